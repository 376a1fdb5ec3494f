use std::fmt::{Display, Formatter};

/// Leveled debug-trace label threaded through the lexer, state tokenizer, and ASI engine.
///
/// Each stage is handed an optional `Log<&'static str>` so a developer chasing a
/// mis-tokenized template literal or a wrong ASI decision can opt into tracing without a
/// debugger. Ordered `None < Default < Success < Result < Verbose`; every print site is
/// gated behind `#[cfg(debug_assertions)]` so release builds pay nothing for it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}
