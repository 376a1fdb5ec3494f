use std::fmt::{Debug, Display, Formatter};

/// One element of a tokenized stream: a token kind paired with its byte span.
///
/// The lexeme does not borrow the source slice it spans; callers that need the text
/// index back into the original buffer with `start..end`.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Lex<TToken> {
    pub token: TToken,
    pub start: usize,
    pub end: usize,
}

impl<TToken> Lex<TToken> {
    pub fn new(token: TToken, start: usize, end: usize) -> Self {
        Self { token, start, end }
    }
}

impl<TToken: Debug> Display for Lex<TToken> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("").field(&self.token).field(&self.start).field(&self.end).finish()
    }
}
