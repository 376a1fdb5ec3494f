//! The [ITokenization] driver this crate's lexer builds on: a state-based tokenizer
//! that switches its active lexeme set as [StateMixin](crate::lexeme::StateMixin)/
//! [ThunkStateMixin](crate::lexeme::ThunkStateMixin) push and pop a shared state stack.

use crate::log::Log;
use crate::position::Code;
use crate::{ILexeme, ITokenization, Lex, ParseError, TokenImpl};
use std::fmt::Debug;
use std::rc::Rc;

/// State-based tokenizer: each state owns its own ordered list of lexeme utilities.
///
/// A [StateMixin](crate::lexeme::StateMixin) or
/// [ThunkStateMixin](crate::lexeme::ThunkStateMixin) lexeme pushes, pops, or swaps the
/// top of the shared state stack; after each token the driver looks at the stack top and
/// switches analyzer sets if it changed. This is the mechanism the crate's lexer uses to
/// fall into template-literal mode on a backtick and climb back out on the matching one.
pub struct CombinedTokenizer<TT = i8, TS = u8> {
    analyzers: Vec<(TS, Vec<Rc<dyn ILexeme<Token = TT, State = TS>>>)>,
    default_state: TS,
    debug: Option<Log<&'static str>>,
}

impl<TT, TS: Ord + Eq + Copy> CombinedTokenizer<TT, TS> {
    pub fn new(default_state: TS, lexemes: Vec<Rc<dyn ILexeme<Token = TT, State = TS>>>) -> Self {
        Self {
            analyzers: vec![(default_state, lexemes)],
            default_state,
            debug: None,
        }
    }

    pub fn add_state(&mut self, state: TS, lexemes: Vec<Rc<dyn ILexeme<Token = TT, State = TS>>>) {
        let index = match self.analyzers.binary_search_by_key(&state, |a| a.0) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        self.analyzers.insert(index, (state, lexemes));
    }

    pub fn set_log(&mut self, log_label: Log<&'static str>) {
        self.debug = Some(log_label);
    }
}

impl<TToken: TokenImpl, TState: Copy + Debug + Ord + Eq> ITokenization for CombinedTokenizer<TToken, TState> {
    type Token = TToken;

    fn tokenize(&self, code: &Code) -> Result<Vec<Lex<TToken>>, ParseError> {
        let mut tokenized_stream: Vec<Lex<TToken>> = Vec::new();
        let mut pointer: usize = 0;
        let eof_pointer: usize = code.value.len();

        let mut state_stack = Vec::<TState>::new();
        let mut current_state = self.default_state;
        let mut current_analyzer = match self
            .analyzers
            .binary_search_by_key(&&current_state, |(b, _)| b)
        {
            Ok(index) => &self.analyzers[index],
            Err(_) => panic!("Tokenizer state {:?} has no registered lexeme set", current_state),
        };

        #[cfg(debug_assertions)]
        let debug = self.debug.unwrap_or(Log::None);
        #[cfg(debug_assertions)]
        if debug.order() >= Log::Verbose(()).order() {
            println!("Begin tokenization in state {:?}", current_state);
        }

        loop {
            match current_analyzer
                .1
                .iter()
                .find_map(|lexer| lexer.consume(code, pointer, &tokenized_stream, &mut state_stack))
            {
                Some(lex_data) => {
                    debug_assert_eq!(pointer, lex_data.start);
                    pointer = lex_data.end;
                    tokenized_stream.push(lex_data);

                    if pointer == eof_pointer {
                        #[cfg(debug_assertions)]
                        if debug.order() >= Log::Success(()).order() {
                            println!("[{}; tokenization success]", debug);
                        }
                        tokenized_stream.push(Lex::new(TToken::eof(), eof_pointer, eof_pointer));
                        return Ok(tokenized_stream);
                    }
                }
                None => {
                    #[cfg(debug_assertions)]
                    if debug.order() >= Log::Default(()).order() {
                        println!(
                            "{}: tokenization failed in state {:?} at {}",
                            debug,
                            current_state,
                            code.obtain_position(pointer)
                        );
                    }
                    return Err(ParseError::new(
                        pointer,
                        format!("Failed to tokenize code @ {}", code.obtain_position(pointer)),
                    ));
                }
            }

            let latest_state = state_stack.last().copied().unwrap_or(self.default_state);
            if latest_state != current_state {
                current_analyzer = match self
                    .analyzers
                    .binary_search_by_key(&latest_state, |(b, _)| *b)
                {
                    Ok(index) => &self.analyzers[index],
                    Err(_) => panic!("Tokenizer state {:?} has no registered lexeme set", latest_state),
                };
                #[cfg(debug_assertions)]
                if debug.order() >= Log::Default(()).order() {
                    println!(
                        "{}: switching state {:?} -> {:?} at {}",
                        debug,
                        current_state,
                        latest_state,
                        code.obtain_position(pointer)
                    );
                }
                current_state = latest_state;
            }
        }
    }
}
