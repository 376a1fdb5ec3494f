//! A syntactic front-end for a common ECMAScript subset: a stateful lexer, an
//! Automatic-Semicolon-Insertion adapter sitting between lexer and parser, and a
//! hand-written recursive-descent parser building a typed abstract syntax tree.
//!
//! # Overview
//!
//! Three cooperating stages turn source text into an [ast::Program]:
//!
//! - [lexer] scans UTF-8 source into a flat token stream, resolving the
//!   regex-vs-division ambiguity and re-entering template literal substitutions using the
//!   state-stack tokenizer utilities in [lexeme].
//! - [asi] interposes between the raw token stream and the parser: it tracks paren and
//!   brace nesting, performs unbounded look-ahead to recognise arrow-function heads, and
//!   inserts synthetic semicolons per the restricted-production and no-LineTerminator rules.
//! - [parser] consumes the adapted stream and reduces it into [ast] nodes, counting
//!   distinct errors rather than aborting on the first one.
//!
//! [diagnostics] provides the error sink used by the CLI binary; [token] defines the
//! shared terminal alphabet all three stages agree on.
//!
//! # Example
//!
//! ```
//! use js_syntax::parser::Parser;
//!
//! let mut parser = Parser::new("var x = 1 + 2;", true);
//! let program = parser.parse();
//! assert_eq!(parser.error_count(), 0);
//! assert_eq!(program.body.len(), 1);
//! ```

mod field_tree;
mod lex;
pub mod log;
pub mod position;
pub mod tokenization;

pub mod ast;
pub mod asi;
pub mod diagnostics;
pub mod error;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod token;

#[cfg(test)]
mod __tests__;

use std::fmt::Debug;

pub use lex::Lex;
pub use log::Log;
pub use position::{Code, Position};

/// Implemented by a token kind so generic tokenizer utilities know its end-of-file
/// sentinel and which tokens carry no grammatical meaning (whitespace, comments).
pub trait TokenImpl: Copy + Debug + Eq + Ord {
    fn eof() -> Self;
    fn is_structural(&self) -> bool;
}

/// An interface implemented by every lexeme utility, the primary building block of a
/// tokenizer: given a position in the buffer, try to consume a token starting there.
pub trait ILexeme {
    type Token: Copy + Debug + Eq + Ord;
    type State: Copy + Debug + Eq + Ord;

    fn consume(
        &self,
        code: &Code,
        pointer: usize,
        tokenized_stream: &Vec<Lex<Self::Token>>,
        state_stack: &mut Vec<Self::State>,
    ) -> Option<Lex<Self::Token>>;

    fn get_grammar_field(&self) -> Vec<(Self::Token, String)>;
}

/// Implemented by [tokenization::CombinedTokenizer]: turn a whole buffer into a token
/// stream in one pass.
pub trait ITokenization {
    type Token;
    fn tokenize(&self, code: &Code) -> Result<Vec<Lex<Self::Token>>, ParseError>;
}

/// A tokenization failure: no lexeme utility matched at `pointer`.
#[derive(Debug)]
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pointer: usize, message: String) -> Self {
        Self { pointer, message }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Clone, Debug)]
struct FieldTree<T> {
    token: Option<T>,
    children: Vec<(u8, FieldTree<T>)>,
}
