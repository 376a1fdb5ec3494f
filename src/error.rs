use std::fmt::{Display, Formatter};

use crate::position::Position;

/// A single syntactic failure recorded by the lexer, the ASI engine, or the parser.
///
/// `Display` renders the message alone; a location prefix is added by the diagnostics
/// sink (see [crate::diagnostics]) since the sink, not the error, knows the file label.
#[derive(Debug, Clone)]
pub struct ParserError {
    pub position: Position,
    pub message: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    RestrictedProduction,
    Syntax,
}

impl ParserError {
    pub fn lexical(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            kind: ErrorKind::Lexical,
        }
    }
    pub fn restricted(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            kind: ErrorKind::RestrictedProduction,
        }
    }
    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            kind: ErrorKind::Syntax,
        }
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Fatal internal error: the ASI engine's bounded pending queue overflowed.
///
/// This crate never panics on attacker-controlled input, so it surfaces as an `Err` at
/// the public API boundary instead of aborting the process.
#[derive(Debug, Clone)]
pub struct PendingQueueOverflow {
    pub capacity: usize,
}

impl Display for PendingQueueOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ASI pending queue exceeded its capacity of {} tokens",
            self.capacity
        )
    }
}
