//! Automatic Semicolon Insertion.
//!
//! [AsiEngine] sits between [lexer::tokenize](crate::lexer::tokenize) and the parser. It
//! does not decide on its own where semicolons belong — that decision stays with the
//! parser, which is the only component that knows when a token fails to fit the current
//! production. Instead the engine tracks the context a bare token stream loses (paren and
//! brace nesting, what an open `(`/`{` is *for*) and answers two questions the parser asks
//! as it goes: "may I treat end-of-statement here as a virtual semicolon" and "does this
//! keyword force one regardless of what follows".
//!
//! The one piece of real lookahead it performs unprompted is recognising an arrow
//! function head: a `(` can only be told apart from a parenthesized expression by finding
//! its matching `)` and checking whether `=>` follows, so the engine scans ahead itself
//! and replaces the `(` with a synthetic [TokenKind::ArrowHead], re-queuing the original
//! paren to be re-read immediately after.

use std::collections::VecDeque;

use crate::error::{ParserError, PendingQueueOverflow};
use crate::token::{Token, TokenKind};

/// Upper bound on tokens re-queued by arrow-head lookahead before the next real pull.
/// Only one token is ever queued per lookahead in practice; the bound exists so a defect
/// that queues in a loop fails loudly instead of growing without limit.
const PENDING_QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParenKind {
    Plain,
    Control,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceKind {
    Block,
    Object,
    Function,
}

/// The stateful adapter described in the module documentation.
pub struct AsiEngine {
    tokens: Vec<Token>,
    pos: usize,
    queue: VecDeque<Token>,

    paren_depth: i32,
    paren_kind_stack: Vec<ParenKind>,
    brace_stack: Vec<BraceKind>,

    prev_token: Option<Token>,
    expects_statement: bool,
    expect_function_paren: bool,
    pending_function_body: bool,
    last_closed_control: bool,
    last_closed_function: bool,
    last_closed_paren: bool,
    async_allows_function_decl: bool,

    module_mode: bool,
}

impl AsiEngine {
    pub fn new(tokens: Vec<Token>, module_mode: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            queue: VecDeque::new(),
            paren_depth: 0,
            paren_kind_stack: Vec::new(),
            brace_stack: Vec::new(),
            prev_token: None,
            expects_statement: true,
            expect_function_paren: false,
            pending_function_body: false,
            last_closed_control: false,
            last_closed_function: false,
            last_closed_paren: false,
            async_allows_function_decl: false,
            module_mode,
        }
    }

    pub fn is_module(&self) -> bool {
        self.module_mode
    }

    /// Paren/bracket nesting the current position sits inside. Semicolon insertion is
    /// never legal while this is nonzero: a line terminator inside a
    /// `for (...)` header or a call's argument list never ends a statement.
    pub fn paren_depth(&self) -> i32 {
        self.paren_depth
    }

    /// Whether `true` was returned for `function` because it appeared directly after
    /// `async` with no line terminator between them — the parser uses this to build an
    /// async function declaration/expression instead of treating `async` as a plain
    /// identifier.
    pub fn async_allows_function_decl(&self) -> bool {
        self.async_allows_function_decl
    }

    /// Whether a virtual semicolon may be inserted immediately before `token`: one of the
    /// three ASI triggers holds (a preceding line terminator, `token` is `}`, or `token`
    /// is end of input) and nesting doesn't forbid it.
    pub fn may_insert_semicolon(&self, token: &Token) -> bool {
        self.paren_depth == 0
            && (token.newline_before || token.kind == TokenKind::RBrace || token.kind == TokenKind::Eof)
    }

    /// The restricted-production rule: a line terminator between a
    /// restricted keyword (`return`, `break`, `continue`, `throw`, `yield`) — or a
    /// restricted postfix operator's operand — and the following token forces a semicolon
    /// even where the grammar would otherwise allow the production to continue.
    pub fn is_restricted_production(&self, keyword: &Token, next: &Token) -> bool {
        keyword.kind.is_restricted_production_keyword() && next.newline_before
    }

    /// Pull the next adapted token, advancing all internal bookkeeping.
    pub fn next_token(&mut self) -> Result<Token, ParserError> {
        let tok = self.pull_raw()?;
        self.advance_state(&tok);
        Ok(tok)
    }

    fn pull_raw(&mut self) -> Result<Token, ParserError> {
        if let Some(tok) = self.queue.pop_front() {
            return Ok(tok);
        }

        let idx = self.pos;
        let mut tok = if idx < self.tokens.len() {
            self.pos += 1;
            self.tokens[idx].clone()
        } else {
            self.tokens.last().cloned().expect("token stream always ends with Eof")
        };

        if !self.module_mode && matches!(tok.kind, TokenKind::Import | TokenKind::Export) {
            let text = if tok.kind == TokenKind::Import { "import" } else { "export" };
            tok = Token::new(TokenKind::Identifier, text.to_string(), tok.position, tok.newline_before);
        }

        if tok.kind == TokenKind::LParen && self.permits_expression_start() && self.has_arrow_head(self.pos) {
            self.enqueue(tok)?;
            let real_paren = self.queue.front().expect("just enqueued");
            return Ok(Token::new(
                TokenKind::ArrowHead,
                "(".to_string(),
                real_paren.position,
                real_paren.newline_before,
            ));
        }

        if tok.kind == TokenKind::Function && self.expects_statement {
            tok.kind = TokenKind::FunctionDecl;
        }

        Ok(tok)
    }

    fn enqueue(&mut self, token: Token) -> Result<(), ParserError> {
        if self.queue.len() >= PENDING_QUEUE_CAPACITY {
            return Err(ParserError::syntax(
                token.position,
                PendingQueueOverflow { capacity: PENDING_QUEUE_CAPACITY }.to_string(),
            ));
        }
        self.queue.push_back(token);
        Ok(())
    }

    fn permits_expression_start(&self) -> bool {
        self.prev_token.as_ref().map_or(true, |t| t.kind.permits_regex_after())
    }

    /// Unbounded balanced-paren scan: starting just past the `(` at `start`, find its
    /// matching `)` and report whether `=>` immediately follows it.
    fn has_arrow_head(&self, start: usize) -> bool {
        let mut depth = 1i32;
        let mut j = start;
        while j < self.tokens.len() {
            match self.tokens[j].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.tokens.get(j + 1).map_or(false, |t| t.kind == TokenKind::Arrow);
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            j += 1;
        }
        false
    }

    fn advance_state(&mut self, tok: &Token) {
        let closed_control = self.last_closed_control;
        self.last_closed_control = false;
        self.last_closed_function = false;
        self.last_closed_paren = false;

        match tok.kind {
            TokenKind::ArrowHead => {
                self.expects_statement = false;
            }
            TokenKind::LParen => {
                let prev_kind = self.prev_token.as_ref().map(|t| t.kind);
                let kind = if prev_kind == Some(TokenKind::ArrowHead) || self.expect_function_paren {
                    ParenKind::Function
                } else if matches!(
                    prev_kind,
                    Some(TokenKind::If)
                        | Some(TokenKind::For)
                        | Some(TokenKind::While)
                        | Some(TokenKind::Switch)
                        | Some(TokenKind::Catch)
                        | Some(TokenKind::With)
                ) {
                    ParenKind::Control
                } else {
                    ParenKind::Plain
                };
                self.expect_function_paren = false;
                self.paren_kind_stack.push(kind);
                self.paren_depth += 1;
                self.expects_statement = false;
            }
            TokenKind::RParen => {
                if let Some(kind) = self.paren_kind_stack.pop() {
                    self.paren_depth -= 1;
                    match kind {
                        ParenKind::Control => self.last_closed_control = true,
                        ParenKind::Function => {
                            self.last_closed_function = true;
                            self.pending_function_body = true;
                        }
                        ParenKind::Plain => self.last_closed_paren = true,
                    }
                }
                self.expects_statement = false;
            }
            TokenKind::LBrace => {
                let kind = if self.pending_function_body {
                    self.pending_function_body = false;
                    BraceKind::Function
                } else if self.expects_statement || closed_control {
                    BraceKind::Block
                } else {
                    BraceKind::Object
                };
                self.expects_statement = !matches!(kind, BraceKind::Object);
                self.brace_stack.push(kind);
            }
            TokenKind::RBrace => {
                let popped = self.brace_stack.pop();
                self.expects_statement = matches!(popped, Some(BraceKind::Block) | Some(BraceKind::Function));
            }
            TokenKind::Semicolon => {
                self.expects_statement = true;
            }
            TokenKind::Function | TokenKind::FunctionDecl => {
                self.async_allows_function_decl =
                    matches!(self.prev_token.as_ref(), Some(t) if t.kind == TokenKind::Async) && !tok.newline_before;
                self.expect_function_paren = true;
                self.expects_statement = false;
            }
            // Leaves `expects_statement` untouched: `async` never stands on its own as a
            // statement, so a `function` immediately following one seen at statement
            // position must still be reclassified as `FunctionDecl`.
            TokenKind::Async => {}
            _ => {
                self.expects_statement = false;
            }
        }

        self.prev_token = Some(tok.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn tok(kind: TokenKind, newline_before: bool) -> Token {
        Token::new(kind, String::new(), Position::new(1, 1), newline_before)
    }

    fn run(tokens: Vec<Token>) -> Vec<Token> {
        let mut engine = AsiEngine::new(tokens, false);
        let mut out = Vec::new();
        loop {
            let t = engine.next_token().unwrap();
            let done = t.kind == TokenKind::Eof;
            out.push(t);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn arrow_head_is_detected_and_paren_replayed() {
        let tokens = vec![
            tok(TokenKind::LParen, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::RParen, false),
            tok(TokenKind::Arrow, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::Eof, false),
        ];
        let out = run(tokens);
        assert_eq!(out[0].kind, TokenKind::ArrowHead);
        assert_eq!(out[1].kind, TokenKind::LParen);
        assert_eq!(out[2].kind, TokenKind::Identifier);
        assert_eq!(out[3].kind, TokenKind::RParen);
        assert_eq!(out[4].kind, TokenKind::Arrow);
    }

    #[test]
    fn call_expression_paren_is_not_an_arrow_head() {
        let tokens = vec![
            tok(TokenKind::Identifier, false),
            tok(TokenKind::LParen, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::RParen, false),
            tok(TokenKind::Semicolon, false),
            tok(TokenKind::Eof, false),
        ];
        let out = run(tokens);
        assert!(out.iter().all(|t| t.kind != TokenKind::ArrowHead));
    }

    #[test]
    fn function_keyword_at_statement_position_becomes_function_decl() {
        let tokens = vec![
            tok(TokenKind::Function, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::LParen, false),
            tok(TokenKind::RParen, false),
            tok(TokenKind::LBrace, false),
            tok(TokenKind::RBrace, false),
            tok(TokenKind::Eof, false),
        ];
        let out = run(tokens);
        assert_eq!(out[0].kind, TokenKind::FunctionDecl);
    }

    #[test]
    fn function_keyword_in_expression_position_stays_function() {
        let tokens = vec![
            tok(TokenKind::Var, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::Assign, false),
            tok(TokenKind::Function, false),
            tok(TokenKind::LParen, false),
            tok(TokenKind::RParen, false),
            tok(TokenKind::LBrace, false),
            tok(TokenKind::RBrace, false),
            tok(TokenKind::Semicolon, false),
            tok(TokenKind::Eof, false),
        ];
        let out = run(tokens);
        assert_eq!(out[3].kind, TokenKind::Function);
    }

    #[test]
    fn may_insert_semicolon_suppressed_inside_parens() {
        let tokens = vec![
            tok(TokenKind::For, false),
            tok(TokenKind::LParen, false),
            tok(TokenKind::Semicolon, false),
            tok(TokenKind::Semicolon, true),
            tok(TokenKind::RParen, false),
            tok(TokenKind::Semicolon, false),
            tok(TokenKind::Eof, false),
        ];
        let mut engine = AsiEngine::new(tokens, false);
        engine.next_token().unwrap(); // for
        engine.next_token().unwrap(); // (
        assert_eq!(engine.paren_depth(), 1);
        let second = engine.next_token().unwrap();
        assert!(!engine.may_insert_semicolon(&second));
    }

    #[test]
    fn if_body_brace_is_a_block() {
        let tokens = vec![
            tok(TokenKind::If, false),
            tok(TokenKind::LParen, false),
            tok(TokenKind::Identifier, false),
            tok(TokenKind::RParen, false),
            tok(TokenKind::LBrace, false),
            tok(TokenKind::RBrace, false),
            tok(TokenKind::Eof, false),
        ];
        let mut engine = AsiEngine::new(tokens, false);
        for _ in 0..4 {
            engine.next_token().unwrap();
        }
        assert_eq!(engine.pending_function_body, false);
        let brace = engine.next_token().unwrap();
        assert_eq!(brace.kind, TokenKind::LBrace);
    }
}
