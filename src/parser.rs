//! Recursive-descent parser. Drives [lexer::tokenize] through [AsiEngine] and builds the
//! typed [ast::Node] tree one statement at a time.
//!
//! Every `parse_*` method is infallible in the Rust sense: a malformed construct is recorded
//! through [Parser::record_error] and a best-effort placeholder node is returned so that
//! parsing can keep going past the first mistake rather than aborting the whole file. This
//! mirrors how a human reading broken source would keep scanning for more problems instead
//! of stopping at the first one.

use crate::ast::{self, Literal, ListBuilder, Node, Program, VarKind};
use crate::asi::AsiEngine;
use crate::error::ParserError;
use crate::lexer;
use crate::token::{Token, TokenKind};

pub struct Parser {
    engine: AsiEngine,
    current: Token,
    peek: Token,
    no_in: bool,
    errors: Vec<ParserError>,
    ast: Option<Program>,
}

impl Parser {
    pub fn new(source: &str, module_mode: bool) -> Self {
        let mut errors = Vec::new();
        let tokens = match lexer::tokenize(source) {
            Ok(tokens) => tokens,
            Err(err) => {
                let eof = Token::new(TokenKind::Eof, String::new(), err.position, false);
                errors.push(err);
                vec![eof]
            }
        };
        let mut engine = AsiEngine::new(tokens, module_mode);
        let current = pull(&mut engine, &mut errors);
        let peek = pull(&mut engine, &mut errors);
        Self { engine, current, peek, no_in: false, errors, ast: None }
    }

    pub fn is_module(&self) -> bool {
        self.engine.is_module()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn reset_error_count(&mut self) {
        self.errors.clear();
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn take_ast(&mut self) -> Option<Program> {
        self.ast.take()
    }

    pub fn parse(&mut self) -> Program {
        let mut body = ListBuilder::new();
        while self.current.kind != TokenKind::Eof {
            body.append(self.parse_statement());
        }
        let program = Program { body: body.build() };
        self.ast = Some(Program { body: program.body.clone() });
        program
    }

    // -- token plumbing --------------------------------------------------

    fn bump(&mut self) -> Token {
        let next = pull(&mut self.engine, &mut self.errors);
        let old_current = std::mem::replace(&mut self.current, std::mem::replace(&mut self.peek, next));
        old_current
    }

    fn expect(&mut self, kind: TokenKind) -> Token {
        if self.current.kind == kind {
            self.bump()
        } else {
            self.record_error(format!("expected {:?} but found {:?}", kind, self.current.kind));
            self.current.clone()
        }
    }

    /// `of` is a contextual keyword (like `as`/`from`), not a reserved word, so the lexer
    /// hands it back as a plain `Identifier`.
    fn at_of(&self) -> bool {
        self.current.kind == TokenKind::Identifier && self.current.lexeme == "of"
    }

    fn expect_contextual(&mut self, word: &str) {
        if self.current.kind == TokenKind::Identifier && self.current.lexeme == word {
            self.bump();
        } else {
            self.record_error(format!("expected '{word}' but found {:?}", self.current.kind));
        }
    }

    fn consume_semicolon(&mut self) {
        if self.current.kind == TokenKind::Semicolon {
            self.bump();
            return;
        }
        if self.engine.may_insert_semicolon(&self.current) {
            return;
        }
        self.record_error(format!("expected ';' but found {:?}", self.current.kind));
    }

    fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(ParserError::syntax(self.current.position, message));
    }

    fn resync_to_statement_boundary(&mut self) {
        while !matches!(self.current.kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof) {
            self.bump();
        }
        if self.current.kind == TokenKind::Semicolon {
            self.bump();
        }
    }

    // -- statements -------------------------------------------------------

    fn parse_statement(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Semicolon => {
                self.bump();
                Node::EmptyStmt
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => self.parse_var_statement(),
            TokenKind::FunctionDecl => self.parse_function(true),
            TokenKind::Async if self.peek.kind == TokenKind::FunctionDecl => self.parse_function(true),
            TokenKind::Class => self.parse_class(true),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Try => self.parse_try(),
            TokenKind::With => self.parse_with(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Import if !matches!(self.peek.kind, TokenKind::LParen | TokenKind::Dot) => {
                self.parse_import()
            }
            TokenKind::Export => self.parse_export(),
            TokenKind::Identifier if self.peek.kind == TokenKind::Colon => self.parse_labeled_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> Node {
        self.expect(TokenKind::LBrace);
        let mut body = ListBuilder::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            body.append(self.parse_statement());
        }
        self.expect(TokenKind::RBrace);
        Node::Block { body: body.build() }
    }

    fn parse_labeled_statement(&mut self) -> Node {
        let label = self.current.lexeme.clone();
        self.bump();
        self.bump(); // `:`
        let body = self.parse_statement();
        Node::Labeled { label, body: Box::new(body) }
    }

    fn parse_expression_statement(&mut self) -> Node {
        let expr = self.parse_expression();
        self.consume_semicolon();
        Node::ExpressionStmt { expr: Box::new(expr) }
    }

    fn parse_var_statement(&mut self) -> Node {
        let kind = var_kind_of(self.current.kind);
        self.bump();
        let mut decls = ListBuilder::new();
        decls.append(self.parse_one_binding(kind));
        while self.current.kind == TokenKind::Comma {
            self.bump();
            decls.append(self.parse_one_binding(kind));
        }
        self.consume_semicolon();
        Node::VarStmt { kind, decls: decls.build() }
    }

    /// A top-level `let`/`const`/`var` declarator: always wrapped in a `BindingPattern`,
    /// whether or not it carries an initializer. `const` requires one.
    fn parse_one_binding(&mut self, kind: VarKind) -> Node {
        let target = self.parse_binding_target();
        let init = if self.current.kind == TokenKind::Assign {
            self.bump();
            Some(Box::new(self.parse_assignment_expression()))
        } else {
            if kind == VarKind::Const {
                self.record_error("missing initializer in const declaration");
            }
            None
        };
        Node::VarDecl { binding: Box::new(Node::BindingPattern { target: Box::new(target), init }) }
    }

    fn parse_if(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen);
        let test = self.parse_expression();
        self.expect(TokenKind::RParen);
        let consequent = self.parse_statement();
        let alternate = if self.current.kind == TokenKind::Else {
            self.bump();
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Node::If { test: Box::new(test), consequent: Box::new(consequent), alternate }
    }

    fn parse_while(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen);
        let test = self.parse_expression();
        self.expect(TokenKind::RParen);
        let body = self.parse_statement();
        Node::While { test: Box::new(test), body: Box::new(body) }
    }

    fn parse_do_while(&mut self) -> Node {
        self.bump();
        let body = self.parse_statement();
        self.expect(TokenKind::While);
        self.expect(TokenKind::LParen);
        let test = self.parse_expression();
        self.expect(TokenKind::RParen);
        self.consume_semicolon();
        Node::DoWhile { test: Box::new(test), body: Box::new(body) }
    }

    fn parse_for(&mut self) -> Node {
        self.bump();
        let is_await = if self.current.kind == TokenKind::Await {
            self.bump();
            true
        } else {
            false
        };
        self.expect(TokenKind::LParen);

        if self.current.kind == TokenKind::Semicolon {
            self.bump();
            return self.parse_for_rest(None);
        }

        if matches!(self.current.kind, TokenKind::Var | TokenKind::Let | TokenKind::Const) {
            let kind = var_kind_of(self.current.kind);
            self.bump();
            let target = self.parse_binding_target();
            if self.current.kind == TokenKind::In || self.at_of() {
                let decl = Node::VarDecl {
                    binding: Box::new(Node::BindingPattern { target: Box::new(target), init: None }),
                };
                return self.parse_for_in_of(Node::VarStmt { kind, decls: vec![decl] }, is_await);
            }
            let init = if self.current.kind == TokenKind::Assign {
                self.bump();
                Some(Box::new(self.parse_assignment_expression()))
            } else {
                if kind == VarKind::Const {
                    self.record_error("missing initializer in const declaration");
                }
                None
            };
            let mut decls = vec![Node::VarDecl {
                binding: Box::new(Node::BindingPattern { target: Box::new(target), init }),
            }];
            while self.current.kind == TokenKind::Comma {
                self.bump();
                decls.push(self.parse_one_binding(kind));
            }
            self.expect(TokenKind::Semicolon);
            return self.parse_for_rest(Some(Box::new(Node::VarStmt { kind, decls })));
        }

        self.no_in = true;
        let expr = self.parse_expression();
        self.no_in = false;
        if self.current.kind == TokenKind::In || self.at_of() {
            return self.parse_for_in_of(expr, is_await);
        }
        self.expect(TokenKind::Semicolon);
        self.parse_for_rest(Some(Box::new(Node::ExpressionStmt { expr: Box::new(expr) })))
    }

    fn parse_for_rest(&mut self, init: Option<Box<Node>>) -> Node {
        let test = if self.current.kind == TokenKind::Semicolon {
            None
        } else {
            Some(Box::new(self.parse_expression()))
        };
        self.expect(TokenKind::Semicolon);
        let update = if self.current.kind == TokenKind::RParen {
            None
        } else {
            Some(Box::new(self.parse_expression()))
        };
        self.expect(TokenKind::RParen);
        let body = self.parse_statement();
        Node::For { init, test, update, body: Box::new(body) }
    }

    fn parse_for_in_of(&mut self, left: Node, is_await: bool) -> Node {
        let is_of = self.at_of();
        self.bump(); // `in` / `of`
        let right = self.parse_assignment_expression();
        self.expect(TokenKind::RParen);
        let body = self.parse_statement();
        if is_of {
            Node::ForOf { left: Box::new(left), right: Box::new(right), body: Box::new(body), is_await }
        } else {
            Node::ForIn { left: Box::new(left), right: Box::new(right), body: Box::new(body) }
        }
    }

    fn parse_switch(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen);
        let discriminant = self.parse_expression();
        self.expect(TokenKind::RParen);
        self.expect(TokenKind::LBrace);
        let mut cases = ListBuilder::new();
        let mut seen_default = false;
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            let (test, is_default) = if self.current.kind == TokenKind::Case {
                self.bump();
                let test = self.parse_expression();
                (Some(Box::new(test)), false)
            } else if self.current.kind == TokenKind::Default {
                self.bump();
                if seen_default {
                    self.record_error("multiple default clauses in switch");
                }
                seen_default = true;
                (None, true)
            } else {
                self.record_error(format!("expected 'case' or 'default', found {:?}", self.current.kind));
                self.resync_to_statement_boundary();
                continue;
            };
            self.expect(TokenKind::Colon);
            let mut consequents = ListBuilder::new();
            while !matches!(self.current.kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof) {
                consequents.append(self.parse_statement());
            }
            cases.append(Node::SwitchCase { test, consequents: consequents.build(), is_default });
        }
        self.expect(TokenKind::RBrace);
        Node::Switch { discriminant: Box::new(discriminant), cases: cases.build() }
    }

    fn parse_try(&mut self) -> Node {
        self.bump();
        let block = self.parse_block();
        let handler = if self.current.kind == TokenKind::Catch {
            self.bump();
            let param = if self.current.kind == TokenKind::LParen {
                self.bump();
                let target = self.parse_binding_target();
                self.expect(TokenKind::RParen);
                Some(Box::new(target))
            } else {
                None
            };
            let body = self.parse_block();
            Some(Box::new(Node::Catch { param, body: Box::new(body) }))
        } else {
            None
        };
        let finalizer = if self.current.kind == TokenKind::Finally {
            self.bump();
            Some(Box::new(self.parse_block()))
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            self.record_error("missing catch or finally after try block");
        }
        Node::Try { block: Box::new(block), handler, finalizer }
    }

    fn parse_with(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen);
        let object = self.parse_expression();
        self.expect(TokenKind::RParen);
        let body = self.parse_statement();
        Node::With { object: Box::new(object), body: Box::new(body) }
    }

    fn parse_break(&mut self) -> Node {
        self.bump();
        let label = self.parse_optional_label();
        self.consume_semicolon();
        Node::Break { label }
    }

    fn parse_continue(&mut self) -> Node {
        self.bump();
        let label = self.parse_optional_label();
        self.consume_semicolon();
        Node::Continue { label }
    }

    fn parse_optional_label(&mut self) -> Option<String> {
        if !self.current.newline_before && self.current.kind == TokenKind::Identifier {
            let name = self.current.lexeme.clone();
            self.bump();
            Some(name)
        } else {
            None
        }
    }

    fn parse_return(&mut self) -> Node {
        self.bump();
        let arg = if self.current.newline_before
            || matches!(self.current.kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof)
        {
            None
        } else {
            Some(Box::new(self.parse_expression()))
        };
        self.consume_semicolon();
        Node::Return { arg }
    }

    fn parse_throw(&mut self) -> Node {
        self.bump();
        if self.current.newline_before {
            self.record_error("illegal newline after 'throw'");
        }
        let arg = self.parse_expression();
        self.consume_semicolon();
        Node::Throw { arg: Box::new(arg) }
    }

    fn parse_import(&mut self) -> Node {
        self.bump();
        let mut specifiers = ListBuilder::new();
        if self.current.kind == TokenKind::String {
            let source = strip_quotes(&self.current.lexeme);
            self.bump();
            self.consume_semicolon();
            return Node::ImportDecl { specifiers: specifiers.build(), source };
        }
        if self.current.kind == TokenKind::Identifier {
            let local = self.current.lexeme.clone();
            self.bump();
            specifiers.append(Node::ImportSpecifier { local, imported: None, is_namespace: false, is_default: true });
            if self.current.kind == TokenKind::Comma {
                self.bump();
            }
        }
        if self.current.kind == TokenKind::Star {
            self.bump();
            self.expect_contextual("as");
            let local = self.current.lexeme.clone();
            self.bump();
            specifiers.append(Node::ImportSpecifier { local, imported: None, is_namespace: true, is_default: false });
        } else if self.current.kind == TokenKind::LBrace {
            self.bump();
            while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
                let imported = self.current.lexeme.clone();
                self.bump();
                let local = if self.current.kind == TokenKind::Identifier && self.current.lexeme == "as" {
                    self.bump();
                    let name = self.current.lexeme.clone();
                    self.bump();
                    name
                } else {
                    imported.clone()
                };
                specifiers.append(Node::ImportSpecifier {
                    local,
                    imported: Some(imported),
                    is_namespace: false,
                    is_default: false,
                });
                if self.current.kind == TokenKind::Comma {
                    self.bump();
                } else {
                    break;
                }
            }
            self.expect(TokenKind::RBrace);
        }
        self.expect_contextual("from");
        let source = strip_quotes(&self.current.lexeme);
        self.bump();
        self.consume_semicolon();
        Node::ImportDecl { specifiers: specifiers.build(), source }
    }

    fn parse_export(&mut self) -> Node {
        self.bump();
        if self.current.kind == TokenKind::Default {
            self.bump();
            let declaration = self.parse_assignment_expression();
            self.consume_semicolon();
            return Node::ExportDecl {
                declaration: Some(Box::new(Node::ExpressionStmt { expr: Box::new(declaration) })),
                specifiers: Vec::new(),
                source: None,
            };
        }
        if matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const | TokenKind::Function | TokenKind::FunctionDecl | TokenKind::Class
        ) {
            let declaration = self.parse_statement();
            return Node::ExportDecl { declaration: Some(Box::new(declaration)), specifiers: Vec::new(), source: None };
        }
        let mut specifiers = ListBuilder::new();
        self.expect(TokenKind::LBrace);
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            let local = self.current.lexeme.clone();
            self.bump();
            let exported = if self.current.kind == TokenKind::Identifier && self.current.lexeme == "as" {
                self.bump();
                let name = self.current.lexeme.clone();
                self.bump();
                Some(name)
            } else {
                None
            };
            specifiers.append(Node::ExportSpecifier { local, exported });
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        let source = if self.current.kind == TokenKind::Identifier && self.current.lexeme == "from" {
            self.bump();
            let s = strip_quotes(&self.current.lexeme);
            self.bump();
            Some(s)
        } else {
            None
        };
        self.consume_semicolon();
        Node::ExportDecl { declaration: None, specifiers: specifiers.build(), source }
    }

    fn parse_class(&mut self, as_decl: bool) -> Node {
        self.bump();
        let name = if self.current.kind == TokenKind::Identifier {
            let n = self.current.lexeme.clone();
            self.bump();
            Some(n)
        } else {
            None
        };
        let super_class = if self.current.kind == TokenKind::Extends {
            self.bump();
            Some(Box::new(self.parse_call_member_new()))
        } else {
            None
        };
        self.expect(TokenKind::LBrace);
        let mut body = ListBuilder::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Semicolon {
                self.bump();
                continue;
            }
            body.append(self.parse_method_definition());
        }
        self.expect(TokenKind::RBrace);
        if as_decl {
            Node::ClassDecl { name, super_class, body: body.build() }
        } else {
            Node::ClassExpr { name, super_class, body: body.build() }
        }
    }

    fn parse_method_definition(&mut self) -> Node {
        let is_static = self.current.kind == TokenKind::Identifier
            && self.current.lexeme == "static"
            && self.peek.kind != TokenKind::LParen;
        if is_static {
            self.bump();
        }
        let is_async = self.current.kind == TokenKind::Async && self.peek.kind != TokenKind::LParen;
        if is_async {
            self.bump();
        }
        let is_generator = if self.current.kind == TokenKind::Star {
            self.bump();
            true
        } else {
            false
        };
        let mut kind = "method".to_string();
        if self.current.kind == TokenKind::Identifier
            && (self.current.lexeme == "get" || self.current.lexeme == "set")
            && self.peek.kind != TokenKind::LParen
        {
            kind = self.current.lexeme.clone();
            self.bump();
        }
        let key = if self.current.kind == TokenKind::LBracket {
            self.bump();
            let k = self.parse_assignment_expression();
            self.expect(TokenKind::RBracket);
            k
        } else {
            let name = self.current.lexeme.clone();
            self.bump();
            Node::Identifier { name }
        };
        if self.current.kind != TokenKind::LParen {
            return self.parse_field_tail(key);
        }
        let function = self.parse_method_tail(is_async, is_generator);
        Node::MethodDef { kind, is_static, is_generator, is_async, key: Box::new(key), function: Box::new(function) }
    }

    /// A class member whose key isn't followed by `(` is a field declaration rather than
    /// a method: `key;` or `key = expr;`.
    fn parse_field_tail(&mut self, key: Node) -> Node {
        let value = if self.current.kind == TokenKind::Assign {
            self.bump();
            Some(Box::new(self.parse_assignment_expression()))
        } else {
            None
        };
        if self.current.kind == TokenKind::Semicolon {
            self.bump();
        }
        Node::ComputedProperty { key: Box::new(key), value }
    }

    fn parse_method_tail(&mut self, is_async: bool, is_generator: bool) -> Node {
        self.expect(TokenKind::LParen);
        let params = self.parse_params();
        self.expect(TokenKind::RParen);
        let body = self.parse_block();
        Node::FunctionExpr { name: None, params, body: Box::new(body), is_async, is_generator }
    }

    fn parse_function(&mut self, as_decl: bool) -> Node {
        let is_async = if self.current.kind == TokenKind::Async {
            self.bump();
            true
        } else {
            false
        };
        self.bump(); // `function` / `FunctionDecl`
        let is_generator = if self.current.kind == TokenKind::Star {
            self.bump();
            true
        } else {
            false
        };
        let name = if self.current.kind == TokenKind::Identifier {
            let n = self.current.lexeme.clone();
            self.bump();
            Some(n)
        } else {
            None
        };
        self.expect(TokenKind::LParen);
        let params = self.parse_params();
        self.expect(TokenKind::RParen);
        let body = self.parse_block();
        if as_decl {
            Node::FunctionDecl { name, params, body: Box::new(body), is_async, is_generator }
        } else {
            Node::FunctionExpr { name, params, body: Box::new(body), is_async, is_generator }
        }
    }

    fn parse_params(&mut self) -> Vec<Node> {
        let mut params = ListBuilder::new();
        while self.current.kind != TokenKind::RParen && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_binding_target();
                params.append(Node::RestElement { arg: Box::new(arg) });
                break;
            }
            params.append(self.parse_binding_element());
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        params.build()
    }

    // -- binding patterns ---------------------------------------------------

    fn parse_binding_target(&mut self) -> Node {
        match self.current.kind {
            TokenKind::LBrace => self.parse_object_binding(),
            TokenKind::LBracket => self.parse_array_binding(),
            TokenKind::Identifier => {
                let name = self.current.lexeme.clone();
                self.bump();
                Node::Identifier { name }
            }
            _ => {
                self.record_error(format!("expected binding target, found {:?}", self.current.kind));
                Node::Identifier { name: String::new() }
            }
        }
    }

    /// A binding target with an optional default: bare target when there is none, a
    /// `BindingPattern` wrapper only when a default value follows.
    fn parse_binding_element(&mut self) -> Node {
        let target = self.parse_binding_target();
        if self.current.kind == TokenKind::Assign {
            self.bump();
            let init = self.parse_assignment_expression();
            Node::BindingPattern { target: Box::new(target), init: Some(Box::new(init)) }
        } else {
            target
        }
    }

    fn parse_object_binding(&mut self) -> Node {
        self.expect(TokenKind::LBrace);
        let mut properties = ListBuilder::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_binding_target();
                properties.append(Node::RestElement { arg: Box::new(arg) });
                break;
            }
            let key_name = self.current.lexeme.clone();
            let key = Node::Identifier { name: key_name.clone() };
            self.bump();
            let (value, shorthand) = if self.current.kind == TokenKind::Colon {
                self.bump();
                (self.parse_binding_element(), false)
            } else if self.current.kind == TokenKind::Assign {
                self.bump();
                let default = self.parse_assignment_expression();
                (
                    Node::BindingPattern { target: Box::new(Node::Identifier { name: key_name }), init: Some(Box::new(default)) },
                    true,
                )
            } else {
                (Node::Identifier { name: key_name }, true)
            };
            properties.append(Node::BindingProperty { key: Box::new(key), value: Box::new(value), shorthand });
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        Node::ObjectBinding { properties: properties.build() }
    }

    fn parse_array_binding(&mut self) -> Node {
        self.expect(TokenKind::LBracket);
        let mut elements = ListBuilder::new();
        while self.current.kind != TokenKind::RBracket && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Comma {
                elements.append(Node::ArrayHole);
                self.bump();
                continue;
            }
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_binding_target();
                elements.append(Node::RestElement { arg: Box::new(arg) });
                break;
            }
            elements.append(self.parse_binding_element());
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBracket);
        Node::ArrayBinding { elements: elements.build() }
    }

    // -- expressions ----------------------------------------------------------

    fn parse_expression(&mut self) -> Node {
        let mut expr = self.parse_assignment_expression();
        while self.current.kind == TokenKind::Comma {
            self.bump();
            let right = self.parse_assignment_expression();
            expr = ast::make_sequence(expr, right);
        }
        expr
    }

    fn is_arrow_function_start(&self) -> bool {
        match self.current.kind {
            TokenKind::ArrowHead => true,
            TokenKind::Identifier => self.peek.kind == TokenKind::Arrow,
            TokenKind::Async => matches!(self.peek.kind, TokenKind::ArrowHead) || self.peek.kind == TokenKind::Identifier,
            _ => false,
        }
    }

    fn parse_assignment_expression(&mut self) -> Node {
        if self.is_arrow_function_start() {
            return self.parse_arrow_function();
        }
        let left = self.parse_conditional_expression();
        if is_assignment_op(self.current.kind) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_assignment_expression();
            return Node::Assign { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_arrow_function(&mut self) -> Node {
        let is_async = if self.current.kind == TokenKind::Async {
            self.bump();
            true
        } else {
            false
        };
        let params = if self.current.kind == TokenKind::ArrowHead {
            self.bump();
            self.expect(TokenKind::LParen);
            let params = self.parse_params();
            self.expect(TokenKind::RParen);
            params
        } else {
            let name = self.current.lexeme.clone();
            self.bump();
            vec![Node::Identifier { name }]
        };
        self.expect(TokenKind::Arrow);
        let (body, expression_body) = if self.current.kind == TokenKind::LBrace {
            (self.parse_block(), false)
        } else {
            (self.parse_assignment_expression(), true)
        };
        Node::ArrowFunction { params, body: Box::new(body), is_async, expression_body }
    }

    fn parse_conditional_expression(&mut self) -> Node {
        let test = self.parse_logical_or();
        if self.current.kind == TokenKind::Question {
            self.bump();
            let consequent = self.parse_assignment_expression();
            self.expect(TokenKind::Colon);
            let alternate = self.parse_assignment_expression();
            return Node::Conditional { test: Box::new(test), consequent: Box::new(consequent), alternate: Box::new(alternate) };
        }
        test
    }

    fn parse_logical_or(&mut self) -> Node {
        let mut left = self.parse_logical_and();
        while matches!(self.current.kind, TokenKind::OrOr | TokenKind::NullishCoalesce) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_logical_and();
            left = Node::Logical { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_logical_and(&mut self) -> Node {
        let mut left = self.parse_bitwise_or();
        while self.current.kind == TokenKind::AndAnd {
            self.bump();
            let right = self.parse_bitwise_or();
            left = Node::Logical { op: "&&".to_string(), left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_bitwise_or(&mut self) -> Node {
        let mut left = self.parse_bitwise_xor();
        while self.current.kind == TokenKind::BitOr {
            self.bump();
            let right = self.parse_bitwise_xor();
            left = Node::Binary { op: "|".to_string(), left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_bitwise_xor(&mut self) -> Node {
        let mut left = self.parse_bitwise_and();
        while self.current.kind == TokenKind::BitXor {
            self.bump();
            let right = self.parse_bitwise_and();
            left = Node::Binary { op: "^".to_string(), left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_bitwise_and(&mut self) -> Node {
        let mut left = self.parse_equality();
        while self.current.kind == TokenKind::BitAnd {
            self.bump();
            let right = self.parse_equality();
            left = Node::Binary { op: "&".to_string(), left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_equality(&mut self) -> Node {
        let mut left = self.parse_relational();
        while matches!(self.current.kind, TokenKind::Eq | TokenKind::Ne | TokenKind::EqStrict | TokenKind::NeStrict) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_relational();
            left = Node::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_relational(&mut self) -> Node {
        let mut left = self.parse_shift();
        loop {
            let is_in = self.current.kind == TokenKind::In && !self.no_in;
            let is_cmp = matches!(
                self.current.kind,
                TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge | TokenKind::Instanceof
            );
            if !is_cmp && !is_in {
                break;
            }
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_shift();
            left = Node::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_shift(&mut self) -> Node {
        let mut left = self.parse_additive();
        while matches!(self.current.kind, TokenKind::Shl | TokenKind::Shr | TokenKind::UShr) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_additive();
            left = Node::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_additive(&mut self) -> Node {
        let mut left = self.parse_multiplicative();
        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_multiplicative();
            left = Node::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Node {
        let mut left = self.parse_exponent();
        while matches!(self.current.kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            let right = self.parse_exponent();
            left = Node::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_exponent(&mut self) -> Node {
        let left = self.parse_unary();
        if self.current.kind == TokenKind::StarStar {
            self.bump();
            let right = self.parse_exponent();
            return Node::Binary { op: "**".to_string(), left: Box::new(left), right: Box::new(right) };
        }
        left
    }

    fn parse_unary(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Void | TokenKind::Typeof | TokenKind::Delete | TokenKind::Not | TokenKind::BitNot | TokenKind::Plus | TokenKind::Minus => {
                let op = op_text(self.current.kind).to_string();
                self.bump();
                let arg = self.parse_unary();
                Node::Unary { op, arg: Box::new(arg) }
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = op_text(self.current.kind).to_string();
                self.bump();
                let arg = self.parse_unary();
                Node::Update { op, arg: Box::new(arg), prefix: true }
            }
            TokenKind::Await => {
                self.bump();
                let arg = self.parse_unary();
                Node::Await { arg: Box::new(arg) }
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Node {
        let expr = self.parse_call_member_new();
        if !self.current.newline_before && matches!(self.current.kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = op_text(self.current.kind).to_string();
            self.bump();
            return Node::Update { op, arg: Box::new(expr), prefix: false };
        }
        expr
    }

    fn parse_call_member_new(&mut self) -> Node {
        let mut expr = if self.current.kind == TokenKind::New {
            self.parse_new_expression()
        } else {
            self.parse_primary()
        };
        loop {
            match self.current.kind {
                TokenKind::Dot => {
                    self.bump();
                    let name = self.current.lexeme.clone();
                    self.bump();
                    expr = Node::Member { object: Box::new(expr), property: Box::new(Node::Identifier { name }), computed: false };
                }
                TokenKind::QuestionDot => {
                    self.bump();
                    if self.current.kind == TokenKind::LParen {
                        let args = self.parse_arguments();
                        expr = Node::Call { callee: Box::new(expr), args };
                    } else if self.current.kind == TokenKind::LBracket {
                        self.bump();
                        let property = self.parse_expression();
                        self.expect(TokenKind::RBracket);
                        expr = Node::Member { object: Box::new(expr), property: Box::new(property), computed: true };
                    } else {
                        let name = self.current.lexeme.clone();
                        self.bump();
                        expr = Node::Member { object: Box::new(expr), property: Box::new(Node::Identifier { name }), computed: false };
                    }
                }
                TokenKind::LBracket => {
                    self.bump();
                    let property = self.parse_expression();
                    self.expect(TokenKind::RBracket);
                    expr = Node::Member { object: Box::new(expr), property: Box::new(property), computed: true };
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments();
                    expr = Node::Call { callee: Box::new(expr), args };
                }
                TokenKind::TemplateNoSub | TokenKind::TemplateHead => {
                    let quasi = self.parse_template_literal();
                    expr = Node::TaggedTemplate { tag: Box::new(expr), quasi: Box::new(quasi) };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_new_expression(&mut self) -> Node {
        self.bump(); // `new`
        if self.current.kind == TokenKind::Dot {
            self.bump();
            self.bump(); // `target`
            return Node::Identifier { name: "new.target".to_string() };
        }
        let callee = if self.current.kind == TokenKind::New {
            self.parse_new_expression()
        } else {
            self.parse_member_only()
        };
        let args = if self.current.kind == TokenKind::LParen { self.parse_arguments() } else { Vec::new() };
        Node::New { callee: Box::new(callee), args }
    }

    /// Member-access chain without the trailing call, used for `new a.b.c(...)` where the
    /// callee must be fully resolved before the argument list is attached to the `New` node
    /// rather than to the innermost member access.
    fn parse_member_only(&mut self) -> Node {
        let mut expr = self.parse_primary();
        loop {
            match self.current.kind {
                TokenKind::Dot => {
                    self.bump();
                    let name = self.current.lexeme.clone();
                    self.bump();
                    expr = Node::Member { object: Box::new(expr), property: Box::new(Node::Identifier { name }), computed: false };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let property = self.parse_expression();
                    self.expect(TokenKind::RBracket);
                    expr = Node::Member { object: Box::new(expr), property: Box::new(property), computed: true };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_arguments(&mut self) -> Vec<Node> {
        self.expect(TokenKind::LParen);
        let mut args = ListBuilder::new();
        while self.current.kind != TokenKind::RParen && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_assignment_expression();
                args.append(Node::SpreadElement { arg: Box::new(arg) });
            } else {
                args.append(self.parse_assignment_expression());
            }
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen);
        args.build()
    }

    fn parse_yield_expression(&mut self) -> Node {
        self.bump();
        let delegate = if self.current.kind == TokenKind::Star {
            self.bump();
            true
        } else {
            false
        };
        let arg = if self.current.newline_before
            || matches!(
                self.current.kind,
                TokenKind::Semicolon | TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Comma | TokenKind::Colon | TokenKind::Eof
            ) {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression()))
        };
        Node::Yield { arg, delegate }
    }

    fn parse_array_literal(&mut self) -> Node {
        self.bump();
        let mut elements = ListBuilder::new();
        while self.current.kind != TokenKind::RBracket && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Comma {
                elements.append(Node::ArrayHole);
                self.bump();
                continue;
            }
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_assignment_expression();
                elements.append(Node::SpreadElement { arg: Box::new(arg) });
            } else {
                elements.append(self.parse_assignment_expression());
            }
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBracket);
        Node::ArrayLiteral { elements: elements.build() }
    }

    fn parse_object_literal(&mut self) -> Node {
        self.bump();
        let mut properties = ListBuilder::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Spread {
                self.bump();
                let arg = self.parse_assignment_expression();
                properties.append(Node::SpreadElement { arg: Box::new(arg) });
            } else {
                properties.append(self.parse_object_property());
            }
            if self.current.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        Node::ObjectLiteral { properties: properties.build() }
    }

    fn parse_object_property(&mut self) -> Node {
        if self.current.kind == TokenKind::LBracket {
            let key = Box::new({
                self.bump();
                let k = self.parse_assignment_expression();
                self.expect(TokenKind::RBracket);
                k
            });
            if self.current.kind == TokenKind::LParen {
                let function = self.parse_method_tail(false, false);
                return Node::Property { key, value: Box::new(function), computed: true, shorthand: false };
            }
            self.expect(TokenKind::Colon);
            let value = self.parse_assignment_expression();
            return Node::Property { key, value: Box::new(value), computed: true, shorthand: false };
        }

        let is_async = self.current.kind == TokenKind::Async
            && !matches!(self.peek.kind, TokenKind::Colon | TokenKind::Comma | TokenKind::RBrace | TokenKind::LParen);
        if is_async {
            self.bump();
        }
        let is_generator = if self.current.kind == TokenKind::Star {
            self.bump();
            true
        } else {
            false
        };

        let key_name = self.current.lexeme.clone();
        let key = match self.current.kind {
            TokenKind::String => Node::LiteralExpr { value: Literal::String(strip_quotes(&key_name)) },
            TokenKind::Number => Node::LiteralExpr { value: Literal::Number(parse_number(&key_name)) },
            _ => Node::Identifier { name: key_name.clone() },
        };
        self.bump();

        if self.current.kind == TokenKind::LParen {
            let function = self.parse_method_tail(is_async, is_generator);
            return Node::Property { key: Box::new(key), value: Box::new(function), computed: false, shorthand: false };
        }
        if self.current.kind == TokenKind::Colon {
            self.bump();
            let value = self.parse_assignment_expression();
            return Node::Property { key: Box::new(key), value: Box::new(value), computed: false, shorthand: false };
        }
        if self.current.kind == TokenKind::Assign {
            self.bump();
            let default = self.parse_assignment_expression();
            let value = Node::BindingPattern { target: Box::new(Node::Identifier { name: key_name }), init: Some(Box::new(default)) };
            return Node::Property { key: Box::new(key), value: Box::new(value), computed: false, shorthand: true };
        }
        Node::Property { key: Box::new(key.clone()), value: Box::new(key), computed: false, shorthand: true }
    }

    fn parse_template_literal(&mut self) -> Node {
        let first = self.current.clone();
        let is_no_sub = first.kind == TokenKind::TemplateNoSub;
        let mut quasis = vec![Node::TemplateElement { raw: first.lexeme.clone(), tail: is_no_sub }];
        let mut expressions = Vec::new();
        self.bump();
        if !is_no_sub {
            loop {
                expressions.push(self.parse_expression());
                let chunk = self.current.clone();
                let tail = chunk.kind == TokenKind::TemplateTail;
                quasis.push(Node::TemplateElement { raw: chunk.lexeme.clone(), tail });
                self.bump();
                if tail {
                    break;
                }
            }
        }
        Node::TemplateLiteral { quasis, expressions }
    }

    fn parse_primary(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Number => {
                let v = self.current.lexeme.clone();
                self.bump();
                Node::LiteralExpr { value: Literal::Number(parse_number(&v)) }
            }
            TokenKind::String => {
                let raw = self.current.lexeme.clone();
                self.bump();
                Node::LiteralExpr { value: Literal::String(strip_quotes(&raw)) }
            }
            TokenKind::Regex => {
                let raw = self.current.lexeme.clone();
                self.bump();
                Node::LiteralExpr { value: Literal::Regex(raw) }
            }
            TokenKind::True => {
                self.bump();
                Node::LiteralExpr { value: Literal::Boolean(true) }
            }
            TokenKind::False => {
                self.bump();
                Node::LiteralExpr { value: Literal::Boolean(false) }
            }
            TokenKind::Null => {
                self.bump();
                Node::LiteralExpr { value: Literal::Null }
            }
            TokenKind::Undefined => {
                self.bump();
                Node::LiteralExpr { value: Literal::Undefined }
            }
            TokenKind::This => {
                self.bump();
                Node::This
            }
            TokenKind::Super => {
                self.bump();
                Node::Super
            }
            TokenKind::Identifier => {
                let name = self.current.lexeme.clone();
                self.bump();
                Node::Identifier { name }
            }
            TokenKind::Yield => self.parse_yield_expression(),
            TokenKind::Function => self.parse_function(false),
            TokenKind::Async if self.peek.kind == TokenKind::Function => self.parse_function(false),
            TokenKind::Class => self.parse_class(false),
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expression();
                self.expect(TokenKind::RParen);
                expr
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::TemplateNoSub | TokenKind::TemplateHead => self.parse_template_literal(),
            _ => {
                self.record_error(format!("unexpected token {:?}", self.current.kind));
                self.bump();
                Node::Identifier { name: String::new() }
            }
        }
    }
}

fn pull(engine: &mut AsiEngine, errors: &mut Vec<ParserError>) -> Token {
    match engine.next_token() {
        Ok(tok) => tok,
        Err(err) => {
            let position = err.position;
            errors.push(err);
            Token::new(TokenKind::Eof, String::new(), position, false)
        }
    }
}

fn var_kind_of(kind: TokenKind) -> VarKind {
    match kind {
        TokenKind::Var => VarKind::Var,
        TokenKind::Let => VarKind::Let,
        _ => VarKind::Const,
    }
}

fn is_assignment_op(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign | StarStarAssign | AndAssign | OrAssign | XorAssign | ShlAssign | ShrAssign | UShrAssign
    )
}

fn op_text(kind: TokenKind) -> &'static str {
    use TokenKind::*;
    match kind {
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        StarStar => "**",
        PlusPlus => "++",
        MinusMinus => "--",
        Assign => "=",
        PlusAssign => "+=",
        MinusAssign => "-=",
        StarAssign => "*=",
        SlashAssign => "/=",
        PercentAssign => "%=",
        StarStarAssign => "**=",
        AndAssign => "&=",
        OrAssign => "|=",
        XorAssign => "^=",
        ShlAssign => "<<=",
        ShrAssign => ">>=",
        UShrAssign => ">>>=",
        Eq => "==",
        Ne => "!=",
        EqStrict => "===",
        NeStrict => "!==",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        AndAnd => "&&",
        OrOr => "||",
        Not => "!",
        NullishCoalesce => "??",
        BitAnd => "&",
        BitOr => "|",
        BitXor => "^",
        BitNot => "~",
        Shl => "<<",
        Shr => ">>",
        UShr => ">>>",
        Typeof => "typeof",
        Void => "void",
        Delete => "delete",
        Instanceof => "instanceof",
        In => "in",
        _ => "?",
    }
}

fn strip_quotes(raw: &str) -> String {
    if raw.len() >= 2 {
        raw[1..raw.len() - 1].to_string()
    } else {
        raw.to_string()
    }
}

fn parse_number(raw: &str) -> f64 {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).unwrap_or(0) as f64;
    }
    if let Some(oct) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        return i64::from_str_radix(oct, 8).unwrap_or(0) as f64;
    }
    if let Some(bin) = raw.strip_prefix("0b").or_else(|| raw.strip_prefix("0B")) {
        return i64::from_str_radix(bin, 2).unwrap_or(0) as f64;
    }
    raw.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source, true).parse()
    }

    #[test]
    fn var_declaration_with_initializer() {
        let program = parse("var x = 1 + 2;");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Node::VarStmt { kind: VarKind::Var, decls } => assert_eq!(decls.len(), 1),
            other => panic!("expected VarStmt, got {other:?}"),
        }
    }

    #[test]
    fn const_without_initializer_is_a_syntax_error() {
        let mut parser = Parser::new("const x;", true);
        parser.parse();
        assert_eq!(parser.error_count(), 1);
    }

    #[test]
    fn const_in_for_head_without_initializer_is_a_syntax_error() {
        let mut parser = Parser::new("for (const x; x < 3; x = x + 1) {}", true);
        parser.parse();
        assert_eq!(parser.error_count(), 1);
    }

    #[test]
    fn const_in_for_of_head_needs_no_initializer() {
        let mut parser = Parser::new("for (const x of xs) {}", true);
        parser.parse();
        assert_eq!(parser.error_count(), 0);
    }

    #[test]
    fn asi_inserts_semicolon_between_statements_on_newline() {
        let mut parser = Parser::new("let a = 1\nlet b = 2", true);
        let program = parser.parse();
        assert_eq!(parser.error_count(), 0);
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn for_loop_builds_init_test_update() {
        let program = parse("for (let i = 0; i < 10; i++) { sum += i; }");
        match &program.body[0] {
            Node::For { init: Some(_), test: Some(_), update: Some(_), .. } => {}
            other => panic!("expected fully populated For, got {other:?}"),
        }
    }

    #[test]
    fn destructuring_const_with_rest() {
        let program = parse("const {x, y: z = 5, ...rest} = obj;");
        match &program.body[0] {
            Node::VarStmt { kind: VarKind::Const, decls } => match &decls[0] {
                Node::VarDecl { binding } => match binding.as_ref() {
                    Node::BindingPattern { target, .. } => match target.as_ref() {
                        Node::ObjectBinding { properties } => assert_eq!(properties.len(), 3),
                        other => panic!("expected ObjectBinding, got {other:?}"),
                    },
                    other => panic!("expected BindingPattern target, got {other:?}"),
                },
                other => panic!("expected VarDecl, got {other:?}"),
            },
            other => panic!("expected VarStmt, got {other:?}"),
        }
    }

    #[test]
    fn try_catch_finally_all_present() {
        let program = parse("try { risky(); } catch (e) { handle(e); } finally { cleanup(); }");
        match &program.body[0] {
            Node::Try { handler: Some(_), finalizer: Some(_), .. } => {}
            other => panic!("expected Try with handler and finalizer, got {other:?}"),
        }
    }

    #[test]
    fn regex_after_newline_is_not_mistaken_for_division() {
        let mut parser = Parser::new("let pattern = /abc/\n1 / 2;", true);
        let program = parser.parse();
        assert_eq!(parser.error_count(), 0);
        assert_eq!(program.body.len(), 2);
        match &program.body[1] {
            Node::ExpressionStmt { expr } => match expr.as_ref() {
                Node::Binary { op, .. } => assert_eq!(op, "/"),
                other => panic!("expected Binary division, got {other:?}"),
            },
            other => panic!("expected ExpressionStmt, got {other:?}"),
        }
    }

    #[test]
    fn arrow_function_with_block_body() {
        let program = parse("const add = (a, b) => { return a + b; };");
        match &program.body[0] {
            Node::VarStmt { decls, .. } => match &decls[0] {
                Node::VarDecl { binding } => match binding.as_ref() {
                    Node::BindingPattern { init: Some(init), .. } => match init.as_ref() {
                        Node::ArrowFunction { params, expression_body: false, .. } => assert_eq!(params.len(), 2),
                        other => panic!("expected ArrowFunction, got {other:?}"),
                    },
                    other => panic!("expected init, got {other:?}"),
                },
                other => panic!("expected VarDecl, got {other:?}"),
            },
            other => panic!("expected VarStmt, got {other:?}"),
        }
    }

    #[test]
    fn async_function_declaration_is_reclassified_at_statement_position() {
        let program = parse("async function loadAll() { return await fetchAll(); }");
        match &program.body[0] {
            Node::FunctionDecl { is_async: true, name: Some(name), .. } => assert_eq!(name, "loadAll"),
            other => panic!("expected async FunctionDecl, got {other:?}"),
        }
    }

    #[test]
    fn malformed_input_recovers_and_keeps_parsing() {
        let mut parser = Parser::new("let x = ;\nlet y = 2;", true);
        let program = parser.parse();
        assert!(parser.error_count() > 0);
        assert_eq!(program.body.len(), 2);
    }
}
