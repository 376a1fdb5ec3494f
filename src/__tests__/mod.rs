//! End-to-end scenarios exercising the lexer, the ASI engine, and the parser together,
//! rather than one production in isolation.

use crate::ast::{Node, VarKind};
use crate::parser::Parser;

fn parse_ok(source: &str, module_mode: bool) -> crate::ast::Program {
    let mut parser = Parser::new(source, module_mode);
    let program = parser.parse();
    assert_eq!(parser.error_count(), 0, "unexpected errors: {:?}", parser.errors());
    program
}

#[test]
fn scenario_var_declaration() {
    let program = parse_ok("var x = 1;", false);
    assert_eq!(program.body.len(), 1);
    match &program.body[0] {
        Node::VarStmt { kind: VarKind::Var, decls } => assert_eq!(decls.len(), 1),
        other => panic!("expected VarStmt, got {other:?}"),
    }
}

#[test]
fn scenario_function_with_synthetic_semicolon() {
    // No semicolon after the return statement's expression: ASI must insert one before
    // the newline, and the function body closes cleanly on the following line.
    let program = parse_ok("function add(a, b) {\n  return a + b\n}", false);
    match &program.body[0] {
        Node::FunctionDecl { name: Some(name), params, .. } => {
            assert_eq!(name, "add");
            assert_eq!(params.len(), 2);
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn scenario_for_loop() {
    let program = parse_ok("for (let i = 0; i < 3; i = i + 1) { total = total + i; }", false);
    match &program.body[0] {
        Node::For { init: Some(_), test: Some(_), update: Some(_), body } => match body.as_ref() {
            Node::Block { body } => assert_eq!(body.len(), 1),
            other => panic!("expected Block body, got {other:?}"),
        },
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn scenario_destructuring_const() {
    let program = parse_ok("const { x, y: z = 5, ...rest } = source;", false);
    match &program.body[0] {
        Node::VarStmt { kind: VarKind::Const, .. } => {}
        other => panic!("expected const VarStmt, got {other:?}"),
    }
}

#[test]
fn scenario_try_catch_finally() {
    let program = parse_ok(
        "try {\n  risky();\n} catch (err) {\n  log(err);\n} finally {\n  cleanup();\n}",
        false,
    );
    match &program.body[0] {
        Node::Try { handler: Some(_), finalizer: Some(_), .. } => {}
        other => panic!("expected Try with both clauses, got {other:?}"),
    }
}

#[test]
fn scenario_regex_vs_division_after_newline() {
    // `/re/` right after an open paren can only be a regex literal; `x / y` on its own
    // line after a complete statement is division, never a regex resuming the last line.
    let program = parse_ok("const re = /ab+c/;\nconst ratio = width / height;", false);
    assert_eq!(program.body.len(), 2);
    match &program.body[1] {
        Node::VarStmt { decls, .. } => match &decls[0] {
            Node::VarDecl { binding } => match binding.as_ref() {
                Node::BindingPattern { init: Some(init), .. } => match init.as_ref() {
                    Node::Binary { op, .. } => assert_eq!(op, "/"),
                    other => panic!("expected division, got {other:?}"),
                },
                other => panic!("expected init, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        },
        other => panic!("expected VarStmt, got {other:?}"),
    }
}

#[test]
fn empty_input_produces_an_empty_program() {
    let program = parse_ok("", false);
    assert!(program.body.is_empty());
}

#[test]
fn whitespace_and_comments_only_produce_an_empty_program() {
    let program = parse_ok("  \n// a line comment\n/* a block comment */\n  ", false);
    assert!(program.body.is_empty());
}

#[test]
fn return_without_newline_keeps_its_argument() {
    let program = parse_ok("function f() { return 1; }", false);
    match &program.body[0] {
        Node::FunctionDecl { body, .. } => match body.as_ref() {
            Node::Block { body } => match &body[0] {
                Node::Return { arg: Some(_) } => {}
                other => panic!("expected Return with argument, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        },
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn return_followed_by_newline_drops_its_argument() {
    // Restricted production: a line terminator right after `return` forces an empty
    // return, leaving `1` to parse as its own (unreachable) expression statement.
    let program = parse_ok("function f() { return\n1; }", false);
    match &program.body[0] {
        Node::FunctionDecl { body, .. } => match body.as_ref() {
            Node::Block { body } => {
                assert_eq!(body.len(), 2);
                match &body[0] {
                    Node::Return { arg: None } => {}
                    other => panic!("expected empty Return, got {other:?}"),
                }
            }
            other => panic!("expected Block, got {other:?}"),
        },
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn parenthesized_object_literal_is_an_expression_not_a_block() {
    let program = parse_ok("const shape = ({ sides: 4 });", false);
    match &program.body[0] {
        Node::VarStmt { decls, .. } => match &decls[0] {
            Node::VarDecl { binding } => match binding.as_ref() {
                Node::BindingPattern { init: Some(init), .. } => match init.as_ref() {
                    Node::ObjectLiteral { properties } => assert_eq!(properties.len(), 1),
                    other => panic!("expected ObjectLiteral, got {other:?}"),
                },
                other => panic!("expected init, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        },
        other => panic!("expected VarStmt, got {other:?}"),
    }
}

#[test]
fn labeled_block_at_statement_position_is_a_block_not_an_object() {
    let program = parse_ok("{ a: 1; }", false);
    match &program.body[0] {
        Node::Block { body } => {
            assert_eq!(body.len(), 1);
            match &body[0] {
                Node::Labeled { label, .. } => assert_eq!(label, "a"),
                other => panic!("expected Labeled statement, got {other:?}"),
            }
        }
        other => panic!("expected Block, got {other:?}"),
    }
}

#[test]
fn arrow_head_paren_is_not_mistaken_for_a_call() {
    let program = parse_ok("const identity = (x) => x;", false);
    match &program.body[0] {
        Node::VarStmt { decls, .. } => match &decls[0] {
            Node::VarDecl { binding } => match binding.as_ref() {
                Node::BindingPattern { init: Some(init), .. } => match init.as_ref() {
                    Node::ArrowFunction { params, expression_body: true, .. } => assert_eq!(params.len(), 1),
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
fn call_expression_paren_is_not_mistaken_for_an_arrow_head() {
    let program = parse_ok("identity(x);", false);
    match &program.body[0] {
        Node::ExpressionStmt { expr } => match expr.as_ref() {
            Node::Call { args, .. } => assert_eq!(args.len(), 1),
            other => panic!("expected Call, got {other:?}"),
        },
        other => panic!("expected ExpressionStmt, got {other:?}"),
    }
}

#[test]
fn module_mode_parses_import_and_export_declarations() {
    let program = parse_ok("import { readFile } from \"fs\";\nexport const value = 1;", true);
    assert_eq!(program.body.len(), 2);
    match &program.body[0] {
        Node::ImportDecl { specifiers, source } => {
            assert_eq!(source, "fs");
            assert_eq!(specifiers.len(), 1);
        }
        other => panic!("expected ImportDecl, got {other:?}"),
    }
    match &program.body[1] {
        Node::ExportDecl { declaration: Some(_), .. } => {}
        other => panic!("expected ExportDecl, got {other:?}"),
    }
}

#[test]
fn class_body_parses_fields_alongside_methods() {
    let program = parse_ok(
        "class Counter {\n  count = 0;\n  hidden;\n  [computedName] = 1;\n  increment() { return this.count; }\n}",
        false,
    );
    match &program.body[0] {
        Node::ClassDecl { name: Some(name), body, .. } => {
            assert_eq!(name, "Counter");
            assert_eq!(body.len(), 4);
            match &body[0] {
                Node::ComputedProperty { value: Some(_), .. } => {}
                other => panic!("expected initialized field, got {other:?}"),
            }
            match &body[1] {
                Node::ComputedProperty { value: None, .. } => {}
                other => panic!("expected uninitialized field, got {other:?}"),
            }
            match &body[3] {
                Node::MethodDef { .. } => {}
                other => panic!("expected MethodDef, got {other:?}"),
            }
        }
        other => panic!("expected ClassDecl, got {other:?}"),
    }
}

#[test]
fn script_mode_degrades_import_to_a_plain_identifier() {
    // Outside module mode, `import`/`export` are not reserved: a file that never opts
    // into module syntax can still use them as ordinary binding names.
    let program = parse_ok("var import = 1;", false);
    match &program.body[0] {
        Node::VarStmt { decls, .. } => match &decls[0] {
            Node::VarDecl { binding } => match binding.as_ref() {
                Node::BindingPattern { target, .. } => match target.as_ref() {
                    Node::Identifier { name } => assert_eq!(name, "import"),
                    other => panic!("expected Identifier target, got {other:?}"),
                },
                other => panic!("expected BindingPattern, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        },
        other => panic!("expected VarStmt, got {other:?}"),
    }
}
