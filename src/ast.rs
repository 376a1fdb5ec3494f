//! The typed syntax tree the parser builds and the textual dump format used to compare
//! trees across test fixtures.
//!
//! [Node] is a single closed tagged variant (no open inheritance hierarchy): dispatch for
//! traversal and dumping is one per-kind `match` each rather than dynamic polymorphism.
//! Every node owns its children by value; there are no parent links and no cycles, so the
//! tree is freed by ordinary `Drop`.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Regex(String),
    Boolean(bool),
    Null,
    Undefined,
}

/// The root of a parsed source file. Kept as its own struct — distinct from the `Program`
/// variant below used when dumping — since a program never nests inside another node and
/// callers want `.body`/`.errors` without matching on `Node`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    pub fn dump(&self) -> String {
        dump(&Node::Program { body: self.body.clone() })
    }
}

/// A single AST node. Lists are insertion-ordered `Vec<Node>`; optional children are
/// `Option<Box<Node>>`. Nodes are never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program { body: Vec<Node> },
    Block { body: Vec<Node> },

    VarStmt { kind: VarKind, decls: Vec<Node> },
    VarDecl { binding: Box<Node> },
    BindingPattern { target: Box<Node>, init: Option<Box<Node>> },
    ObjectBinding { properties: Vec<Node> },
    ArrayBinding { elements: Vec<Node> },
    BindingProperty { key: Box<Node>, value: Box<Node>, shorthand: bool },
    RestElement { arg: Box<Node> },
    ArrayHole,

    FunctionDecl { name: Option<String>, params: Vec<Node>, body: Box<Node>, is_async: bool, is_generator: bool },
    FunctionExpr { name: Option<String>, params: Vec<Node>, body: Box<Node>, is_async: bool, is_generator: bool },
    ArrowFunction { params: Vec<Node>, body: Box<Node>, is_async: bool, expression_body: bool },

    Return { arg: Option<Box<Node>> },
    If { test: Box<Node>, consequent: Box<Node>, alternate: Option<Box<Node>> },
    For { init: Option<Box<Node>>, test: Option<Box<Node>>, update: Option<Box<Node>>, body: Box<Node> },
    ForIn { left: Box<Node>, right: Box<Node>, body: Box<Node> },
    ForOf { left: Box<Node>, right: Box<Node>, body: Box<Node>, is_await: bool },
    While { test: Box<Node>, body: Box<Node> },
    DoWhile { test: Box<Node>, body: Box<Node> },
    Switch { discriminant: Box<Node>, cases: Vec<Node> },
    SwitchCase { test: Option<Box<Node>>, consequents: Vec<Node>, is_default: bool },
    Try { block: Box<Node>, handler: Option<Box<Node>>, finalizer: Option<Box<Node>> },
    Catch { param: Option<Box<Node>>, body: Box<Node> },
    With { object: Box<Node>, body: Box<Node> },
    Labeled { label: String, body: Box<Node> },
    Break { label: Option<String> },
    Continue { label: Option<String> },
    Throw { arg: Box<Node> },
    ExpressionStmt { expr: Box<Node> },
    EmptyStmt,

    Identifier { name: String },
    This,
    Super,
    LiteralExpr { value: Literal },
    TemplateLiteral { quasis: Vec<Node>, expressions: Vec<Node> },
    TemplateElement { raw: String, tail: bool },
    TaggedTemplate { tag: Box<Node>, quasi: Box<Node> },

    Assign { op: String, left: Box<Node>, right: Box<Node> },
    Binary { op: String, left: Box<Node>, right: Box<Node> },
    Logical { op: String, left: Box<Node>, right: Box<Node> },
    Conditional { test: Box<Node>, consequent: Box<Node>, alternate: Box<Node> },
    Sequence { elements: Vec<Node> },
    Unary { op: String, arg: Box<Node> },
    Update { op: String, arg: Box<Node>, prefix: bool },
    New { callee: Box<Node>, args: Vec<Node> },
    Call { callee: Box<Node>, args: Vec<Node> },
    Member { object: Box<Node>, property: Box<Node>, computed: bool },
    Yield { arg: Option<Box<Node>>, delegate: bool },
    Await { arg: Box<Node> },

    ArrayLiteral { elements: Vec<Node> },
    ObjectLiteral { properties: Vec<Node> },
    Property { key: Box<Node>, value: Box<Node>, computed: bool, shorthand: bool },
    SpreadElement { arg: Box<Node> },

    ClassDecl { name: Option<String>, super_class: Option<Box<Node>>, body: Vec<Node> },
    ClassExpr { name: Option<String>, super_class: Option<Box<Node>>, body: Vec<Node> },
    MethodDef { kind: String, is_static: bool, is_generator: bool, is_async: bool, key: Box<Node>, function: Box<Node> },
    ComputedProperty { key: Box<Node>, value: Option<Box<Node>> },

    ImportDecl { specifiers: Vec<Node>, source: String },
    ImportSpecifier { local: String, imported: Option<String>, is_namespace: bool, is_default: bool },
    ExportDecl { declaration: Option<Box<Node>>, specifiers: Vec<Node>, source: Option<String> },
    ExportSpecifier { local: String, exported: Option<String> },
}

/// A small owned builder for the `Vec<Node>` lists that appear throughout the grammar
/// (statement bodies, argument lists, property lists). `concat` splices two already-built
/// lists without re-walking either one — equivalent to `Vec::extend`, but named for the
/// reduction step it represents so it isn't called on the wrong list by accident.
#[derive(Debug, Default)]
pub struct ListBuilder {
    items: Vec<Node>,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn append(&mut self, node: Node) -> &mut Self {
        self.items.push(node);
        self
    }

    pub fn concat(&mut self, other: ListBuilder) -> &mut Self {
        self.items.extend(other.items);
        self
    }

    pub fn build(self) -> Vec<Node> {
        self.items
    }
}

/// `left , right`: flattens nested comma expressions into one `Sequence` regardless of
/// whether the parser folds left-to-right or right-to-left.
pub fn make_sequence(left: Node, right: Node) -> Node {
    match left {
        Node::Sequence { mut elements } => {
            elements.push(right);
            Node::Sequence { elements }
        }
        other => Node::Sequence { elements: vec![other, right] },
    }
}

/// Pre-order traversal: `visitor` runs on `node` itself, then on every semantic child in
/// source order.
pub fn traverse<'a>(node: &'a Node, visitor: &mut dyn FnMut(&'a Node)) {
    visitor(node);
    for child in children(node) {
        traverse(child, visitor);
    }
}

fn opt<'a>(o: &'a Option<Box<Node>>) -> Vec<&'a Node> {
    o.iter().map(|b| b.as_ref()).collect()
}

fn children(node: &Node) -> Vec<&Node> {
    match node {
        Node::Program { body } | Node::Block { body } => body.iter().collect(),
        Node::VarStmt { decls, .. } => decls.iter().collect(),
        Node::VarDecl { binding } => vec![binding],
        Node::BindingPattern { target, init } => {
            let mut v = vec![target.as_ref()];
            v.extend(opt(init));
            v
        }
        Node::ObjectBinding { properties } => properties.iter().collect(),
        Node::ArrayBinding { elements } => elements.iter().collect(),
        Node::BindingProperty { key, value, .. } => vec![key, value],
        Node::RestElement { arg } | Node::SpreadElement { arg } | Node::Throw { arg } | Node::Await { arg } => {
            vec![arg]
        }
        Node::ArrayHole | Node::EmptyStmt | Node::Identifier { .. } | Node::This | Node::Super => vec![],
        Node::LiteralExpr { .. } => vec![],
        Node::FunctionDecl { params, body, .. } | Node::FunctionExpr { params, body, .. } => {
            let mut v: Vec<&Node> = params.iter().collect();
            v.push(body);
            v
        }
        Node::ArrowFunction { params, body, .. } => {
            let mut v: Vec<&Node> = params.iter().collect();
            v.push(body);
            v
        }
        Node::Return { arg } | Node::Yield { arg, .. } => opt(arg),
        Node::If { test, consequent, alternate } => {
            let mut v = vec![test.as_ref(), consequent.as_ref()];
            v.extend(opt(alternate));
            v
        }
        Node::For { init, test, update, body } => {
            let mut v = vec![];
            v.extend(opt(init));
            v.extend(opt(test));
            v.extend(opt(update));
            v.push(body);
            v
        }
        Node::ForIn { left, right, body } | Node::ForOf { left, right, body, .. } => {
            vec![left, right, body]
        }
        Node::While { test, body } | Node::DoWhile { test, body } => vec![test, body],
        Node::Switch { discriminant, cases } => {
            let mut v = vec![discriminant.as_ref()];
            v.extend(cases.iter());
            v
        }
        Node::SwitchCase { test, consequents, .. } => {
            let mut v = opt(test);
            v.extend(consequents.iter());
            v
        }
        Node::Try { block, handler, finalizer } => {
            let mut v = vec![block.as_ref()];
            v.extend(opt(handler));
            v.extend(opt(finalizer));
            v
        }
        Node::Catch { param, body } => {
            let mut v = opt(param);
            v.push(body);
            v
        }
        Node::With { object, body } => vec![object, body],
        Node::Labeled { body, .. } => vec![body],
        Node::Break { .. } | Node::Continue { .. } => vec![],
        Node::ExpressionStmt { expr } => vec![expr],
        Node::TemplateLiteral { quasis, expressions } => {
            let mut v: Vec<&Node> = quasis.iter().collect();
            v.extend(expressions.iter());
            v
        }
        Node::TemplateElement { .. } => vec![],
        Node::TaggedTemplate { tag, quasi } => vec![tag, quasi],
        Node::Assign { left, right, .. }
        | Node::Binary { left, right, .. }
        | Node::Logical { left, right, .. } => vec![left, right],
        Node::Conditional { test, consequent, alternate } => vec![test, consequent, alternate],
        Node::Sequence { elements } => elements.iter().collect(),
        Node::Unary { arg, .. } | Node::Update { arg, .. } => vec![arg],
        Node::New { callee, args } | Node::Call { callee, args } => {
            let mut v = vec![callee.as_ref()];
            v.extend(args.iter());
            v
        }
        Node::Member { object, property, .. } => vec![object, property],
        Node::ArrayLiteral { elements } => elements.iter().collect(),
        Node::ObjectLiteral { properties } => properties.iter().collect(),
        Node::Property { key, value, .. } => vec![key, value],
        Node::ClassDecl { super_class, body, .. } | Node::ClassExpr { super_class, body, .. } => {
            let mut v = opt(super_class);
            v.extend(body.iter());
            v
        }
        Node::MethodDef { key, function, .. } => vec![key, function],
        Node::ComputedProperty { key, value } => {
            let mut v = vec![key.as_ref()];
            v.extend(opt(value));
            v
        }
        Node::ImportDecl { specifiers, .. } => specifiers.iter().collect(),
        Node::ImportSpecifier { .. } => vec![],
        Node::ExportDecl { declaration, specifiers, .. } => {
            let mut v = opt(declaration);
            v.extend(specifiers.iter());
            v
        }
        Node::ExportSpecifier { .. } => vec![],
    }
}

/// Render the node as text: two spaces per indent level, one node per line as
/// `<NodeName> [<key>=<value> ...]`, children grouped under labelled sub-sections.
pub fn dump(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out, 0);
    out
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn header(out: &mut String, indent: usize, name: &str, attrs: &[(&str, String)]) {
    pad(out, indent);
    if attrs.is_empty() {
        writeln!(out, "{name}").unwrap();
    } else {
        let rendered: Vec<String> = attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        writeln!(out, "{name} [{}]", rendered.join(" ")).unwrap();
    }
}

fn section(out: &mut String, indent: usize, label: &str, nodes: &[Node]) {
    if nodes.is_empty() {
        return;
    }
    pad(out, indent + 1);
    out.push_str(label);
    out.push('\n');
    for child in nodes {
        write_node(child, out, indent + 2);
    }
}

fn single(out: &mut String, indent: usize, label: &str, node: &Node) {
    pad(out, indent + 1);
    out.push_str(label);
    out.push('\n');
    write_node(node, out, indent + 2);
}

fn single_opt(out: &mut String, indent: usize, label: &str, node: &Option<Box<Node>>) {
    if let Some(n) = node {
        single(out, indent, label, n);
    }
}

fn literal_text(value: &Literal) -> String {
    match value {
        Literal::Number(n) => n.to_string(),
        Literal::String(s) => format!("{s:?}"),
        Literal::Regex(r) => r.clone(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Null => "null".to_string(),
        Literal::Undefined => "undefined".to_string(),
    }
}

fn write_node(node: &Node, out: &mut String, indent: usize) {
    match node {
        Node::Program { body } => {
            header(out, indent, "Program", &[]);
            section(out, indent, "Body", body);
        }
        Node::Block { body } => {
            header(out, indent, "Block", &[]);
            section(out, indent, "Body", body);
        }
        Node::VarStmt { kind, decls } => {
            header(out, indent, "VarStmt", &[("kind", kind.as_str().to_string())]);
            section(out, indent, "Decls", decls);
        }
        Node::VarDecl { binding } => {
            header(out, indent, "VarDecl", &[]);
            single(out, indent, "Binding", binding);
        }
        Node::BindingPattern { target, init } => {
            header(out, indent, "BindingPattern", &[]);
            single(out, indent, "Target", target);
            single_opt(out, indent, "Init", init);
        }
        Node::ObjectBinding { properties } => {
            header(out, indent, "ObjectBinding", &[]);
            section(out, indent, "Properties", properties);
        }
        Node::ArrayBinding { elements } => {
            header(out, indent, "ArrayBinding", &[]);
            section(out, indent, "Elements", elements);
        }
        Node::BindingProperty { key, value, shorthand } => {
            header(out, indent, "BindingProperty", &[("shorthand", shorthand.to_string())]);
            single(out, indent, "Key", key);
            single(out, indent, "Value", value);
        }
        Node::RestElement { arg } => {
            header(out, indent, "RestElement", &[]);
            single(out, indent, "Arg", arg);
        }
        Node::ArrayHole => header(out, indent, "ArrayHole", &[]),
        Node::FunctionDecl { name, params, body, is_async, is_generator } => {
            header(
                out,
                indent,
                "FunctionDecl",
                &[
                    ("name", name.clone().unwrap_or_default()),
                    ("async", is_async.to_string()),
                    ("generator", is_generator.to_string()),
                ],
            );
            section(out, indent, "Params", params);
            single(out, indent, "Body", body);
        }
        Node::FunctionExpr { name, params, body, is_async, is_generator } => {
            header(
                out,
                indent,
                "FunctionExpr",
                &[
                    ("name", name.clone().unwrap_or_default()),
                    ("async", is_async.to_string()),
                    ("generator", is_generator.to_string()),
                ],
            );
            section(out, indent, "Params", params);
            single(out, indent, "Body", body);
        }
        Node::ArrowFunction { params, body, is_async, expression_body } => {
            header(
                out,
                indent,
                "ArrowFunction",
                &[("async", is_async.to_string()), ("expression_body", expression_body.to_string())],
            );
            section(out, indent, "Params", params);
            single(out, indent, "Body", body);
        }
        Node::Return { arg } => {
            header(out, indent, "Return", &[]);
            single_opt(out, indent, "Arg", arg);
        }
        Node::If { test, consequent, alternate } => {
            header(out, indent, "If", &[]);
            single(out, indent, "Test", test);
            single(out, indent, "Consequent", consequent);
            single_opt(out, indent, "Alternate", alternate);
        }
        Node::For { init, test, update, body } => {
            header(out, indent, "For", &[]);
            single_opt(out, indent, "Init", init);
            single_opt(out, indent, "Test", test);
            single_opt(out, indent, "Update", update);
            single(out, indent, "Body", body);
        }
        Node::ForIn { left, right, body } => {
            header(out, indent, "ForIn", &[]);
            single(out, indent, "Left", left);
            single(out, indent, "Right", right);
            single(out, indent, "Body", body);
        }
        Node::ForOf { left, right, body, is_await } => {
            header(out, indent, "ForOf", &[("await", is_await.to_string())]);
            single(out, indent, "Left", left);
            single(out, indent, "Right", right);
            single(out, indent, "Body", body);
        }
        Node::While { test, body } => {
            header(out, indent, "While", &[]);
            single(out, indent, "Test", test);
            single(out, indent, "Body", body);
        }
        Node::DoWhile { test, body } => {
            header(out, indent, "DoWhile", &[]);
            single(out, indent, "Test", test);
            single(out, indent, "Body", body);
        }
        Node::Switch { discriminant, cases } => {
            header(out, indent, "Switch", &[]);
            single(out, indent, "Discriminant", discriminant);
            section(out, indent, "Cases", cases);
        }
        Node::SwitchCase { test, consequents, is_default } => {
            header(out, indent, "SwitchCase", &[("default", is_default.to_string())]);
            single_opt(out, indent, "Test", test);
            section(out, indent, "Consequent", consequents);
        }
        Node::Try { block, handler, finalizer } => {
            header(out, indent, "Try", &[]);
            single(out, indent, "Block", block);
            single_opt(out, indent, "Handler", handler);
            single_opt(out, indent, "Finalizer", finalizer);
        }
        Node::Catch { param, body } => {
            header(out, indent, "Catch", &[]);
            single_opt(out, indent, "Param", param);
            single(out, indent, "Body", body);
        }
        Node::With { object, body } => {
            header(out, indent, "With", &[]);
            single(out, indent, "Object", object);
            single(out, indent, "Body", body);
        }
        Node::Labeled { label, body } => {
            header(out, indent, "Labeled", &[("label", label.clone())]);
            single(out, indent, "Body", body);
        }
        Node::Break { label } => header(out, indent, "Break", &[("label", label.clone().unwrap_or_default())]),
        Node::Continue { label } => {
            header(out, indent, "Continue", &[("label", label.clone().unwrap_or_default())])
        }
        Node::Throw { arg } => {
            header(out, indent, "Throw", &[]);
            single(out, indent, "Arg", arg);
        }
        Node::ExpressionStmt { expr } => {
            header(out, indent, "ExpressionStmt", &[]);
            single(out, indent, "Expr", expr);
        }
        Node::EmptyStmt => header(out, indent, "EmptyStmt", &[]),
        Node::Identifier { name } => header(out, indent, "Identifier", &[("name", name.clone())]),
        Node::This => header(out, indent, "This", &[]),
        Node::Super => header(out, indent, "Super", &[]),
        Node::LiteralExpr { value } => {
            header(out, indent, "Literal", &[("value", literal_text(value))]);
        }
        Node::TemplateLiteral { quasis, expressions } => {
            header(out, indent, "TemplateLiteral", &[]);
            section(out, indent, "Quasis", quasis);
            section(out, indent, "Expressions", expressions);
        }
        Node::TemplateElement { raw, tail } => {
            header(out, indent, "TemplateElement", &[("raw", format!("{raw:?}")), ("tail", tail.to_string())]);
        }
        Node::TaggedTemplate { tag, quasi } => {
            header(out, indent, "TaggedTemplate", &[]);
            single(out, indent, "Tag", tag);
            single(out, indent, "Quasi", quasi);
        }
        Node::Assign { op, left, right } => {
            header(out, indent, "Assign", &[("op", op.clone())]);
            single(out, indent, "Left", left);
            single(out, indent, "Right", right);
        }
        Node::Binary { op, left, right } => {
            header(out, indent, "Binary", &[("op", op.clone())]);
            single(out, indent, "Left", left);
            single(out, indent, "Right", right);
        }
        Node::Logical { op, left, right } => {
            header(out, indent, "Logical", &[("op", op.clone())]);
            single(out, indent, "Left", left);
            single(out, indent, "Right", right);
        }
        Node::Conditional { test, consequent, alternate } => {
            header(out, indent, "Conditional", &[]);
            single(out, indent, "Test", test);
            single(out, indent, "Consequent", consequent);
            single(out, indent, "Alternate", alternate);
        }
        Node::Sequence { elements } => {
            header(out, indent, "Sequence", &[]);
            section(out, indent, "Elements", elements);
        }
        Node::Unary { op, arg } => {
            header(out, indent, "Unary", &[("op", op.clone())]);
            single(out, indent, "Arg", arg);
        }
        Node::Update { op, arg, prefix } => {
            header(out, indent, "Update", &[("op", op.clone()), ("prefix", prefix.to_string())]);
            single(out, indent, "Arg", arg);
        }
        Node::New { callee, args } => {
            header(out, indent, "New", &[]);
            single(out, indent, "Callee", callee);
            section(out, indent, "Arguments", args);
        }
        Node::Call { callee, args } => {
            header(out, indent, "Call", &[]);
            single(out, indent, "Callee", callee);
            section(out, indent, "Arguments", args);
        }
        Node::Member { object, property, computed } => {
            header(out, indent, "Member", &[("computed", computed.to_string())]);
            single(out, indent, "Object", object);
            single(out, indent, "Property", property);
        }
        Node::Yield { arg, delegate } => {
            header(out, indent, "Yield", &[("delegate", delegate.to_string())]);
            single_opt(out, indent, "Arg", arg);
        }
        Node::Await { arg } => {
            header(out, indent, "Await", &[]);
            single(out, indent, "Arg", arg);
        }
        Node::ArrayLiteral { elements } => {
            header(out, indent, "ArrayLiteral", &[]);
            section(out, indent, "Elements", elements);
        }
        Node::ObjectLiteral { properties } => {
            header(out, indent, "ObjectLiteral", &[]);
            section(out, indent, "Properties", properties);
        }
        Node::Property { key, value, computed, shorthand } => {
            header(
                out,
                indent,
                "Property",
                &[("computed", computed.to_string()), ("shorthand", shorthand.to_string())],
            );
            single(out, indent, "Key", key);
            single(out, indent, "Value", value);
        }
        Node::SpreadElement { arg } => {
            header(out, indent, "SpreadElement", &[]);
            single(out, indent, "Arg", arg);
        }
        Node::ClassDecl { name, super_class, body } => {
            header(out, indent, "ClassDecl", &[("name", name.clone().unwrap_or_default())]);
            single_opt(out, indent, "Super", super_class);
            section(out, indent, "Body", body);
        }
        Node::ClassExpr { name, super_class, body } => {
            header(out, indent, "ClassExpr", &[("name", name.clone().unwrap_or_default())]);
            single_opt(out, indent, "Super", super_class);
            section(out, indent, "Body", body);
        }
        Node::MethodDef { kind, is_static, is_generator, is_async, key, function } => {
            header(
                out,
                indent,
                "MethodDef",
                &[
                    ("kind", kind.clone()),
                    ("static", is_static.to_string()),
                    ("generator", is_generator.to_string()),
                    ("async", is_async.to_string()),
                ],
            );
            single(out, indent, "Key", key);
            single(out, indent, "Function", function);
        }
        Node::ComputedProperty { key, value } => {
            header(out, indent, "ComputedProperty", &[]);
            single(out, indent, "Key", key);
            single_opt(out, indent, "Value", value);
        }
        Node::ImportDecl { specifiers, source } => {
            header(out, indent, "ImportDecl", &[("source", format!("{source:?}"))]);
            section(out, indent, "Specifiers", specifiers);
        }
        Node::ImportSpecifier { local, imported, is_namespace, is_default } => {
            header(
                out,
                indent,
                "ImportSpecifier",
                &[
                    ("local", local.clone()),
                    ("imported", imported.clone().unwrap_or_default()),
                    ("namespace", is_namespace.to_string()),
                    ("default", is_default.to_string()),
                ],
            );
        }
        Node::ExportDecl { declaration, specifiers, source } => {
            header(out, indent, "ExportDecl", &[("source", source.clone().map(|s| format!("{s:?}")).unwrap_or_default())]);
            single_opt(out, indent, "Declaration", declaration);
            section(out, indent, "Specifiers", specifiers);
        }
        Node::ExportSpecifier { local, exported } => {
            header(
                out,
                indent,
                "ExportSpecifier",
                &[("local", local.clone()), ("exported", exported.clone().unwrap_or_default())],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_folds_flat_regardless_of_association() {
        let a = Node::Identifier { name: "a".into() };
        let b = Node::Identifier { name: "b".into() };
        let c = Node::Identifier { name: "c".into() };
        let seq = make_sequence(make_sequence(a, b), c);
        match seq {
            Node::Sequence { elements } => assert_eq!(elements.len(), 3),
            other => panic!("expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn traverse_visits_every_child_exactly_once() {
        let tree = Node::Program {
            body: vec![
                Node::ExpressionStmt {
                    expr: Box::new(Node::Binary {
                        op: "+".into(),
                        left: Box::new(Node::Identifier { name: "a".into() }),
                        right: Box::new(Node::Identifier { name: "b".into() }),
                    }),
                },
            ],
        };
        let mut count = 0;
        traverse(&tree, &mut |_| count += 1);
        assert_eq!(count, 5); // Program, ExpressionStmt, Binary, Identifier a, Identifier b
    }

    #[test]
    fn dump_matches_indentation_contract() {
        let tree = Node::Program { body: vec![Node::EmptyStmt] };
        let text = dump(&tree);
        assert_eq!(text, "Program\n  Body\n    EmptyStmt\n");
    }
}
