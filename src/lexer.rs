//! The concrete tokenizer for this language: wires [crate::lexeme] utilities into a
//! two-state [CombinedTokenizer], then fuses the raw template-literal delimiter/content
//! tokens it produces into the four template terminals the grammar expects.
//!
//! Template literals are the one piece of JavaScript lexical syntax the generic lexeme
//! utilities cannot fully express on their own: matching a substitution's closing `}`
//! requires counting brace depth, not matching a fixed pattern. The tokenizer still
//! reuses [StateMixin](crate::lexeme::StateMixin) for the state transitions (exactly the
//! technique demonstrated for this same problem in [crate::lexeme]'s own documentation),
//! and a small hand-written [ILexeme] fills in the one piece — scanning raw template text
//! — that has no ready-made utility.

use std::rc::Rc;

use crate::error::ParserError;
use crate::lexeme::{Action, LexemeBuilder, Mapper, Pattern, Punctuations, StateMixin};
use crate::position::Code;
use crate::token::{Token, TokenKind};
use crate::tokenization::CombinedTokenizer;
use crate::{ILexeme, ITokenization, Lex};

const MAIN: u8 = 0;
const TEMPLATE: u8 = 1;

/// Scans the literal text between two template delimiters (backtick/`` ${ ``/`}`).
///
/// Escape sequences and a `$` not followed by `{` are consumed verbatim; the lexeme
/// stops, without consuming, at an unescaped backtick or `${`, leaving those for the
/// punctuation lexemes in the same state to claim. An empty match is valid here (e.g. the
/// literal text between two adjacent substitutions, `` `${a}${b}` ``), unlike every other
/// lexeme in this crate, because the surrounding delimiters make the zero-length case
/// unambiguous.
struct TemplateChunk;

impl ILexeme for TemplateChunk {
    type Token = TokenKind;
    type State = u8;

    fn consume(
        &self,
        code: &Code,
        pointer: usize,
        _stream: &Vec<Lex<TokenKind>>,
        _state: &mut Vec<u8>,
    ) -> Option<Lex<TokenKind>> {
        let bytes = code.value;
        let mut i = pointer;
        while i < bytes.len() {
            match bytes[i] {
                b'`' => break,
                b'$' if bytes.get(i + 1) == Some(&b'{') => break,
                b'\\' => i += 2,
                _ => i += 1,
            }
        }
        let end = i.min(bytes.len());
        if end == pointer {
            None
        } else {
            Some(Lex::new(TokenKind::TemplateChunkRaw, pointer, end))
        }
    }

    fn get_grammar_field(&self) -> Vec<(TokenKind, String)> {
        vec![(TokenKind::TemplateChunkRaw, "<template text>".into())]
    }
}

fn identifier_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    let identifier = Pattern::new(TokenKind::Identifier, r"^[_$a-zA-Z][_$a-zA-Z0-9]*").unwrap();
    let mapped = Mapper::new(
        identifier,
        vec![
            ("var", TokenKind::Var), ("let", TokenKind::Let), ("const", TokenKind::Const),
            ("function", TokenKind::Function), ("if", TokenKind::If), ("else", TokenKind::Else),
            ("for", TokenKind::For), ("while", TokenKind::While), ("do", TokenKind::Do),
            ("return", TokenKind::Return), ("break", TokenKind::Break), ("continue", TokenKind::Continue),
            ("switch", TokenKind::Switch), ("case", TokenKind::Case), ("default", TokenKind::Default),
            ("try", TokenKind::Try), ("catch", TokenKind::Catch), ("finally", TokenKind::Finally),
            ("throw", TokenKind::Throw), ("new", TokenKind::New), ("this", TokenKind::This),
            ("typeof", TokenKind::Typeof), ("delete", TokenKind::Delete), ("in", TokenKind::In),
            ("instanceof", TokenKind::Instanceof), ("void", TokenKind::Void), ("with", TokenKind::With),
            ("debugger", TokenKind::Debugger), ("class", TokenKind::Class), ("extends", TokenKind::Extends),
            ("super", TokenKind::Super), ("import", TokenKind::Import), ("export", TokenKind::Export),
            ("yield", TokenKind::Yield), ("async", TokenKind::Async), ("await", TokenKind::Await),
            ("true", TokenKind::True), ("false", TokenKind::False), ("null", TokenKind::Null),
            ("undefined", TokenKind::Undefined),
        ],
    )
    .unwrap();
    Rc::new(mapped)
}

fn number_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(
        Pattern::new(
            TokenKind::Number,
            r"^(0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+|(\d+(\.\d+)?|\.\d+)([eE][+-]?\d+)?)",
        )
        .unwrap(),
    )
}

fn string_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(
        Pattern::new(
            TokenKind::String,
            r#"^("([^"\\\r\n]|\\.)*"|'([^'\\\r\n]|\\.)*')"#,
        )
        .unwrap(),
    )
}

fn line_comment_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(Pattern::new(TokenKind::LineComment, r"^//[^\n]*").unwrap())
}

fn block_comment_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(Pattern::new(TokenKind::BlockComment, r"^/\*([^*]|\*[^/])*\*/").unwrap())
}

fn whitespace_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(Pattern::new(TokenKind::Whitespace, r"^[ \t\r\n\x0c\x0b]+").unwrap())
}

/// `/` and `/=` claimed only when the preceding real token permits division; discarded
/// (falling through to the regex-literal pattern tried next) otherwise. This is the
/// crate's version of the regex-vs-division `ThunkStateMixin` documented in
/// [crate::lexeme]'s own JavaScript example.
fn division_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    let div_punct = Punctuations::new(vec![("/=", TokenKind::SlashAssign), ("/", TokenKind::Slash)]).unwrap();
    Rc::new(div_punct.thunk_mixin(|_lex, _code, stream| {
        let permits_division = stream
            .iter()
            .rev()
            .find(|t| !matches!(t.token, TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment))
            .map_or(true, |t| !t.token.permits_regex_after());
        Action::None { discard: !permits_division }
    }))
}

fn regex_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    Rc::new(Pattern::new(TokenKind::Regex, r"^/([^\\/\r\n\[]|\\.|\[([^\]\\\r\n]|\\.)*\])+/[a-zA-Z]*").unwrap())
}

fn main_punctuation_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    use TokenKind::*;
    let punctuations = Punctuations::new(vec![
        (">>>=", UShrAssign), ("<<=", ShlAssign), (">>=", ShrAssign), ("...", Spread),
        ("===", EqStrict), ("!==", NeStrict), (">>>", UShr), ("**=", StarStarAssign),
        ("&&", AndAnd), ("||", OrOr), ("??", NullishCoalesce), ("?.", QuestionDot),
        ("=>", Arrow), ("==", Eq), ("!=", Ne), ("<=", Le), (">=", Ge), ("<<", Shl), (">>", Shr),
        ("++", PlusPlus), ("--", MinusMinus), ("+=", PlusAssign), ("-=", MinusAssign),
        ("*=", StarAssign), ("%=", PercentAssign), ("&=", AndAssign), ("|=", OrAssign),
        ("^=", XorAssign), ("**", StarStar),
        ("+", Plus), ("-", Minus), ("*", Star), ("%", Percent), ("=", Assign),
        ("<", Lt), (">", Gt), ("!", Not), ("&", BitAnd), ("|", BitOr), ("^", BitXor), ("~", BitNot),
        ("?", Question), (":", Colon),
        ("(", LParen), (")", RParen), ("{", LBrace), ("}", RBrace), ("[", LBracket), ("]", RBracket),
        (";", Semicolon), (",", Comma), (".", Dot),
        ("`", TemplateTickOpen),
    ])
    .unwrap();

    Rc::new(StateMixin::new(
        punctuations,
        vec![
            (TemplateTickOpen, Action::append(TEMPLATE, false)),
            (LBrace, Action::append(MAIN, false)),
            (RBrace, Action::remove(false)),
        ],
    ))
}

fn template_punctuation_lexeme() -> Rc<dyn ILexeme<Token = TokenKind, State = u8>> {
    use TokenKind::*;
    let punctuations = Punctuations::new(vec![("`", TemplateTickClose), ("${", TemplateExprStart)]).unwrap();
    Rc::new(StateMixin::new(
        punctuations,
        vec![
            (TemplateTickClose, Action::remove(false)),
            (TemplateExprStart, Action::append(MAIN, false)),
        ],
    ))
}

fn raw_tokenizer() -> CombinedTokenizer<TokenKind, u8> {
    let mut tokenizer = CombinedTokenizer::new(
        MAIN,
        vec![
            whitespace_lexeme(),
            line_comment_lexeme(),
            block_comment_lexeme(),
            identifier_lexeme(),
            number_lexeme(),
            string_lexeme(),
            division_lexeme(),
            regex_lexeme(),
            main_punctuation_lexeme(),
        ],
    );
    tokenizer.add_state(TEMPLATE, vec![template_punctuation_lexeme(), Rc::new(TemplateChunk)]);
    tokenizer
}

/// Merge the raw tick/chunk/expr-start sequence a [CombinedTokenizer] produces into the
/// four template terminals the grammar expects.
///
/// Whether a given `}` closes a substitution (and should be fused into the next
/// `TemplateMiddle`/`TemplateTail`) or is an ordinary brace cannot be read off its token
/// kind alone — `{`/`}` inside a substitution's own nested object literals look
/// identical. A small brace-depth stack, tracked here independently of the tokenizer's
/// own internal state stack, disambiguates them.
fn merge_template_tokens(raw: &[Lex<TokenKind>], code: &Code) -> Result<Vec<Lex<TokenKind>>, ParserError> {
    enum Frame {
        Brace,
        Subst,
    }
    let mut stack: Vec<Frame> = Vec::new();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i].token {
            TokenKind::LBrace => {
                stack.push(Frame::Brace);
                out.push(raw[i]);
                i += 1;
            }
            TokenKind::RBrace => match stack.pop() {
                Some(Frame::Brace) | None => {
                    out.push(raw[i]);
                    i += 1;
                }
                Some(Frame::Subst) => {
                    let (kind, end, next_i) = accumulate_chunk(raw, i, code)?;
                    if kind == TokenKind::TemplateMiddle {
                        stack.push(Frame::Subst);
                    }
                    out.push(Lex::new(kind, raw[i].start, end));
                    i = next_i;
                }
            },
            TokenKind::TemplateTickOpen => {
                let (kind, end, next_i) = accumulate_chunk(raw, i, code)?;
                if kind == TokenKind::TemplateHead {
                    stack.push(Frame::Subst);
                }
                out.push(Lex::new(kind, raw[i].start, end));
                i = next_i;
            }
            _ => {
                out.push(raw[i]);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Starting at `raw[start]` (a `TemplateTickOpen` or a substitution-closing `RBrace`),
/// consume the optional chunk text and its terminator, returning the fused token kind
/// (`TemplateNoSub`/`TemplateHead` for a tick start, `TemplateTail`/`TemplateMiddle` for a
/// brace start), the byte offset the fused token ends at, and the index of the next
/// unconsumed raw token.
fn accumulate_chunk(
    raw: &[Lex<TokenKind>],
    start: usize,
    code: &Code,
) -> Result<(TokenKind, usize, usize), ParserError> {
    let opened_by_tick = raw[start].token == TokenKind::TemplateTickOpen;
    let mut i = start + 1;
    if i < raw.len() && raw[i].token == TokenKind::TemplateChunkRaw {
        i += 1;
    }
    let terminator = raw.get(i).ok_or_else(|| {
        ParserError::lexical(code.obtain_position(code.value.len()), "unterminated template literal")
    })?;
    let kind = match (opened_by_tick, terminator.token) {
        (true, TokenKind::TemplateTickClose) => TokenKind::TemplateNoSub,
        (true, TokenKind::TemplateExprStart) => TokenKind::TemplateHead,
        (false, TokenKind::TemplateTickClose) => TokenKind::TemplateTail,
        (false, TokenKind::TemplateExprStart) => TokenKind::TemplateMiddle,
        _ => {
            return Err(ParserError::lexical(
                code.obtain_position(terminator.start),
                "unterminated template literal",
            ))
        }
    };
    Ok((kind, terminator.end, i + 1))
}

/// Tokenize a complete source buffer into the adapted token stream the ASI engine and
/// parser operate on: trivia stripped, template literals fused, each token carrying its
/// own text and whether a line terminator preceded it.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParserError> {
    let code = Code::from(source);
    let tokenizer = raw_tokenizer();
    let raw = tokenizer.tokenize(&code).map_err(|e| {
        ParserError::lexical(code.obtain_position(e.pointer), e.message)
    })?;
    let merged = merge_template_tokens(&raw, &code)?;

    let mut tokens = Vec::with_capacity(merged.len());
    let mut newline_before = false;
    for lex in merged {
        match lex.token {
            TokenKind::Whitespace => {
                if code.value[lex.start..lex.end].contains(&b'\n') {
                    newline_before = true;
                }
            }
            TokenKind::LineComment => newline_before = true,
            TokenKind::BlockComment => {
                if code.value[lex.start..lex.end].contains(&b'\n') {
                    newline_before = true;
                }
            }
            TokenKind::TemplateChunkRaw | TokenKind::TemplateExprStart | TokenKind::TemplateTickOpen
            | TokenKind::TemplateTickClose => {
                unreachable!("fused away by merge_template_tokens")
            }
            kind => {
                let text = code.as_str()[lex.start..lex.end].to_string();
                let position = code.obtain_position(lex.start);
                tokens.push(Token::new(kind, text, position, newline_before));
                newline_before = false;
            }
        }
    }
    let eof_position = code.obtain_position(code.value.len());
    tokens.push(Token::new(TokenKind::Eof, String::new(), eof_position, newline_before));
    Ok(tokens)
}
