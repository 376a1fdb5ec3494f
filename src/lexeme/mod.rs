//! Lexeme utilities: each analyzes string slices at incremental positions of the input
//! and produces tokens. [Pattern] and [Punctuations] match raw text; [Mapper] reclassifies
//! a matched token by its text (keywords out of an identifier pattern); [StateMixin]/
//! [ThunkStateMixin] additionally push, pop, or swap a shared state stack so a
//! [CombinedTokenizer](super::CombinedTokenizer) can switch lexeme sets mid-stream — the
//! mechanism this crate's lexer uses to re-enter template-literal substitutions.

mod action;
mod builder;
mod mapper;
mod mixin;
mod pattern;
mod punctuation;
use crate::{Code, FieldTree, ILexeme, Lex, Log};
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;
use std::{collections::HashMap, fmt::Debug, marker::PhantomData};

trait LexemeLogger {
    fn log_cell(&self) -> &OnceCell<Log<&'static str>>;
    fn log_enter(&self) {
        #[cfg(debug_assertions)]
        if let Some(l) = self.log_cell().get() {
            println!("Entering {}", l)
        }
    }

    fn log_result<T: Debug>(&self, _pointer: usize, _code: &Code, _result: &Option<Lex<T>>) {
        #[cfg(debug_assertions)]
        match _result {
            Some(lex) => self.log_success(_code, lex),
            None => self.log_failure(_pointer, _code),
        }
    }
    fn log_success<T: Debug>(&self, _code: &Code, _lex: &Lex<T>) {
        #[cfg(debug_assertions)]
        if let Some(log_label) = self.log_cell().get() {
            if log_label.order() >= Log::Success(()).order() {
                println!(
                    "Lexeme Success for {} : token: {:?} from {} to {}.",
                    log_label,
                    _lex.token,
                    _code.obtain_position(_lex.start),
                    _code.obtain_position(_lex.end)
                )
            }
        }
    }
    fn log_failure(&self, _pointer: usize, _code: &Code) {
        #[cfg(debug_assertions)]
        if let Some(log_label) = self.log_cell().get() {
            if log_label.order() >= Log::Result(()).order() {
                println!(
                    "Lexeme error for {} : at {}",
                    log_label,
                    _code.obtain_position(_pointer)
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An enum variants to represent tokenization state action.
///
/// [Action] is used by lexeme utilities [StateMixin] and [ThunkStateMixin] to change the stack state
/// so that [CombinedTokenizer](super::CombinedTokenizer) switch to different set of lexeme utilities to tokenize part of the input string.
pub enum Action<T> {
    Pop { discard: bool },
    Append { state: T, discard: bool },
    Switch { state: T, discard: bool },
    None { discard: bool },
}

/// A regular expression based lexeme utility.
///
/// Provided regex expression will be matched at incremental position of the input utf-8 bytes string and return tokenized result.
/// The provided regular expression should be enforce to match string from the beginning i.e. expression should implement start of string (^) match.
///
/// # Example
/// ```
/// use js_syntax::{lexeme::Pattern, tokenization::CombinedTokenizer, Code, ITokenization, Lex, TokenImpl};
/// use std::rc::Rc;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// enum Token {
///     ID,
///     Space,
///     EOF,
/// }
/// impl TokenImpl for Token {
///     fn eof() -> Self { Self::EOF }
///     fn is_structural(&self) -> bool { self != &Self::Space }
/// }
/// let identifier = Pattern::new(Token::ID, r#"^[_$a-zA-Z][_$\w]*"#).unwrap();
/// let space = Pattern::new(Token::Space, r#"^\s+"#).unwrap();
///
/// let tokenizer = CombinedTokenizer::new(0u8, vec![Rc::new(identifier), Rc::new(space)]);
/// let lex_stream = tokenizer.tokenize(&Code::from("abc xy")).unwrap();
/// assert_eq!(
///     lex_stream,
///     vec![
///         Lex { token: Token::ID, start: 0, end: 3 },
///         Lex { token: Token::Space, start: 3, end: 4 },
///         Lex { token: Token::ID, start: 4, end: 6 },
///         Lex { token: Token::EOF, start: 6, end: 6 },
///     ]
/// );
/// ```
pub struct Pattern<TToken, TState = u8> {
    token: TToken,
    regexp: Regex,
    log: OnceCell<Log<&'static str>>,
    _state: PhantomData<TState>,
}

/// A lexer utility to match a set of constant values like punctuations, operators etc.  
///
/// Match punctuation values at the incremental position of the input and return tokenized result.
/// This lexeme utility will create a tree structure from utf-8 values of the provided punctuation.
/// The input utf-8 values will be match with each node of the tree return associated token value if complete match is found.  
///
/// # Example
/// ```
/// use js_syntax::{
///     lexeme::{Pattern, Punctuations},
///     tokenization::CombinedTokenizer,
///     Code,
///     ITokenization, Lex, TokenImpl,
/// };
/// use std::rc::Rc;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Token {
///     ID,
///     Space,
///     Add,
///     Subtract,
///     PlusPlus,
///     MinusMinus,
///     EOF,
/// }
///
/// impl TokenImpl for Token {
///     fn eof() -> Self { Self::EOF }
///     fn is_structural(&self) -> bool { *self != Self::EOF }
/// }
///
/// let space = Pattern::new(Token::Space, r#"^\s+"#).unwrap();
/// let identifier = Pattern::new(Token::ID, r#"^[_$a-zA-Z][_$\w]*"#).unwrap();
/// let punctuations: Punctuations<Token> = Punctuations::new(vec![
///     ("+", Token::Add),
///     ("++", Token::PlusPlus),
///     ("--", Token::MinusMinus),
///     ("-", Token::Subtract),
/// ])
/// .unwrap();
///
/// let tokenizer = CombinedTokenizer::new(0u8, vec![
///     Rc::new(punctuations),
///     Rc::new(space),
///     Rc::new(identifier),
/// ]);
/// let lex = tokenizer.tokenize(&Code::from("a+++b")).unwrap();
/// assert_eq!(
///     lex,
///     vec![
///         Lex { token: Token::ID, start: 0, end: 1 },
///         Lex { token: Token::PlusPlus, start: 1, end: 3 },
///         Lex { token: Token::Add, start: 3, end: 4 },
///         Lex { token: Token::ID, start: 4, end: 5 },
///         Lex { token: Token::EOF, start: 5, end: 5 }
///     ]
/// );
/// let lex = tokenizer.tokenize(&Code::from("a+ ++b")).unwrap();
/// assert_eq!(
///     lex,
///     vec![
///         Lex { token: Token::ID, start: 0, end: 1 },
///         Lex { token: Token::Add, start: 1, end: 2 },
///         Lex { token: Token::Space, start: 2, end: 3 },
///         Lex { token: Token::PlusPlus, start: 3, end: 5 },
///         Lex { token: Token::ID, start: 5, end: 6 },
///         Lex { token: Token::EOF, start: 6, end: 6 }
///     ]
/// );
/// ```
pub struct Punctuations<TToken, TState = u8> {
    field_tree: FieldTree<TToken>,
    punctuations: Vec<(String, TToken)>,
    log: OnceCell<Log<&'static str>>,
    _state: PhantomData<TState>,
}

/// A lexical utility that transforms tokenized data based on the mapped string fields.
///
/// The associated lexeme utility will first be matched with the input string.
/// Once the associated lexeme utility successfully obtains token data,
/// it will then look for the appropriate token value for the tokenized string part of the input.
/// If no match is found for the corresponding tokenized string part, the original tokenized data will be returned.
/// # Example
/// ```
/// use js_syntax::{
///     lexeme::{Mapper, Pattern},
///     tokenization::CombinedTokenizer,
///     Code,
///     ITokenization, Lex, TokenImpl,
/// };
/// use std::rc::Rc;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Token {
///     ID,
///     IF,
///     ELSE,
///     FOR,
///     Space,
///     True,
///     False,
///     EOF,
/// }
///
/// impl TokenImpl for Token {
///     fn eof() -> Self { Self::EOF }
///     fn is_structural(&self) -> bool { *self != Self::EOF }
/// }
/// let id_lexer: Pattern<Token> = Pattern::new(Token::ID, r#"^[_$a-zA-Z][_$\w]*"#).unwrap();
/// let space = Pattern::new(Token::Space, r#"^\s+"#).unwrap();
///
/// let mapped_lexer = Mapper::new(
///     id_lexer,
///     vec![
///         ("if", Token::IF),
///         ("else", Token::ELSE),
///         ("for", Token::FOR),
///         ("true", Token::True),
///         ("false", Token::False),
///     ],
/// )
/// .unwrap();
///
/// let tokenizer = CombinedTokenizer::new(0u8, vec![Rc::new(mapped_lexer), Rc::new(space)]);
/// let lex_stream = tokenizer.tokenize(&Code::from("abc xy")).unwrap();
///
/// assert_eq!(
///     lex_stream,
///     vec![
///         Lex { token: Token::ID, start: 0, end: 3 },
///         Lex { token: Token::Space, start: 3, end: 4 },
///         Lex { token: Token::ID, start: 4, end: 6 },
///         Lex { token: Token::EOF, start: 6, end: 6 }
///     ]
/// );
/// let lex = tokenizer.tokenize(&Code::from("if true")).unwrap();
/// assert_eq!(
///     lex,
///     vec![
///         Lex { token: Token::IF, start: 0, end: 2 },
///         Lex { token: Token::Space, start: 2, end: 3 },
///         Lex { token: Token::True, start: 3, end: 7 },
///         Lex { token: Token::EOF, start: 7, end: 7 }
///     ]
/// );
///
/// ```
pub struct Mapper<TLexer: ILexeme> {
    lexeme: TLexer,
    log: OnceCell<Log<&'static str>>,
    fields: HashMap<Vec<u8>, TLexer::Token>,
}

/// A lexeme utility to modify state stack base on the provided [Action] corresponding to the tokens.
///
/// Once the associated lexeme utility create a token,
/// the utility will change the state stack based on [Action] for the state based [tokenizer](crate::CombinedTokenizer).
///
/// # Example
///
/// ```
/// use js_syntax::{
///     lexeme::{Action, Pattern, Punctuations, StateMixin},
///     tokenization::CombinedTokenizer,
///     Code,
///     ITokenization, Lex, TokenImpl,
/// };
/// use std::rc::Rc;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Token {
///     ID,
///     Number,
///     Add,
///     Assign,
///     Subtract,
///     EOF,
///     TemplateTick,
///     TemplateExprStart,
///     TemplateString,
///     OpenBrace,
///     CloseBrace,
/// }
/// impl TokenImpl for Token {
///     fn eof() -> Self { Self::EOF }
///     fn is_structural(&self) -> bool { *self != Self::EOF }
/// }
/// const MAIN: u8 = 0;
/// const TEMPLATE: u8 = 1;
/// let identifier = Rc::new(Pattern::new(Token::ID, r#"^[_$a-zA-Z][_$\w]*"#).unwrap());
/// let number_literal =
///     Rc::new(Pattern::new(Token::Number, r"^(0|[\d--0]\d*)(\.\d+)?([eE][+-]?\d+)?").unwrap());
///
/// let expression_punctuation = Punctuations::new(vec![
///     ("+", Token::Add),
///     ("-", Token::Subtract),
///     ("=", Token::Assign),
///     ("{", Token::OpenBrace),
///     ("}", Token::CloseBrace),
///     ("`", Token::TemplateTick),
/// ])
/// .unwrap();
///
/// let expr_punctuation_mixin = Rc::new(StateMixin::new(
///     expression_punctuation,
///     vec![
///         (Token::TemplateTick, Action::append(TEMPLATE, false)), // Encountering a TemplateTick (`) indicates beginning of template literal.
///         // While tokenizing in the template literal expression we are going to augment stack to keep track of open and close brace.
///         (Token::OpenBrace, Action::append(MAIN, false)),
///         (Token::CloseBrace, Action::remove(false)),
///     ],
/// ));
///
/// let lex_template_string: Rc<Pattern<Token>> = Rc::new(
///     Pattern::new(
///         Token::TemplateString,
///         r"^([^`\\$]|\$[^{^`\\$]|\\[${`bfnrtv])+",
///     )
///     .unwrap(),
/// );
///
/// let template_punctuations = Punctuations::new(vec![
///     ("`", Token::TemplateTick),
///     ("${", Token::TemplateExprStart),
/// ])
/// .unwrap();
/// let template_punctuation_mixin = StateMixin::new(
///     template_punctuations,
///     vec![
///         (Token::TemplateTick, Action::remove(false)), // Encountering TemplateTick (`) indicates end of template literal state.
///         (Token::TemplateExprStart, Action::append(MAIN, false)),
///     ],
/// );
///
/// let mut combined_tokenizer = CombinedTokenizer::new(
///     MAIN,
///     vec![identifier, number_literal, expr_punctuation_mixin],
/// );
/// combined_tokenizer.add_state(
///     TEMPLATE,
///     vec![Rc::new(template_punctuation_mixin), lex_template_string],
/// );
///
/// let token_stream = combined_tokenizer
///     .tokenize(&Code::from("d=`Sum is ${a+b}`"))
///     .unwrap();
/// debug_assert_eq!(
///     token_stream,
///     vec![
///         Lex::new(Token::ID, 0, 1),
///         Lex::new(Token::Assign, 1, 2),
///         Lex::new(Token::TemplateTick, 2, 3),
///         Lex::new(Token::TemplateString, 3, 10),
///         Lex::new(Token::TemplateExprStart, 10, 12,),
///         Lex::new(Token::ID, 12, 13),
///         Lex::new(Token::Add, 13, 14),
///         Lex::new(Token::ID, 14, 15),
///         Lex::new(Token::CloseBrace, 15, 16),
///         Lex::new(Token::TemplateTick, 16, 17),
///         Lex::new(Token::EOF, 17, 17),
///     ]
/// );
///
/// ```

pub struct StateMixin<TLexeme: ILexeme> {
    lexeme: TLexeme,
    log: OnceCell<Log<&'static str>>,
    actions: Vec<(TLexeme::Token, Action<TLexeme::State>)>,
}

/// A lexeme utility to modify state stack based on [Action] received from the closure function.
///
/// This similar to [StateMixin] however, [Action] is received from the closure function.
/// # Example
/// ```
/// use js_syntax::{
///     lexeme::{Action, Pattern, Punctuations, ThunkStateMixin},
///     tokenization::CombinedTokenizer,
///     Code,
///     ITokenization, Lex, TokenImpl,
/// };
/// use std::rc::Rc;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Token {
///     RegexLiteral,
///     ID,
///     Number,
///     Add,
///     Mul,
///     Div,
///     Assign,
///     Subtract,
///     EOF,
/// }
/// impl TokenImpl for Token {
///     fn eof() -> Self { Self::EOF }
///     fn is_structural(&self) -> bool { *self != Self::EOF }
/// }
/// let identifier = Rc::new(Pattern::new(Token::ID, r#"^[_$a-zA-Z][_$\w]*"#).unwrap());
/// let number_literal =
///     Rc::new(Pattern::new(Token::Number, r"^(0|[\d--0]\d*)(\.\d+)?([eE][+-]?\d+)?").unwrap());
///
/// let punctuations = Punctuations::new(vec![
///     ("+", Token::Add),
///     ("*", Token::Mul),
///     ("/", Token::Div),
///     ("=", Token::Assign),
///     ("-", Token::Subtract),
/// ])
/// .unwrap();
///
/// let punctuation_mixin = Rc::new(ThunkStateMixin::new(
///     punctuations,
///     |lex_data, _code, stream| {
///         if lex_data.token == Token::Div {
///             let is_expr_continuation =
///                 stream
///                     .last()
///                     .map_or(false, |pre_data| match pre_data.token {
///                         Token::ID | Token::Number => true,
///                         _ => false,
///                     });
///             Action::None {
///                 discard: !is_expr_continuation,
///             } // If the symbol '/' immediately after id or number it is a div element.
///               // Otherwise discard the lexeme if it is part of regex expression
///         } else {
///             Action::None { discard: false }
///         }
///     },
/// ));
///
/// let regex_literal =
///     Rc::new(Pattern::new(Token::RegexLiteral, r"^/([^\\/\r\n\[]|\\.|\[[^]]+\])+/").unwrap());
///
/// let tokenizer = CombinedTokenizer::new(0u8, vec![
///     identifier,
///     number_literal,
///     punctuation_mixin,
///     regex_literal, // Should appear after punctuation so that it will be checked once div '/' is rejected.
/// ]);
///
/// let lex = tokenizer.tokenize(&Code::from("2/xy/6")).unwrap();
/// assert_eq!(
///     lex,
///     [
///         Lex { token: Token::Number, start: 0, end: 1 },
///         Lex { token: Token::Div, start: 1, end: 2 },
///         Lex { token: Token::ID, start: 2, end: 4 },
///         Lex { token: Token::Div, start: 4, end: 5 },
///         Lex { token: Token::Number, start: 5, end: 6 },
///         Lex { token: Token::EOF, start: 6, end: 6 },
///     ]
/// );
/// let regex_lex = tokenizer.tokenize(&Code::from("a=/xy/")).unwrap();
/// assert_eq!(
///     regex_lex,
///     [
///         Lex { token: Token::ID, start: 0, end: 1 },
///         Lex { token: Token::Assign, start: 1, end: 2 },
///         Lex { token: Token::RegexLiteral, start: 2, end: 6 },
///         Lex { token: Token::EOF, start: 6, end: 6 },
///     ]
/// );
///
/// ```
pub struct ThunkStateMixin<
    TL: ILexeme,
    TF: Fn(&Lex<TL::Token>, &[u8], &Vec<Lex<TL::Token>>) -> Action<TL::State>,
> {
    lexeme: TL,
    log: OnceCell<Log<&'static str>>,
    thunk_action: TF,
}

/// A trait implementation utility to convert one lexeme utility to another higher order lexeme utility.
///
/// The trait is implemented for generic [ILexeme] types.
/// Therefore, the associated methods are available for all utilities which implement [ILexeme] trait.
pub trait LexemeBuilder: ILexeme {
    fn thunk_mixin<
        TM: Fn(&Lex<Self::Token>, &[u8], &Vec<Lex<Self::Token>>) -> Action<Self::State>,
    >(
        self,
        middleware: TM,
    ) -> ThunkStateMixin<Self, TM>
    where
        Self: Sized;
}
