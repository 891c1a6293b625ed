//! Parse and compile errors.

use kstring::KString;

use crate::{def_boxed_error, def_boxed_thiserror};

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("{c:?}"),
        None => "end of input".into()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("invalid block declaration")]
    InvalidBlockName,
    #[error("expected element")]
    ExpectedElement,
    #[error("expected element name")]
    ExpectedElementName,
    #[error("invalid attribute name")]
    InvalidAttributeName,
    #[error("unterminated attribute value")]
    UnterminatedAttribute,
    #[error("expected \",\" or \")\" in attribute list")]
    InvalidAttributes,
    #[error("missing \"}}\" in compound statement")]
    MissingClosingBrace,
    #[error("missing \"*/\" in comment")]
    UnterminatedComment,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("malformed hexadecimal escape sequence")]
    MalformedHexEscape,
    #[error("malformed unicode escape sequence")]
    MalformedUnicodeEscape,
    #[error("unknown escape sequence \"\\{0}\"")]
    UnknownEscape(char),
    #[error("expected {expected:?} instead of {}", describe_found(.found))]
    Expected { expected: char, found: Option<char> },
}

def_boxed_thiserror!(ParseError,
    #[error("syntax error: {kind} at line {line} column {column} (offset {offset}): {fragment:?}")]
    pub struct ParseErrorInner {
        pub kind: ParseErrorKind,
        /// Byte offset into the source.
        pub offset: usize,
        /// 1-based.
        pub line: usize,
        /// 1-based, in characters.
        pub column: usize,
        /// The source line containing `offset`.
        pub fragment: String,
    });

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, offset: usize) -> ParseError {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = source[offset..].find(|c| c == '\n' || c == '\r')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        ParseError::from(ParseErrorInner {
            kind,
            offset,
            line: before.matches('\n').count() + 1,
            column: source[line_start..offset].chars().count() + 1,
            fragment: source[line_start..line_end].to_string(),
        })
    }
}


def_boxed_thiserror!(CompileError,
    #[derive(Clone, PartialEq, Eq)]
    pub enum CompileErrorKind {
    #[error("element class tokens need a block name, which the root template lacks")]
    MissingBlockName,
    #[error("{construct} requires a parent template")]
    SuperWithoutParent { construct: KString },
    #[error("super call for element \"{0}\", which no ancestor template defines")]
    UndefinedSuperTarget(KString),
    #[error("super! outside of any named element")]
    SuperOutsideElement,
    #[error("super! in the attributes of an element without name needs an explicit element name")]
    AnonymousAttributeSuper,
    #[error("helper element without a resolvable helper name")]
    UnresolvedHelperName,
    #[error("helper \"{0}\" is not defined")]
    UndefinedHelper(KString),
    #[error("element \"{0}\" would end up containing itself")]
    RecursiveElement(KString),
});


#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

def_boxed_error!(Error, ErrorKind);
