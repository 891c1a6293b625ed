//! Recursive descent parser from template source to `Block`.
//!
//! Syntax overview:
//!
//! ```text
//! // comment, /* comment */
//! #block-name
//! tag
//! tag/name { ...content... }
//! tag/name1, name2 (attr1=bare value, attr2='quoted', flag) { 'text' }
//! /name (super!, class=extra)     -- override of an inherited element
//! tag/, name1                     -- class tokens only, not overridable
//! @helper/name { ... }
//! super!  super.name!             -- inside { }: the parent's content
//! ```

use kstring::KString;

use crate::ast::{Attribute, Attributes, Block, Comment, Element, Node, SuperCall, Text};
use crate::error::{ParseError, ParseErrorKind};
use crate::scanner::{NameKind, Scanner};

pub fn parse(source: &str) -> Result<Block, ParseError> {
    Parser::new(source).parse()
}

/// Trim, normalize line endings, and strip the indentation (and
/// blank lines) of backtick string contents.
pub fn normalize_multiline_text(s: &str) -> String {
    let s = s.trim().replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(s.len());
    for line in s.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

fn ks(s: &str) -> KString {
    KString::from_ref(s)
}


pub struct Parser<'s> {
    s: Scanner<'s>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Parser<'s> {
        Parser { s: Scanner::new(source) }
    }

    pub fn parse(mut self) -> Result<Block, ParseError> {
        let mut content = Vec::new();
        while self.s.skip_whitespace() == Some('/') && self.s.at_comment() {
            content.push(Node::Comment(self.read_comment()?));
        }
        let name = if self.s.peek() == Some('#') {
            Some(self.read_block_name()?)
        } else {
            None
        };
        content.extend(self.read_content(false)?);
        Ok(Block { name, content })
    }

    fn read_block_name(&mut self) -> Result<KString, ParseError> {
        self.s.expect('#')?;
        match self.s.read_name(NameKind::Block) {
            Some(name) => Ok(ks(name)),
            None => Err(self.s.error(ParseErrorKind::InvalidBlockName))
        }
    }

    fn read_content(&mut self, brackets: bool) -> Result<Vec<Node>, ParseError> {
        let start = self.s.pos();
        if brackets {
            self.s.expect('{')?;
        }
        let mut content = Vec::new();
        loop {
            match self.s.skip_whitespace() {
                None => {
                    if brackets {
                        return Err(self.s.error_at(ParseErrorKind::MissingClosingBrace, start))
                    }
                    return Ok(content)
                }
                Some('\'' | '"' | '`') => {
                    content.push(Node::Text(self.read_text()?));
                }
                Some('/') if self.s.at_comment() => {
                    content.push(Node::Comment(self.read_comment()?));
                }
                Some('}') if brackets => {
                    self.s.advance();
                    return Ok(content)
                }
                Some(_) => {
                    if brackets {
                        if let Some(super_call) = self.read_super_call() {
                            content.push(Node::SuperCall(super_call));
                            continue;
                        }
                    }
                    content.push(Node::Element(self.read_element()?));
                }
            }
        }
    }

    fn read_super_call(&mut self) -> Option<SuperCall> {
        let (len, element_name) = self.s.match_super_call()?;
        self.s.skip_bytes(len);
        Some(SuperCall { element_name: element_name.map(ks) })
    }

    fn read_element(&mut self) -> Result<Element, ParseError> {
        let start = self.s.pos();
        let is_helper = self.s.eat("@");
        let tag_name = self.s.read_name(NameKind::Tag).map(ks);
        let c = if tag_name.is_some() {
            self.s.skip_whitespace()
        } else {
            self.s.peek()
        };
        let names = if c == Some('/') && !self.s.at_comment() {
            self.s.advance();
            self.s.skip_whitespace();
            Some(self.read_element_names()?)
        } else {
            None
        };
        if tag_name.is_none() && names.is_none() {
            return Err(self.s.error_at(ParseErrorKind::ExpectedElement, start))
        }
        let attributes = if self.s.peek() == Some('(') {
            let attributes = self.read_attributes()?;
            self.s.skip_whitespace();
            Some(attributes)
        } else {
            None
        };
        let content = if self.s.peek() == Some('{') {
            Some(self.read_content(true)?)
        } else {
            None
        };
        Ok(Element { is_helper, tag_name, names, attributes, content })
    }

    fn read_element_names(&mut self) -> Result<Vec<Option<KString>>, ParseError> {
        let mut names = Vec::new();
        if self.s.peek() == Some(',') {
            self.s.advance();
            self.s.skip_whitespace();
            names.push(None);
        }
        loop {
            let name = self.s.read_name(NameKind::Element).ok_or_else(
                || self.s.error(ParseErrorKind::ExpectedElementName))?;
            names.push(Some(ks(name)));
            if self.s.skip_whitespace() != Some(',') {
                return Ok(names)
            }
            self.s.advance();
            self.s.skip_whitespace();
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<Option<char>, ParseError> {
        loop {
            match self.s.skip_whitespace() {
                Some('/') => { self.read_comment()?; }
                c => return Ok(c)
            }
        }
    }

    fn read_attributes(&mut self) -> Result<Attributes, ParseError> {
        self.s.expect('(')?;
        let mut attributes = Attributes::default();
        if self.skip_whitespace_and_comments()? == Some(')') {
            self.s.advance();
            return Ok(attributes)
        }
        loop {
            let super_call = if attributes.super_call.is_none() {
                self.read_super_call()
            } else {
                None
            };
            if super_call.is_some() {
                attributes.super_call = super_call;
                self.skip_whitespace_and_comments()?;
            } else {
                let name = self.s.read_name(NameKind::Attribute).ok_or_else(
                    || self.s.error(ParseErrorKind::InvalidAttributeName))?;
                let value = if self.skip_whitespace_and_comments()? == Some('=') {
                    self.s.advance();
                    let value = match self.s.skip_whitespace() {
                        Some('\'' | '"' | '`') => self.read_string()?,
                        _ => self.read_bare_value()?
                    };
                    self.skip_whitespace_and_comments()?;
                    Some(KString::from_string(value))
                } else {
                    None
                };
                attributes.list.push(Attribute { name: ks(name), value });
            }
            match self.s.peek() {
                Some(')') => {
                    self.s.advance();
                    return Ok(attributes)
                }
                Some(',') => {
                    self.s.advance();
                    self.skip_whitespace_and_comments()?;
                }
                _ => return Err(self.s.error(ParseErrorKind::InvalidAttributes))
            }
        }
    }

    /// Up to the end of the line, `,` or `)`, trimmed; comments are
    /// part of the value.
    fn read_bare_value(&mut self) -> Result<String, ParseError> {
        let rest = self.s.rest();
        match rest.find(|c| matches!(c, '\r' | '\n' | ',' | ')')) {
            Some(len) => {
                self.s.skip_bytes(len);
                Ok(rest[..len].trim().to_string())
            }
            None => Err(self.s.error(ParseErrorKind::UnterminatedAttribute))
        }
    }

    fn read_text(&mut self) -> Result<Text, ParseError> {
        Ok(Text { value: KString::from_string(self.read_string()?) })
    }

    /// A quoted string with escapes decoded; backtick strings are
    /// normalized via `normalize_multiline_text`.
    fn read_string(&mut self) -> Result<String, ParseError> {
        let start = self.s.pos();
        let quote = match self.s.peek() {
            Some(c @ ('\'' | '"' | '`')) => c,
            found => return Err(self.s.error(ParseErrorKind::Expected { expected: '\'', found }))
        };
        self.s.advance();
        let mut out = String::new();
        loop {
            match self.s.advance() {
                None => return Err(self.s.error_at(ParseErrorKind::UnterminatedString, start)),
                Some(c) if c == quote => {
                    return Ok(if quote == '`' {
                        normalize_multiline_text(&out)
                    } else {
                        out
                    })
                }
                Some('\\') => {
                    let c = self.read_escape(start)?;
                    out.push(c);
                }
                Some('\r' | '\n') if quote != '`' => {
                    return Err(self.s.error_at(ParseErrorKind::UnterminatedString, start))
                }
                Some(c) => out.push(c)
            }
        }
    }

    /// After a backslash.
    fn read_escape(&mut self, string_start: usize) -> Result<char, ParseError> {
        let at = self.s.pos() - 1;
        match self.s.advance() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('b') => Ok('\u{8}'),
            Some('f') => Ok('\u{c}'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('x') => self.read_hex_escape(2, at, ParseErrorKind::MalformedHexEscape),
            Some('u') => self.read_hex_escape(4, at, ParseErrorKind::MalformedUnicodeEscape),
            Some(c) => Err(self.s.error_at(ParseErrorKind::UnknownEscape(c), at)),
            None => Err(self.s.error_at(ParseErrorKind::UnterminatedString, string_start)),
        }
    }

    fn read_hex_escape(
        &mut self, ndigits: usize, at: usize, malformed: ParseErrorKind
    ) -> Result<char, ParseError> {
        let c = self.s.rest().get(..ndigits)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|digits| u32::from_str_radix(digits, 16).ok())
            .and_then(char::from_u32);
        match c {
            Some(c) => {
                self.s.skip_bytes(ndigits);
                Ok(c)
            }
            None => Err(self.s.error_at(malformed, at))
        }
    }

    fn read_comment(&mut self) -> Result<Comment, ParseError> {
        let start = self.s.pos();
        self.s.expect('/')?;
        match self.s.peek() {
            Some('/') => {
                self.s.advance();
                let rest = self.s.rest();
                let len = rest.find(|c| c == '\r' || c == '\n').unwrap_or(rest.len());
                self.s.skip_bytes(len);
                Ok(Comment { value: ks(&rest[..len]), multiline: false })
            }
            Some('*') => {
                self.s.advance();
                let rest = self.s.rest();
                match rest.find("*/") {
                    Some(len) => {
                        self.s.skip_bytes(len + 2);
                        Ok(Comment { value: ks(&rest[..len]), multiline: true })
                    }
                    None => Err(self.s.error_at(ParseErrorKind::UnterminatedComment, start))
                }
            }
            found => Err(self.s.error(ParseErrorKind::Expected { expected: '/', found }))
        }
    }
}
