//! Character cursor over template source, used by the parser.

use crate::error::{ParseError, ParseErrorKind};

/// What kind of name to match; they differ in the allowed first
/// character and in whether a `ns:` prefix is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Block,
    Tag,
    Element,
    Attribute,
}

impl NameKind {
    fn allows_underscore_start(self) -> bool {
        match self {
            NameKind::Block | NameKind::Tag => false,
            NameKind::Element | NameKind::Attribute => true,
        }
    }

    fn allows_namespace(self) -> bool {
        match self {
            NameKind::Tag | NameKind::Attribute => true,
            NameKind::Block | NameKind::Element => false,
        }
    }
}

fn is_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Length in bytes of the identifier at the start of `s`, 0 if there
/// is none.
fn ident_len(s: &[u8], allow_underscore_start: bool) -> usize {
    match s.first() {
        Some(b) if b.is_ascii_alphabetic() || (allow_underscore_start && *b == b'_') => {
            1 + s[1..].iter().take_while(|b| is_name_continue(**b)).count()
        }
        _ => 0
    }
}

/// Length in bytes of a name of the given kind at the start of `s`.
fn name_len(s: &str, kind: NameKind) -> usize {
    let bytes = s.as_bytes();
    let len = ident_len(bytes, kind.allows_underscore_start());
    if len > 0 && kind.allows_namespace() && bytes.get(len) == Some(&b':') {
        let len2 = ident_len(&bytes[len + 1..], kind.allows_underscore_start());
        if len2 > 0 {
            return len + 1 + len2
        }
    }
    len
}


pub struct Scanner<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Scanner<'s> {
        Scanner { source, pos: 0 }
    }

    /// Byte offset of the current character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the current character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip `n` bytes, which must end on a char boundary.
    pub fn skip_bytes(&mut self, n: usize) {
        debug_assert!(self.source.is_char_boundary(self.pos + n));
        self.pos += n;
    }

    /// Skip characters <= ' ' and return the next one.
    pub fn skip_whitespace(&mut self) -> Option<char> {
        while let Some(c) = self.peek() {
            if c > ' ' {
                return Some(c)
            }
            self.pos += c.len_utf8();
        }
        None
    }

    /// True if the cursor is at `//` or `/*`.
    pub fn at_comment(&self) -> bool {
        let r = self.rest();
        r.starts_with("//") || r.starts_with("/*")
    }

    /// Consume `c` or fail.
    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            found => Err(self.error(ParseErrorKind::Expected { expected: c, found }))
        }
    }

    /// Consume `lit` if the rest of the input starts with it.
    pub fn eat(&mut self, lit: &str) -> bool {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Consume a name of the given kind, if there is one.
    pub fn read_name(&mut self, kind: NameKind) -> Option<&'s str> {
        let len = name_len(self.rest(), kind);
        if len == 0 {
            None
        } else {
            let name = &self.source[self.pos..self.pos + len];
            self.pos += len;
            Some(name)
        }
    }

    /// Match `super!` or `super.name!` without consuming anything;
    /// returns the total length and the element name.
    pub fn match_super_call(&self) -> Option<(usize, Option<&'s str>)> {
        let rest = self.rest();
        let after = rest.strip_prefix("super")?;
        if let Some(after_dot) = after.strip_prefix('.') {
            let len = name_len(after_dot, NameKind::Element);
            if len > 0 && after_dot[len..].starts_with('!') {
                return Some((5 + 1 + len + 1, Some(&after_dot[..len])))
            }
            None
        } else if after.starts_with('!') {
            Some((5 + 1, None))
        } else {
            None
        }
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.pos)
    }

    pub fn error_at(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.source, offset)
    }
}
