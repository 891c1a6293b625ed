//! Which tags are written without a closing tag.

use std::collections::HashSet;

use kstring::KString;
use lazy_static::lazy_static;

// https://developer.mozilla.org/en-US/docs/Glossary/Void_element,
// plus a few obsolete ones that browsers still treat as void.
const VOID_ELEMENT_NAMES: &[&str] = &[
    "area",
    "base",
    "basefont", // obsolete
    "br",
    "col",
    "command", // obsolete
    "embed",
    "frame", // obsolete
    "hr",
    "img",
    "input",
    "isindex", // obsolete
    "keygen", // obsolete
    "link",
    "meta",
    "param",
    "source",
    "track",
    "wbr",
];

// SVG shapes that are usually written as `<circle ... />`; in HTML
// serialization the parser accepts them unclosed inside `<svg>`.
const SVG_SHAPE_NAMES: &[&str] = &[
    "circle",
    "ellipse",
    "line",
    "path",
    "polygon",
    "polyline",
    "rect",
    "stop",
    "use",
];

pub struct TagDb {
    self_closing: HashSet<KString>,
}

impl TagDb {
    fn new() -> TagDb {
        let self_closing = VOID_ELEMENT_NAMES.iter()
            .chain(SVG_SHAPE_NAMES.iter())
            .map(|n| KString::from_static(n))
            .collect();
        TagDb { self_closing }
    }

    /// Case sensitive; tag names in templates are expected in lower
    /// case.
    pub fn is_self_closing(&self, tag_name: &str) -> bool {
        self.self_closing.contains(tag_name)
    }

    pub fn self_closing_tags(&self) -> impl Iterator<Item = &str> {
        self.self_closing.iter().map(|k| k.as_str())
    }
}

lazy_static!{
    pub static ref TAGDB: TagDb = TagDb::new();
}

pub fn is_self_closing(tag_name: &str) -> bool {
    TAGDB.is_self_closing(tag_name)
}
