//! The syntax tree produced by the parser, consumed by the compiler
//! and by helpers.

use kstring::KString;
use serde::{Deserialize, Serialize};

/// One parsed template document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// From `#name`, if declared.
    pub name: Option<KString>,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    SuperCall(SuperCall),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Written as `@tag`: `tag_name` names a helper, not an HTML tag.
    pub is_helper: bool,
    pub tag_name: Option<KString>,
    /// `None` if no `/` was given. A leading `None` entry means the
    /// element has no identity and the remaining names only
    /// contribute class tokens.
    pub names: Option<Vec<Option<KString>>>,
    pub attributes: Option<Attributes>,
    /// `None` if there was no `{ }` block, which is different from an
    /// empty block when it comes to closing tags.
    pub content: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub super_call: Option<SuperCall>,
    pub list: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: KString,
    /// `None` for a bare `name` without `=`.
    pub value: Option<KString>,
}

/// `super!` or `super.name!`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperCall {
    pub element_name: Option<KString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub value: KString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub value: KString,
    pub multiline: bool,
}


impl Node {
    pub fn text(value: &str) -> Node {
        Node::Text(Text { value: KString::from_ref(value) })
    }
}

/// Private element names are overridable but don't produce class
/// tokens.
pub fn is_private_name(name: &str) -> bool {
    name.starts_with('_')
}

impl Element {
    /// A plain element with the given tag and nothing else, for
    /// building trees in helpers.
    pub fn new(tag_name: &str) -> Element {
        Element {
            is_helper: false,
            tag_name: Some(KString::from_ref(tag_name)),
            names: None,
            attributes: None,
            content: None,
        }
    }

    /// The identity used for overriding, i.e. `names[0]`.
    pub fn name(&self) -> Option<&KString> {
        self.names.as_ref()?.first()?.as_ref()
    }

    /// All names that are present, identity first.
    pub fn all_names(&self) -> impl Iterator<Item = &KString> {
        self.names.iter().flatten().flatten()
    }

    /// Names that get a class token in the rendered markup.
    pub fn class_names(&self) -> Vec<KString> {
        self.all_names()
            .filter(|n| !is_private_name(n))
            .cloned()
            .collect()
    }
}
