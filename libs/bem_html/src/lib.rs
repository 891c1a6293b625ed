//! The HTML knowledge the template compiler relies on but does not
//! own: which tags never get a closing tag, and how to escape text
//! and attribute values.

pub mod meta;
pub mod escape;
