//! Compiler for a compact element/attribute markup language with
//! template inheritance, producing HTML with BEM style class names.
//!
//! ```
//! use bemplate::{Template, CompileOptions};
//!
//! let base = Template::new("#card\ndiv/title { 'Hello' }", &CompileOptions::default()).unwrap();
//! let child = base.extend("#card-x\nh1/title { super! ', world' }",
//!                         &CompileOptions::default()).unwrap();
//! assert_eq!(child.render(),
//!            "<h1 class=\"card-x__title card__title\">Hello, world</h1>");
//! ```

pub mod boxed_error;
pub mod warn;
pub mod env;
pub mod error;
pub mod ast;
pub mod scanner;
pub mod parser;
pub mod attributes;
pub mod ops;
pub mod helpers;
pub mod compiler;
pub mod template;

pub use error::{CompileError, CompileErrorKind, Error, ErrorKind, ParseError, ParseErrorKind};
pub use helpers::{register_helper, HelperRegistry};
pub use parser::parse;
pub use template::{CompileOptions, Template};
