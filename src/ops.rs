//! Render operations: compiled templates are lists of these, executed
//! by `Template::render`.

use bem_html::escape::push_escaped_attribute;
use kstring::KString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Ready-made markup.
    Literal(String),
    /// The class tokens for these element names, one per level of the
    /// prefix chain of the template being rendered.
    ElementClasses(Vec<KString>),
    /// The render operation of the named element, looked up starting
    /// from the rendered template.
    InvokeElement(KString),
    /// The content operation of the named element, looked up starting
    /// from the rendered template.
    InvokeContent(KString),
    /// The content operation of the named element, looked up starting
    /// from the parent of the template that defined this operation.
    SuperContent(KString),
}

/// Collects operations, merging adjacent literals.
#[derive(Debug, Default)]
pub struct OpBuffer {
    ops: Vec<RenderOp>,
}

impl OpBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return
        }
        if let Some(RenderOp::Literal(last)) = self.ops.last_mut() {
            last.push_str(s);
        } else {
            self.ops.push(RenderOp::Literal(s.to_string()));
        }
    }

    pub fn push(&mut self, op: RenderOp) {
        match op {
            RenderOp::Literal(s) => self.push_str(&s),
            _ => self.ops.push(op)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if there is nothing here except element invocations.
    pub fn only_invocations(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, RenderOp::InvokeElement(_)))
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<RenderOp> {
        self.ops
    }
}

/// Append the space separated class tokens `prefix + name` for each
/// name, and for each name each prefix in order.
pub fn push_element_classes(out: &mut String, prefixes: &[KString], names: &[KString]) {
    let mut first = true;
    for name in names {
        for prefix in prefixes {
            if !first {
                out.push(' ');
            }
            first = false;
            push_escaped_attribute(out, prefix);
            push_escaped_attribute(out, name);
        }
    }
}
