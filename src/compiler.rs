//! Turns a `Block` (plus the template it extends, if any) into render
//! operations.

use std::collections::HashMap;
use std::sync::Arc;

use bem_html::escape::{push_escaped_attribute, push_escaped_text};
use bem_html::meta::is_self_closing;
use kstring::KString;

use crate::ast::{Attributes, Block, Element, Node, SuperCall};
use crate::attributes::AttributeSlots;
use crate::error::{CompileError, CompileErrorKind};
use crate::helpers::{global_helpers, HelperRegistry};
use crate::ops::{OpBuffer, RenderOp};
use crate::template::{CompileOptions, CompiledElement, CompiledTemplate, Template};
use crate::{trace, warn};

/// The tag for elements that neither have one nor inherit one.
pub const DEFAULT_TAG: &str = "div";

/// The separator between block and element name in class tokens.
pub const ELEMENT_NAME_DELIMITER: &str = "__";

struct Scope {
    /// `None` only for the top level.
    name: Option<KString>,
    ops: OpBuffer,
}

struct Compiler<'t> {
    parent: Option<&'t CompiledTemplate>,
    helpers: &'t HelperRegistry,
    /// Whether the prefix chain will be non-empty, i.e. class tokens
    /// can be generated.
    has_prefixes: bool,
    scopes: Vec<Scope>,
    elements: HashMap<KString, CompiledElement>,
    tag_names: HashMap<KString, KString>,
    attribute_lists: HashMap<KString, AttributeSlots>,
}

fn super_without_parent(construct: &str) -> CompileError {
    CompileErrorKind::SuperWithoutParent { construct: KString::from_ref(construct) }.into()
}

impl<'t> Compiler<'t> {
    fn new(
        parent: Option<&'t CompiledTemplate>,
        helpers: &'t HelperRegistry,
        has_prefixes: bool,
    ) -> Self {
        Compiler {
            parent,
            helpers,
            has_prefixes,
            scopes: vec![Scope { name: None, ops: OpBuffer::new() }],
            elements: HashMap::new(),
            tag_names: HashMap::new(),
            attribute_lists: HashMap::new(),
        }
    }

    fn scope(&mut self) -> &mut OpBuffer {
        &mut self.scopes.last_mut().expect("top level scope is never popped").ops
    }

    /// The name of the innermost named element being compiled.
    fn scope_name(&self) -> Option<&KString> {
        self.scopes.iter().rev().find_map(|s| s.name.as_ref())
    }

    fn lookup_tag_name(&self, name: &str) -> Option<&KString> {
        self.tag_names.get(name).or_else(
            || self.parent.and_then(|p| p.lookup_tag_name(name)))
    }

    fn compile_node(&mut self, node: &Node) -> Result<(), CompileError> {
        match node {
            Node::Element(el) => self.compile_element(el),
            Node::Text(text) => {
                let mut s = String::new();
                push_escaped_text(&mut s, &text.value);
                self.scope().push_str(&s);
                Ok(())
            }
            Node::Comment(_) => Ok(()),
            Node::SuperCall(super_call) => self.compile_super_call(super_call),
        }
    }

    fn compile_super_call(&mut self, super_call: &SuperCall) -> Result<(), CompileError> {
        let target = match &super_call.element_name {
            Some(name) => name.clone(),
            None => self.scope_name().cloned().ok_or(CompileErrorKind::SuperOutsideElement)?
        };
        let parent = self.parent.ok_or_else(|| super_without_parent("super!"))?;
        if parent.lookup_element(&target).is_none() {
            return Err(CompileErrorKind::UndefinedSuperTarget(target).into())
        }
        self.scope().push(RenderOp::SuperContent(target));
        Ok(())
    }

    fn compile_element(&mut self, el: &Element) -> Result<(), CompileError> {
        let mut tag_name = el.tag_name.clone();
        if let Some(name) = el.name() {
            match &el.tag_name {
                Some(tag) => {
                    self.tag_names.entry(name.clone()).or_insert_with(|| tag.clone());
                }
                None => tag_name = self.lookup_tag_name(name).cloned()
            }
            self.compile_named(el, name, tag_name)
        } else {
            self.compile_anonymous(el, tag_name)
        }
    }

    /// A starting point from an ancestor's slots for `super.name!`,
    /// or empty.
    fn inherited_slots(&self, super_call: Option<&SuperCall>, name: Option<&KString>)
                       -> Result<AttributeSlots, CompileError>
    {
        match super_call {
            Some(super_call) => {
                let target = super_call.element_name.as_ref().or(name)
                    .ok_or(CompileErrorKind::AnonymousAttributeSuper)?;
                let parent = self.parent.ok_or_else(|| super_without_parent("attribute super!"))?;
                Ok(parent.lookup_attribute_list(target).cloned().unwrap_or_default())
            }
            None => Ok(AttributeSlots::new())
        }
    }

    fn attribute_slots(&self, attributes: &Attributes, name: Option<&KString>)
                       -> Result<AttributeSlots, CompileError>
    {
        let mut slots = self.inherited_slots(attributes.super_call.as_ref(), name)?;
        for attribute in &attributes.list {
            slots.set_attribute(attribute);
        }
        Ok(slots)
    }

    /// Append the attributes including the class attribute carrying
    /// the tokens for `class_names`, if any.
    fn push_attributes(
        &self,
        out: &mut OpBuffer,
        slots: Option<&AttributeSlots>,
        class_names: Vec<KString>,
    ) -> Result<(), CompileError> {
        let with_classes = !class_names.is_empty();
        if with_classes && !self.has_prefixes {
            return Err(CompileErrorKind::MissingBlockName.into())
        }
        let explicit_class = slots.map_or(false, |s| s.position("class").is_some());
        let mut class_names = Some(class_names).filter(|_| with_classes);
        if !explicit_class {
            if let Some(class_names) = class_names.take() {
                out.push_str(" class=\"");
                out.push(RenderOp::ElementClasses(class_names));
                out.push_str("\"");
            }
        }
        let mut s = String::new();
        for (name, value) in slots.into_iter().flat_map(|s| s.iter()) {
            s.clear();
            s.push(' ');
            s.push_str(name);
            s.push_str("=\"");
            if name.as_str() == "class" {
                if let Some(class_names) = class_names.take() {
                    out.push_str(&s);
                    out.push(RenderOp::ElementClasses(class_names));
                    s.clear();
                    if value.map_or(false, |v| !v.is_empty()) {
                        s.push(' ');
                    }
                }
            }
            if let Some(value) = value {
                push_escaped_attribute(&mut s, value);
            }
            s.push('"');
            out.push_str(&s);
        }
        Ok(())
    }

    fn compile_named(&mut self, el: &Element, name: &KString, tag_name: Option<KString>)
                     -> Result<(), CompileError>
    {
        let slots = match &el.attributes {
            Some(attributes) if !attributes.list.is_empty() || attributes.super_call.is_some() => {
                let slots = self.attribute_slots(attributes, Some(name))?;
                self.attribute_lists.insert(name.clone(), slots.clone());
                Some(slots)
            }
            _ => None
        };

        let mut render = OpBuffer::new();
        if el.is_helper {
            render.push(RenderOp::InvokeContent(name.clone()));
        } else {
            let tag = tag_name.as_deref().unwrap_or(DEFAULT_TAG);
            trace!("element \"{name}\" <{tag}>");
            render.push_str("<");
            render.push_str(tag);
            self.push_attributes(&mut render, slots.as_ref(), el.class_names())?;
            render.push_str(">");
            match &el.content {
                Some(content) if !content.is_empty() => {
                    render.push(RenderOp::InvokeContent(name.clone()));
                    render.push_str(&format!("</{tag}>"));
                }
                None if is_self_closing(tag) => {}
                _ => render.push_str(&format!("</{tag}>"))
            }
        }

        self.scopes.push(Scope { name: Some(name.clone()), ops: OpBuffer::new() });
        self.compile_children(el, tag_name.as_ref())?;
        let scope = self.scopes.pop().expect("pushed above");

        let element = CompiledElement {
            render: render.into_ops(),
            content: scope.ops.into_ops(),
        };
        if self.elements.insert(name.clone(), element).is_some() {
            warn!("element \"{name}\" is defined more than once in the same template, \
                   using the last definition");
        }
        self.scope().push(RenderOp::InvokeElement(name.clone()));
        Ok(())
    }

    fn compile_anonymous(&mut self, el: &Element, tag_name: Option<KString>)
                         -> Result<(), CompileError>
    {
        if el.is_helper {
            return self.compile_children(el, tag_name.as_ref())
        }
        let tag = tag_name.as_deref().unwrap_or(DEFAULT_TAG);
        let mut open = OpBuffer::new();
        open.push_str("<");
        open.push_str(tag);
        let slots = match &el.attributes {
            Some(attributes) => Some(self.attribute_slots(attributes, None)?),
            None => None
        };
        self.push_attributes(&mut open, slots.as_ref(), el.class_names())?;
        open.push_str(">");
        for op in open.into_ops() {
            self.scope().push(op);
        }
        self.compile_children(el, tag_name.as_ref())?;
        if el.content.is_some() || !is_self_closing(tag) {
            self.scope().push_str(&format!("</{tag}>"));
        }
        Ok(())
    }

    /// The element's content, or for helpers the nodes returned by the
    /// helper, into the current scope.
    fn compile_children(&mut self, el: &Element, tag_name: Option<&KString>)
                        -> Result<(), CompileError>
    {
        if el.is_helper {
            let helper_name = tag_name.ok_or(CompileErrorKind::UnresolvedHelperName)?;
            let helpers = self.helpers;
            let helper = helpers.get(helper_name).ok_or_else(
                || CompileErrorKind::UndefinedHelper(helper_name.clone()))?;
            trace!("expanding helper \"{helper_name}\"");
            if let Some(nodes) = helper(el) {
                for node in &nodes {
                    self.compile_node(node)?;
                }
            }
        } else if let Some(content) = &el.content {
            for node in content {
                self.compile_node(node)?;
            }
        }
        Ok(())
    }
}


/// Compile `block` as a root template (`parent` is `None`) or as an
/// extension of `parent`.
pub fn compile(block: &Block, parent: Option<&Template>, options: &CompileOptions)
               -> Result<Template, CompileError>
{
    let block_names: Vec<KString> = if options.block_names.is_empty() {
        block.name.iter().cloned().collect()
    } else {
        options.block_names.clone()
    };
    let helpers: Arc<HelperRegistry> = match &options.helpers {
        Some(helpers) => helpers.clone(),
        None => global_helpers()
    };
    let parent_compiled = parent.map(|p| p.compiled());

    let mut prefixes: Vec<KString> = block_names.iter()
        .map(|name| KString::from_string(format!("{name}{ELEMENT_NAME_DELIMITER}")))
        .collect();
    if prefixes.is_empty() && parent.is_some() {
        prefixes.push(KString::from_static(""));
    }
    if let Some(p) = parent_compiled {
        prefixes.extend(p.prefixes.iter().cloned());
    }

    let display_name = block_names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(",");
    trace!("compiling template \"{display_name}\", prefixes {:?}",
           prefixes.iter().map(|p| p.as_str()).collect::<Vec<_>>());
    let mut compiler = Compiler::new(parent_compiled, &helpers, !prefixes.is_empty());
    for node in &block.content {
        compiler.compile_node(node)?;
    }
    let Compiler { mut scopes, elements, tag_names, attribute_lists, .. } = compiler;
    let top = scopes.pop().expect("top level scope").ops;

    let root = if parent.is_some() {
        if !top.only_invocations() {
            warn!("ignoring top level markup in template \"{display_name}\", \
                   which extends another template");
        }
        Vec::new()
    } else {
        top.into_ops()
    };

    let template = Template::from_compiled(CompiledTemplate {
        block_names,
        parent: parent.cloned(),
        prefixes,
        root,
        elements,
        tag_names,
        attribute_lists,
    });
    template.check_recursion()?;
    Ok(template)
}
