//! Compiled templates, their inheritance chain, and rendering.

use std::collections::{HashMap, HashSet};
use std::iter;
use std::sync::Arc;

use kstring::KString;

use crate::ast::Block;
use crate::attributes::AttributeSlots;
use crate::compiler::compile;
use crate::error::{CompileError, CompileErrorKind, Error};
use crate::helpers::HelperRegistry;
use crate::ops::{push_element_classes, RenderOp};
use crate::parser::parse;

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Override the `#name` declared in the source when non-empty.
    /// Each name yields its own class token per element.
    pub block_names: Vec<KString>,
    /// Uses the global registry (see `register_helper`) if `None`.
    pub helpers: Option<Arc<HelperRegistry>>,
}

impl CompileOptions {
    pub fn with_block_name(self, block_name: &str) -> Self {
        self.with_block_names(&[block_name])
    }

    pub fn with_block_names(mut self, block_names: &[&str]) -> Self {
        self.block_names = block_names.iter().map(|n| KString::from_ref(n)).collect();
        self
    }

    pub fn with_helpers(mut self, helpers: Arc<HelperRegistry>) -> Self {
        self.helpers = Some(helpers);
        self
    }
}

#[derive(Debug)]
pub struct CompiledElement {
    /// The element's tag with attributes, invoking `content`.
    pub render: Vec<RenderOp>,
    pub content: Vec<RenderOp>,
}

#[derive(Debug)]
pub struct CompiledTemplate {
    pub(crate) block_names: Vec<KString>,
    pub(crate) parent: Option<Template>,
    /// `"<block name>__"` for each block name of this template and
    /// each ancestor, this one first; `""` for extensions without
    /// block name.
    pub(crate) prefixes: Vec<KString>,
    /// Top level operations; empty for extensions, which render
    /// through the root template's.
    pub(crate) root: Vec<RenderOp>,
    pub(crate) elements: HashMap<KString, CompiledElement>,
    pub(crate) tag_names: HashMap<KString, KString>,
    pub(crate) attribute_lists: HashMap<KString, AttributeSlots>,
}

impl CompiledTemplate {
    fn parent_compiled(&self) -> Option<&CompiledTemplate> {
        self.parent.as_ref().map(|p| p.compiled())
    }

    /// This template followed by its ancestors.
    pub fn chain(&self) -> impl Iterator<Item = &CompiledTemplate> {
        iter::successors(Some(self), |t| t.parent_compiled())
    }

    /// The nearest definition of element `name`, and the template
    /// defining it.
    pub fn lookup_element(&self, name: &str) -> Option<(&CompiledTemplate, &CompiledElement)> {
        self.chain().find_map(|t| t.elements.get(name).map(|el| (t, el)))
    }

    pub fn lookup_tag_name(&self, name: &str) -> Option<&KString> {
        self.chain().find_map(|t| t.tag_names.get(name))
    }

    pub fn lookup_attribute_list(&self, name: &str) -> Option<&AttributeSlots> {
        self.chain().find_map(|t| t.attribute_lists.get(name))
    }

    fn root_template(&self) -> &CompiledTemplate {
        let mut t = self;
        while let Some(p) = t.parent_compiled() {
            t = p;
        }
        t
    }
}


/// Executes render operations on behalf of a leaf template: element
/// and content invocations are looked up starting from the leaf,
/// super calls from the parent of the template that defined them.
struct Renderer<'t> {
    leaf: &'t CompiledTemplate,
    out: String,
}

impl<'t> Renderer<'t> {
    fn run(&mut self, owner: &'t CompiledTemplate, ops: &'t [RenderOp]) {
        for op in ops {
            match op {
                RenderOp::Literal(s) => self.out.push_str(s),
                RenderOp::ElementClasses(names) =>
                    push_element_classes(&mut self.out, &self.leaf.prefixes, names),
                RenderOp::InvokeElement(name) => {
                    let (t, el) = self.leaf.lookup_element(name)
                        .expect("compiled elements are defined");
                    self.run(t, &el.render);
                }
                RenderOp::InvokeContent(name) => {
                    let (t, el) = self.leaf.lookup_element(name)
                        .expect("compiled elements are defined");
                    self.run(t, &el.content);
                }
                RenderOp::SuperContent(name) => {
                    let (t, el) = owner.parent_compiled()
                        .and_then(|p| p.lookup_element(name))
                        .expect("super targets were checked by the compiler");
                    self.run(t, &el.content);
                }
            }
        }
    }
}


/// A compiled template, cheap to clone and share between threads.
#[derive(Debug, Clone)]
pub struct Template(Arc<CompiledTemplate>);

impl Template {
    /// Parse and compile a root template.
    pub fn new(source: &str, options: &CompileOptions) -> Result<Template, Error> {
        let block = parse(source)?;
        Ok(Template::from_block(&block, options)?)
    }

    pub fn from_block(block: &Block, options: &CompileOptions) -> Result<Template, CompileError> {
        compile(block, None, options)
    }

    /// Parse and compile a template extending this one.
    pub fn extend(&self, source: &str, options: &CompileOptions) -> Result<Template, Error> {
        let block = parse(source)?;
        Ok(self.extend_block(&block, options)?)
    }

    pub fn extend_block(&self, block: &Block, options: &CompileOptions)
                        -> Result<Template, CompileError>
    {
        compile(block, Some(self), options)
    }

    pub(crate) fn from_compiled(compiled: CompiledTemplate) -> Template {
        Template(Arc::new(compiled))
    }

    pub(crate) fn compiled(&self) -> &CompiledTemplate {
        &self.0
    }

    pub fn render(&self) -> String {
        let leaf = self.compiled();
        let root = leaf.root_template();
        let mut renderer = Renderer { leaf, out: String::new() };
        renderer.run(root, &root.root);
        renderer.out
    }

    /// The first block name, if any.
    pub fn block_name(&self) -> Option<&str> {
        self.0.block_names.first().map(|n| n.as_str())
    }

    pub fn block_names(&self) -> &[KString] {
        &self.0.block_names
    }

    pub fn parent(&self) -> Option<&Template> {
        self.0.parent.as_ref()
    }

    /// Whether this template itself (not an ancestor) defines element
    /// `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.0.elements.contains_key(name)
    }

    /// Walk the operations the way `render` does and fail if an
    /// element would end up invoking itself.
    pub(crate) fn check_recursion(&self) -> Result<(), CompileError> {
        fn visit<'t>(
            leaf: &'t CompiledTemplate,
            owner: &'t CompiledTemplate,
            ops: &'t [RenderOp],
            active: &mut Vec<&'t str>,
            done: &mut HashSet<&'t str>,
        ) -> Result<(), CompileError> {
            for op in ops {
                match op {
                    RenderOp::Literal(_) | RenderOp::ElementClasses(_) => (),
                    RenderOp::InvokeElement(name) => {
                        if done.contains(name.as_str()) {
                            continue
                        }
                        if active.contains(&name.as_str()) {
                            return Err(CompileErrorKind::RecursiveElement(name.clone()).into())
                        }
                        if let Some((t, el)) = leaf.lookup_element(name) {
                            active.push(name);
                            visit(leaf, t, &el.render, active, done)?;
                            active.pop();
                        }
                        done.insert(name);
                    }
                    RenderOp::InvokeContent(name) => {
                        if let Some((t, el)) = leaf.lookup_element(name) {
                            visit(leaf, t, &el.content, active, done)?;
                        }
                    }
                    RenderOp::SuperContent(name) => {
                        if let Some((t, el)) = owner.parent_compiled()
                            .and_then(|p| p.lookup_element(name))
                        {
                            visit(leaf, t, &el.content, active, done)?;
                        }
                    }
                }
            }
            Ok(())
        }

        let leaf = self.compiled();
        let root = leaf.root_template();
        visit(leaf, root, &root.root, &mut Vec::new(), &mut HashSet::new())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Element, Node, Text};
    use crate::error::{ErrorKind, ParseErrorKind};

    fn opts(helpers: HelperRegistry) -> CompileOptions {
        CompileOptions::default().with_helpers(Arc::new(helpers))
    }

    fn base(source: &str) -> Template {
        Template::new(source, &opts(HelperRegistry::with_builtins()))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn t(source: &str) -> String {
        base(source).render()
    }

    fn ext(parent: &Template, source: &str) -> String {
        parent.extend(source, &opts(HelperRegistry::with_builtins()))
            .unwrap_or_else(|e| panic!("{e}"))
            .render()
    }

    fn compile_error(result: Result<Template, Error>) -> CompileErrorKind {
        match result {
            Ok(t) => panic!("unexpectedly compiled: {}", t.render()),
            Err(e) => match e.into_kind() {
                ErrorKind::Compile(e) => e.into_kind(),
                ErrorKind::Parse(e) => panic!("parse error: {e}")
            }
        }
    }

    #[test]
    fn t_plain() {
        assert_eq!(t("#b1\nspan { 'text' }"), "<span>text</span>");
        assert_eq!(t("#block1\nspan { 'a' 'b' } br hr {} img (src=x.png, alt)"),
                   "<span>ab</span><br><hr></hr><img src=\"x.png\" alt=\"\">");
        assert_eq!(t(""), "");
        assert_eq!(t("// nothing"), "");
    }

    #[test]
    fn t_named() {
        assert_eq!(t("#b1\nspan/el1 { 'text' }"), "<span class=\"b1__el1\">text</span>");
        assert_eq!(t("#block1\nspan/name1, name2"),
                   "<span class=\"block1__name1 block1__name2\"></span>");
        assert_eq!(t("#block1\n/el1"), "<div class=\"block1__el1\"></div>");
        assert_eq!(t("#block1\nbr/el1"), "<br class=\"block1__el1\">");
        assert_eq!(t("#block1\nbr/el1 {}"), "<br class=\"block1__el1\"></br>");
    }

    #[test]
    fn t_anonymous_names() {
        assert_eq!(t("#block1\nspan/, name1, name2"),
                   "<span class=\"block1__name1 block1__name2\"></span>");
        assert_eq!(t("#block1\nspan/, name1 (title=x, class=_m)"),
                   "<span title=\"x\" class=\"block1__name1 _m\"></span>");
        assert_eq!(t("#block1\nspan/, name1 (title=x)"),
                   "<span class=\"block1__name1\" title=\"x\"></span>");
    }

    #[test]
    fn t_private_names() {
        assert_eq!(t("span/_el1 { 'text' }"), "<span>text</span>");
        assert_eq!(t("#b1\nspan/_el1 (class=x)"), "<span class=\"x\"></span>");
        assert_eq!(t("#b1\nspan/_el1, el2"), "<span class=\"b1__el2\"></span>");
    }

    #[test]
    fn t_missing_block_name() {
        assert_eq!(compile_error(Template::new("span/el1", &CompileOptions::default())),
                   CompileErrorKind::MissingBlockName);
        let t1 = Template::new("span/el1", &CompileOptions::default().with_block_name("b1"))
            .unwrap();
        assert_eq!(t1.block_name(), Some("b1"));
        assert_eq!(t1.render(), "<span class=\"b1__el1\"></span>");
    }

    #[test]
    fn t_private_names_inherited() {
        let t1 = base("#b1\nspan/_el1 (a=1) { 'x' }");
        let t2 = t1.extend("#b2\n/_el1 (super!, b=2) { super! }", &CompileOptions::default())
            .unwrap();
        let t3 = t2.extend("#b3\n/_el1 (super!) { super! }", &CompileOptions::default())
            .unwrap();
        assert_eq!(t3.render(), "<span a=\"1\" b=\"2\">x</span>");
        assert_eq!(t2.render(), "<span a=\"1\" b=\"2\">x</span>");
        let t4 = t3.extend("#b4\ndiv/_el1, el2 (super!)", &CompileOptions::default())
            .unwrap();
        assert_eq!(t4.render(), "<div class=\"b4__el2 b3__el2 b2__el2 b1__el2\" \
                                 a=\"1\" b=\"2\"></div>");
    }

    #[test]
    fn t_multiple_block_names() {
        let o = CompileOptions::default().with_block_names(&["a", "b"]);
        let t1 = Template::new("span/el", &o).unwrap();
        assert_eq!(t1.render(), "<span class=\"a__el b__el\"></span>");
        assert_eq!(t1.block_name(), Some("a"));
        assert_eq!(t1.block_names(), &[KString::from_static("a"), KString::from_static("b")]);
        // the source's name is overridden
        let t1 = Template::new("#c\nspan/el, x", &o).unwrap();
        assert_eq!(t1.render(), "<span class=\"a__el b__el a__x b__x\"></span>");
        assert_eq!(ext(&t1, "#d\n/el { 'y' }"),
                   "<span class=\"d__el a__el b__el\">y</span>");
        let t2 = t1.extend("/el", &CompileOptions::default().with_block_names(&["e", "f"]))
            .unwrap();
        assert_eq!(t2.render(), "<span class=\"e__el f__el a__el b__el\"></span>");
        // an empty list keeps the declared name
        let t1 = Template::new("#c\nspan/el", &CompileOptions::default().with_block_names(&[]))
            .unwrap();
        assert_eq!(t1.render(), "<span class=\"c__el\"></span>");
    }

    #[test]
    fn t_escaping() {
        assert_eq!(t(r#"'_\t_\x20_\u0020_ _'"#), "_\t_ _ _ _");
        assert_eq!(t("p { 'a < b & \"c\"' }"), "<p>a &lt; b &amp; \"c\"</p>");
        assert_eq!(t("a (href='?a=1&b=\"2\"')"), "<a href=\"?a=1&amp;b=&quot;2&quot;\"></a>");
    }

    #[test]
    fn t_attributes() {
        assert_eq!(t("#block1\nspan (/* comment */)\n\
                      span (attr1/* comment */=1)\n\
                      span (/* comment */attr1)\n\
                      span (attr1/* comment */, attr2)\n\
                      span (\n attr1, // comment\n /* comment */\n attr2=1\n // comment\n)"),
                   "<span></span><span attr1=\"1\"></span><span attr1=\"\"></span>\
                    <span attr1=\"\" attr2=\"\"></span><span attr1=\"\" attr2=\"1\"></span>");
        assert_eq!(t("#b\nspan/el (a=1, class=c, a=2)"),
                   "<span a=\"2\" class=\"b__el c\"></span>");
        assert_eq!(t("#b\nspan/el (class)"), "<span class=\"b__el\"></span>");
    }

    #[test]
    fn t_overriding_element() {
        let t1 = base("#block1\nspan/el1 { 'text' }\nbr");
        assert_eq!(ext(&t1, "#block1-x\n/el1 { 'other text' }"),
                   "<span class=\"block1-x__el1 block1__el1\">other text</span><br>");
        // the base is unchanged
        assert_eq!(t1.render(), "<span class=\"block1__el1\">text</span><br>");
    }

    #[test]
    fn t_content_super() {
        let t1 = base("#b1\nspan/el1 { 'text' }");
        assert_eq!(ext(&t1, "#b1-x\ndiv/el1 { span { super! } }"),
                   "<div class=\"b1-x__el1 b1__el1\"><span>text</span></div>");
    }

    #[test]
    fn t_content_super_2() {
        let t1 = base("#block1\nspan/el1\nspan/el2");
        assert_eq!(ext(&t1, "#block1-x\ndiv/el2 { super! }"),
                   "<span class=\"block1-x__el1 block1__el1\"></span>\
                    <div class=\"block1-x__el2 block1__el2\"></div>");
    }

    #[test]
    fn t_content_super_el_name() {
        let t1 = base("#block1\nspan/el1 { 'text' }");
        assert_eq!(ext(&t1, "#block1-x\ndiv/el1 { span/el2 { super.el1! } }"),
                   "<div class=\"block1-x__el1 block1__el1\">\
                    <span class=\"block1-x__el2 block1__el2\">text</span></div>");
    }

    #[test]
    fn t_nested_override() {
        let t1 = base("#b\nul/list { li/item { 'one' } }");
        assert_eq!(ext(&t1, "#b-x\n/item { 'two' super! }"),
                   "<ul class=\"b-x__list b__list\"><li class=\"b-x__item b__item\">twoone</li></ul>");
    }

    #[test]
    fn t_three_levels() {
        let t1 = base("#a\nspan/el { 'a' }");
        let t2 = t1.extend("#b\n/el { 'b' super! }", &CompileOptions::default()).unwrap();
        let t3 = t2.extend("#c\ndiv/el { 'c' super! }", &CompileOptions::default()).unwrap();
        assert_eq!(t3.render(), "<div class=\"c__el b__el a__el\">cba</div>");
        assert_eq!(t2.render(), "<span class=\"b__el a__el\">ba</span>");
        assert_eq!(t3.parent().and_then(|p| p.block_name()), Some("b"));
        assert!(t3.defines("el"));
        assert!(!t3.defines("other"));
    }

    #[test]
    fn t_unnamed_extension() {
        let t1 = base("#b1\nspan/el1 { 'text' }");
        assert_eq!(ext(&t1, "/el1 { 'x' }"), "<span class=\"el1 b1__el1\">x</span>");
    }

    #[test]
    fn t_attributes_super() {
        let t1 = base("#b1\nspan/el1 (a=1,b=2)");
        assert_eq!(ext(&t1, "#b1-x\n/el1 (super!)"),
                   "<span class=\"b1-x__el1 b1__el1\" a=\"1\" b=\"2\"></span>");
        let t1 = base("#block1\nspan/span1 (class=_mod1)");
        assert_eq!(ext(&t1, "#block1-x\n/span1 (super!)"),
                   "<span class=\"block1-x__span1 block1__span1 _mod1\"></span>");
        // without super! the attributes are not inherited
        let t1 = base("#b1\nspan/el1 (a=1)");
        assert_eq!(ext(&t1, "#b1-x\n/el1 (b=2)"),
                   "<span class=\"b1-x__el1 b1__el1\" b=\"2\"></span>");
    }

    #[test]
    fn t_attributes_super_overwrite_in_place() {
        let t1 = base("#b\nspan/el (a=1, class=c1, b=2)");
        assert_eq!(ext(&t1, "#b-x\n/el (super!, c=3, a=4, class=c2)"),
                   "<span a=\"4\" class=\"b-x__el b__el c2\" b=\"2\" c=\"3\"></span>");
    }

    #[test]
    fn t_attributes_super_el_name() {
        let t1 = base("#block1\nspan/el1 (attr1=value1, attr2=value2)\n\
                       span/el2 (attr3=value3, attr4=value4)");
        assert_eq!(ext(&t1, "#block1-x\n\
                             div/el1 (super.el2!, class=_mod1)\n\
                             div/el2 (super.el1!, class=_mod2)"),
                   "<div attr3=\"value3\" attr4=\"value4\" \
                    class=\"block1-x__el1 block1__el1 _mod1\"></div>\
                    <div attr1=\"value1\" attr2=\"value2\" \
                    class=\"block1-x__el2 block1__el2 _mod2\"></div>");
    }

    #[test]
    fn t_anonymous_attribute_super() {
        let t1 = base("#b\nspan/el (a=1)\ndiv/box { 'x' }");
        assert_eq!(ext(&t1, "#b-x\n/box { i (super.el!, b=2) }"),
                   "<span class=\"b-x__el b__el\" a=\"1\"></span>\
                    <div class=\"b-x__box b__box\"><i a=\"1\" b=\"2\"></i></div>");
        assert_eq!(compile_error(t1.extend("#b-x\n/box { i (super!) }",
                                           &CompileOptions::default())),
                   CompileErrorKind::AnonymousAttributeSuper);
    }

    #[test]
    fn t_super_errors() {
        assert!(matches!(compile_error(Template::new("#b\nspan/el { super! }",
                                                     &CompileOptions::default())),
                         CompileErrorKind::SuperWithoutParent { .. }));
        assert!(matches!(compile_error(Template::new("#b\nspan/el (super!)",
                                                     &CompileOptions::default())),
                         CompileErrorKind::SuperWithoutParent { .. }));
        let t1 = base("#b\nspan/el");
        assert_eq!(compile_error(t1.extend("#b-x\n/el { super.other! }",
                                           &CompileOptions::default())),
                   CompileErrorKind::UndefinedSuperTarget(KString::from_static("other")));
        assert_eq!(compile_error(t1.extend("#b-x\nspan { super! }",
                                           &CompileOptions::default())),
                   CompileErrorKind::SuperOutsideElement);
        // parse-level: super! is not a top level construct
        match t1.extend("#b-x\nsuper!", &CompileOptions::default()) {
            Err(e) => match e.kind() {
                ErrorKind::Parse(e) => assert_eq!(e.kind, ParseErrorKind::ExpectedElement),
                ErrorKind::Compile(e) => panic!("{e}")
            },
            Ok(_) => panic!("no error")
        }
    }

    #[test]
    fn t_recursive_element() {
        assert_eq!(compile_error(Template::new("#b\ndiv/a { div/a }", &CompileOptions::default())),
                   CompileErrorKind::RecursiveElement(KString::from_static("a")));
        let t1 = base("#b\ndiv/a { div/b }");
        assert_eq!(compile_error(t1.extend("#b-x\n/b { super.a! }", &CompileOptions::default())),
                   CompileErrorKind::RecursiveElement(KString::from_static("b")));
    }

    #[test]
    fn t_helper() {
        let mut helpers = HelperRegistry::new();
        helpers.register("test", |_| Some(vec![Node::text("1"), Node::text("2"), Node::text("3")]));
        let t1 = Template::new("#block1\nspan { @test }", &opts(helpers)).unwrap();
        assert_eq!(t1.render(), "<span>123</span>");
    }

    #[test]
    fn t_helper_wrapping_content() {
        let mut helpers = HelperRegistry::new();
        helpers.register("test", |el| {
            let mut nodes = vec![Node::text("[")];
            nodes.extend(el.content.iter().flatten().cloned());
            nodes.push(Node::text("]"));
            Some(nodes)
        });
        let t1 = Template::new("#block1\nspan {\n @test { div }\n}", &opts(helpers)).unwrap();
        assert_eq!(t1.render(), "<span>[<div></div>]</span>");
    }

    #[test]
    fn t_helper_super() {
        let mut helpers = HelperRegistry::new();
        helpers.register("test", |el| {
            let names = match &el.names {
                Some(names) if names.first().map_or(false, |n| n.is_some()) => {
                    let mut v = vec![el.name().map(|n| KString::from_string(format!("${n}")))];
                    v.extend(names.iter().cloned());
                    Some(v)
                }
                names => names.clone()
            };
            Some(vec![Node::Element(Element {
                is_helper: false,
                tag_name: Some(KString::from_static("span")),
                names,
                attributes: el.attributes.clone(),
                content: None,
            })])
        });
        let o = opts(helpers);
        let t1 = Template::new("#block1\n@test/test (attr1=value1)", &o).unwrap();
        let t2 = t1.extend("#block1-x\n@/test (super!, attr2=value2)", &o).unwrap();
        assert_eq!(t2.render(),
                   "<span class=\"block1-x__$test block1__$test block1-x__test block1__test\" \
                    attr1=\"value1\" attr2=\"value2\"></span>");
    }

    #[test]
    fn t_helper_content_super() {
        let t1 = base("#block1\n@section/inner {\n span\n}");
        assert_eq!(t1.render(), "<span></span>");
        assert_eq!(ext(&t1, "#block1-x\n@/inner {\n div { super! }\n}"),
                   "<div><span></span></div>");
    }

    #[test]
    fn t_helper_errors() {
        let o = opts(HelperRegistry::new());
        assert_eq!(compile_error(Template::new("#b\n@nope", &o)),
                   CompileErrorKind::UndefinedHelper(KString::from_static("nope")));
        assert_eq!(compile_error(Template::new("#b\n@/x", &o)),
                   CompileErrorKind::UnresolvedHelperName);
        let mut helpers = HelperRegistry::new();
        helpers.register("none", |_| None);
        assert_eq!(Template::new("#b\np { @none { 'x' } }", &opts(helpers)).unwrap().render(),
                   "<p></p>");
    }

    #[test]
    fn t_global_helpers() {
        crate::helpers::register_helper("t_global_text", |_| {
            Some(vec![Node::Text(Text { value: KString::from_static("g") })])
        });
        let t1 = Template::new("#b\np { @t_global_text }", &CompileOptions::default()).unwrap();
        assert_eq!(t1.render(), "<p>g</p>");
    }

    #[test]
    fn t_extension_top_level_markup_is_ignored() {
        let t1 = base("#b\nspan/el { 'a' }");
        assert_eq!(ext(&t1, "#b-x\np { 'ignored' }\n/el { 'b' }"),
                   "<span class=\"b-x__el b__el\">b</span>");
    }

    #[test]
    fn t_from_block() {
        let block = parse("#b1\nspan/el1").unwrap();
        let t1 = Template::from_block(&block, &CompileOptions::default()).unwrap();
        let block2 = parse("/el1 (x=1)").unwrap();
        let t2 = t1.extend_block(&block2, &CompileOptions::default().with_block_name("b2"))
            .unwrap();
        assert_eq!(t2.render(), "<span class=\"b2__el1 b1__el1\" x=\"1\"></span>");
        assert_eq!(t2.block_name(), Some("b2"));
    }

    #[test]
    fn t_deterministic_and_shareable() {
        let t1 = base("#b\nul/list { li/, item (class=first) { 'a' } li/, item { 'b' } }");
        let t2 = t1.clone();
        let handle = std::thread::spawn(move || t2.render());
        let rendered = handle.join().unwrap();
        assert_eq!(rendered, t1.render());
        assert_eq!(rendered,
                   "<ul class=\"b__list\"><li class=\"b__item first\">a</li>\
                    <li class=\"b__item\">b</li></ul>");
    }
}
