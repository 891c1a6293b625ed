//! Helpers: functions invoked at compile time for `@name` elements,
//! returning the nodes to compile in their place.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use kstring::KString;
use lazy_static::lazy_static;

use crate::ast::{Element, Node};

/// Receives the helper element as written and returns replacement
/// nodes, or `None` to emit nothing.
pub type HelperFn = dyn Fn(&Element) -> Option<Vec<Node>> + Send + Sync;

#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<KString, Arc<HelperFn>>,
}

impl Debug for HelperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.helpers.keys().map(|k| k.as_str()).collect();
        names.sort();
        f.debug_struct("HelperRegistry").field("helpers", &names).finish()
    }
}

/// Just passes the element's content through, so that `@section/name
/// { ... }` groups content under an overridable name without markup
/// of its own.
pub fn section_helper(element: &Element) -> Option<Vec<Node>> {
    element.content.clone()
}

impl HelperRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `section` helper.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("section", section_helper);
        registry
    }

    /// Replaces a previous helper of the same name.
    pub fn register<F>(&mut self, name: &str, helper: F)
    where F: Fn(&Element) -> Option<Vec<Node>> + Send + Sync + 'static
    {
        self.helpers.insert(KString::from_ref(name), Arc::new(helper));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<HelperFn>> {
        self.helpers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }
}


lazy_static!{
    static ref GLOBAL_HELPERS: RwLock<Arc<HelperRegistry>> =
        RwLock::new(Arc::new(HelperRegistry::with_builtins()));
}

/// Add a helper to the process wide registry used by compilations
/// that don't pass their own. Compilations already running keep
/// seeing the registry as it was when they started.
pub fn register_helper<F>(name: &str, helper: F)
where F: Fn(&Element) -> Option<Vec<Node>> + Send + Sync + 'static
{
    let mut guard = GLOBAL_HELPERS.write().expect("abandoned lock");
    Arc::make_mut(&mut *guard).register(name, helper);
}

/// Snapshot of the process wide registry.
pub fn global_helpers() -> Arc<HelperRegistry> {
    GLOBAL_HELPERS.read().expect("abandoned lock").clone()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_registry() {
        let mut r = HelperRegistry::new();
        assert!(!r.contains("section"));
        r.register("twice", |el: &Element| {
            Some(vec![Node::Element(el.clone()), Node::Element(el.clone())])
        });
        let f = r.get("twice").unwrap();
        assert_eq!(f(&Element::new("br")).unwrap().len(), 2);
        assert!(r.get("thrice").is_none());
        assert_eq!(format!("{r:?}"), "HelperRegistry { helpers: [\"twice\"] }");
    }

    #[test]
    fn t_section() {
        let r = HelperRegistry::with_builtins();
        let mut el = Element::new("section");
        assert_eq!(r.get("section").unwrap()(&el), None);
        el.content = Some(vec![Node::text("x")]);
        assert_eq!(section_helper(&el), Some(vec![Node::text("x")]));
    }

    #[test]
    fn t_global() {
        let before = global_helpers();
        assert!(before.contains("section"));
        register_helper("t_global_helper", |_| None);
        assert!(global_helpers().contains("t_global_helper"));
        assert!(!before.contains("t_global_helper"));
    }
}
