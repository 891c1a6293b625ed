//! Ordered attribute lists with in-place overriding, as inherited
//! from ancestor templates.

use std::collections::HashMap;

use kstring::KString;

use crate::ast::Attribute;

/// Attribute name/value pairs in first-definition order. Setting an
/// existing name replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSlots {
    slots: Vec<(KString, Option<KString>)>,
    index: HashMap<KString, usize>,
}

impl AttributeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn set(&mut self, name: KString, value: Option<KString>) {
        if let Some(&i) = self.index.get(&name) {
            self.slots[i].1 = value;
        } else {
            self.index.insert(name.clone(), self.slots.len());
            self.slots.push((name, value));
        }
    }

    pub fn set_attribute(&mut self, attribute: &Attribute) {
        self.set(attribute.name.clone(), attribute.value.clone());
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Option<KString>> {
        self.position(name).map(|i| &self.slots[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KString, Option<&KString>)> {
        self.slots.iter().map(|(n, v)| (n, v.as_ref()))
    }
}

impl<'a> FromIterator<&'a Attribute> for AttributeSlots {
    fn from_iter<I: IntoIterator<Item = &'a Attribute>>(iter: I) -> Self {
        let mut slots = AttributeSlots::new();
        for attribute in iter {
            slots.set_attribute(attribute);
        }
        slots
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ks(s: &str) -> KString {
        KString::from_ref(s)
    }

    fn pairs(slots: &AttributeSlots) -> Vec<(&str, Option<&str>)> {
        slots.iter().map(|(n, v)| (n.as_str(), v.map(|v| v.as_str()))).collect()
    }

    #[test]
    fn t_set_keeps_position() {
        let mut s = AttributeSlots::new();
        assert!(s.is_empty());
        s.set(ks("a"), Some(ks("1")));
        s.set(ks("class"), None);
        s.set(ks("b"), Some(ks("2")));
        s.set(ks("a"), Some(ks("3")));
        assert_eq!(s.len(), 3);
        assert_eq!(pairs(&s), vec![("a", Some("3")), ("class", None), ("b", Some("2"))]);
        assert_eq!(s.position("class"), Some(1));
        assert_eq!(s.get("b"), Some(&Some(ks("2"))));
        assert_eq!(s.get("c"), None);
    }

    #[test]
    fn t_inherit_and_override() {
        let parent: AttributeSlots = [
            Attribute { name: ks("attr1"), value: Some(ks("value1")) },
            Attribute { name: ks("class"), value: Some(ks("_mod1")) },
        ].iter().collect();
        let mut child = parent.clone();
        child.set(ks("class"), Some(ks("_mod2")));
        child.set(ks("attr2"), None);
        assert_eq!(pairs(&parent), vec![("attr1", Some("value1")), ("class", Some("_mod1"))]);
        assert_eq!(pairs(&child),
                   vec![("attr1", Some("value1")), ("class", Some("_mod2")), ("attr2", None)]);
    }
}
