//! Template-value substitution over compiled forests.
//!
//! Any element carrying the marker attribute is a slot:
//!
//! ```aht
//! Hello, @span(template-value=user){guest}!
//! ```
//!
//! Once `user` has a value, the slot's children are replaced by that text.

use std::collections::HashMap;

use hatet_markup::Node;

pub const DEFAULT_MARKER: &str = "template-value";

#[derive(Debug, Clone)]
pub struct TemplateValues {
    values: HashMap<String, String>,
    marker: String,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self { values: HashMap::new(), marker: DEFAULT_MARKER.to_string() }
    }

    /// Use a different marker attribute name.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fill every slot in `forest` whose key has a value.
    ///
    /// Returns the number of elements rewritten. Slots without a value keep
    /// their children.
    pub fn apply(&self, forest: &mut [Node]) -> usize {
        let mut rewritten = 0;
        for node in forest {
            let Node::Element(element) = node else { continue };
            let value = element.attr(&self.marker).and_then(|key| self.values.get(key));
            match value {
                Some(value) => {
                    element.children = vec![Node::Text(value.clone())];
                    rewritten += 1;
                }
                None => rewritten += self.apply(&mut element.children),
            }
        }
        rewritten
    }
}

impl Default for TemplateValues {
    fn default() -> Self {
        Self::new()
    }
}
