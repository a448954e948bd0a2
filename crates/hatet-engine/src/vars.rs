//! Named style variables, emitted as CSS custom properties on `:root`.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleVars {
    /// Keyed by name without the `--` prefix.
    vars: BTreeMap<String, String>,
}

fn bare(name: &str) -> &str {
    name.strip_prefix("--").unwrap_or(name)
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(bare(name).to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(bare(name)).map(|v| v.trim())
    }

    /// Replace a variable with `f(current)`; an unset variable reads as "".
    pub fn update(&mut self, name: &str, f: impl FnOnce(&str) -> String) {
        let next = f(self.get(name).unwrap_or(""));
        self.set(name, next);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `:root { --a: 1; --b: 2; }\n`, or an empty string when nothing is set.
    pub fn to_css(&self) -> String {
        if self.vars.is_empty() {
            return String::new();
        }
        let mut css = String::from(":root { ");
        for (name, value) in &self.vars {
            css.push_str(&format!("--{name}: {}; ", value.trim()));
        }
        css.push_str("}\n");
        css
    }
}
