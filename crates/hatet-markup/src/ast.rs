// ── Attributes ────────────────────────────────────────────────────────────

/// Attributes of one AHT tag, in source order with unique names.
///
/// Inserting a name that is already present overwrites its value in place,
/// so the first occurrence keeps its position and the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

/// One unit of compiled AHT output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Raw text, kept verbatim (surrounding whitespace included).
    Text(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            Node::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

/// An AHT tag occurrence:
///
/// ```aht
/// @card(id="main", class=wide) {
///     @title{Hello}
///     some text
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written: `card`, `title`. Never checked against any schema.
    pub tag: String,
    pub attributes: Attributes,
    /// Children in document order. Owned exclusively by this element.
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: Attributes::new(), children: Vec::new() }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Concatenated text of all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Child elements only, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

// ── StyleBlock ────────────────────────────────────────────────────────────

/// A single `property: value` pair inside a [`StyleBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// One `!selector` ... `@` group of an AAAD block.
///
/// `selector` is never empty; declarations keep source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl StyleBlock {
    /// Serialize the way the line compiler emits a closed block.
    pub fn to_css(&self) -> String {
        let mut css = format!("{} {{ ", self.selector);
        for d in &self.declarations {
            css.push_str(&format!("{}: {}; ", d.property, d.value));
        }
        css.push_str("}\n");
        css
    }
}
