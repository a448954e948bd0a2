//! HTML rendering of compiled AHT forests.
//!
//! Each forest is rebuilt as `markup5ever_rcdom` nodes and written out with
//! `html5ever::serialize`, which owns escaping and void-element handling.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use hatet_markup::{Element, Node};
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::{Attribute, LocalName, QualName, ns, serialize};
use markup5ever_rcdom::{Handle, Node as DomNode, NodeData, SerializableHandle};

pub fn render_forest(forest: &[Node]) -> io::Result<String> {
    let opts = SerializeOpts { traversal_scope: TraversalScope::IncludeNode, ..Default::default() };

    let mut output = Vec::new();
    for node in forest {
        let handle = SerializableHandle::from(build_node(node));
        serialize(&mut output, &handle, opts.clone())?;
    }

    String::from_utf8(output).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn build_node(node: &Node) -> Handle {
    match node {
        Node::Text(s) => create_text(s),
        Node::Element(e) => build_element(e),
    }
}

fn build_element(e: &Element) -> Handle {
    let handle = create_element(e);
    for child in &e.children {
        let child = build_node(child);
        child.parent.set(Some(Rc::downgrade(&handle)));
        handle.children.borrow_mut().push(child);
    }
    handle
}

fn create_element(e: &Element) -> Handle {
    let attrs = e
        .attributes
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(DomNode {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(e.tag.as_str())),
            attrs: RefCell::new(attrs),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(DomNode {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text { contents: RefCell::new(text.to_string().into()) },
    })
}
