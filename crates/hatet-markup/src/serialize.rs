use crate::ast::{Element, Node};

/// Write a compiled forest back out in AHT syntax.
///
/// Attribute values are always quoted. Recompiling the result gives back the
/// same forest as long as text holds no tag heads or braces and no attribute
/// value contains `"`.
pub fn to_aht(forest: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(forest, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Element(e) => write_element(e, out),
        }
    }
}

fn write_element(e: &Element, out: &mut String) {
    out.push('@');
    out.push_str(&e.tag);
    if !e.attributes.is_empty() {
        out.push('(');
        for (i, (name, value)) in e.attributes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push(')');
    }
    out.push('{');
    write_nodes(&e.children, out);
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn writes_nested_elements() {
        let forest = vec![
            Node::text("a "),
            Element::new("box")
                .with_attr("id", "x")
                .with_attr("class", "y z")
                .with_child(Element::new("span").with_child(Node::text("hi")))
                .into(),
        ];
        assert_eq!(to_aht(&forest), r#"a @box(id="x",class="y z"){@span{hi}}"#);
    }

    #[test]
    fn reparse_is_identical() {
        let src = r#"head @card(id=main, title="A, B"){ @h{Title} body @br{} } tail"#;
        let forest = parse_str(src).unwrap();
        assert_eq!(parse_str(&to_aht(&forest)).unwrap(), forest);
    }
}
