use std::fmt::{self, Display, Write};

use crate::card::format::escape_html;

const INDENT: &str = "    ";

/// A node of an SVG document. Text and attribute values are stored raw and
/// escaped once, on serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn comment(self, text: impl Into<String>) -> Self {
        self.child(Node::Comment(text.into()))
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Pretty-printed markup.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, 0);
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);
        write!(out, "{}<{}", pad, self.name)?;
        for (key, value) in &self.attributes {
            write!(out, " {}=\"{}\"", key, escape_html(value))?;
        }
        if self.children.is_empty() {
            return write!(out, "/>");
        }
        write!(out, ">")?;

        // Inline children keep single-line text elements compact.
        if let [Node::Text(text)] = self.children.as_slice() {
            return write!(out, "{}</{}>", escape_html(text), self.name);
        }

        for child in &self.children {
            out.push('\n');
            match child {
                Node::Element(element) => element.write_to(out, depth + 1)?,
                Node::Text(text) => write!(out, "{}{}{}", pad, INDENT, escape_html(text))?,
                Node::Comment(text) => write!(out, "{}{}<!-- {} -->", pad, INDENT, text)?,
            }
        }
        write!(out, "\n{}</{}>", pad, self.name)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_element_self_closes() {
        let rect = Element::new("rect").attr("width", 495.0).attr("rx", 4.5);
        assert_eq!(rect.render(), r#"<rect width="495" rx="4.5"/>"#);
    }

    #[test]
    fn test_single_text_child_is_inline() {
        let text = Element::new("text").attr("x", 0).text("Tom & Jerry");
        assert_eq!(text.render(), r#"<text x="0">Tom &amp; Jerry</text>"#);
    }

    #[test]
    fn test_nested_elements_are_indented() {
        let group = Element::new("g")
            .attr("transform", "translate(1, 2)")
            .comment("Label")
            .child(Element::new("circle").attr("r", 40));
        assert_eq!(
            group.render(),
            "<g transform=\"translate(1, 2)\">\n    <!-- Label -->\n    <circle r=\"40\"/>\n</g>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let el = Element::new("text").attr("data-name", "\"quoted\" <x>");
        assert_eq!(el.render(), r#"<text data-name="&quot;quoted&quot; &lt;x&gt;"/>"#);
        assert_eq!(el.attribute("data-name"), Some("\"quoted\" <x>"));
        assert_eq!(el.name(), "text");
    }
}
