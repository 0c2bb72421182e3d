//! Tree to CNXML
//!
//! Inverse of the loader tables. Output is compact, one document without
//! indentation.

use cnx_model::{Element, Node, Text, Tree};
use quick_xml::escape::escape;

pub const CNXML_NAMESPACE: &str = "http://cnx.rice.edu/cnxml";

/// Serialize a whole document, wrapped in `<document><content>`
pub fn serialize(tree: &Tree) -> String {
    let mut serializer = Serializer::new();
    serializer.output.push_str(&format!(
        "<document xmlns=\"{}\"><content>",
        CNXML_NAMESPACE
    ));
    serializer.blocks(&tree.export_children(tree.root()));
    serializer.output.push_str("</content></document>");
    serializer.output
}

/// Serialize blocks without the document wrapper
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut serializer = Serializer::new();
    serializer.blocks(nodes);
    serializer.output
}

#[derive(Debug, Default)]
struct Serializer {
    output: String,
    /// Element types of the blocks currently open
    open: Vec<String>,
}

impl Serializer {
    fn new() -> Self {
        Self::default()
    }

    fn blocks(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Element(element) => self.element(element),
                Node::Text(text) => self.text(text),
            }
        }
    }

    fn element(&mut self, element: &Element) {
        let mut attributes: Vec<(&str, String)> = Vec::new();
        if !element.key.is_generated() {
            attributes.push(("id", element.key.to_string()));
        }

        let tag = match element.ty.as_str() {
            "paragraph" => "para",
            "title" => "title",
            "figure_caption" => "caption",
            "section" => "section",
            "exercise" => "exercise",
            "exercise_problem" => "problem",
            "exercise_solution" => "solution",
            "exercise_commentary" => "commentary",
            "list_item" => "item",
            "ul_list" => "list",
            "ol_list" => {
                attributes.push(("list-type", "enumerated".to_string()));
                "list"
            }
            "figure" if self.open.iter().any(|ty| ty == "figure") => "subfigure",
            "figure" => "figure",
            "image" => "image",
            "video" => "video",
            "audio" => "audio",
            "media" => "media",
            "admonition" => "note",
            other => {
                tracing::warn!(ty = other, key = %element.key, "skipping element with no markup tag");
                return;
            }
        };

        for name in ["type", "src", "intended-use", "alt"] {
            if let Some(value) = element.data.get(name).and_then(|value| value.as_str()) {
                attributes.push((name, value.to_string()));
            }
        }

        self.output.push('<');
        self.output.push_str(tag);
        for (name, value) in &attributes {
            self.output.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
        }

        if element.is_void || element.children.is_empty() {
            self.output.push_str("/>");
            return;
        }

        self.output.push('>');
        self.open.push(element.ty.clone());
        self.blocks(&element.children);
        self.open.pop();
        self.output.push_str(&format!("</{}>", tag));
    }

    fn text(&mut self, text: &Text) {
        let mut closing = Vec::new();
        for mark in &text.marks {
            let (open, close) = match mark.ty.as_str() {
                "strong" => ("<emphasis effect=\"bold\">", "</emphasis>"),
                "emphasis" => ("<emphasis effect=\"italics\">", "</emphasis>"),
                "underline" => ("<emphasis effect=\"underline\">", "</emphasis>"),
                "subscript" => ("<sub>", "</sub>"),
                "superscript" => ("<sup>", "</sup>"),
                other => {
                    tracing::warn!(mark = other, "dropping mark with no markup tag");
                    continue;
                }
            };
            self.output.push_str(open);
            closing.push(close);
        }

        self.output.push_str(&escape(text.value.as_str()));
        for close in closing.iter().rev() {
            self.output.push_str(close);
        }
    }
}
