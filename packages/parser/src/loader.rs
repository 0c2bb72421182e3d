//! # CNXML loader
//!
//! Turns markup into [`Node`]s using two lookup tables:
//!
//! - block tags ([`block_tag`]) become elements, either with a fixed type and
//!   block children, or through a transformer that decides type, data and
//!   children itself
//! - mark tags ([`mark_tag`]) become marks on every text leaf below them
//!
//! Anything found in neither table is dropped together with its subtree.

use crate::dom::{self, XmlElement, XmlNode};
use crate::error::LoadResult;
use cnx_model::{Element, Key, Mark, Node, Text, Tree, GENERATED_PREFIX};
use std::collections::HashSet;

/// Tags which only occur in-line, mixed with text
///
/// Consulted by the mixed content rule to tell an inline run from a
/// sequence of blocks.
pub const INLINE_TAGS: &[&str] = &["emphasis", "footnote", "foreign", "link", "sub", "sup"];

/// Element type used for an implicit block around inline content
pub const DEFAULT_BLOCK: &str = "paragraph";

pub type Transformer = fn(&mut Loader, &XmlElement, Key) -> Element;

/// Entry of the block table
#[derive(Clone, Copy)]
pub enum BlockTag {
    /// Fixed element type, children loaded as blocks
    Type(&'static str),
    /// Custom transformer, handed the key the element must carry
    Transform(Transformer),
}

/// Entry of the mark table
#[derive(Clone, Copy)]
pub enum MarkTag {
    Type(&'static str),
    Transform(fn(&XmlElement) -> &'static str),
}

pub fn block_tag(name: &str) -> Option<BlockTag> {
    let tag = match name {
        "caption" => BlockTag::Transform(|loader, el, key| loader.text_block(key, "figure_caption", el)),
        "commentary" => BlockTag::Transform(|loader, el, key| loader.mixed_block(key, "exercise_commentary", el)),
        "exercise" => BlockTag::Type("exercise"),
        "figure" => BlockTag::Type("figure"),
        "audio" => BlockTag::Transform(|_, el, key| media_object(key, "audio", el)),
        "image" => BlockTag::Transform(|_, el, key| media_object(key, "image", el)),
        "item" => BlockTag::Transform(|loader, el, key| loader.mixed_block(key, "list_item", el)),
        "list" => BlockTag::Transform(list),
        "media" => BlockTag::Transform(media),
        "note" => BlockTag::Transform(admonition),
        "para" => BlockTag::Transform(|loader, el, key| loader.text_block(key, "paragraph", el)),
        "problem" => BlockTag::Type("exercise_problem"),
        "section" => BlockTag::Type("section"),
        "solution" => BlockTag::Type("exercise_solution"),
        "subfigure" => BlockTag::Type("figure"),
        "title" => BlockTag::Transform(|loader, el, key| loader.text_block(key, "title", el)),
        "video" => BlockTag::Transform(|_, el, key| media_object(key, "video", el)),
        _ => return None,
    };
    Some(tag)
}

pub fn mark_tag(name: &str) -> Option<MarkTag> {
    match name {
        "emphasis" => Some(MarkTag::Transform(emphasis)),
        "sub" => Some(MarkTag::Type("subscript")),
        "sup" => Some(MarkTag::Type("superscript")),
        _ => None,
    }
}

/// Void image, video or audio element
fn media_object(key: Key, ty: &str, el: &XmlElement) -> Element {
    let mut object = Element::keyed(key, ty).void();
    for name in ["src", "intended-use"] {
        if let Some(value) = el.attribute(name) {
            object = object.with_data(name, value);
        }
    }
    object
}

fn media(loader: &mut Loader, el: &XmlElement, key: Key) -> Element {
    let mut media = Element::keyed(key, "media").with_children(loader.blocks(el));
    if let Some(alt) = el.attribute("alt") {
        media = media.with_data("alt", alt);
    }
    media
}

fn admonition(loader: &mut Loader, el: &XmlElement, key: Key) -> Element {
    Element::keyed(key, "admonition")
        .with_data("type", el.attribute("type").unwrap_or("note"))
        .with_children(loader.mixed_content(el, DEFAULT_BLOCK))
}

fn list(loader: &mut Loader, el: &XmlElement, key: Key) -> Element {
    let ty = match el.attribute("list-type") {
        Some("enumerated") => "ol_list",
        _ => "ul_list",
    };
    Element::keyed(key, ty).with_children(loader.blocks(el))
}

fn emphasis(el: &XmlElement) -> &'static str {
    match el.attribute("effect").unwrap_or("bold") {
        "bold" => "strong",
        "italics" => "emphasis",
        "underline" => "underline",
        _ => "strong",
    }
}

/// Stateful markup loader
///
/// Tracks `id`s already used as keys so that a repeated id does not break
/// key uniqueness.
#[derive(Debug, Default)]
pub struct Loader {
    used_ids: HashSet<String>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one element as a block, `None` when its tag is unknown
    pub fn block(&mut self, el: &XmlElement) -> Option<Node> {
        let Some(tag) = block_tag(&el.name) else {
            tracing::debug!(tag = %el.name, "dropping unknown block element");
            return None;
        };

        // Claimed before the children so that the outer of two equal ids wins
        let key = self.key_for(el);
        let element = match tag {
            BlockTag::Type(ty) => Element::keyed(key, ty).with_children(self.blocks(el)),
            BlockTag::Transform(transform) => transform(self, el, key),
        };
        Some(element.into())
    }

    /// Load the element children of `el` as blocks, ignoring text
    pub fn blocks(&mut self, el: &XmlElement) -> Vec<Node> {
        el.elements().filter_map(|child| self.block(child)).collect()
    }

    /// Load `nodes` as inline content: text leaves, with marks applied
    pub fn inline(&mut self, nodes: &[XmlNode]) -> Vec<Node> {
        let mut out = Vec::new();
        for node in nodes {
            match node {
                XmlNode::Text(value) => out.push(Text::new(value.as_str()).into()),
                XmlNode::Element(el) => out.extend(self.inline_element(el)),
            }
        }
        out
    }

    fn inline_element(&mut self, el: &XmlElement) -> Vec<Node> {
        let Some(tag) = mark_tag(&el.name) else {
            // A block nested in inline content is still loaded as a block
            return self.block(el).into_iter().collect();
        };

        let mark = Mark::new(match tag {
            MarkTag::Type(ty) => ty,
            MarkTag::Transform(transform) => transform(el),
        });
        let mut children = self.inline(&el.children);
        for child in &mut children {
            child.for_each_mut(&mut |node| {
                if let Node::Text(text) = node {
                    // Outer marks first
                    text.marks.insert(0, mark.clone());
                }
            });
        }
        children
    }

    /// Either a single implicit `default_type` block holding all of the
    /// content inline, or the element children loaded as blocks
    ///
    /// Only the first child decides. Trailing blocks after a leading inline
    /// run are loaded inline as well.
    pub fn mixed_content(&mut self, el: &XmlElement, default_type: &str) -> Vec<Node> {
        let inline = match el.children.first() {
            None => return Vec::new(),
            Some(XmlNode::Text(text)) => !text.trim().is_empty(),
            Some(XmlNode::Element(first)) => INLINE_TAGS.contains(&first.name.as_str()),
        };

        if inline {
            vec![self.text_block(Key::generate(), default_type, el).into()]
        } else {
            self.blocks(el)
        }
    }

    /// Element of type `ty` holding the content of `el` inline
    pub fn text_block(&mut self, key: Key, ty: &str, el: &XmlElement) -> Element {
        let mut children = self.inline(&el.children);
        if children.is_empty() {
            children.push(Text::empty().into());
        }
        Element::keyed(key, ty).with_children(children)
    }

    /// Element of type `ty` with mixed content
    pub fn mixed_block(&mut self, key: Key, ty: &str, el: &XmlElement) -> Element {
        Element::keyed(key, ty).with_children(self.mixed_content(el, DEFAULT_BLOCK))
    }

    fn key_for(&mut self, el: &XmlElement) -> Key {
        let Some(id) = el.attribute("id").filter(|id| !id.is_empty()) else {
            return Key::generate();
        };
        if id.starts_with(GENERATED_PREFIX) || !self.used_ids.insert(id.to_string()) {
            tracing::debug!(id, "id cannot be used as key, generating a fresh one");
            return Key::generate();
        }
        Key::from_id(id)
    }
}

/// Load `source` into top-level blocks
///
/// Accepts a whole `<document>`, a bare `<content>`, or any single block
/// element.
pub fn deserialize(source: &str) -> LoadResult<Vec<Node>> {
    let root = dom::parse(source)?;
    let mut loader = Loader::new();

    let nodes = match root.name.as_str() {
        "document" => match root.element("content") {
            Some(content) => loader.blocks(content),
            None => Vec::new(),
        },
        "content" => loader.blocks(&root),
        _ => loader.block(&root).into_iter().collect(),
    };
    Ok(nodes)
}

/// Load `source` into a document tree
pub fn load(source: &str) -> LoadResult<Tree> {
    let nodes = deserialize(source)?;
    let tree = Tree::from_nodes(nodes)?;
    tracing::debug!(nodes = tree.len(), "loaded document");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(source: &str) -> String {
        let tree = load(source).unwrap();
        tree.outline(tree.root())
    }

    #[test]
    fn test_fixed_type_blocks() {
        assert_eq!(
            outline("<section><problem><para>Q</para></problem></section>"),
            r#"section(exercise_problem(paragraph("Q")))"#
        );
    }

    #[test]
    fn test_unknown_tags_are_dropped_with_subtree() {
        assert_eq!(
            outline("<section><para>A</para><equation><para>B</para></equation></section>"),
            r#"section(paragraph("A"))"#
        );
    }

    #[test]
    fn test_emphasis_effects() {
        assert_eq!(
            outline(r#"<para><emphasis effect="underline">u</emphasis><emphasis>b</emphasis><emphasis effect="smallcaps">s</emphasis><emphasis effect="italics">i</emphasis></para>"#),
            r#"paragraph("u"{underline}, "b"{strong}, "s"{strong}, "i"{emphasis})"#
        );
    }

    #[test]
    fn test_nested_marks_outer_first() {
        assert_eq!(
            outline("<para>x<emphasis>a<sup>2</sup></emphasis></para>"),
            r#"paragraph("x", "a"{strong}, "2"{strong,superscript})"#
        );
    }

    #[test]
    fn test_void_image_and_media() {
        assert_eq!(
            outline(r#"<figure><media alt="cat"><image src="cat.png"/></media><caption>A cat</caption></figure>"#),
            r#"figure(media[alt=cat](image[src=cat.png]), figure_caption("A cat"))"#
        );
    }

    #[test]
    fn test_video_keeps_intended_use() {
        assert_eq!(
            outline(r#"<media alt=""><video src="v.mpg" intended-use="all"/><audio src="a.mp3"/></media>"#),
            r#"media[alt=](video[intended-use=all,src=v.mpg], audio[src=a.mp3])"#
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            outline(r#"<section><list list-type="enumerated"><item>one</item></list><list><item>two</item></list></section>"#),
            r#"section(ol_list(list_item(paragraph("one"))), ul_list(list_item(paragraph("two"))))"#
        );
    }

    #[test]
    fn test_admonition_type_defaults_to_note() {
        assert_eq!(
            outline(r#"<section><note>n</note><note type="warning">w</note></section>"#),
            r#"section(admonition[type=note](paragraph("n")), admonition[type=warning](paragraph("w")))"#
        );
    }

    #[test]
    fn test_ids_become_keys_once() {
        let tree = load(r#"<section id="s"><para id="p">a</para><para id="p">b</para></section>"#).unwrap();
        let s = Key::from_id("s");

        let children = tree.children(&s);
        assert_eq!(children[0], Key::from_id("p"));
        assert!(children[1].is_generated());
    }

    #[test]
    fn test_document_roots() {
        let wrapped = r#"<document xmlns="http://cnx.rice.edu/cnxml"><title>T</title><content><para>a</para><para>b</para></content></document>"#;
        assert_eq!(outline(wrapped), r#"paragraph("a"), paragraph("b")"#);
        assert_eq!(outline("<content><para>a</para></content>"), r#"paragraph("a")"#);
        assert_eq!(outline("<document><title>T</title></document>"), "");
    }

    #[test]
    fn test_transformers_build_under_the_given_key() {
        let el = dom::parse(r#"<note type="tip"><para id="inner">t</para></note>"#).unwrap();
        let mut loader = Loader::new();

        let element = admonition(&mut loader, &el, Key::from_id("n"));
        assert_eq!(element.key, Key::from_id("n"));
        assert_eq!(element.children[0].key(), &Key::from_id("inner"));

        let node = Loader::new().block(&el).unwrap();
        assert!(node.key().is_generated());
        assert_eq!(node.as_element().unwrap().ty, "admonition");
    }
}
