//! Paragraph-level helpers: text extraction, run construction and formatting copies.

use super::xml::{XmlElement, XmlNode};

pub const PARAGRAPH: &str = "w:p";
pub const PARAGRAPH_PROPERTIES: &str = "w:pPr";
pub const PARAGRAPH_STYLE: &str = "w:pStyle";
pub const RUN: &str = "w:r";
pub const RUN_PROPERTIES: &str = "w:rPr";
pub const TEXT: &str = "w:t";

/// Font properties carried over to an appended run, in `w:rPr` schema order.
const RUN_FONT_PROPERTIES: &[&str] = &[
    "w:rFonts", "w:b", "w:bCs", "w:i", "w:iCs", "w:color", "w:sz", "w:szCs", "w:u",
];

/// Paragraph formatting carried over to inserted list items, in `w:pPr` schema order.
const PARAGRAPH_FORMAT_PROPERTIES: &[&str] = &[
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:widowControl",
    "w:numPr",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:jc",
];

/// Subtrees whose text is not part of the paragraph's own text.
const OPAQUE_CONTAINERS: &[&str] = &[
    PARAGRAPH_PROPERTIES,
    RUN_PROPERTIES,
    "w:drawing",
    "w:pict",
    "w:object",
    "mc:AlternateContent",
];

/// Visible text of a paragraph. Tabs become `\t`, line breaks `\n`.
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut text = String::new();
    collect_text(paragraph, &mut text);
    text
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for child in element.elements() {
        match child.name.as_str() {
            TEXT => {
                for node in &child.children {
                    if let XmlNode::Text(t) | XmlNode::CData(t) = node {
                        out.push_str(t);
                    }
                }
            }
            "w:tab" => out.push('\t'),
            "w:br" | "w:cr" => out.push('\n'),
            name if OPAQUE_CONTAINERS.contains(&name) => {}
            _ => collect_text(child, out),
        }
    }
}

pub fn paragraph_style_id(paragraph: &XmlElement) -> Option<&str> {
    paragraph
        .child(PARAGRAPH_PROPERTIES)?
        .child(PARAGRAPH_STYLE)?
        .attr("w:val")
}

pub fn last_direct_run(paragraph: &XmlElement) -> Option<&XmlElement> {
    paragraph.children_named(RUN).last()
}

/// A plain run holding `text`.
pub fn text_run(text: &str) -> XmlElement {
    let mut t = XmlElement::new(TEXT);
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        t.set_attr("xml:space", "preserve");
    }
    XmlElement::new(RUN).with_child(t.with_text(text))
}

/// `w:rPr` carrying the font properties of `source`, or `None` if it has none.
pub fn copy_run_font(source: &XmlElement) -> Option<XmlElement> {
    let properties = source.child(RUN_PROPERTIES)?;
    let copied = copy_children(properties, RUN_FONT_PROPERTIES);
    (!copied.is_empty()).then(|| XmlElement {
        name: RUN_PROPERTIES.to_string(),
        attributes: Vec::new(),
        children: copied,
    })
}

/// A new paragraph with an optional style and paragraph formatting copied from
/// `format_source`. Empty text produces a paragraph without runs.
pub fn new_paragraph(
    text: &str,
    style_id: Option<&str>,
    format_source: Option<&XmlElement>,
) -> XmlElement {
    let mut properties = XmlElement::new(PARAGRAPH_PROPERTIES);
    if let Some(style_id) = style_id {
        properties.push(XmlElement::new(PARAGRAPH_STYLE).with_attr("w:val", style_id));
    }
    if let Some(source) = format_source.and_then(|p| p.child(PARAGRAPH_PROPERTIES)) {
        properties
            .children
            .extend(copy_children(source, PARAGRAPH_FORMAT_PROPERTIES));
    }

    let mut paragraph = XmlElement::new(PARAGRAPH);
    if !properties.children.is_empty() {
        paragraph.push(properties);
    }
    if !text.is_empty() {
        paragraph.push(text_run(text));
    }
    paragraph
}

fn copy_children(source: &XmlElement, names: &[&str]) -> Vec<XmlNode> {
    names
        .iter()
        .filter_map(|name| source.child(name))
        .cloned()
        .map(XmlNode::Element)
        .collect()
}
