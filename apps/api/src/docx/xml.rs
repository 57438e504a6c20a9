//! Mutable XML element tree for package parts.
//!
//! `quick-xml` is a streaming reader/writer. Editing paragraphs needs random access to
//! siblings, so a part is materialised into this tree and written back in order.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{xml_err, DocxError};

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name, prefix included (`w:p`).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .filter(move |e| e.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .find(|e| e.name == name)
    }

    /// Index into `children` of the `n`th child element called `name`.
    pub fn position_of_nth(&self, name: &str, n: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element(name))
            .nth(n)
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed part: optional `<?xml ...?>` declaration plus the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub declaration: Option<Declaration>,
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut declaration = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Decl(decl) => {
                    let version = decl.version().map_err(xml_err)?;
                    let encoding = decl.encoding().transpose().map_err(xml_err)?;
                    let standalone = decl.standalone().transpose().map_err(xml_err)?;
                    declaration = Some(Declaration {
                        version: String::from_utf8_lossy(&version).into_owned(),
                        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
                        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
                    });
                }
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DocxError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text.unescape().map_err(xml_err)?;
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(XmlNode::CData(data));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let comment = String::from_utf8_lossy(&comment).into_owned();
                        parent.children.push(XmlNode::Comment(comment));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(DocxError::Xml(format!(
                "{} unclosed element(s) at end of input",
                stack.len()
            )));
        }
        let root = root.ok_or_else(|| DocxError::Xml("document has no root element".to_string()))?;

        Ok(Self { declaration, root })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = Writer::new(Vec::new());
        if let Some(decl) = &self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    decl.standalone.as_deref(),
                )))
                .map_err(xml_err)?;
            writer.get_mut().extend_from_slice(b"\r\n");
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, DocxError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_err)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DocxError> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DocxError::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), DocxError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_err);
    }

    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_err)?,
            XmlNode::CData(data) => writer
                .write_event(Event::CData(BytesCData::new(data.as_str())))
                .map_err(xml_err)?,
            XmlNode::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                .map_err(xml_err)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t xml:space="preserve"> R&amp;D </w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_parse_keeps_declaration_and_structure() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let decl = doc.declaration.as_ref().unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.standalone.as_deref(), Some("yes"));
        assert_eq!(doc.root.name, "w:document");
        assert_eq!(doc.root.attr("xmlns:w"), Some("urn:w"));

        let body = doc.root.child("w:body").unwrap();
        assert_eq!(body.elements().count(), 2);
        let t = body
            .child("w:p")
            .and_then(|p| p.child("w:r"))
            .and_then(|r| r.child("w:t"))
            .unwrap();
        assert_eq!(t.attr("xml:space"), Some("preserve"));
        assert_eq!(t.children, vec![XmlNode::Text(" R&D ".to_string())]);
    }

    #[test]
    fn test_written_output_parses_back_identically() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let bytes = doc.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\""));
        assert!(text.contains("R&amp;D"));
        assert!(text.contains("<w:sectPr/>"));

        let reparsed = XmlDocument::parse(&text).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_attribute_values_are_escaped_on_write() {
        let doc = XmlDocument {
            declaration: None,
            root: XmlElement::new("a").with_attr("title", "x < \"y\""),
        };
        let text = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        let reparsed = XmlDocument::parse(&text).unwrap();
        assert_eq!(reparsed.root.attr("title"), Some("x < \"y\""));
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        let err = XmlDocument::parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, DocxError::Xml(_)));
    }

    #[test]
    fn test_unclosed_root_is_rejected() {
        assert!(XmlDocument::parse("<a><b/>").is_err());
        assert!(XmlDocument::parse("").is_err());
    }

    #[test]
    fn test_position_of_nth_skips_other_elements() {
        let parent = XmlElement::new("w:body")
            .with_child(XmlElement::new("w:tbl"))
            .with_child(XmlElement::new("w:p"))
            .with_text("\n")
            .with_child(XmlElement::new("w:p"));
        assert_eq!(parent.position_of_nth("w:p", 0), Some(1));
        assert_eq!(parent.position_of_nth("w:p", 1), Some(3));
        assert_eq!(parent.position_of_nth("w:p", 2), None);
    }
}
