//! In-memory `.docx` document: load, inspect and edit paragraphs by scope, serialize.

use super::package::Package;
use super::paragraph::{paragraph_style_id, paragraph_text, PARAGRAPH};
use super::styles::StyleSheet;
use super::xml::{XmlDocument, XmlElement, XmlNode};
use super::{xml_err, DocxError};

pub const MAIN_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";

const BODY: &str = "w:body";
const TABLE: &str = "w:tbl";
const ROW: &str = "w:tr";
const CELL: &str = "w:tc";
const SECTION_PROPERTIES: &str = "w:sectPr";

/// A run of sibling paragraphs: the document body or a single table cell.
///
/// Cells are addressed through the body's top-level tables; nested tables are not scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Body,
    Cell { table: usize, row: usize, cell: usize },
}

/// Read-only view of one paragraph with its text and resolved style name.
#[derive(Debug, Clone)]
pub struct ParagraphView<'a> {
    pub element: &'a XmlElement,
    pub text: String,
    pub style_id: Option<&'a str>,
    pub style_name: String,
}

impl ParagraphView<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    main: XmlDocument,
    styles: StyleSheet,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let package = Package::read(bytes)?;

        let main = parse_part(
            package
                .part(MAIN_PART)
                .ok_or(DocxError::MissingPart(MAIN_PART))?,
        )?;
        if main.root.child(BODY).is_none() {
            return Err(DocxError::MissingBody);
        }

        let styles = match package.part(STYLES_PART) {
            Some(bytes) => StyleSheet::from_root(&parse_part(bytes)?.root),
            None => StyleSheet::default(),
        };

        Ok(Self {
            package,
            main,
            styles,
        })
    }

    /// Serializes the edited main part back into the package.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, DocxError> {
        let main = self.main.to_bytes()?;
        self.package.set_part(MAIN_PART, main);
        self.package.write()
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Every cell of every top-level table, row by row.
    pub fn table_cells(&self) -> Vec<Scope> {
        let Some(body) = self.main.root.child(BODY) else {
            return Vec::new();
        };

        let mut cells = Vec::new();
        for (table, tbl) in body.children_named(TABLE).enumerate() {
            for (row, tr) in tbl.children_named(ROW).enumerate() {
                for (cell, _) in tr.children_named(CELL).enumerate() {
                    cells.push(Scope::Cell { table, row, cell });
                }
            }
        }
        cells
    }

    pub fn container(&self, scope: Scope) -> Option<&XmlElement> {
        let body = self.main.root.child(BODY)?;
        match scope {
            Scope::Body => Some(body),
            Scope::Cell { table, row, cell } => body
                .children_named(TABLE)
                .nth(table)?
                .children_named(ROW)
                .nth(row)?
                .children_named(CELL)
                .nth(cell),
        }
    }

    fn container_mut(&mut self, scope: Scope) -> Result<&mut XmlElement, DocxError> {
        let body = self.main.root.child_mut(BODY).ok_or(DocxError::MissingBody)?;
        let container = match scope {
            Scope::Body => Some(body),
            Scope::Cell { table, row, cell } => body
                .children_named_mut(TABLE)
                .nth(table)
                .and_then(|t| t.children_named_mut(ROW).nth(row))
                .and_then(|r| r.children_named_mut(CELL).nth(cell)),
        };
        container.ok_or(DocxError::ScopeNotFound(scope))
    }

    /// Direct paragraphs of `scope`, in order. Unknown scopes have none.
    pub fn paragraphs(&self, scope: Scope) -> Vec<ParagraphView<'_>> {
        let Some(container) = self.container(scope) else {
            return Vec::new();
        };
        container
            .children_named(PARAGRAPH)
            .map(|element| {
                let style_id = paragraph_style_id(element);
                ParagraphView {
                    element,
                    text: paragraph_text(element),
                    style_id,
                    style_name: self.styles.name_of(style_id),
                }
            })
            .collect()
    }

    pub fn paragraph_mut(
        &mut self,
        scope: Scope,
        index: usize,
    ) -> Result<&mut XmlElement, DocxError> {
        self.container_mut(scope)?
            .children_named_mut(PARAGRAPH)
            .nth(index)
            .ok_or(DocxError::ParagraphNotFound { scope, index })
    }

    /// Inserts `paragraph` directly before the `index`th paragraph of `scope`.
    pub fn insert_paragraph_before(
        &mut self,
        scope: Scope,
        index: usize,
        paragraph: XmlElement,
    ) -> Result<(), DocxError> {
        let container = self.container_mut(scope)?;
        let position = container
            .position_of_nth(PARAGRAPH, index)
            .ok_or(DocxError::ParagraphNotFound { scope, index })?;
        container
            .children
            .insert(position, XmlNode::Element(paragraph));
        Ok(())
    }

    /// Appends `paragraph` at the end of `scope`. In the body it lands before the
    /// trailing section properties.
    pub fn append_paragraph(&mut self, scope: Scope, paragraph: XmlElement) -> Result<(), DocxError> {
        let container = self.container_mut(scope)?;
        let position = match scope {
            Scope::Body => container
                .children
                .iter()
                .rposition(|node| node.is_element(SECTION_PROPERTIES))
                .unwrap_or(container.children.len()),
            Scope::Cell { .. } => container.children.len(),
        };
        container
            .children
            .insert(position, XmlNode::Element(paragraph));
        Ok(())
    }
}

fn parse_part(bytes: &[u8]) -> Result<XmlDocument, DocxError> {
    let text = std::str::from_utf8(bytes).map_err(xml_err)?;
    XmlDocument::parse(text.trim_start_matches('\u{feff}'))
}
