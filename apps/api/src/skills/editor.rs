//! Mutator: writes new skills into the located section, or appends a fallback section.

use tracing::{debug, info};

use crate::docx::paragraph::{
    copy_run_font, last_direct_run, new_paragraph, paragraph_text, text_run,
};
use crate::docx::xml::{XmlElement, XmlNode};
use crate::docx::{Document, DocxError, Scope};
use crate::skills::locator::{locate_skills_section, SectionLayout, SkillsSection};

const FALLBACK_HEADING: &str = "Skills";
const FALLBACK_HEADING_STYLE: &str = "Heading 1";
const FALLBACK_HEADING_STYLE_ID: &str = "Heading1";

/// Which strategy placed the skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended to a comma-separated paragraph.
    Inline,
    /// New list items inserted before the list boundary.
    ListInserted,
    /// New list items appended at the end of an open-ended list.
    ListAppended,
    /// No section found; a new heading and paragraph were added at the end.
    Fallback,
}

/// Locates the skills section and inserts `skills` into it.
pub fn apply_skills(doc: &mut Document, skills: &[String]) -> Result<Placement, DocxError> {
    match locate_skills_section(doc) {
        Some(section) => apply_to_section(doc, &section, skills),
        None => {
            append_fallback_section(doc, skills)?;
            Ok(Placement::Fallback)
        }
    }
}

pub fn apply_to_section(
    doc: &mut Document,
    section: &SkillsSection,
    skills: &[String],
) -> Result<Placement, DocxError> {
    match section.layout {
        SectionLayout::Inline => {
            add_skills_to_paragraph(doc, section.scope, section.anchor, skills)?;
            Ok(Placement::Inline)
        }
        SectionLayout::List {
            boundary: Some(boundary),
            reference,
        } => {
            let template = ListItemTemplate::from_reference(doc, section.scope, reference);
            // Each insert lands directly before the boundary, so walk backwards to keep
            // the requested order.
            for skill in skills.iter().rev() {
                doc.insert_paragraph_before(section.scope, boundary, template.paragraph(skill))?;
            }
            Ok(Placement::ListInserted)
        }
        SectionLayout::List {
            boundary: None,
            reference,
        } => {
            let template = ListItemTemplate::from_reference(doc, section.scope, reference);
            for skill in skills {
                doc.append_paragraph(section.scope, template.paragraph(skill))?;
            }
            Ok(Placement::ListAppended)
        }
    }
}

fn add_skills_to_paragraph(
    doc: &mut Document,
    scope: Scope,
    index: usize,
    skills: &[String],
) -> Result<(), DocxError> {
    let paragraph = doc.paragraph_mut(scope, index)?;

    let joined = skills.join(", ");
    let existing = paragraph_text(paragraph);
    let existing = existing.trim();
    let text = if !existing.is_empty() && !existing.ends_with(',') {
        format!(", {joined}")
    } else {
        format!(" {joined}")
    };

    let mut run = text_run(&text);
    if let Some(font) = last_direct_run(paragraph).and_then(copy_run_font) {
        run.children.insert(0, XmlNode::Element(font));
    }
    paragraph.push(run);
    Ok(())
}

/// Style and paragraph formatting shared by every inserted list item.
struct ListItemTemplate {
    style_id: Option<String>,
    reference: Option<XmlElement>,
}

impl ListItemTemplate {
    fn from_reference(doc: &Document, scope: Scope, reference: usize) -> Self {
        let paragraphs = doc.paragraphs(scope);
        let Some(view) = paragraphs.get(reference) else {
            return Self {
                style_id: None,
                reference: None,
            };
        };

        let styles = doc.styles();
        let style_id = match view.style_id {
            Some(id) if styles.is_paragraph_style(id) && !styles.is_default(id) => {
                Some(id.to_string())
            }
            Some(id) => {
                debug!(style_id = id, "Reference style unusable; inserting unstyled");
                None
            }
            None => None,
        };

        Self {
            style_id,
            reference: Some(view.element.clone()),
        }
    }

    fn paragraph(&self, skill: &str) -> XmlElement {
        new_paragraph(skill, self.style_id.as_deref(), self.reference.as_ref())
    }
}

fn append_fallback_section(doc: &mut Document, skills: &[String]) -> Result<(), DocxError> {
    let heading_style = doc
        .styles()
        .id_for_name(FALLBACK_HEADING_STYLE)
        .unwrap_or(FALLBACK_HEADING_STYLE_ID)
        .to_string();

    doc.append_paragraph(
        Scope::Body,
        new_paragraph(FALLBACK_HEADING, Some(&heading_style), None),
    )?;
    doc.append_paragraph(Scope::Body, new_paragraph(&skills.join(", "), None, None))?;

    info!(
        skills = skills.len(),
        "No skills section found; appended one at the end of the document"
    );
    Ok(())
}
