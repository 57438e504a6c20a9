//! Section locator: finds the "Skills" section and decides how new skills fit into it.
//!
//! Detection is deliberately heuristic and must stay that way: a heading is any paragraph
//! whose text starts with "skills", and a list ends at a blank line, a `Heading*` style,
//! or an all-caps line longer than four characters.


use crate::docx::{Document, ParagraphView, Scope};

const HEADING_PREFIX: &str = "skills";

/// How the skills under a heading are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    /// One comma-separated paragraph.
    Inline,
    /// One paragraph per skill. `boundary` is the blank line or heading that ends the
    /// list (`None` when the list runs to the end of its scope); `reference` is the last
    /// list item, whose formatting new items copy.
    List {
        boundary: Option<usize>,
        reference: usize,
    },
}

/// A located skills section. Indices are paragraph positions within `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillsSection {
    pub scope: Scope,
    pub anchor: usize,
    pub layout: SectionLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingRule {
    AnyStyle,
    /// List-styled paragraphs never count as headings.
    ExcludeListStyles,
}

/// Table cells first, then body paragraphs. `None` when no heading has a non-blank
/// paragraph after it.
pub fn locate_skills_section(doc: &Document) -> Option<SkillsSection> {
    for scope in doc.table_cells() {
        let paragraphs = doc.paragraphs(scope);
        if let Some(anchor) = find_anchor(&paragraphs, HeadingRule::AnyStyle) {
            return Some(classify(scope, &paragraphs, anchor));
        }
    }

    let paragraphs = doc.paragraphs(Scope::Body);
    find_anchor(&paragraphs, HeadingRule::ExcludeListStyles)
        .map(|anchor| classify(Scope::Body, &paragraphs, anchor))
}

fn find_anchor(paragraphs: &[ParagraphView<'_>], rule: HeadingRule) -> Option<usize> {
    let heading = paragraphs.iter().position(|p| is_skills_heading(p, rule))?;
    paragraphs
        .iter()
        .enumerate()
        .skip(heading + 1)
        .find(|(_, p)| !p.is_blank())
        .map(|(index, _)| index)
}

fn is_skills_heading(paragraph: &ParagraphView<'_>, rule: HeadingRule) -> bool {
    if !paragraph
        .text
        .to_lowercase()
        .trim()
        .starts_with(HEADING_PREFIX)
    {
        return false;
    }
    match rule {
        HeadingRule::AnyStyle => true,
        HeadingRule::ExcludeListStyles => !paragraph.style_name.to_lowercase().starts_with("list"),
    }
}

fn classify(scope: Scope, paragraphs: &[ParagraphView<'_>], anchor: usize) -> SkillsSection {
    let layout = if paragraphs[anchor].text.contains(',') {
        SectionLayout::Inline
    } else {
        find_list_boundary(paragraphs, anchor)
    };
    SkillsSection {
        scope,
        anchor,
        layout,
    }
}

/// Scans forward from the anchor for the paragraph that ends the list.
pub fn find_list_boundary(paragraphs: &[ParagraphView<'_>], anchor: usize) -> SectionLayout {
    for (index, paragraph) in paragraphs.iter().enumerate().skip(anchor + 1) {
        if is_boundary(paragraph) {
            return SectionLayout::List {
                boundary: Some(index),
                reference: index - 1,
            };
        }
    }
    SectionLayout::List {
        boundary: None,
        reference: paragraphs.len().saturating_sub(1).max(anchor),
    }
}

fn is_boundary(paragraph: &ParagraphView<'_>) -> bool {
    let text = paragraph.text.trim();
    text.is_empty()
        || paragraph.style_name.starts_with("Heading")
        || (is_all_caps(text) && text.chars().count() > 4)
}

/// At least one cased character and no lower-case ones.
fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        has_cased |= c.is_uppercase();
    }
    has_cased
}
