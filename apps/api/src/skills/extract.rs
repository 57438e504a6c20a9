//! Existing-skill extraction and de-duplication for the reporting variant.

use crate::docx::Document;
use crate::skills::locator::{SectionLayout, SkillsSection};
use crate::skills::normalize::{normalize_skills, SkillSet};

/// Skills already listed in `section`, normalized and de-duplicated case-insensitively
/// in first-seen order.
pub fn existing_skills(doc: &Document, section: &SkillsSection) -> Vec<String> {
    let paragraphs = doc.paragraphs(section.scope);
    let end = match section.layout {
        SectionLayout::Inline => section.anchor + 1,
        SectionLayout::List { boundary, .. } => boundary.unwrap_or(paragraphs.len()),
    };
    let raw: Vec<&str> = paragraphs
        .get(section.anchor..end)
        .unwrap_or_default()
        .iter()
        .map(|p| p.text.as_str())
        .collect();

    let mut seen = SkillSet::new();
    normalize_skills(&raw)
        .into_iter()
        .filter(|skill| seen.insert(skill))
        .collect()
}

/// Requested skills missing from `existing`, in request order and without repeats.
pub fn plan_additions(requested: &[String], existing: &[String]) -> Vec<String> {
    let mut seen: SkillSet = existing.iter().collect();
    requested
        .iter()
        .filter(|skill| seen.insert(skill))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testing::{p, styled_p, DocxBuilder};
    use crate::skills::locator::locate_skills_section;

    fn existing_in(body: &str) -> Vec<String> {
        let doc = Document::from_bytes(&DocxBuilder::new(body).build()).unwrap();
        let section = locate_skills_section(&doc).unwrap();
        existing_skills(&doc, &section)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inline_section_is_split_and_normalized() {
        let existing = existing_in(&[p("Skills"), p("Python, SQL")].concat());
        assert_eq!(existing, strings(&["Python", "Sql"]));
    }

    #[test]
    fn test_list_section_reads_one_skill_per_paragraph_up_to_boundary() {
        let body = [
            p("SKILLS"),
            styled_p("ListBullet", "rust"),
            styled_p("ListBullet", "Go"),
            styled_p("ListBullet", "RUST"),
            p(""),
            p("Languages"),
        ]
        .concat();
        assert_eq!(existing_in(&body), strings(&["Rust", "Go"]));
    }

    #[test]
    fn test_open_ended_list_reads_to_scope_end() {
        let body = [p("Skills"), p("Docker"), p("Terraform")].concat();
        assert_eq!(existing_in(&body), strings(&["Docker", "Terraform"]));
    }

    #[test]
    fn test_plan_filters_case_insensitively_and_collapses_repeats() {
        let existing = strings(&["Python", "Sql"]);
        let requested = strings(&["Go", "Python", "SQL", "go", "Rust"]);
        assert_eq!(plan_additions(&requested, &existing), strings(&["Go", "Rust"]));
    }

    #[test]
    fn test_plan_with_everything_present_is_empty() {
        let existing = strings(&["Go"]);
        assert!(plan_additions(&strings(&["GO"]), &existing).is_empty());
    }
}
