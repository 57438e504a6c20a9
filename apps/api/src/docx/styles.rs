//! Paragraph style table read from `word/styles.xml`.

use std::collections::HashMap;

use super::xml::XmlElement;

const DEFAULT_STYLE_NAME: &str = "Normal";

/// Built-in styles that Word stores under lowercase names but shows capitalised.
const UI_NAME_ALIASES: &[(&str, &str)] = &[
    ("caption", "Caption"),
    ("footer", "Footer"),
    ("header", "Header"),
    ("title", "Title"),
    ("subtitle", "Subtitle"),
    ("heading 1", "Heading 1"),
    ("heading 2", "Heading 2"),
    ("heading 3", "Heading 3"),
    ("heading 4", "Heading 4"),
    ("heading 5", "Heading 5"),
    ("heading 6", "Heading 6"),
    ("heading 7", "Heading 7"),
    ("heading 8", "Heading 8"),
    ("heading 9", "Heading 9"),
];

#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// style id -> UI name, paragraph styles only.
    paragraph_styles: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    pub fn from_root(root: &XmlElement) -> Self {
        let mut sheet = Self::default();

        for style in root.children_named("w:style") {
            if style.attr("w:type") != Some("paragraph") {
                continue;
            }
            let Some(id) = style.attr("w:styleId") else {
                continue;
            };
            let name = style
                .child("w:name")
                .and_then(|n| n.attr("w:val"))
                .map(ui_name)
                .unwrap_or_else(|| id.to_string());

            if matches!(style.attr("w:default"), Some("1" | "true" | "on")) {
                sheet.default_paragraph = Some(id.to_string());
            }
            sheet.paragraph_styles.insert(id.to_string(), name);
        }

        sheet
    }

    /// UI name of the style a paragraph with `style_id` renders in. Unknown and absent ids
    /// resolve to the default paragraph style.
    pub fn name_of(&self, style_id: Option<&str>) -> String {
        style_id
            .and_then(|id| self.paragraph_styles.get(id))
            .or_else(|| {
                self.default_paragraph
                    .as_ref()
                    .and_then(|id| self.paragraph_styles.get(id))
            })
            .cloned()
            .unwrap_or_else(|| DEFAULT_STYLE_NAME.to_string())
    }

    pub fn is_paragraph_style(&self, style_id: &str) -> bool {
        self.paragraph_styles.contains_key(style_id)
    }

    pub fn is_default(&self, style_id: &str) -> bool {
        self.default_paragraph.as_deref() == Some(style_id)
    }

    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.paragraph_styles
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| id.as_str())
    }
}

fn ui_name(raw: &str) -> String {
    UI_NAME_ALIASES
        .iter()
        .find(|(internal, _)| *internal == raw)
        .map(|(_, ui)| ui.to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testing::STANDARD_STYLES;
    use crate::docx::xml::XmlDocument;

    fn sheet() -> StyleSheet {
        StyleSheet::from_root(&XmlDocument::parse(STANDARD_STYLES).unwrap().root)
    }

    #[test]
    fn test_builtin_heading_names_use_ui_casing() {
        let sheet = sheet();
        assert_eq!(sheet.name_of(Some("Heading1")), "Heading 1");
        assert_eq!(sheet.name_of(Some("ListBullet")), "List Bullet");
    }

    #[test]
    fn test_unknown_and_absent_ids_resolve_to_default_style() {
        let sheet = sheet();
        assert_eq!(sheet.name_of(None), "Normal");
        assert_eq!(sheet.name_of(Some("NoSuchStyle")), "Normal");
        assert!(sheet.is_default("Normal"));
        assert!(!sheet.is_paragraph_style("NoSuchStyle"));
    }

    #[test]
    fn test_character_styles_are_not_paragraph_styles() {
        let sheet = sheet();
        assert!(!sheet.is_paragraph_style("Strong"));
    }

    #[test]
    fn test_id_lookup_by_ui_name() {
        let sheet = sheet();
        assert_eq!(sheet.id_for_name("Heading 1"), Some("Heading1"));
        assert_eq!(sheet.id_for_name("Heading 7"), None);
    }

    #[test]
    fn test_empty_sheet_falls_back_to_normal() {
        let sheet = StyleSheet::default();
        assert_eq!(sheet.name_of(Some("Heading1")), "Normal");
        assert_eq!(sheet.id_for_name("Heading 1"), None);
    }
}
