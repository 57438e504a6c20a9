//! Skill normalizer: splits comma-joined phrases into trimmed, title-cased tokens.

use std::collections::HashSet;

/// Splits every phrase on commas, trims, title-cases and drops empty pieces.
/// Order and duplicates are preserved.
pub fn normalize_skills<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|phrase| phrase.as_ref().split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(title_case)
        .collect()
}

/// Upper-cases a cased character that follows an uncased one and lower-cases the rest.
/// Uncased characters (digits, punctuation, whitespace) pass through.
///
/// Only the first character of a multi-character upper-case mapping stays upper-case,
/// so `ß` becomes `Ss` and `ﬁ` becomes `Fi`. Word starts are judged on the emitted
/// text, which keeps a second pass from changing the result.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut previous_cased = false;

    for c in word.chars() {
        if !is_cased(c) {
            out.push(c);
            previous_cased = false;
            continue;
        }

        let start = out.len();
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        }
        previous_cased = out[start..].chars().next_back().is_some_and(is_cased);
    }

    out
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// Case-insensitive set of skill tokens.
#[derive(Debug, Default, Clone)]
pub struct SkillSet {
    keys: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the skill was not already present.
    pub fn insert(&mut self, skill: &str) -> bool {
        self.keys.insert(skill.to_lowercase())
    }
}

impl<'a> FromIterator<&'a String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = &'a String>>(iter: I) -> Self {
        let mut set = Self::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}
