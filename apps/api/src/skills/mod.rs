// Resume skills insertion.
// Flow per request: normalize -> load document -> locate section -> mutate -> serialize.
// Everything here is synchronous and CPU-bound; handlers run it under spawn_blocking.

pub mod editor;
pub mod extract;
pub mod handlers;
pub mod locator;
pub mod normalize;

use anyhow::Context;
use tracing::{info, warn};

use crate::docx::Document;
use crate::errors::AppError;
use crate::skills::editor::{apply_skills, apply_to_section};
use crate::skills::extract::{existing_skills, plan_additions};
use crate::skills::locator::locate_skills_section;
use crate::skills::normalize::normalize_skills;

/// Result of the reporting variant.
#[derive(Debug)]
pub struct SkillReport {
    pub document: Vec<u8>,
    pub existing_skills: Vec<String>,
    pub added_skills: Vec<String>,
}

/// Normalizes raw skill fields. Rejects requests that yield no skills at all.
pub fn prepare_skills(raw: &[String]) -> Result<Vec<String>, AppError> {
    let skills = normalize_skills(raw);
    if skills.is_empty() {
        return Err(AppError::Validation("No skills provided".to_string()));
    }
    Ok(skills)
}

/// Inserts every skill into the resume, duplicates included.
pub fn add_skills_to_resume(resume: &[u8], skills: &[String]) -> Result<Vec<u8>, AppError> {
    let mut doc = load_document(resume)?;
    let placement = apply_skills(&mut doc, skills).context("Failed to insert skills")?;
    info!(?placement, skills = skills.len(), "Skills inserted into resume");
    save_document(doc)
}

/// Inserts only the skills the resume does not already list and reports both sets.
pub fn add_missing_skills(resume: &[u8], skills: &[String]) -> Result<SkillReport, AppError> {
    let mut doc = load_document(resume)?;

    let section = locate_skills_section(&doc);
    let existing = section
        .as_ref()
        .map(|section| existing_skills(&doc, section))
        .unwrap_or_default();
    let added = plan_additions(skills, &existing);

    if added.is_empty() {
        info!(
            existing = existing.len(),
            "All requested skills already present; document left unchanged"
        );
    } else {
        let placement = match &section {
            Some(section) => apply_to_section(&mut doc, section, &added),
            None => apply_skills(&mut doc, &added),
        }
        .context("Failed to insert skills")?;
        info!(
            ?placement,
            existing = existing.len(),
            added = added.len(),
            "Missing skills inserted into resume"
        );
    }

    Ok(SkillReport {
        document: save_document(doc)?,
        existing_skills: existing,
        added_skills: added,
    })
}

fn load_document(bytes: &[u8]) -> Result<Document, AppError> {
    Document::from_bytes(bytes).map_err(|err| {
        warn!(error = %err, size = bytes.len(), "Rejected uploaded document");
        AppError::InvalidDocument(err)
    })
}

fn save_document(doc: Document) -> Result<Vec<u8>, AppError> {
    Ok(doc
        .into_bytes()
        .context("Failed to serialize modified document")?)
}
