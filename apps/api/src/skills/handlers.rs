//! Axum route handlers for the skills API.

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::skills::{add_missing_skills, add_skills_to_resume, prepare_skills};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const OUTPUT_FILENAME: &str = "updated_resume.docx";

const RESUME_FIELD: &str = "resume";
const SKILLS_FIELD: &str = "skills";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Multipart upload: one resume file plus any number of `skills` text fields.
#[derive(Debug)]
pub struct SkillsUpload {
    pub resume: Bytes,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillReportResponse {
    pub filename: String,
    /// Base64 of the modified document.
    pub file: String,
    pub existing_skills: Vec<String>,
    pub added_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /add-skills
///
/// Returns the modified resume as a `.docx` attachment.
pub async fn handle_add_skills(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart?).await?;
    let skills = prepare_skills(&upload.skills)?;

    let document =
        tokio::task::spawn_blocking(move || add_skills_to_resume(&upload.resume, &skills))
            .await
            .context("Document worker failed")??;

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{OUTPUT_FILENAME}\""),
            ),
        ],
        document,
    )
        .into_response())
}

/// POST /add-skills/report
///
/// Adds only the skills the resume lacks and returns the document base64-encoded,
/// alongside the skills found and the skills added.
pub async fn handle_add_skills_report(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SkillReportResponse>, AppError> {
    let upload = read_upload(multipart?).await?;
    let skills = prepare_skills(&upload.skills)?;

    let report = tokio::task::spawn_blocking(move || add_missing_skills(&upload.resume, &skills))
        .await
        .context("Document worker failed")??;

    Ok(Json(SkillReportResponse {
        filename: OUTPUT_FILENAME.to_string(),
        file: STANDARD.encode(&report.document),
        existing_skills: report.existing_skills,
        added_skills: report.added_skills,
    }))
}

/// Drains the multipart body. Fails if the resume or every skill field is missing.
async fn read_upload(mut multipart: Multipart) -> Result<SkillsUpload, AppError> {
    let mut resume = None;
    let mut skills = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                debug!(filename = ?field.file_name(), "Receiving resume upload");
                resume = Some(field.bytes().await?);
            }
            Some(SKILLS_FIELD) => skills.push(field.text().await?),
            other => debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    if skills.is_empty() {
        return Err(AppError::Validation("No skills provided".to_string()));
    }

    Ok(SkillsUpload { resume, skills })
}
