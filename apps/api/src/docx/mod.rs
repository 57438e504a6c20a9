//! WordprocessingML (.docx) package handling.
//!
//! A `.docx` file is an OPC package (a ZIP archive). Only the main document part is
//! parsed and rewritten; every other entry is carried through untouched. Elements are
//! matched by their conventional `w:` qualified names, which is what Word and every
//! mainstream producer emit.

pub mod document;
pub mod package;
pub mod paragraph;
pub mod styles;
pub mod xml;

#[cfg(test)]
pub mod testing;

use thiserror::Error;

pub use document::{Document, ParagraphView, Scope};

/// Errors raised while loading, editing or saving a document package.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Package has no '{0}' part")]
    MissingPart(&'static str),

    #[error("Part '{name}' inflates past {limit} bytes")]
    PartTooLarge { name: String, limit: u64 },

    #[error("Package inflates past {limit} bytes")]
    PackageTooLarge { limit: u64 },

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Main document part has no w:body")]
    MissingBody,

    #[error("Scope {0:?} does not exist in the document")]
    ScopeNotFound(Scope),

    #[error("Paragraph {index} does not exist in {scope:?}")]
    ParagraphNotFound { scope: Scope, index: usize },
}

pub(crate) fn xml_err(err: impl std::fmt::Display) -> DocxError {
    DocxError::Xml(err.to_string())
}
