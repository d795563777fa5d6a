//! Output formats for resolution reports

pub mod json;
pub mod pretty;

use cdom_core::diagnostic::Diagnostic;
use cdom_core::{Language, NameRole, ProblemKind};
use serde::Serialize;

/// One resolved name occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct NameEntry {
    pub name: String,
    pub line: u32,
    pub column: u32,
    pub role: NameRole,
    pub kind: &'static str,
    pub binding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// Everything resolved for one syntax tree.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub language: Language,
    pub names: Vec<NameEntry>,
    pub diagnostics: Vec<Diagnostic>,
}
