//! JSON output formatter for resolution reports
//!
//! Provides a single structured document for programmatic integration.

use super::FileReport;
use cdom_core::diagnostic::Severity;
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub files: &'a [FileReport],
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub cdom_version: &'static str,
    pub working_directory: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_problems: usize,
    pub total_names: usize,
    pub total_diagnostics: usize,
    pub by_severity: SeverityCounts,
}

#[derive(Serialize, Default)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub hint: usize,
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, reports: &[FileReport]) -> String {
        let output = self.build_output(reports);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn build_output<'a>(&self, reports: &'a [FileReport]) -> JsonOutput<'a> {
        let working_directory = std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        JsonOutput {
            version: "1.0",
            metadata: JsonMetadata {
                cdom_version: env!("CARGO_PKG_VERSION"),
                working_directory,
            },
            summary: self.build_summary(reports),
            files: reports,
        }
    }

    fn build_summary(&self, reports: &[FileReport]) -> JsonSummary {
        let mut by_severity = SeverityCounts::default();
        for diagnostic in reports.iter().flat_map(|r| &r.diagnostics) {
            match diagnostic.severity {
                Severity::Error => by_severity.error += 1,
                Severity::Warning => by_severity.warning += 1,
                Severity::Info => by_severity.info += 1,
                Severity::Hint => by_severity.hint += 1,
            }
        }

        JsonSummary {
            total_files: reports.len(),
            files_with_problems: reports.iter().filter(|r| !r.diagnostics.is_empty()).count(),
            total_names: reports.iter().map(|r| r.names.len()).sum(),
            total_diagnostics: reports.iter().map(|r| r.diagnostics.len()).sum(),
            by_severity,
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NameEntry;
    use cdom_core::diagnostic::Diagnostic;
    use cdom_core::{Language, NameRole};

    fn report() -> FileReport {
        FileReport {
            file: "unit.ast.json".to_string(),
            language: Language::C,
            names: vec![NameEntry {
                name: "x".to_string(),
                line: 1,
                column: 5,
                role: NameRole::Declaration,
                kind: "variable",
                binding: "x".to_string(),
                problem: None,
                r#type: Some("int".to_string()),
            }],
            diagnostics: vec![Diagnostic::new(
                "E001",
                Severity::Warning,
                "No declaration of the name is visible at this point: 'z'".to_string(),
                "unit.c",
                2,
                9,
            )],
        }
    }

    #[test]
    fn json_output_is_valid() {
        let output = JsonFormatter::new().format(&[report()]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["version"], "1.0");
        assert_eq!(parsed["summary"]["total_files"], 1);
        assert_eq!(parsed["summary"]["total_names"], 1);
        assert_eq!(parsed["summary"]["by_severity"]["warning"], 1);
    }

    #[test]
    fn json_output_lists_names_with_types() {
        let output = JsonFormatter::new().format(&[report()]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let name = &parsed["files"][0]["names"][0];
        assert_eq!(name["role"], "declaration");
        assert_eq!(name["type"], "int");
        assert!(name.get("problem").is_none());
        assert_eq!(parsed["files"][0]["language"], "c");
        assert_eq!(parsed["files"][0]["diagnostics"][0]["code"], "E001");
    }

    #[test]
    fn json_output_empty_reports() {
        let output = JsonFormatter::new().format(&[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["summary"]["total_diagnostics"], 0);
        assert_eq!(parsed["files"].as_array().unwrap().len(), 0);
    }
}
