//! Pretty formatter for human-readable terminal output
//!
//! Lists each file's names with their bindings, then its diagnostics with source context.

use super::{FileReport, NameEntry};
use cdom_core::NameRole;
use cdom_core::diagnostic::{Diagnostic, Severity};
use colored::{ColoredString, Colorize};
use std::collections::HashMap;
use std::fs;

pub struct PrettyFormatter {
    sources: HashMap<String, String>,
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_sources(sources: HashMap<String, String>) -> Self {
        Self { sources }
    }

    pub fn format(&self, reports: &[FileReport]) -> String {
        let mut output = String::new();

        for report in reports {
            output.push_str(&self.format_report(report));
            output.push('\n');
        }

        let diagnostics: Vec<&Diagnostic> =
            reports.iter().flat_map(|r| &r.diagnostics).collect();
        output.push_str(&self.format_summary(reports.len(), &diagnostics));

        output
    }

    fn format_report(&self, report: &FileReport) -> String {
        let language = match report.language {
            cdom_core::Language::C => "c",
            cdom_core::Language::Cpp => "c++",
        };
        let mut lines = vec![format!("{} {}", report.file.bold(), format!("({})", language).dimmed())];

        for entry in &report.names {
            lines.push(self.format_name(entry));
        }

        for diag in &report.diagnostics {
            lines.push(String::new());
            lines.push(self.format_diagnostic(diag));
        }

        lines.push(String::new());
        lines.join("\n")
    }

    fn format_name(&self, entry: &NameEntry) -> String {
        let position = format!("{}:{}", entry.line, entry.column);
        let role = match entry.role {
            NameRole::Declaration => "decl",
            NameRole::Reference => "ref",
            NameRole::Neither => "-",
        };
        let binding = match entry.problem {
            Some(problem) => format!("{}", problem).red().to_string(),
            None => format!("{} {}", entry.kind, entry.binding),
        };
        let mut line = format!(
            "  {:>8}  {:<4}  {:<16}  {}",
            position.dimmed(),
            role,
            entry.name,
            binding
        );
        if let Some(ty) = &entry.r#type {
            line.push_str(&format!("  {}", ty.cyan()));
        }
        line
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut lines = Vec::new();

        let severity_str = self.colorize_severity(&diag.severity);
        lines.push(format!("{}[{}]: {}", severity_str, diag.code.dimmed(), diag.message));
        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            diag.file,
            diag.line,
            diag.column
        ));

        let padding = " ".repeat(diag.line.to_string().len());
        if let Some(source_line) = self.get_source_line(&diag.file, diag.line) {
            lines.push(format!("{} {}", padding, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                diag.line.to_string().blue(),
                "|".blue(),
                source_line
            ));
            let caret_padding = " ".repeat((diag.column as usize).saturating_sub(1));
            lines.push(format!(
                "{} {} {}{}",
                padding,
                "|".blue(),
                caret_padding,
                "^".red()
            ));
        }

        if let Some(suggestion) = &diag.suggestion {
            lines.push(format!(
                "{} {} {} {}",
                padding,
                "=".blue(),
                "suggestion:".green(),
                suggestion
            ));
        }

        lines.join("\n")
    }

    fn colorize_severity(&self, severity: &Severity) -> ColoredString {
        match severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
            Severity::Hint => "hint".cyan().bold(),
        }
    }

    fn get_source_line(&self, file: &str, line: u32) -> Option<String> {
        let index = (line as usize).checked_sub(1)?;
        if let Some(source) = self.sources.get(file) {
            return source.lines().nth(index).map(|s| s.to_string());
        }

        // A tree file has no source lines to show.
        if file.ends_with(".json") {
            return None;
        }
        fs::read_to_string(file)
            .ok()
            .and_then(|content| content.lines().nth(index).map(|s| s.to_string()))
    }

    fn format_summary(&self, files: usize, diagnostics: &[&Diagnostic]) -> String {
        let error_count = diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
            .count();
        let warning_count = diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
            .count();

        let files_str = if files == 1 { "file" } else { "files" };
        if diagnostics.is_empty() {
            return format!("Resolved {} {} without problems\n", files, files_str).green().to_string();
        }

        let errors_str = if error_count == 1 {
            format!("{} error", error_count)
        } else {
            format!("{} errors", error_count)
        };

        let warnings_str = if warning_count == 1 {
            format!("{} warning", warning_count)
        } else {
            format!("{} warnings", warning_count)
        };

        let total = diagnostics.len();
        let problems_str = if total == 1 { "problem" } else { "problems" };

        format!(
            "Found {} {} in {} {} ({}, {})\n",
            total.to_string().bold(),
            problems_str,
            files,
            files_str,
            errors_str.red(),
            warnings_str.yellow()
        )
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdom_core::{Language, ProblemKind};

    fn report(diagnostics: Vec<Diagnostic>) -> FileReport {
        FileReport {
            file: "unit.ast.json".to_string(),
            language: Language::C,
            names: vec![
                NameEntry {
                    name: "x".to_string(),
                    line: 1,
                    column: 5,
                    role: NameRole::Declaration,
                    kind: "variable",
                    binding: "x".to_string(),
                    problem: None,
                    r#type: Some("int".to_string()),
                },
                NameEntry {
                    name: "z".to_string(),
                    line: 2,
                    column: 9,
                    role: NameRole::Reference,
                    kind: "problem",
                    binding: "z".to_string(),
                    problem: Some(ProblemKind::NameNotFound),
                    r#type: None,
                },
            ],
            diagnostics,
        }
    }

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            "E001",
            severity,
            "No declaration of the name is visible at this point: 'z'".to_string(),
            "unit.c",
            2,
            9,
        )
    }

    #[test]
    fn pretty_format_lists_names() {
        colored::control::set_override(false);
        let output = PrettyFormatter::new().format(&[report(vec![])]);

        assert!(output.contains("unit.ast.json (c)"));
        assert!(output.contains("variable x"));
        assert!(output.contains("int"));
        assert!(output.contains("name-not-found"));
        assert!(output.contains("without problems"));
    }

    #[test]
    fn pretty_format_shows_source_context() {
        colored::control::set_override(false);
        let mut sources = HashMap::new();
        sources.insert("unit.c".to_string(), "int x;\nint y = x + z;\n".to_string());

        let formatter = PrettyFormatter::with_sources(sources);
        let output = formatter.format(&[report(vec![diagnostic(Severity::Error)])]);

        assert!(output.contains("error[E001]"));
        assert!(output.contains("--> unit.c:2:9"));
        assert!(output.contains("int y = x + z;"));
        assert!(output.contains("        ^"));
    }

    #[test]
    fn pretty_format_summary_counts() {
        colored::control::set_override(false);
        let output = PrettyFormatter::new().format(&[report(vec![
            diagnostic(Severity::Error),
            diagnostic(Severity::Warning),
        ])]);

        assert!(output.contains("Found 2 problems in 1 file (1 error, 1 warning)"));
    }

    #[test]
    fn pretty_format_shows_suggestion() {
        colored::control::set_override(false);
        let diag = diagnostic(Severity::Error).with_suggestion("Cast an argument".to_string());
        let output = PrettyFormatter::new().format(&[report(vec![diag])]);

        assert!(output.contains("= suggestion: Cast an argument"));
    }
}
