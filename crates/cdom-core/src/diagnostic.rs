//! Diagnostic reporting for resolution results
//!
//! Problems are data; diagnostics are what gets shown to a user: a code, a severity, a message
//! and a position.

use std::collections::HashMap;

use serde::Serialize;

use crate::ast::Ast;
use crate::problems::{Problem, ProblemKind, ProblemOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        code: &str,
        severity: Severity,
        message: String,
        file: &str,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message,
            file: file.to_string(),
            line,
            column,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

/// Severity per problem kind, with overrides on top of the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityMap {
    overrides: HashMap<ProblemKind, Severity>,
}

impl SeverityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: ProblemKind, severity: Severity) {
        self.overrides.insert(kind, severity);
    }

    pub fn severity(&self, kind: ProblemKind) -> Severity {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_severity(kind))
    }
}

fn default_severity(kind: ProblemKind) -> Severity {
    match kind {
        ProblemKind::AmbiguousLookup
        | ProblemKind::RecursionInLookup
        | ProblemKind::InvalidTemplateArguments => Severity::Warning,
        _ => Severity::Error,
    }
}

/// Code shown for a problem kind: `E` for binding problems, `S` for syntax problems.
pub fn problem_code(kind: ProblemKind) -> String {
    let prefix = if kind.is_syntax() { 'S' } else { 'E' };
    format!("{}{:03X}", prefix, kind.code())
}

/// Turns problems into diagnostics positioned at their nodes. `file` is used when a node has no
/// file location of its own.
pub fn diagnostics_for(
    ast: &Ast,
    problems: &[Problem],
    severities: &SeverityMap,
    file: &str,
) -> Vec<Diagnostic> {
    problems
        .iter()
        .map(|problem| {
            let location = ast.location(problem.node);
            let (line, column) = location.line_column();
            let file = location
                .file
                .as_ref()
                .map(|f| f.file.as_str())
                .filter(|f| !f.is_empty())
                .unwrap_or(file);
            let diagnostic = Diagnostic::new(
                &problem_code(problem.kind),
                severities.severity(problem.kind),
                problem.message(),
                file,
                line,
                column,
            );
            match (problem.origin, problem.kind) {
                (ProblemOrigin::Binding, ProblemKind::NoViableOverload) => diagnostic
                    .with_suggestion("Check the argument types against the declared overloads".to_string()),
                (ProblemOrigin::Binding, ProblemKind::AmbiguousCall) => diagnostic
                    .with_suggestion("Cast an argument to select one overload".to_string()),
                _ => diagnostic,
            }
        })
        .collect()
}
