//! Resolve command - resolves every name in exported syntax trees

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use crate::output::{FileReport, NameEntry};
use anyhow::{Context, Result};
use cdom_core::config::load_config_or_default_with_warnings;
use cdom_core::context::TranslationUnitContext;
use cdom_core::diagnostic::{Severity, SeverityMap, diagnostics_for};
use cdom_core::{Language, NodeId, TranslationUnit};
use clap::{Args, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use walkdir::WalkDir;

const TREE_SUFFIX: &str = ".ast.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    C,
    Cpp,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::C => Language::C,
            LanguageArg::Cpp => Language::Cpp,
        }
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Syntax tree files or directories containing *.ast.json files
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Resolve as this language instead of the one recorded in the tree
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Fail on warnings (exit code 1)
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ResolveArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let config_start = self.paths.first().cloned().unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config_or_default_with_warnings(&config_start);
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        let config = config_result.config;
        let severities = config.severities();
        let mut context = config.context();
        if let Some(language) = self.language {
            context = context.with_language(language.into());
        }

        let mut files = Vec::new();
        for path in &self.paths {
            files.extend(discover_files(path)?);
        }
        if files.is_empty() {
            println!("No *.ast.json files found.");
            return Ok(());
        }
        info!(files = files.len(), "resolving syntax trees");

        let results: Vec<Result<FileReport>> = files
            .par_iter()
            .map(|file| resolve_file(file, &context, &severities))
            .collect();

        let mut reports = Vec::with_capacity(results.len());
        let mut failures = 0;
        for result in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    eprintln!("{} {:#}", "error:".red().bold(), e);
                    failures += 1;
                }
            }
        }

        match self.format {
            OutputFormat::Json => println!("{}", JsonFormatter::new().format(&reports)),
            OutputFormat::Pretty => print!("{}", PrettyFormatter::new().format(&reports)),
        }

        let count = |severity: Severity| {
            reports
                .iter()
                .flat_map(|r| &r.diagnostics)
                .filter(|d| d.severity == severity)
                .count()
        };
        let has_errors = failures > 0 || count(Severity::Error) > 0;
        let has_warnings = count(Severity::Warning) > 0 && self.fail_on_warnings;

        if has_errors || has_warnings {
            process::exit(1);
        }

        Ok(())
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env || self.format == OutputFormat::Json {
            colored::control::set_override(false);
        }
    }
}

/// Reads one syntax tree, resolves it and collects its names and diagnostics.
pub fn resolve_file(
    path: &Path,
    context: &TranslationUnitContext,
    severities: &SeverityMap,
) -> Result<FileReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let mut unit = TranslationUnit::from_json(&content, context.clone())
        .with_context(|| format!("Invalid syntax tree in '{}'", path.display()))?;
    let file = path.to_string_lossy().to_string();

    debug!(file = %file, nodes = unit.ast().len(), "resolving translation unit");
    unit.resolve_all();

    let names = name_entries(&mut unit);
    let problems = unit.problems();
    let diagnostics = diagnostics_for(unit.ast(), &problems, severities, &file);

    Ok(FileReport {
        file,
        language: unit.language(),
        names,
        diagnostics,
    })
}

fn name_entries(unit: &mut TranslationUnit) -> Vec<NameEntry> {
    let ids: Vec<NodeId> = unit
        .ast()
        .preorder()
        .iter()
        .copied()
        .filter(|&id| unit.ast().name_text(id).is_some_and(|text| !text.is_empty()))
        .collect();

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(binding) = unit.resolve_binding(id) else {
            continue;
        };
        let (kind, binding_name) = {
            let binding = unit.binding(binding);
            (binding.kind, binding.name.clone())
        };
        let ty = match kind.problem() {
            Some(_) => None,
            None => unit.binding_type(binding).map(|ty| ty.to_string()),
        };
        let (line, column) = unit.ast().location(id).line_column();
        entries.push(NameEntry {
            name: unit.ast().name_text(id).unwrap_or_default().to_string(),
            line,
            column,
            role: unit.name_role(id),
            kind: kind.label(),
            binding: binding_name,
            problem: kind.problem(),
            r#type: ty,
        });
    }
    entries
}

fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_tree_file(path) {
            return Ok(vec![path.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_tree_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    Ok(files)
}

fn is_tree_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TREE_SUFFIX) && name.len() > TREE_SUFFIX.len())
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "target")
        .unwrap_or(false)
}
