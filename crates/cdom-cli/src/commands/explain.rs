//! Explain command - provides detailed explanation of a problem kind

use cdom_core::ProblemKind;
use cdom_core::config::load_config_or_default_with_warnings;
use cdom_core::diagnostic::{Severity, problem_code};
use clap::Args;
use colored::Colorize;
use std::env;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "CODE",
        help = "Problem code or name to explain (e.g., \"E001\", \"name-not-found\")"
    )]
    pub code: String,
}

impl ExplainArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let cwd = env::current_dir()?;
        let severities = load_config_or_default_with_warnings(&cwd).config.severities();

        match find_problem(&self.code) {
            Some(kind) => {
                let info = kind.info();

                println!();
                println!("{}", format!("Problem {}", problem_code(kind)).bold());
                println!();
                println!("  {}: {}", "Name".cyan(), info.name);
                println!("  {}: {}", "Summary".cyan(), info.summary);
                println!(
                    "  {}: {}",
                    "Reported by".cyan(),
                    if kind.is_syntax() { "parser" } else { "binding resolution" }
                );
                println!(
                    "  {}: {}",
                    "Severity".cyan(),
                    format_severity(&severities.severity(kind))
                );
                if !info.example.is_empty() {
                    println!();
                    println!("  {}:", "Example".cyan());
                    for line in info.example.lines() {
                        println!("    {}", line);
                    }
                }
                println!();

                Ok(())
            }
            None => {
                eprintln!(
                    "{} Unknown problem '{}'",
                    "error:".red().bold(),
                    self.code
                );
                eprintln!();
                eprintln!("Available problems:");

                for kind in ProblemKind::ALL {
                    eprintln!("  {} ({})", problem_code(kind), kind.name());
                }

                std::process::exit(1);
            }
        }
    }
}

/// Accepts a code such as `E001`, a bare hexadecimal number or a problem name.
fn find_problem(query: &str) -> Option<ProblemKind> {
    if let Some(kind) = ProblemKind::from_name(query) {
        return Some(kind);
    }
    let normalized = query.to_ascii_uppercase();
    if let Some(kind) = ProblemKind::ALL
        .into_iter()
        .find(|&kind| problem_code(kind) == normalized)
    {
        return Some(kind);
    }
    u32::from_str_radix(&normalized, 16)
        .ok()
        .and_then(ProblemKind::from_code)
}

fn format_severity(severity: &Severity) -> String {
    match severity {
        Severity::Error => "error".red().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".blue().to_string(),
        Severity::Hint => "hint".cyan().to_string(),
    }
}
