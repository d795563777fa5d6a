//! CLI command implementations

pub mod explain;
pub mod resolve;

pub use explain::ExplainArgs;
pub use resolve::ResolveArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every name in one or more *.ast.json syntax trees
    Resolve(ResolveArgs),

    /// Show a detailed explanation for a problem code or name
    Explain(ExplainArgs),
}
