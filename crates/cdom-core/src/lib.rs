//! Binding resolution for C and C++ syntax trees
//!
//! A parser hands over a [`ast::Ast`]; a [`TranslationUnit`] resolves every name in it to a
//! [`semantic::Binding`], computes declarator and expression types and reports problems as data.

pub mod ast;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod problems;
pub mod semantic;
pub mod translation_unit;
pub mod types;
pub mod visitor;

pub use ast::{Ast, AstBuilder, AstError, Language, NodeId};
pub use context::TranslationUnitContext;
pub use problems::{Problem, ProblemKind, ProblemOrigin};
pub use semantic::{Binding, BindingId, BindingKind, ExprType, NameRole, ValueCategory};
pub use translation_unit::TranslationUnit;
pub use types::Type;
