//! Problem taxonomy
//!
//! Every resolution failure and every unparseable region handed over by the parser is carried
//! as data: a [`ProblemKind`] with a stable numeric code plus the raw text involved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemKind {
    NameNotFound,
    AmbiguousLookup,
    InvalidType,
    CircularInheritance,
    InvalidOverload,
    InvalidRedeclaration,
    InvalidRedefinition,
    LabelNotFound,
    InvalidUsing,
    RecursionInLookup,
    MemberNotFound,
    InvalidTemplateArguments,
    AmbiguousCall,
    NoViableOverload,
    SyntaxError,
    UnbalancedInput,
}

/// Static description of a problem kind, used by `explain` and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemInfo {
    pub code: u32,
    pub name: &'static str,
    pub summary: &'static str,
    pub example: &'static str,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 16] = [
        ProblemKind::NameNotFound,
        ProblemKind::AmbiguousLookup,
        ProblemKind::InvalidType,
        ProblemKind::CircularInheritance,
        ProblemKind::InvalidOverload,
        ProblemKind::InvalidRedeclaration,
        ProblemKind::InvalidRedefinition,
        ProblemKind::LabelNotFound,
        ProblemKind::InvalidUsing,
        ProblemKind::RecursionInLookup,
        ProblemKind::MemberNotFound,
        ProblemKind::InvalidTemplateArguments,
        ProblemKind::AmbiguousCall,
        ProblemKind::NoViableOverload,
        ProblemKind::SyntaxError,
        ProblemKind::UnbalancedInput,
    ];

    pub fn info(self) -> ProblemInfo {
        let (code, name, summary, example) = match self {
            ProblemKind::NameNotFound => (
                0x01,
                "name-not-found",
                "No declaration of the name is visible at this point",
                "void f() { y = 1; }",
            ),
            ProblemKind::AmbiguousLookup => (
                0x02,
                "ambiguous-lookup",
                "Several non-overloadable declarations are visible with this name",
                "namespace a { int x; } namespace b { int x; }\nusing namespace a; using namespace b;\nint y = x;",
            ),
            ProblemKind::InvalidType => (
                0x03,
                "invalid-type",
                "The name is used as a type but does not denote one, or names the wrong kind of tag",
                "int t; t x;",
            ),
            ProblemKind::CircularInheritance => (
                0x04,
                "circular-inheritance",
                "A class derives from itself through its base classes",
                "struct A : A {};",
            ),
            ProblemKind::InvalidOverload => (
                0x05,
                "invalid-overload",
                "A function is declared with a name already used by a non-function",
                "char foo; void foo() {}",
            ),
            ProblemKind::InvalidRedeclaration => (
                0x06,
                "invalid-redeclaration",
                "The name is already declared in this scope as something incompatible",
                "void f() { int x; int x; }",
            ),
            ProblemKind::InvalidRedefinition => (
                0x07,
                "invalid-redefinition",
                "The entity already has a definition in this scope",
                "struct A { int x; }; struct A { int y; };",
            ),
            ProblemKind::LabelNotFound => (
                0x08,
                "label-not-found",
                "A goto names a label that is not defined in the enclosing function",
                "void f() { goto end; }",
            ),
            ProblemKind::InvalidUsing => (
                0x09,
                "invalid-using",
                "A using-directive does not name a namespace",
                "int n; using namespace n;",
            ),
            ProblemKind::RecursionInLookup => (
                0x0A,
                "recursion-in-lookup",
                "Resolving the name requires resolving the name itself",
                "",
            ),
            ProblemKind::MemberNotFound => (
                0x0B,
                "member-not-found",
                "The owner type has no member with this name, or is incomplete",
                "struct s { int a; } v; int y = v.b;",
            ),
            ProblemKind::InvalidTemplateArguments => (
                0x0C,
                "invalid-template-arguments",
                "Template arguments could not be parsed",
                "",
            ),
            ProblemKind::AmbiguousCall => (
                0x0D,
                "ambiguous-call",
                "Several overloads match the call equally well",
                "void f(long); void f(double); void g() { f(1); }",
            ),
            ProblemKind::NoViableOverload => (
                0x0E,
                "no-viable-overload",
                "No overload accepts the call's arguments",
                "void f(int &); void g() { f(5); }",
            ),
            ProblemKind::SyntaxError => (
                0x20,
                "syntax-error",
                "The parser could not make sense of this input",
                "int x = ;",
            ),
            ProblemKind::UnbalancedInput => (
                0x21,
                "unbalanced-input",
                "Input ended inside an unterminated construct",
                "void f() {",
            ),
        };
        ProblemInfo {
            code,
            name,
            summary,
            example,
        }
    }

    pub fn code(self) -> u32 {
        self.info().code
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn from_name(name: &str) -> Option<ProblemKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn from_code(code: u32) -> Option<ProblemKind> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Problems reported by the parser rather than by binding resolution.
    pub fn is_syntax(self) -> bool {
        matches!(
            self,
            ProblemKind::SyntaxError
                | ProblemKind::UnbalancedInput
                | ProblemKind::InvalidTemplateArguments
        )
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemOrigin {
    Syntax,
    Binding,
}

/// A problem found in a translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub origin: ProblemOrigin,
    /// Problem node or name node the problem is attached to.
    pub node: NodeId,
    pub raw_text: String,
}

impl Problem {
    pub fn message(&self) -> String {
        match self.origin {
            ProblemOrigin::Binding => format!("{}: '{}'", self.kind.info().summary, self.raw_text),
            ProblemOrigin::Syntax if self.raw_text.is_empty() => self.kind.info().summary.to_string(),
            ProblemOrigin::Syntax => format!("{}: '{}'", self.kind.info().summary, self.raw_text),
        }
    }
}
