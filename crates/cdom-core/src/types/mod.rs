//! Type model for C and C++ declarations
//!
//! Types are immutable values. Aggregates, enumerations and typedefs refer back to the binding
//! that declared them, so member lists stay in the binding table instead of being copied into
//! every type that mentions them.

mod qualifiers;
mod render;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::NodeId;
use crate::problems::ProblemKind;
use crate::semantic::BindingId;

pub use qualifiers::{ArrayQualifiers, BasicModifiers, TypeQualifiers};
pub use render::TypeRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    /// No type keyword, only modifiers (`unsigned x`) or an implicit `int`.
    #[default]
    Unspecified,
    Void,
    Char,
    WChar,
    Int,
    Float,
    Double,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Struct,
    Union,
    Class,
}

impl CompositeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CompositeKind::Struct => "struct",
            CompositeKind::Union => "union",
            CompositeKind::Class => "class",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicType {
    pub kind: BasicKind,
    pub modifiers: BasicModifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerType {
    pub target: Arc<Type>,
    pub qualifiers: TypeQualifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Arc<Type>,
    /// Size expression as written, if any.
    pub size: Option<NodeId>,
    /// Element count when the size is an integer literal.
    pub length: Option<u64>,
    pub qualifiers: ArrayQualifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedType {
    pub qualifiers: TypeQualifiers,
    pub inner: Arc<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_type: Arc<Type>,
    pub parameters: Vec<Type>,
    pub variadic: bool,
    /// cv-qualification of a C++ member function.
    pub qualifiers: TypeQualifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub binding: BindingId,
    pub kind: CompositeKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationType {
    pub binding: BindingId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefType {
    pub binding: BindingId,
    pub name: String,
    pub aliased: Arc<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    pub target: Arc<Type>,
    pub rvalue: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(BasicType),
    Pointer(PointerType),
    Array(ArrayType),
    Qualified(QualifiedType),
    Function(FunctionType),
    Composite(CompositeType),
    Enumeration(EnumerationType),
    Typedef(TypedefType),
    Reference(ReferenceType),
    Problem(ProblemKind),
}

impl Type {
    pub fn basic(kind: BasicKind) -> Self {
        Type::Basic(BasicType {
            kind,
            modifiers: BasicModifiers::empty(),
        })
    }

    pub fn with_modifiers(kind: BasicKind, modifiers: BasicModifiers) -> Self {
        Type::Basic(BasicType { kind, modifiers })
    }

    pub fn int() -> Self {
        Type::basic(BasicKind::Int)
    }

    pub fn void() -> Self {
        Type::basic(BasicKind::Void)
    }

    pub fn pointer_to(target: Type) -> Self {
        Type::Pointer(PointerType {
            target: Arc::new(target),
            qualifiers: TypeQualifiers::empty(),
        })
    }

    pub fn reference_to(target: Type, rvalue: bool) -> Self {
        Type::Reference(ReferenceType {
            target: Arc::new(target),
            rvalue,
        })
    }

    /// Wraps `inner` in a qualified type; empty qualifiers return `inner` unchanged.
    pub fn qualified(inner: Type, qualifiers: TypeQualifiers) -> Self {
        if qualifiers.is_empty() {
            return inner;
        }
        match inner {
            Type::Qualified(q) => Type::Qualified(QualifiedType {
                qualifiers: q.qualifiers | qualifiers,
                inner: q.inner,
            }),
            other => Type::Qualified(QualifiedType {
                qualifiers,
                inner: Arc::new(other),
            }),
        }
    }

    /// Unwraps exactly one typedef level.
    pub fn typedef_target(&self) -> Option<&Type> {
        match self {
            Type::Typedef(t) => Some(&t.aliased),
            _ => None,
        }
    }

    pub fn strip_typedefs(&self) -> &Type {
        let mut current = self;
        while let Type::Typedef(t) = current {
            current = &t.aliased;
        }
        current
    }

    /// Strips typedef and top-level qualification wrappers.
    pub fn canonical(&self) -> &Type {
        let mut current = self;
        loop {
            match current {
                Type::Typedef(t) => current = &t.aliased,
                Type::Qualified(q) => current = &q.inner,
                _ => return current,
            }
        }
    }

    /// Top-level cv-qualifiers, looking through typedefs.
    pub fn qualifiers(&self) -> TypeQualifiers {
        let mut quals = TypeQualifiers::empty();
        let mut current = self;
        loop {
            match current {
                Type::Typedef(t) => current = &t.aliased,
                Type::Qualified(q) => {
                    quals |= q.qualifiers;
                    current = &q.inner;
                }
                Type::Pointer(p) => return quals | p.qualifiers,
                _ => return quals,
            }
        }
    }

    /// Canonical form: no typedefs, merged qualifiers, pointer cv folded into the pointer and
    /// array cv pushed onto the element.
    pub fn normalized(&self) -> Type {
        match self {
            Type::Typedef(t) => t.aliased.normalized(),
            Type::Qualified(q) => q.inner.normalized().add_qualifiers(q.qualifiers),
            Type::Pointer(p) => Type::Pointer(PointerType {
                target: Arc::new(p.target.normalized()),
                qualifiers: p.qualifiers,
            }),
            Type::Array(a) => Type::Array(ArrayType {
                element: Arc::new(a.element.normalized()),
                size: None,
                length: a.length,
                qualifiers: a.qualifiers,
            }),
            Type::Function(f) => Type::Function(FunctionType {
                return_type: Arc::new(f.return_type.normalized()),
                parameters: f.parameters.iter().map(Type::normalized).collect(),
                variadic: f.variadic,
                qualifiers: f.qualifiers,
            }),
            Type::Reference(r) => Type::Reference(ReferenceType {
                target: Arc::new(r.target.normalized()),
                rvalue: r.rvalue,
            }),
            other => other.clone(),
        }
    }

    fn add_qualifiers(self, qualifiers: TypeQualifiers) -> Type {
        if qualifiers.is_empty() {
            return self;
        }
        match self {
            Type::Pointer(mut p) => {
                p.qualifiers |= qualifiers;
                Type::Pointer(p)
            }
            Type::Array(mut a) => {
                let element = (*a.element).clone().add_qualifiers(qualifiers);
                a.element = Arc::new(element);
                Type::Array(a)
            }
            other => Type::qualified(other, qualifiers),
        }
    }

    /// Normalized type with top-level cv-qualifiers removed.
    pub fn unqualified(&self) -> Type {
        match self.normalized() {
            Type::Qualified(q) => (*q.inner).clone(),
            Type::Pointer(mut p) => {
                p.qualifiers = TypeQualifiers::empty();
                Type::Pointer(p)
            }
            other => other,
        }
    }

    pub fn is_same_type(&self, other: &Type) -> bool {
        self.normalized() == other.normalized()
    }

    pub fn is_same_ignoring_cv(&self, other: &Type) -> bool {
        self.unqualified() == other.unqualified()
    }

    pub fn is_problem(&self) -> bool {
        matches!(self.canonical(), Type::Problem(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self.canonical(), Type::Basic(b) if b.kind == BasicKind::Void)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.canonical(), Type::Pointer(_))
    }

    pub fn is_integral(&self) -> bool {
        match self.canonical() {
            Type::Basic(b) => matches!(
                b.kind,
                BasicKind::Unspecified
                    | BasicKind::Char
                    | BasicKind::WChar
                    | BasicKind::Int
                    | BasicKind::Bool
            ),
            Type::Enumeration(_) => true,
            _ => false,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        self.is_integral()
            || matches!(
                self.canonical(),
                Type::Basic(b) if matches!(b.kind, BasicKind::Float | BasicKind::Double)
            )
    }

    /// Target of a pointer, or element of an array.
    pub fn pointee(&self) -> Option<&Type> {
        match self.canonical() {
            Type::Pointer(p) => Some(&p.target),
            Type::Array(a) => Some(&a.element),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeType> {
        match self.canonical() {
            Type::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self.canonical() {
            Type::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Function type reached directly or through a pointer, as seen by a call.
    pub fn callable(&self) -> Option<&FunctionType> {
        match self.canonical() {
            Type::Function(f) => Some(f),
            Type::Pointer(p) => p.target.as_function(),
            Type::Reference(r) => r.target.as_function(),
            _ => None,
        }
    }

    pub fn referenced(&self) -> Option<&ReferenceType> {
        match self.canonical() {
            Type::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Rendering that keeps typedef names.
    pub fn declared_signature(&self) -> String {
        TypeRenderer::declared().render(self)
    }
}

impl FunctionType {
    /// Parameters as seen by a call: a lone `void` parameter means none.
    pub fn call_parameters(&self) -> &[Type] {
        match self.parameters.as_slice() {
            [only] if only.is_void() => &[],
            params => params,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TypeRenderer::expanded().render(self))
    }
}
