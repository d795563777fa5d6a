//! Signature rendering
//!
//! Types render postfix, innermost first: a pointer to a function taking `int` and returning
//! `int` is `int (int) *`, a function taking `int` and returning a pointer to an array of `int`
//! is `int [] * (int)`.

use super::{BasicKind, BasicType, Type};

#[derive(Debug, Clone, Copy)]
pub struct TypeRenderer {
    expand_typedefs: bool,
}

impl TypeRenderer {
    /// Renders typedefs through to their aliased type.
    pub fn expanded() -> Self {
        Self {
            expand_typedefs: true,
        }
    }

    /// Renders typedefs by name.
    pub fn declared() -> Self {
        Self {
            expand_typedefs: false,
        }
    }

    pub fn render(&self, ty: &Type) -> String {
        match ty {
            Type::Basic(basic) => render_basic(basic),
            Type::Pointer(p) => {
                let mut out = format!("{} *", self.render(&p.target));
                if !p.qualifiers.is_empty() {
                    out.push(' ');
                    out.push_str(&p.qualifiers.to_string());
                }
                out
            }
            Type::Array(a) => format!("{} []", self.render(&a.element)),
            Type::Qualified(q) => {
                let inner = if self.expand_typedefs {
                    q.inner.strip_typedefs()
                } else {
                    &q.inner
                };
                if matches!(inner, Type::Pointer(_)) {
                    format!("{} {}", self.render(inner), q.qualifiers)
                } else {
                    format!("{} {}", q.qualifiers, self.render(inner))
                }
            }
            Type::Function(f) => {
                let mut params: Vec<String> = f.parameters.iter().map(|p| self.render(p)).collect();
                if f.variadic {
                    params.push("...".to_string());
                }
                let mut out = format!("{} ({})", self.render(&f.return_type), params.join(", "));
                if !f.qualifiers.is_empty() {
                    out.push(' ');
                    out.push_str(&f.qualifiers.to_string());
                }
                out
            }
            Type::Composite(c) => {
                if c.name.is_empty() {
                    format!("{} {{anonymous}}", c.kind.keyword())
                } else {
                    format!("{} {}", c.kind.keyword(), c.name)
                }
            }
            Type::Enumeration(e) => {
                if e.name.is_empty() {
                    "enum {anonymous}".to_string()
                } else {
                    format!("enum {}", e.name)
                }
            }
            Type::Typedef(t) => {
                if self.expand_typedefs {
                    self.render(&t.aliased)
                } else {
                    t.name.clone()
                }
            }
            Type::Reference(r) => {
                let op = if r.rvalue { "&&" } else { "&" };
                format!("{} {}", self.render(&r.target), op)
            }
            Type::Problem(_) => "?".to_string(),
        }
    }
}

fn render_basic(basic: &BasicType) -> String {
    let keyword = match basic.kind {
        BasicKind::Unspecified => "int",
        BasicKind::Void => "void",
        BasicKind::Char => "char",
        BasicKind::WChar => "wchar_t",
        BasicKind::Int => "int",
        BasicKind::Float => "float",
        BasicKind::Double => "double",
        BasicKind::Bool => "bool",
    };
    if basic.modifiers.is_empty() {
        keyword.to_string()
    } else {
        format!("{} {}", basic.modifiers, keyword)
    }
}
