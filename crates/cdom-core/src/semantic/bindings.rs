//! Binding table
//!
//! A binding is the semantic entity a name denotes. Bindings are allocated in an arena owned by
//! the translation unit and are never removed during a resolution pass; name nodes and scope
//! tables refer to them by [`BindingId`].

use id_arena::{Arena, Id};

use super::scope::ScopeId;
use crate::ast::NodeId;
use crate::problems::ProblemKind;
use crate::types::{CompositeKind, Type};

pub type BindingId = Id<Binding>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionInfo {
    /// Implicit external declaration of an undeclared C callee.
    pub implicit: bool,
    /// Composite the function is a member of.
    pub owner: Option<BindingId>,
    pub constructor: bool,
    pub explicit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Variable,
    Parameter,
    Function(FunctionInfo),
    Field { owner: BindingId },
    Label,
    Enumeration,
    Enumerator { enumeration: Option<BindingId> },
    Composite(CompositeKind),
    Typedef,
    Namespace,
    Problem { kind: ProblemKind, node: NodeId },
}

impl BindingKind {
    pub fn label(&self) -> &'static str {
        match self {
            BindingKind::Variable => "variable",
            BindingKind::Parameter => "parameter",
            BindingKind::Function(_) => "function",
            BindingKind::Field { .. } => "field",
            BindingKind::Label => "label",
            BindingKind::Enumeration => "enumeration",
            BindingKind::Enumerator { .. } => "enumerator",
            BindingKind::Composite(CompositeKind::Struct) => "struct",
            BindingKind::Composite(CompositeKind::Union) => "union",
            BindingKind::Composite(CompositeKind::Class) => "class",
            BindingKind::Typedef => "typedef",
            BindingKind::Namespace => "namespace",
            BindingKind::Problem { .. } => "problem",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, BindingKind::Function(_))
    }

    /// Bindings usable as the type in a declaration.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            BindingKind::Typedef | BindingKind::Composite(_) | BindingKind::Enumeration
        )
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, BindingKind::Problem { .. })
    }

    pub fn problem(&self) -> Option<ProblemKind> {
        match self {
            BindingKind::Problem { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    /// Scope the binding was declared in; `None` for problem bindings.
    pub scope: Option<ScopeId>,
    /// Declaring name nodes, in the order they were reconciled.
    pub declarations: Vec<NodeId>,
    /// Name node of the defining declaration.
    pub definition: Option<NodeId>,
    pub(crate) ty: Option<Type>,
}

impl Binding {
    pub fn new(id: BindingId, name: &str, kind: BindingKind, scope: Option<ScopeId>) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            scope,
            declarations: Vec::new(),
            definition: None,
            ty: None,
        }
    }

    pub fn is_problem(&self) -> bool {
        self.kind.is_problem()
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self.kind, BindingKind::Function(info) if info.implicit)
    }

    /// Type computed so far, if any.
    pub fn cached_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    pub(crate) fn add_declaration(&mut self, name: NodeId) {
        if !self.declarations.contains(&name) {
            self.declarations.push(name);
        }
    }
}

pub struct BindingTable {
    arena: Arena<Binding>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn alloc(&mut self, name: &str, kind: BindingKind, scope: Option<ScopeId>) -> BindingId {
        self.arena
            .alloc_with_id(|id| Binding::new(id, name, kind, scope))
    }

    pub fn problem(&mut self, kind: ProblemKind, node: NodeId, text: &str) -> BindingId {
        self.alloc(text, BindingKind::Problem { kind, node }, None)
    }

    pub fn get(&self, id: BindingId) -> &Binding {
        &self.arena[id]
    }

    pub fn get_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.arena.iter().map(|(_, b)| b)
    }

    /// Drops every lazily computed binding type.
    pub fn clear_types(&mut self) {
        for (_, binding) in self.arena.iter_mut() {
            binding.ty = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_bindings_carry_kind_and_node() {
        let mut table = BindingTable::new();
        let id = table.problem(ProblemKind::NameNotFound, NodeId(3), "y");

        let binding = table.get(id);
        assert!(binding.is_problem());
        assert_eq!(binding.kind.problem(), Some(ProblemKind::NameNotFound));
        assert_eq!(binding.name, "y");
        assert!(binding.scope.is_none());
    }

    #[test]
    fn add_declaration_ignores_duplicates() {
        let mut table = BindingTable::new();
        let id = table.alloc("x", BindingKind::Variable, None);
        table.get_mut(id).add_declaration(NodeId(1));
        table.get_mut(id).add_declaration(NodeId(1));
        table.get_mut(id).add_declaration(NodeId(4));

        assert_eq!(table.get(id).declarations, vec![NodeId(1), NodeId(4)]);
    }

    #[test]
    fn clear_types_drops_cached_types() {
        let mut table = BindingTable::new();
        let id = table.alloc("x", BindingKind::Variable, None);
        table.get_mut(id).ty = Some(Type::int());
        table.clear_types();
        assert!(table.get(id).cached_type().is_none());
    }

    #[test]
    fn type_bindings_are_flagged() {
        assert!(BindingKind::Typedef.is_type());
        assert!(BindingKind::Composite(CompositeKind::Struct).is_type());
        assert!(!BindingKind::Variable.is_type());
        assert!(BindingKind::Function(FunctionInfo::default()).is_function());
    }
}
