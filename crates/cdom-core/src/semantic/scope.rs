//! Scope tree for name tables
//!
//! Scopes mirror the block structure of the translation unit (global, namespace, class,
//! function, function prototype, block). Each scope owns the name tables for ordinary
//! identifiers, tags and labels. Scopes are created lazily by the resolver and keyed by the AST
//! node that opens them.

use std::collections::HashMap;

use id_arena::{Arena, Id};

use super::bindings::BindingId;
use crate::ast::NodeId;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    Function,
    FunctionPrototype,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    Ordinary,
    Tag,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeEntry {
    pub binding: BindingId,
    /// Pre-order position of the first declaration seen for the binding in this scope.
    pub declared_at: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Population {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Node that opens the scope.
    pub node: NodeId,
    tables: HashMap<(NamespaceKind, String), Vec<ScopeEntry>>,
    /// Name nodes of using-directives placed directly in this scope.
    pub(crate) usings: Vec<NodeId>,
    pub(crate) population: Population,
}

impl Scope {
    /// Whether visibility in `namespace` depends on the reference's position.
    pub fn is_position_sensitive(&self, namespace: NamespaceKind) -> bool {
        self.kind != ScopeKind::Class && namespace != NamespaceKind::Label
    }

    pub fn entries(&self, namespace: NamespaceKind, name: &str) -> &[ScopeEntry] {
        self.tables
            .get(&(namespace, name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adds `binding` under `name`. Re-adding an existing binding keeps one entry and lowers
    /// its position when `declared_at` is earlier.
    pub fn insert(
        &mut self,
        namespace: NamespaceKind,
        name: &str,
        binding: BindingId,
        declared_at: u32,
    ) {
        let entries = self.tables.entry((namespace, name.to_string())).or_default();
        match entries.iter_mut().find(|e| e.binding == binding) {
            Some(entry) => entry.declared_at = entry.declared_at.min(declared_at),
            None => entries.push(ScopeEntry {
                binding,
                declared_at,
            }),
        }
    }

    /// Bindings visible at position `at`, or all of them when `at` is `None` or the namespace
    /// is not position-sensitive here.
    pub fn visible(&self, namespace: NamespaceKind, name: &str, at: Option<u32>) -> Vec<BindingId> {
        let sensitive = self.is_position_sensitive(namespace);
        self.entries(namespace, name)
            .iter()
            .filter(|e| match at {
                Some(at) if sensitive => e.declared_at <= at,
                _ => true,
            })
            .map(|e| e.binding)
            .collect()
    }

    pub fn names(&self, namespace: NamespaceKind) -> impl Iterator<Item = &str> {
        self.tables
            .keys()
            .filter(move |(ns, _)| *ns == namespace)
            .map(|(_, name)| name.as_str())
    }

    pub fn is_populated(&self) -> bool {
        self.population == Population::Done
    }

    pub(crate) fn reset(&mut self) {
        self.tables.clear();
        self.usings.clear();
        self.population = Population::NotStarted;
    }
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Option<ScopeId>,
    by_node: HashMap<NodeId, ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            by_node: HashMap::new(),
        }
    }

    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, node: NodeId) -> ScopeId {
        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            node,
            tables: HashMap::new(),
            usings: Vec::new(),
            population: Population::NotStarted,
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        self.by_node.insert(node, id);
        id
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn scope_for_node(&self, node: NodeId) -> Option<ScopeId> {
        self.by_node.get(&node).copied()
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.arena[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.arena[id].parent.map(|p| &self.arena[p])
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.arena[id].children.iter().map(|&c| &self.arena[c])
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    pub fn is_descendant_of(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|s| s.id == ancestor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.arena.iter().map(|(_, s)| s)
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ScopeTree,
    current: Option<ScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}
