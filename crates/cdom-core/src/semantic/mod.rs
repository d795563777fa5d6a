//! Semantic analysis
//!
//! Scopes, bindings, declarator types, expression types and C++ overload resolution, all built
//! lazily as names are resolved.

mod bindings;
mod calls;
mod declarator;
mod expressions;
mod lookup;
pub mod overload;
pub(crate) mod queries;
mod resolver;
pub(crate) mod roles;
mod scope;

use std::collections::{HashMap, HashSet};

pub use bindings::{Binding, BindingId, BindingKind, BindingTable, FunctionInfo};
pub use expressions::{ExprType, ValueCategory};
pub use roles::NameRole;
pub use scope::{AncestorIter, NamespaceKind, Scope, ScopeEntry, ScopeId, ScopeKind, ScopeTree};

pub(crate) use resolver::Resolver;

use crate::ast::{Ast, NodeId};

/// Everything resolution has computed for one translation unit.
#[derive(Default)]
pub struct SemanticModel {
    pub(crate) scopes: ScopeTree,
    pub(crate) bindings: BindingTable,
    /// Binding cached for each resolved name node.
    pub(crate) names: HashMap<NodeId, BindingId>,
    /// Names currently being resolved, to detect lookups that need themselves.
    pub(crate) resolving: HashSet<NodeId>,
    /// Implicit C function declarations, one per callee name.
    pub(crate) externals: HashMap<String, BindingId>,
    /// Types of expressions already computed.
    pub(crate) expressions: HashMap<NodeId, ExprType>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Binding cached for `name`, without resolving it.
    pub fn cached(&self, name: NodeId) -> Option<BindingId> {
        self.names.get(&name).copied()
    }

    /// Forgets cached bindings of names under `node`, resets scopes opened inside it and drops
    /// every computed binding type.
    pub(crate) fn clear(&mut self, ast: &Ast, node: NodeId) {
        let subtree = ast.subtree(node);
        for id in subtree {
            self.names.remove(id);
        }

        let cleared: Vec<ScopeId> = self
            .scopes
            .iter()
            .filter(|scope| ast.contains(node, scope.node))
            .map(|scope| scope.id)
            .collect();
        for id in cleared {
            if Some(id) == self.scopes.root() {
                self.externals.clear();
            }
            self.scopes.get_mut(id).reset();
        }

        self.resolving.clear();
        self.expressions.clear();
        self.bindings.clear_types();
    }
}
