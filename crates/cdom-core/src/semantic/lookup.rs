//! Name lookup
//!
//! Lookup walks from the scope containing the reference outward and stops at the first scope
//! that yields at least one visible binding. C++ namespaces also search their other
//! definitions and nominated namespaces; C++ class scopes also search their bases.

use std::collections::HashSet;

use tracing::trace;

use super::bindings::{BindingId, BindingKind};
use super::resolver::Resolver;
use super::roles::enclosing_scope_node;
use super::scope::{NamespaceKind, ScopeId, ScopeKind};
use crate::ast::{NodeId, NodeKind};

pub(crate) struct Lookup<'n> {
    pub namespace: NamespaceKind,
    pub name: &'n str,
    /// Position of the reference; `None` ignores declaration order.
    pub at: Option<u32>,
    /// C++ lets a tag name stand alone as a type name.
    pub tag_fallback: bool,
    /// Search namespaces nominated by using-directives.
    pub usings: bool,
}

impl Resolver<'_> {
    /// Ordinary-namespace lookup for the reference `name`.
    pub(crate) fn lookup_ordinary(&mut self, name: NodeId, text: &str) -> Vec<BindingId> {
        let start = self.scope_for(enclosing_scope_node(self.ast, name));
        let cpp = self.is_cpp();
        self.lookup(
            start,
            &Lookup {
                namespace: NamespaceKind::Ordinary,
                name: text,
                at: Some(self.ast.order(name)),
                tag_fallback: cpp,
                usings: cpp,
            },
        )
    }

    pub(crate) fn lookup_tag(&mut self, start: ScopeId, text: &str, at: u32) -> Vec<BindingId> {
        let usings = self.is_cpp();
        self.lookup(
            start,
            &Lookup {
                namespace: NamespaceKind::Tag,
                name: text,
                at: Some(at),
                tag_fallback: false,
                usings,
            },
        )
    }

    pub(crate) fn lookup(&mut self, start: ScopeId, request: &Lookup<'_>) -> Vec<BindingId> {
        let mut current = Some(start);
        while let Some(scope) = current {
            let found = self.lookup_in_scope(scope, request);
            if !found.is_empty() {
                trace!(
                    name = request.name,
                    found = found.len(),
                    scope = ?self.model.scopes.get(scope).kind,
                    "lookup hit"
                );
                return found;
            }
            current = self.model.scopes.get(scope).parent;
        }
        Vec::new()
    }

    fn lookup_in_scope(&mut self, scope: ScopeId, request: &Lookup<'_>) -> Vec<BindingId> {
        self.ensure_populated(scope);
        let kind = self.model.scopes.get(scope).kind;
        let mut found = self.visible_in(scope, request.namespace, request.name, request.at);

        if self.is_cpp() && kind == ScopeKind::Namespace {
            // Positions are unit-wide, so a later reopening stays hidden from earlier code.
            for other in self.namespace_siblings(scope) {
                self.ensure_populated(other);
                found.extend(self.visible_in(other, request.namespace, request.name, request.at));
            }
        }

        if found.is_empty() && kind == ScopeKind::Class {
            let node = self.model.scopes.get(scope).node;
            if let Some(class) = self.composite_binding(node) {
                for base in self.bases(class) {
                    found.extend(self.lookup_member(base, request.name));
                }
            }
        }

        if found.is_empty() && request.tag_fallback && request.namespace == NamespaceKind::Ordinary {
            found = self.visible_in(scope, NamespaceKind::Tag, request.name, request.at);
        }

        if found.is_empty() && request.usings {
            for namespace in self.nominated(scope, request.at) {
                if let Some(target) = self.namespace_scopes(namespace).first().copied() {
                    found.extend(self.lookup_in_scope(
                        target,
                        &Lookup {
                            at: None,
                            usings: false,
                            ..*request
                        },
                    ));
                }
            }
        }

        dedup(&mut found);
        found
    }

    /// Bindings of `scope` visible at `at`, skipping constructors, which are never found by
    /// name.
    fn visible_in(
        &self,
        scope: ScopeId,
        namespace: NamespaceKind,
        text: &str,
        at: Option<u32>,
    ) -> Vec<BindingId> {
        self.model
            .scopes
            .get(scope)
            .visible(namespace, text, at)
            .into_iter()
            .filter(|&b| !matches!(self.kind_of(b), BindingKind::Function(info) if info.constructor))
            .collect()
    }

    /// Scopes of the other definitions of the namespace that `scope` belongs to.
    fn namespace_siblings(&mut self, scope: ScopeId) -> Vec<ScopeId> {
        let node = self.model.scopes.get(scope).node;
        let NodeKind::NamespaceDefinition { name, .. } = self.ast.kind(node) else {
            return Vec::new();
        };
        let binding = self.resolve(*name);
        if self.kind_of(binding) != BindingKind::Namespace {
            return Vec::new();
        }
        self.namespace_scopes(binding)
            .into_iter()
            .filter(|&s| s != scope)
            .collect()
    }

    /// Scopes opened by every definition of a namespace binding.
    fn namespace_scopes(&mut self, namespace: BindingId) -> Vec<ScopeId> {
        let declarations = self.model.bindings.get(namespace).declarations.clone();
        declarations
            .into_iter()
            .filter_map(|name| self.ast.parent(name))
            .map(|definition| self.scope_for(definition))
            .collect()
    }

    /// Namespaces nominated in `scope` by using-directives preceding `at`.
    fn nominated(&mut self, scope: ScopeId, at: Option<u32>) -> Vec<BindingId> {
        let usings = self.model.scopes.get(scope).usings.clone();
        let mut result = Vec::new();
        for using in usings {
            if at.is_some_and(|at| self.ast.order(using) > at) {
                continue;
            }
            let binding = self.resolve(using);
            if self.kind_of(binding) == BindingKind::Namespace {
                result.push(binding);
            }
        }
        result
    }

    /// Members named `text` of a composite, searching its bases when the class itself has
    /// none.
    pub(crate) fn lookup_member(&mut self, composite: BindingId, text: &str) -> Vec<BindingId> {
        let mut visited = HashSet::new();
        self.lookup_member_in(composite, text, &mut visited)
    }

    fn lookup_member_in(
        &mut self,
        composite: BindingId,
        text: &str,
        visited: &mut HashSet<BindingId>,
    ) -> Vec<BindingId> {
        if !visited.insert(composite) {
            return Vec::new();
        }
        let Some(definition) = self.definition_node(composite) else {
            return Vec::new();
        };
        let scope = self.scope_for(definition);
        self.ensure_populated(scope);

        let mut found = self.visible_in(scope, NamespaceKind::Ordinary, text, None);
        if found.is_empty() && self.is_cpp() {
            found = self.visible_in(scope, NamespaceKind::Tag, text, None);
        }
        if found.is_empty() {
            for base in self.bases(composite) {
                found.extend(self.lookup_member_in(base, text, visited));
            }
        }
        dedup(&mut found);
        found
    }
}

fn dedup(found: &mut Vec<BindingId>) {
    let mut seen = HashSet::new();
    found.retain(|b| seen.insert(*b));
}
