//! Syntax tree consumed by the resolver
//!
//! The external parser hands over an untyped skeleton: declarations, declarators, statements
//! and expressions with unbound names. It is built through [`AstBuilder`] or read from a JSON
//! document, then linked (parents, pre-order positions) and validated once.

mod builder;
mod location;
mod nodes;

use serde::{Deserialize, Serialize};

pub use builder::AstBuilder;
pub use location::{FileLocation, ImageKind, ImageLocation, NodeLocation};
pub use nodes::{
    ArrayModifier, BinaryOperator, Declarator, DeclaratorSuffix, FunctionSuffix, LiteralKind,
    NodeCategory, NodeId, NodeKind, PointerOp, SimpleDeclSpecifier, SpecifierCommon,
    StorageClass, TagKind, TypeIdOperator, UnaryOperator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    C,
    Cpp,
}

impl Language {
    pub fn is_cpp(self) -> bool {
        matches!(self, Language::Cpp)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AstError {
    #[error("Invalid AST document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Node {node:?} is referenced but not defined")]
    UnknownNode { node: NodeId },
    #[error("Node {child:?} is a child of both {first:?} and {second:?}")]
    SharedChild {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },
    #[error("Node {node:?} is not reachable from the root")]
    Detached { node: NodeId },
    #[error("Child {child:?} of {parent:?} should be a {expected}, found a {found}")]
    UnexpectedChild {
        parent: NodeId,
        child: NodeId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Declarator {declarator:?} has no name")]
    DeclaratorWithoutName { declarator: NodeId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub location: NodeLocation,
    #[serde(skip)]
    parent: Option<NodeId>,
    #[serde(skip)]
    order: u32,
    #[serde(skip)]
    subtree_end: u32,
}

/// On-disk form of a tree: the node arena and its root.
#[derive(Debug, Serialize, Deserialize)]
struct AstDocument {
    #[serde(default)]
    language: Language,
    root: NodeId,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Ast {
    language: Language,
    root: NodeId,
    nodes: Vec<Node>,
    preorder: Vec<NodeId>,
}

impl Ast {
    pub(crate) fn link(
        language: Language,
        root: NodeId,
        nodes: Vec<(NodeKind, NodeLocation)>,
    ) -> Result<Self, AstError> {
        let nodes = nodes
            .into_iter()
            .map(|(kind, location)| Node {
                kind,
                location,
                parent: None,
                order: u32::MAX,
                subtree_end: u32::MAX,
            })
            .collect();
        let mut ast = Ast {
            language,
            root,
            nodes,
            preorder: Vec::new(),
        };
        ast.assign_structure()?;
        ast.validate()?;
        Ok(ast)
    }

    pub fn from_json(json: &str) -> Result<Self, AstError> {
        let document: AstDocument = serde_json::from_str(json)?;
        let nodes = document
            .nodes
            .into_iter()
            .map(|n| (n.kind, n.location))
            .collect();
        Self::link(document.language, document.root, nodes)
    }

    pub fn to_json(&self) -> Result<String, AstError> {
        let document = AstDocument {
            language: self.language,
            root: self.root,
            nodes: self.nodes.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn assign_structure(&mut self) -> Result<(), AstError> {
        if self.root.index() >= self.nodes.len() {
            return Err(AstError::UnknownNode { node: self.root });
        }

        // Iterative pre-order walk; the second stack entry closes the subtree.
        let mut stack = vec![(self.root, false)];
        let mut counter = 0u32;
        while let Some((id, closing)) = stack.pop() {
            if closing {
                self.nodes[id.index()].subtree_end = counter.saturating_sub(1);
                continue;
            }
            self.nodes[id.index()].order = counter;
            self.preorder.push(id);
            counter += 1;
            stack.push((id, true));

            let children = self.nodes[id.index()].kind.children();
            for &child in children.iter().rev() {
                let Some(node) = self.nodes.get(child.index()) else {
                    return Err(AstError::UnknownNode { node: child });
                };
                if let Some(first) = node.parent {
                    return Err(AstError::SharedChild {
                        child,
                        first,
                        second: id,
                    });
                }
                if child == self.root {
                    return Err(AstError::SharedChild {
                        child,
                        first: id,
                        second: id,
                    });
                }
                self.nodes[child.index()].parent = Some(id);
                stack.push((child, false));
            }
        }

        if let Some(index) = self.nodes.iter().position(|n| n.order == u32::MAX) {
            return Err(AstError::Detached {
                node: NodeId(index as u32),
            });
        }
        Ok(())
    }

    /// Checks that structurally required children have the right kind.
    pub fn validate(&self) -> Result<(), AstError> {
        for &id in &self.preorder {
            match self.kind(id) {
                NodeKind::SimpleDeclaration {
                    specifier,
                    declarators,
                } => {
                    self.expect(id, *specifier, NodeCategory::DeclSpecifier, "decl-specifier")?;
                    for &d in declarators {
                        self.expect(id, d, NodeCategory::Declarator, "declarator")?;
                        if self.innermost_name(d).is_none() {
                            return Err(AstError::DeclaratorWithoutName { declarator: d });
                        }
                    }
                }
                NodeKind::FunctionDefinition {
                    specifier,
                    declarator,
                    body,
                } => {
                    self.expect(id, *specifier, NodeCategory::DeclSpecifier, "decl-specifier")?;
                    self.expect(id, *declarator, NodeCategory::Declarator, "declarator")?;
                    if self.innermost_name(*declarator).is_none() {
                        return Err(AstError::DeclaratorWithoutName {
                            declarator: *declarator,
                        });
                    }
                    if !matches!(self.kind(*body), NodeKind::CompoundStatement { .. }) {
                        return Err(self.unexpected(id, *body, "compound-statement"));
                    }
                }
                NodeKind::ParameterDeclaration {
                    specifier,
                    declarator,
                }
                | NodeKind::TypeId {
                    specifier,
                    declarator,
                } => {
                    self.expect(id, *specifier, NodeCategory::DeclSpecifier, "decl-specifier")?;
                    self.expect(id, *declarator, NodeCategory::Declarator, "declarator")?;
                }
                NodeKind::Declarator(d) => {
                    if let Some(nested) = d.nested {
                        self.expect(id, nested, NodeCategory::Declarator, "declarator")?;
                    }
                    if let DeclaratorSuffix::Function(f) = &d.suffix {
                        for &p in &f.parameters {
                            self.expect(id, p, NodeCategory::Parameter, "parameter-declaration")?;
                        }
                    }
                }
                NodeKind::ProblemDeclaration { problem }
                | NodeKind::ProblemStatement { problem }
                | NodeKind::ProblemExpression { problem } => {
                    self.expect(id, *problem, NodeCategory::Problem, "problem")?;
                }
                _ => {}
            }

            if let Some(name) = self.name_child(id) {
                self.expect(id, name, NodeCategory::Name, "name")?;
            }
        }
        Ok(())
    }

    fn name_child(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::NamespaceDefinition { name, .. }
            | NodeKind::UsingDirective { name }
            | NodeKind::NamedTypeSpecifier { name, .. }
            | NodeKind::ElaboratedTypeSpecifier { name, .. }
            | NodeKind::CompositeTypeSpecifier { name, .. }
            | NodeKind::EnumerationSpecifier { name, .. }
            | NodeKind::Enumerator { name, .. }
            | NodeKind::BaseSpecifier { name }
            | NodeKind::FieldDesignator { name }
            | NodeKind::LabelStatement { name, .. }
            | NodeKind::GotoStatement { name }
            | NodeKind::IdExpression { name }
            | NodeKind::FieldReference { name, .. } => Some(*name),
            NodeKind::Declarator(d) => d.name,
            _ => None,
        }
    }

    fn expect(
        &self,
        parent: NodeId,
        child: NodeId,
        category: NodeCategory,
        expected: &'static str,
    ) -> Result<(), AstError> {
        if self.kind(child).category() == category {
            Ok(())
        } else {
            Err(self.unexpected(parent, child, expected))
        }
    }

    fn unexpected(&self, parent: NodeId, child: NodeId, expected: &'static str) -> AstError {
        AstError::UnexpectedChild {
            parent,
            child,
            expected,
            found: self.kind(child).label(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn location(&self, id: NodeId) -> &NodeLocation {
        &self.nodes[id.index()].location
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Pre-order position of the node; earlier in source means smaller.
    pub fn order(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].order
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// All nodes in pre-order.
    pub fn preorder(&self) -> &[NodeId] {
        &self.preorder
    }

    /// Nodes of the subtree rooted at `id`, in pre-order.
    pub fn subtree(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        &self.preorder[node.order as usize..=node.subtree_end as usize]
    }

    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let outer = self.node(ancestor);
        let order = self.order(node);
        outer.order <= order && order <= outer.subtree_end
    }

    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            current: self.parent(id),
        }
    }

    pub fn name_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Name { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_name(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Name { .. })
    }

    /// Name node at the core of a declarator, following nested declarators.
    pub fn innermost_name(&self, declarator: NodeId) -> Option<NodeId> {
        let mut current = declarator;
        loop {
            match self.kind(current) {
                NodeKind::Declarator(d) => match (d.name, d.nested) {
                    (Some(name), _) => return Some(name),
                    (None, Some(nested)) => current = nested,
                    (None, None) => return None,
                },
                _ => return None,
            }
        }
    }

    /// Text of the node as far as the skeleton records it.
    pub fn raw_text(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Name { text } => text.clone(),
            NodeKind::Problem { raw_signature, .. } => raw_signature.clone(),
            NodeKind::LiteralExpression { value, .. } => value.clone(),
            _ => self
                .subtree(id)
                .iter()
                .filter_map(|&n| match self.kind(n) {
                    NodeKind::Name { text } if !text.is_empty() => Some(text.as_str()),
                    NodeKind::LiteralExpression { value, .. } => Some(value.as_str()),
                    NodeKind::Problem { raw_signature, .. } => Some(raw_signature.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.ast.parent(id);
        Some(id)
    }
}
