//! Visitor context providing tree and location information during traversal.

use crate::ast::{Ast, NodeId, NodeKind};

pub struct VisitorContext<'a> {
    ast: &'a Ast,
}

impl<'a> VisitorContext<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn kind(&self, node: NodeId) -> &'a NodeKind {
        self.ast.kind(node)
    }

    pub fn line_column(&self, node: NodeId) -> (u32, u32) {
        self.ast.location(node).line_column()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.ast.raw_text(node)
    }
}
