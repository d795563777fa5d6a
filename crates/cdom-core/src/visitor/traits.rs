//! AstVisitor trait for uniform AST traversal.

use std::ops::ControlFlow;

use super::context::VisitorContext;
use crate::ast::NodeId;

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Children,
    SkipChildren,
}

/// `Break` stops the traversal; `Continue` says whether to descend.
pub type VisitResult = ControlFlow<(), Walk>;

pub trait AstVisitor {
    fn visit_translation_unit(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_declaration(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_decl_specifier(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_declarator(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_parameter(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_type_id(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_initializer(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_statement(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_expression(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_enumerator(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_base_specifier(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_designator(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_name(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_problem(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        ControlFlow::Continue(Walk::Children)
    }

    /// Called after a node's children, for nodes whose children were visited.
    fn leave(&mut self, _node: NodeId, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
