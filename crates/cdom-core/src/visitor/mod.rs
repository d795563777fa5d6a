//! Depth-first traversal over the syntax tree.
//!
//! The walker keeps an explicit stack so deeply nested expressions cannot overflow the call
//! stack. Each node is dispatched to the visitor method for its category; the returned
//! [`Walk`] decides whether its children are visited.

mod context;
mod traits;

use std::ops::ControlFlow;

pub use context::VisitorContext;
pub use traits::{AstVisitor, VisitResult, Walk};

use crate::ast::{Ast, NodeCategory, NodeId};

enum Frame {
    Enter(NodeId),
    Leave(NodeId),
}

/// Walks the whole tree in pre-order.
pub fn walk_ast<V: AstVisitor + ?Sized>(ast: &Ast, visitor: &mut V) -> ControlFlow<()> {
    walk_subtree(ast, ast.root(), visitor)
}

/// Walks the subtree rooted at `node` in pre-order.
pub fn walk_subtree<V: AstVisitor + ?Sized>(
    ast: &Ast,
    node: NodeId,
    visitor: &mut V,
) -> ControlFlow<()> {
    let ctx = VisitorContext::new(ast);
    let mut stack = vec![Frame::Enter(node)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if dispatch(visitor, id, &ctx)? == Walk::SkipChildren {
                    continue;
                }
                stack.push(Frame::Leave(id));
                for child in ast.children(id).into_iter().rev() {
                    stack.push(Frame::Enter(child));
                }
            }
            Frame::Leave(id) => visitor.leave(id, &ctx)?,
        }
    }
    ControlFlow::Continue(())
}

fn dispatch<V: AstVisitor + ?Sized>(visitor: &mut V, node: NodeId, ctx: &VisitorContext) -> VisitResult {
    match ctx.kind(node).category() {
        NodeCategory::TranslationUnit => visitor.visit_translation_unit(node, ctx),
        NodeCategory::Declaration => visitor.visit_declaration(node, ctx),
        NodeCategory::DeclSpecifier => visitor.visit_decl_specifier(node, ctx),
        NodeCategory::Declarator => visitor.visit_declarator(node, ctx),
        NodeCategory::Parameter => visitor.visit_parameter(node, ctx),
        NodeCategory::TypeId => visitor.visit_type_id(node, ctx),
        NodeCategory::Initializer => visitor.visit_initializer(node, ctx),
        NodeCategory::Statement => visitor.visit_statement(node, ctx),
        NodeCategory::Expression => visitor.visit_expression(node, ctx),
        NodeCategory::Enumerator => visitor.visit_enumerator(node, ctx),
        NodeCategory::BaseSpecifier => visitor.visit_base_specifier(node, ctx),
        NodeCategory::Designator => visitor.visit_designator(node, ctx),
        NodeCategory::Name => visitor.visit_name(node, ctx),
        NodeCategory::Problem => visitor.visit_problem(node, ctx),
    }
}

/// Collects name nodes in pre-order, optionally filtered.
pub struct NameCollector<F> {
    filter: F,
    pub names: Vec<NodeId>,
}

impl<F: FnMut(NodeId) -> bool> NameCollector<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            names: Vec::new(),
        }
    }
}

impl<F: FnMut(NodeId) -> bool> AstVisitor for NameCollector<F> {
    fn visit_name(&mut self, node: NodeId, _ctx: &VisitorContext) -> VisitResult {
        if (self.filter)(node) {
            self.names.push(node);
        }
        ControlFlow::Continue(Walk::SkipChildren)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Declarator, Language, NodeKind};
    use crate::types::BasicKind;

    fn sample() -> Ast {
        // int a; void f() { a; }
        let mut b = AstBuilder::new(Language::C);
        let spec = b.basic(BasicKind::Int);
        let a = b.variable(spec, "a");
        let use_a = b.id_expression("a");
        let stmt = b.expression_statement(use_a);
        let body = b.compound(vec![stmt]);
        let fname = b.name("f");
        let fdecl = b.declarator(Declarator::named(fname).function(vec![]));
        let void = b.basic(BasicKind::Void);
        let def = b.function_definition(void, fdecl, body);
        let tu = b.translation_unit(vec![a, def]);
        b.finish(tu).unwrap()
    }

    #[test]
    fn names_are_collected_in_source_order() {
        let ast = sample();
        let mut collector = NameCollector::new(|_| true);
        assert!(walk_ast(&ast, &mut collector).is_continue());

        let texts: Vec<&str> = collector
            .names
            .iter()
            .filter_map(|&n| ast.name_text(n))
            .collect();
        assert_eq!(texts, vec!["a", "f", "a"]);
    }

    struct SkipFunctions {
        expressions: usize,
    }

    impl AstVisitor for SkipFunctions {
        fn visit_declaration(&mut self, node: NodeId, ctx: &VisitorContext) -> VisitResult {
            match ctx.kind(node) {
                NodeKind::FunctionDefinition { .. } => ControlFlow::Continue(Walk::SkipChildren),
                _ => ControlFlow::Continue(Walk::Children),
            }
        }

        fn visit_expression(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
            self.expressions += 1;
            ControlFlow::Continue(Walk::Children)
        }
    }

    #[test]
    fn skip_children_prunes_subtree() {
        let ast = sample();
        let mut visitor = SkipFunctions { expressions: 0 };
        assert!(walk_ast(&ast, &mut visitor).is_continue());
        assert_eq!(visitor.expressions, 0);
    }

    struct StopAtFirstName {
        seen: usize,
    }

    impl AstVisitor for StopAtFirstName {
        fn visit_name(&mut self, _node: NodeId, _ctx: &VisitorContext) -> VisitResult {
            self.seen += 1;
            ControlFlow::Break(())
        }
    }

    #[test]
    fn break_stops_traversal() {
        let ast = sample();
        let mut visitor = StopAtFirstName { seen: 0 };
        assert!(walk_ast(&ast, &mut visitor).is_break());
        assert_eq!(visitor.seen, 1);
    }
}
