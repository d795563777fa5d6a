//! Read-only queries over a resolved translation unit.

use std::ops::ControlFlow;

use super::SemanticModel;
use super::bindings::{BindingId, BindingKind};
use super::resolver::Resolver;
use super::roles::{NameRole, classify};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::problems::{Problem, ProblemOrigin};
use crate::visitor::{AstVisitor, NameCollector, VisitResult, VisitorContext, Walk, walk_ast};

/// Names with the given role whose cached binding is `binding`, in pre-order.
pub(crate) fn names_bound_to(
    ast: &Ast,
    model: &SemanticModel,
    binding: BindingId,
    role: NameRole,
) -> Vec<NodeId> {
    let mut collector =
        NameCollector::new(|name| model.cached(name) == Some(binding) && classify(ast, name).role() == role);
    let flow = walk_ast(ast, &mut collector);
    debug_assert!(flow.is_continue(), "name collection walks the whole tree");
    collector.names
}

struct ProblemCollector<'m> {
    model: &'m SemanticModel,
    problems: Vec<Problem>,
}

impl AstVisitor for ProblemCollector<'_> {
    fn visit_problem(&mut self, node: NodeId, ctx: &VisitorContext) -> VisitResult {
        if let NodeKind::Problem {
            problem,
            raw_signature,
        } = ctx.kind(node)
        {
            self.problems.push(Problem {
                kind: *problem,
                origin: ProblemOrigin::Syntax,
                node,
                raw_text: raw_signature.clone(),
            });
        }
        ControlFlow::Continue(Walk::Children)
    }

    fn visit_name(&mut self, node: NodeId, ctx: &VisitorContext) -> VisitResult {
        let problem = self
            .model
            .cached(node)
            .and_then(|binding| self.model.bindings.get(binding).kind.problem());
        if let Some(kind) = problem {
            self.problems.push(Problem {
                kind,
                origin: ProblemOrigin::Binding,
                node,
                raw_text: ctx.text(node),
            });
        }
        ControlFlow::Continue(Walk::Children)
    }
}

/// Syntax problems and problem bindings of resolved names, in source order.
pub(crate) fn problems(ast: &Ast, model: &SemanticModel) -> Vec<Problem> {
    let mut collector = ProblemCollector {
        model,
        problems: Vec::new(),
    };
    let flow = walk_ast(ast, &mut collector);
    debug_assert!(flow.is_continue(), "problem collection walks the whole tree");
    collector.problems
}

impl Resolver<'_> {
    /// Enumerators of an enumeration, in declaration order.
    pub(crate) fn enumerators(&mut self, enumeration: BindingId) -> Vec<BindingId> {
        let Some(definition) = self.definition_node(enumeration) else {
            return Vec::new();
        };
        let ast = self.ast;
        let NodeKind::EnumerationSpecifier { enumerators, .. } = ast.kind(definition) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for &enumerator in enumerators {
            let NodeKind::Enumerator { name, .. } = ast.kind(enumerator) else {
                continue;
            };
            let binding = self.resolve(*name);
            if matches!(self.kind_of(binding), BindingKind::Enumerator { .. }) {
                found.push(binding);
            }
        }
        found
    }
}
