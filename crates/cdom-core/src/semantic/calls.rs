//! Call sites: overload selection against resolved candidates.

use tracing::debug;

use super::bindings::{BindingId, BindingKind};
use super::expressions::ExprType;
use super::overload::{Candidate, ClassRelations, Selection, candidate_costs, select_best};
use super::resolver::Resolver;
use super::roles::{function_declarator, top_declarator};
use super::scope::NamespaceKind;
use crate::ast::{NodeId, NodeKind};
use crate::problems::ProblemKind;
use crate::types::{Type, TypeQualifiers};

impl Resolver<'_> {
    /// Picks the overload of `candidates` that best matches the call arguments. `object` holds
    /// the qualifiers of the implied object argument of a member call.
    pub(crate) fn select_overload(
        &mut self,
        name: NodeId,
        candidates: &[BindingId],
        arguments: &[NodeId],
        object: Option<TypeQualifiers>,
    ) -> BindingId {
        let argument_types: Vec<ExprType> = arguments
            .iter()
            .map(|&argument| self.expression_type(argument))
            .collect();

        let mut costs = Vec::with_capacity(candidates.len());
        for &binding in candidates {
            let function = self
                .binding_type(binding)
                .and_then(|ty| ty.as_function().cloned());
            let Some(function) = function else {
                costs.push(None);
                continue;
            };
            let defaults = self.default_arguments(binding);
            let required = function.call_parameters().len().saturating_sub(defaults);
            let mut candidate = Candidate::from_function(&function, Some(required));
            if matches!(self.kind_of(binding), BindingKind::Function(info) if info.owner.is_some()) {
                candidate.object_qualifiers = Some(function.qualifiers);
            }
            costs.push(candidate_costs(&candidate, &argument_types, object, self));
        }

        let selection = select_best(&costs);
        debug!(
            name = %self.text(name),
            candidates = candidates.len(),
            viable = costs.iter().filter(|c| c.is_some()).count(),
            ?selection,
            "overload resolution"
        );
        match selection {
            Selection::Best(index) => candidates[index],
            Selection::Ambiguous => self.problem(ProblemKind::AmbiguousCall, name),
            Selection::NoViable => self.problem(ProblemKind::NoViableOverload, name),
        }
    }

    /// Number of trailing parameters with default arguments, across every declaration of a
    /// function.
    pub(crate) fn default_arguments(&self, function: BindingId) -> usize {
        let ast = self.ast;
        self.model
            .bindings
            .get(function)
            .declarations
            .iter()
            .filter_map(|&name| {
                let declarator = ast.parent(name)?;
                let declarator = function_declarator(ast, top_declarator(ast, declarator))?;
                let NodeKind::Declarator(d) = ast.kind(declarator) else {
                    return None;
                };
                let suffix = d.function_suffix()?;
                Some(
                    suffix
                        .parameters
                        .iter()
                        .rev()
                        .take_while(|&&p| has_default(ast, p))
                        .count(),
                )
            })
            .max()
            .unwrap_or(0)
    }
}

fn has_default(ast: &crate::ast::Ast, parameter: NodeId) -> bool {
    match ast.kind(parameter) {
        NodeKind::ParameterDeclaration { declarator, .. } => {
            matches!(ast.kind(*declarator), NodeKind::Declarator(d) if d.initializer.is_some())
        }
        _ => false,
    }
}

impl ClassRelations for Resolver<'_> {
    fn is_base_of(&mut self, base: BindingId, derived: BindingId) -> bool {
        base != derived && self.derives_from(derived, base)
    }

    fn converting_constructors(&mut self, class: BindingId) -> Vec<Type> {
        let Some(definition) = self.definition_node(class) else {
            return Vec::new();
        };
        let scope = self.scope_for(definition);
        self.ensure_populated(scope);
        let name = self.model.bindings.get(class).name.clone();
        let constructors: Vec<BindingId> = self
            .model
            .scopes
            .get(scope)
            .entries(NamespaceKind::Ordinary, &name)
            .iter()
            .map(|entry| entry.binding)
            .collect();

        let mut parameters = Vec::new();
        for constructor in constructors {
            let BindingKind::Function(info) = self.kind_of(constructor) else {
                continue;
            };
            if !info.constructor || info.explicit {
                continue;
            }
            let Some(function) = self
                .binding_type(constructor)
                .and_then(|ty| ty.as_function().cloned())
            else {
                continue;
            };
            let defaults = self.default_arguments(constructor);
            match function.call_parameters() {
                [first, rest @ ..] if rest.len() <= defaults => parameters.push(first.clone()),
                _ => {}
            }
        }
        parameters
    }
}
