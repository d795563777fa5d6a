//! Translation unit facade
//!
//! Owns the tree, its context and everything resolution computes for it. All consumer queries
//! go through here; each one runs the resolver on demand and caches what it finds.

use tracing::debug;

use crate::ast::{Ast, AstError, Language, NodeCategory, NodeId};
use crate::context::{MacroDefinition, TranslationUnitContext};
use crate::problems::Problem;
use crate::semantic::{Binding, BindingId, ExprType, NameRole, Resolver, SemanticModel};
use crate::semantic::{queries, roles};
use crate::types::Type;

pub struct TranslationUnit {
    ast: Ast,
    context: TranslationUnitContext,
    model: SemanticModel,
}

impl TranslationUnit {
    pub fn new(ast: Ast) -> Self {
        Self::with_context(ast, TranslationUnitContext::default())
    }

    pub fn with_context(ast: Ast, context: TranslationUnitContext) -> Self {
        Self {
            ast,
            context,
            model: SemanticModel::new(),
        }
    }

    /// Reads a tree from its JSON document.
    pub fn from_json(json: &str, context: TranslationUnitContext) -> Result<Self, AstError> {
        Ok(Self::with_context(Ast::from_json(json)?, context))
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn context(&self) -> &TranslationUnitContext {
        &self.context
    }

    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    /// Language resolution runs in: the context override, else the tree's own.
    pub fn language(&self) -> Language {
        self.context.language.unwrap_or(self.ast.language())
    }

    fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(&self.ast, &self.context, &mut self.model)
    }

    /// Binding of a name node, resolving it on first use. `None` when `name` is not a name.
    pub fn resolve_binding(&mut self, name: NodeId) -> Option<BindingId> {
        if !self.ast.is_name(name) {
            return None;
        }
        Some(self.resolver().resolve(name))
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        self.model.bindings().get(id)
    }

    /// Type of a binding; `None` for labels and namespaces.
    pub fn binding_type(&mut self, id: BindingId) -> Option<Type> {
        self.resolver().binding_type(id)
    }

    /// Type and value category of an expression node.
    pub fn expression_type(&mut self, expression: NodeId) -> Option<ExprType> {
        if self.ast.kind(expression).category() != NodeCategory::Expression {
            return None;
        }
        Some(self.resolver().expression_type(expression))
    }

    pub fn name_role(&self, name: NodeId) -> NameRole {
        roles::classify(&self.ast, name).role()
    }

    /// Resolves every name in the tree, in source order.
    pub fn resolve_all(&mut self) {
        self.resolver().resolve_all();
        debug!(
            bindings = self.model.bindings().len(),
            scopes = self.model.scopes().len(),
            "resolved translation unit"
        );
    }

    /// Declaring name nodes of `binding`, in source order.
    pub fn declarations_in_ast(&mut self, binding: BindingId) -> Vec<NodeId> {
        self.resolve_all();
        queries::names_bound_to(&self.ast, &self.model, binding, NameRole::Declaration)
    }

    /// Referring name nodes of `binding`, in source order.
    pub fn references(&mut self, binding: BindingId) -> Vec<NodeId> {
        self.resolve_all();
        queries::names_bound_to(&self.ast, &self.model, binding, NameRole::Reference)
    }

    /// Syntax problems and binding problems, in source order.
    pub fn problems(&mut self) -> Vec<Problem> {
        self.resolve_all();
        queries::problems(&self.ast, &self.model)
    }

    /// Forgets what was resolved under `node` so it is computed again on the next query.
    pub fn clear_bindings(&mut self, node: NodeId) {
        debug!(node = node.index(), "clearing bindings");
        self.model.clear(&self.ast, node);
    }

    /// Fields of a struct, union or class binding, in declaration order.
    pub fn composite_fields(&mut self, composite: BindingId) -> Vec<BindingId> {
        self.resolver().composite_fields(composite)
    }

    /// Enumerators of an enumeration binding, in declaration order.
    pub fn enumerators(&mut self, enumeration: BindingId) -> Vec<BindingId> {
        self.resolver().enumerators(enumeration)
    }

    /// Macro whose expansion produced `node`, if any.
    pub fn macro_origin(&self, node: NodeId) -> Option<&MacroDefinition> {
        self.context.macro_origin(&self.ast, node)
    }
}
