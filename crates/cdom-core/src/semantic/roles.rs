//! Name roles and scope structure
//!
//! Everything here is derived from the tree shape alone: whether a name declares or refers,
//! which node opens the scope a node lives in, and which declarator of a function definition
//! owns the parameters.

use serde::Serialize;

use super::scope::ScopeKind;
use crate::ast::{Ast, DeclaratorSuffix, NodeId, NodeKind, TagKind};
use crate::types::CompositeKind;

/// Role of a name occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameRole {
    Declaration,
    Reference,
    Neither,
}

/// How a name node is used, with the nodes the resolver needs to act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameUse {
    /// Name of a declarator; `declarator` is the outermost declarator of the chain and `owner`
    /// the declaration, definition, parameter or type-id holding it.
    Declarator { declarator: NodeId, owner: NodeId },
    TagDefinition { specifier: NodeId, tag: TagKind },
    /// `struct A;`
    TagDeclaration { specifier: NodeId, tag: TagKind },
    /// `struct A *p;`
    TagReference { specifier: NodeId, tag: TagKind },
    Enumerator { specifier: NodeId },
    Label,
    Goto,
    Namespace,
    Using,
    TypeName,
    Base { composite: NodeId },
    Identifier { expression: NodeId },
    Member { reference: NodeId },
    Designator { designator: NodeId },
    Other,
}

impl NameUse {
    pub(crate) fn role(self) -> NameRole {
        match self {
            NameUse::Declarator { .. }
            | NameUse::TagDefinition { .. }
            | NameUse::TagDeclaration { .. }
            | NameUse::Enumerator { .. }
            | NameUse::Label
            | NameUse::Namespace => NameRole::Declaration,
            NameUse::TagReference { .. }
            | NameUse::Goto
            | NameUse::Using
            | NameUse::TypeName
            | NameUse::Base { .. }
            | NameUse::Identifier { .. }
            | NameUse::Member { .. }
            | NameUse::Designator { .. } => NameRole::Reference,
            NameUse::Other => NameRole::Neither,
        }
    }
}

pub(crate) fn tag_of(kind: CompositeKind) -> TagKind {
    match kind {
        CompositeKind::Struct => TagKind::Struct,
        CompositeKind::Union => TagKind::Union,
        CompositeKind::Class => TagKind::Class,
    }
}

pub(crate) fn classify(ast: &Ast, name: NodeId) -> NameUse {
    if !ast.is_name(name) {
        return NameUse::Other;
    }
    let Some(parent) = ast.parent(name) else {
        return NameUse::Other;
    };
    match ast.kind(parent) {
        NodeKind::Declarator(_) => {
            let declarator = top_declarator(ast, parent);
            match ast.parent(declarator) {
                Some(owner)
                    if matches!(
                        ast.kind(owner),
                        NodeKind::SimpleDeclaration { .. }
                            | NodeKind::FunctionDefinition { .. }
                            | NodeKind::ParameterDeclaration { .. }
                    ) =>
                {
                    NameUse::Declarator { declarator, owner }
                }
                _ => NameUse::Other,
            }
        }
        NodeKind::CompositeTypeSpecifier { key, .. } => NameUse::TagDefinition {
            specifier: parent,
            tag: tag_of(*key),
        },
        NodeKind::EnumerationSpecifier { .. } => NameUse::TagDefinition {
            specifier: parent,
            tag: TagKind::Enum,
        },
        NodeKind::ElaboratedTypeSpecifier { tag, .. } => {
            let forward = ast.parent(parent).is_some_and(|decl| {
                matches!(
                    ast.kind(decl),
                    NodeKind::SimpleDeclaration { specifier, declarators }
                        if *specifier == parent && declarators.is_empty()
                )
            });
            if forward {
                NameUse::TagDeclaration {
                    specifier: parent,
                    tag: *tag,
                }
            } else {
                NameUse::TagReference {
                    specifier: parent,
                    tag: *tag,
                }
            }
        }
        NodeKind::Enumerator { .. } => match ast.parent(parent) {
            Some(specifier) => NameUse::Enumerator { specifier },
            None => NameUse::Other,
        },
        NodeKind::LabelStatement { .. } => NameUse::Label,
        NodeKind::GotoStatement { .. } => NameUse::Goto,
        NodeKind::NamespaceDefinition { .. } => NameUse::Namespace,
        NodeKind::UsingDirective { .. } => NameUse::Using,
        NodeKind::NamedTypeSpecifier { .. } => NameUse::TypeName,
        NodeKind::BaseSpecifier { .. } => match ast.parent(parent) {
            Some(composite) => NameUse::Base { composite },
            None => NameUse::Other,
        },
        NodeKind::IdExpression { .. } => NameUse::Identifier { expression: parent },
        NodeKind::FieldReference { .. } => NameUse::Member { reference: parent },
        NodeKind::FieldDesignator { .. } => NameUse::Designator { designator: parent },
        _ => NameUse::Other,
    }
}

/// Walks up a chain of nested declarators to the outermost one.
pub(crate) fn top_declarator(ast: &Ast, declarator: NodeId) -> NodeId {
    let mut current = declarator;
    while let Some(parent) = ast.parent(current) {
        match ast.kind(parent) {
            NodeKind::Declarator(d) if d.nested == Some(current) => current = parent,
            _ => break,
        }
    }
    current
}

/// Deepest declarator of a chain that carries a function suffix. For a function definition
/// this is the declarator whose parameters belong to the function body.
pub(crate) fn function_declarator(ast: &Ast, top: NodeId) -> Option<NodeId> {
    let mut found = None;
    let mut current = Some(top);
    while let Some(id) = current {
        let NodeKind::Declarator(d) = ast.kind(id) else {
            break;
        };
        if matches!(d.suffix, DeclaratorSuffix::Function(_)) {
            found = Some(id);
        }
        current = d.nested;
    }
    found
}

/// The function definition whose parameters `declarator` declares, if any.
pub(crate) fn definition_of(ast: &Ast, declarator: NodeId) -> Option<NodeId> {
    let top = top_declarator(ast, declarator);
    let owner = ast.parent(top)?;
    match ast.kind(owner) {
        NodeKind::FunctionDefinition { declarator: d, .. }
            if *d == top && function_declarator(ast, top) == Some(declarator) =>
        {
            Some(owner)
        }
        _ => None,
    }
}

/// Whether the declarator holding a name gives it a function type.
pub(crate) fn declares_function(ast: &Ast, name_declarator: NodeId) -> bool {
    let mut current = name_declarator;
    loop {
        let NodeKind::Declarator(d) = ast.kind(current) else {
            return false;
        };
        match d.suffix {
            DeclaratorSuffix::Function(_) => return true,
            DeclaratorSuffix::Array(_) => return false,
            DeclaratorSuffix::None => {}
        }
        if !d.pointer_ops.is_empty() {
            return false;
        }
        match ast.parent(current) {
            Some(parent)
                if matches!(ast.kind(parent), NodeKind::Declarator(p) if p.nested == Some(current)) =>
            {
                current = parent
            }
            _ => return false,
        }
    }
}

/// Scope node that `parent` opens for its direct child `child`, if any.
pub(crate) fn scope_opened_for(ast: &Ast, parent: NodeId, child: NodeId) -> Option<NodeId> {
    match ast.kind(parent) {
        NodeKind::TranslationUnit { .. } | NodeKind::ForStatement { .. } => Some(parent),
        NodeKind::CompoundStatement { .. } => match ast.parent(parent) {
            Some(owner)
                if matches!(ast.kind(owner), NodeKind::FunctionDefinition { body, .. } if *body == parent) =>
            {
                Some(owner)
            }
            _ => Some(parent),
        },
        NodeKind::NamespaceDefinition { name, .. } => (*name != child).then_some(parent),
        NodeKind::CompositeTypeSpecifier { members, .. } => {
            members.contains(&child).then_some(parent)
        }
        NodeKind::FunctionDefinition { body, .. } => (*body == child).then_some(parent),
        NodeKind::Declarator(d) => match d.function_suffix() {
            Some(f) if f.parameters.contains(&child) => {
                Some(definition_of(ast, parent).unwrap_or(parent))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Node opening the innermost scope that contains `node`.
pub(crate) fn enclosing_scope_node(ast: &Ast, node: NodeId) -> NodeId {
    let mut child = node;
    while let Some(parent) = ast.parent(child) {
        if let Some(scope) = scope_opened_for(ast, parent, child) {
            return scope;
        }
        child = parent;
    }
    ast.root()
}

pub(crate) fn scope_kind_of(ast: &Ast, node: NodeId) -> ScopeKind {
    if node == ast.root() {
        return ScopeKind::Global;
    }
    match ast.kind(node) {
        NodeKind::TranslationUnit { .. } => ScopeKind::Global,
        NodeKind::NamespaceDefinition { .. } => ScopeKind::Namespace,
        NodeKind::CompositeTypeSpecifier { .. } => ScopeKind::Class,
        NodeKind::FunctionDefinition { .. } => ScopeKind::Function,
        NodeKind::Declarator(_) => ScopeKind::FunctionPrototype,
        _ => ScopeKind::Block,
    }
}

/// Whether `node` opens a scope of its own for some of its children.
pub(crate) fn opens_scope(ast: &Ast, node: NodeId) -> bool {
    match ast.kind(node) {
        NodeKind::TranslationUnit { .. }
        | NodeKind::NamespaceDefinition { .. }
        | NodeKind::CompositeTypeSpecifier { .. }
        | NodeKind::FunctionDefinition { .. }
        | NodeKind::ForStatement { .. }
        | NodeKind::CompoundStatement { .. } => true,
        NodeKind::Declarator(d) => d.function_suffix().is_some(),
        _ => false,
    }
}

pub(crate) fn enclosing_function(ast: &Ast, node: NodeId) -> Option<NodeId> {
    ast.ancestors(node)
        .find(|&a| matches!(ast.kind(a), NodeKind::FunctionDefinition { .. }))
}

/// Composite whose member list holds `declaration`.
pub(crate) fn member_of(ast: &Ast, declaration: NodeId) -> Option<NodeId> {
    let parent = ast.parent(declaration)?;
    match ast.kind(parent) {
        NodeKind::CompositeTypeSpecifier { members, .. } if members.contains(&declaration) => {
            Some(parent)
        }
        _ => None,
    }
}

/// Callee expression position: whether `expression` is the function of a call.
pub(crate) fn call_of(ast: &Ast, expression: NodeId) -> Option<NodeId> {
    let mut current = expression;
    // Parentheses around the callee do not change the call.
    while let Some(parent) = ast.parent(current) {
        match ast.kind(parent) {
            NodeKind::UnaryExpression {
                operator: crate::ast::UnaryOperator::Bracketed,
                ..
            } => current = parent,
            NodeKind::FunctionCallExpression { function, .. } if *function == current => {
                return Some(parent);
            }
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Declarator, Language};
    use crate::types::BasicKind;

    #[test]
    fn function_definition_parameters_share_function_scope() {
        let mut b = AstBuilder::new(Language::C);
        let pspec = b.basic(BasicKind::Int);
        let pname = b.name("y");
        let pdecl = b.declarator(Declarator::named(pname));
        let param = b.parameter(pspec, pdecl);
        let fname = b.name("f");
        let fdecl = b.declarator(Declarator::named(fname).function(vec![param]));
        let body = b.compound(vec![]);
        let spec = b.basic(BasicKind::Void);
        let def = b.function_definition(spec, fdecl, body);
        let tu = b.translation_unit(vec![def]);
        let ast = b.finish(tu).unwrap();

        assert_eq!(enclosing_scope_node(&ast, pname), def);
        assert_eq!(enclosing_scope_node(&ast, fname), tu);
        assert_eq!(scope_kind_of(&ast, def), ScopeKind::Function);
        assert!(matches!(
            classify(&ast, pname),
            NameUse::Declarator { owner, .. } if owner == param
        ));
    }

    #[test]
    fn prototype_parameters_get_prototype_scope() {
        let mut b = AstBuilder::new(Language::C);
        let pspec = b.basic(BasicKind::Int);
        let pname = b.name("a");
        let pdecl = b.declarator(Declarator::named(pname));
        let param = b.parameter(pspec, pdecl);
        let fname = b.name("g");
        let fdecl = b.declarator(Declarator::named(fname).function(vec![param]));
        let spec = b.basic(BasicKind::Int);
        let decl = b.simple_declaration(spec, vec![fdecl]);
        let tu = b.translation_unit(vec![decl]);
        let ast = b.finish(tu).unwrap();

        assert_eq!(enclosing_scope_node(&ast, pname), fdecl);
        assert_eq!(scope_kind_of(&ast, fdecl), ScopeKind::FunctionPrototype);
        assert!(declares_function(&ast, fdecl));
    }

    #[test]
    fn pointer_to_function_is_not_a_function_declaration() {
        let mut b = AstBuilder::new(Language::C);
        let name = b.name("fp");
        let inner = b.declarator(Declarator::named(name).pointer());
        let outer = b.declarator(Declarator::nested(inner).function(vec![]));
        let spec = b.basic(BasicKind::Int);
        let decl = b.simple_declaration(spec, vec![outer]);
        let tu = b.translation_unit(vec![decl]);
        let ast = b.finish(tu).unwrap();

        assert!(!declares_function(&ast, inner));
        assert_eq!(top_declarator(&ast, inner), outer);
        assert_eq!(function_declarator(&ast, outer), Some(outer));
    }

    #[test]
    fn forward_tag_declaration_is_a_declaration() {
        let mut b = AstBuilder::new(Language::C);
        let fwd = b.elaborated(TagKind::Struct, "A");
        let fwd_decl = b.simple_declaration(fwd, vec![]);
        let uses = b.elaborated(TagKind::Struct, "A");
        let pname = b.name("p");
        let pdecl = b.declarator(Declarator::named(pname).pointer());
        let use_decl = b.simple_declaration(uses, vec![pdecl]);
        let tu = b.translation_unit(vec![fwd_decl, use_decl]);
        let ast = b.finish(tu).unwrap();

        let NodeKind::ElaboratedTypeSpecifier { name: first, .. } = ast.kind(fwd) else {
            panic!("expected elaborated specifier");
        };
        let NodeKind::ElaboratedTypeSpecifier { name: second, .. } = ast.kind(uses) else {
            panic!("expected elaborated specifier");
        };
        assert_eq!(classify(&ast, *first).role(), NameRole::Declaration);
        assert_eq!(classify(&ast, *second).role(), NameRole::Reference);
    }
}
