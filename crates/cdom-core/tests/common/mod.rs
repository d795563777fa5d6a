//! Tree-building helpers shared by the resolution tests.

#![allow(dead_code)]

use cdom_core::ast::{Ast, AstBuilder, BinaryOperator, Declarator};
use cdom_core::semantic::BindingKind;
use cdom_core::types::BasicKind;
use cdom_core::{NameRole, NodeId, TranslationUnit};
use serde::Serialize;

/// Name nodes spelling `text`, in pre-order.
pub fn names(ast: &Ast, text: &str) -> Vec<NodeId> {
    ast.preorder()
        .iter()
        .copied()
        .filter(|&id| ast.name_text(id) == Some(text))
        .collect()
}

/// The only name node spelling `text`.
pub fn name(ast: &Ast, text: &str) -> NodeId {
    let found = names(ast, text);
    assert_eq!(found.len(), 1, "expected exactly one name '{}'", text);
    found[0]
}

/// `kind name` as a parameter.
pub fn param(b: &mut AstBuilder, kind: BasicKind, name: &str) -> NodeId {
    let spec = b.basic(kind);
    let declarator = b.named_declarator(name);
    b.parameter(spec, declarator)
}

/// `ret name(params) { body }`
pub fn function(
    b: &mut AstBuilder,
    ret: BasicKind,
    name: &str,
    params: Vec<NodeId>,
    body: Vec<NodeId>,
) -> NodeId {
    let fname = b.name(name);
    let declarator = b.declarator(Declarator::named(fname).function(params));
    let body = b.compound(body);
    let spec = b.basic(ret);
    b.function_definition(spec, declarator, body)
}

/// `ret name(params);`
pub fn prototype(b: &mut AstBuilder, ret: BasicKind, name: &str, params: Vec<NodeId>) -> NodeId {
    let fname = b.name(name);
    let declarator = b.declarator(Declarator::named(fname).function(params));
    let spec = b.basic(ret);
    b.simple_declaration(spec, vec![declarator])
}

/// `int name = init;`
pub fn int_with(b: &mut AstBuilder, name: &str, init: NodeId) -> NodeId {
    let spec = b.basic(BasicKind::Int);
    let n = b.name(name);
    let init = b.expression_initializer(init);
    let declarator = b.declarator(Declarator::named(n).with_initializer(init));
    b.simple_declaration(spec, vec![declarator])
}

/// `int name;` as a statement.
pub fn local_int(b: &mut AstBuilder, name: &str) -> NodeId {
    let spec = b.basic(BasicKind::Int);
    let decl = b.variable(spec, name);
    b.declaration_statement(decl)
}

/// `name;` as a statement.
pub fn use_of(b: &mut AstBuilder, name: &str) -> NodeId {
    let e = b.id_expression(name);
    b.expression_statement(e)
}

/// `callee(args);` as a statement.
pub fn call_stmt(b: &mut AstBuilder, callee: &str, args: Vec<NodeId>) -> NodeId {
    let call = b.call_named(callee, args);
    b.expression_statement(call)
}

/// `lhs = rhs;` as a statement.
pub fn assign(b: &mut AstBuilder, lhs: NodeId, rhs: NodeId) -> NodeId {
    let e = b.binary(BinaryOperator::Assign, lhs, rhs);
    b.expression_statement(e)
}

#[derive(Serialize)]
pub struct NameRow {
    pub name: String,
    pub role: NameRole,
    pub binding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

fn binding_label(kind: &BindingKind) -> String {
    match kind.problem() {
        Some(problem) => format!("problem: {}", problem.name()),
        None => kind.label().to_string(),
    }
}

/// One row per non-empty name in pre-order: its role, what it binds to and that binding's type.
pub fn name_rows(unit: &mut TranslationUnit) -> Vec<NameRow> {
    let ids: Vec<NodeId> = unit
        .ast()
        .preorder()
        .iter()
        .copied()
        .filter(|&id| unit.ast().name_text(id).is_some_and(|t| !t.is_empty()))
        .collect();

    ids.into_iter()
        .map(|id| {
            let text = unit.ast().name_text(id).unwrap_or_default().to_string();
            let role = unit.name_role(id);
            let binding = unit.resolve_binding(id).expect("name node");
            let kind = unit.binding(binding).kind;
            let ty = if kind.is_problem() {
                None
            } else {
                unit.binding_type(binding).map(|t| t.to_string())
            };
            NameRow {
                name: text,
                role,
                binding: binding_label(&kind),
                r#type: ty,
            }
        })
        .collect()
}
