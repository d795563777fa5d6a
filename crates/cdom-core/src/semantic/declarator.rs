//! Declarator types
//!
//! A declarator is walked outermost-in: its pointer operators apply to the specifier type
//! first, then its array or function suffix, and the result becomes the base type of the
//! nested declarator.

use std::sync::Arc;

use tracing::warn;

use super::bindings::{BindingId, BindingKind};
use super::expressions::integer_value;
use super::resolver::Resolver;
use super::roles::top_declarator;
use crate::ast::{DeclaratorSuffix, LiteralKind, NodeId, NodeKind, PointerOp};
use crate::problems::ProblemKind;
use crate::types::{
    ArrayType, CompositeType, EnumerationType, FunctionType, PointerType, Type, TypeQualifiers,
    TypedefType,
};

impl Resolver<'_> {
    /// Type of a binding, computed once and kept in the binding.
    pub(crate) fn binding_type(&mut self, binding: BindingId) -> Option<Type> {
        if let Some(ty) = self.model.bindings.get(binding).cached_type() {
            return Some(ty.clone());
        }
        let entry = self.model.bindings.get(binding);
        let name = entry.name.clone();
        let declaration = entry.definition.or_else(|| entry.declarations.first().copied());
        let ty = match entry.kind {
            BindingKind::Problem { kind, .. } => Type::Problem(kind),
            BindingKind::Label | BindingKind::Namespace => return None,
            BindingKind::Function(info) if info.implicit => Type::Function(FunctionType {
                return_type: Arc::new(Type::int()),
                parameters: Vec::new(),
                variadic: false,
                qualifiers: TypeQualifiers::empty(),
            }),
            BindingKind::Composite(kind) => Type::Composite(CompositeType {
                binding,
                kind,
                name,
            }),
            BindingKind::Enumeration => Type::Enumeration(EnumerationType { binding, name }),
            // C enumeration constants have type int.
            BindingKind::Enumerator {
                enumeration: Some(enumeration),
            } if self.is_cpp() => self.binding_type(enumeration)?,
            BindingKind::Enumerator { .. } => Type::int(),
            BindingKind::Variable
            | BindingKind::Parameter
            | BindingKind::Function(_)
            | BindingKind::Field { .. }
            | BindingKind::Typedef => match declaration {
                Some(declaration) => self.declared_type(declaration),
                None => {
                    warn!(binding = binding.index(), "binding has no declaring name");
                    Type::Problem(ProblemKind::InvalidType)
                }
            },
        };
        self.model.bindings.get_mut(binding).ty = Some(ty.clone());
        Some(ty)
    }

    /// Type a declaring name gets from its declaration.
    pub(crate) fn declared_type(&mut self, name: NodeId) -> Type {
        let declarator = self
            .ast
            .parent(name)
            .filter(|&parent| matches!(self.ast.kind(parent), NodeKind::Declarator(_)));
        let Some(declarator) = declarator else {
            warn!(name = name.index(), "declaring name outside a declarator");
            return Type::Problem(ProblemKind::InvalidType);
        };
        let top = top_declarator(self.ast, declarator);
        let Some(owner) = self.ast.parent(top) else {
            warn!(declarator = top.index(), "declarator without an owning declaration");
            return Type::Problem(ProblemKind::InvalidType);
        };
        let ast = self.ast;
        match ast.kind(owner) {
            NodeKind::ParameterDeclaration { .. } => self.parameter_type(owner),
            NodeKind::SimpleDeclaration { specifier, .. }
            | NodeKind::FunctionDefinition { specifier, .. }
            | NodeKind::TypeId { specifier, .. } => {
                let base = self.specifier_type(*specifier);
                self.declarator_type(base, top)
            }
            other => {
                warn!(owner = owner.index(), kind = ?other, "declarator owned by an unexpected node");
                Type::Problem(ProblemKind::InvalidType)
            }
        }
    }

    pub(crate) fn specifier_type(&mut self, specifier: NodeId) -> Type {
        let ast = self.ast;
        let kind = ast.kind(specifier);
        let qualifiers = kind
            .specifier_common()
            .map(|c| c.qualifiers)
            .unwrap_or_default();
        let ty = match kind {
            NodeKind::SimpleDeclSpecifier(simple) => {
                Type::with_modifiers(simple.kind, simple.modifiers)
            }
            NodeKind::NamedTypeSpecifier { name, .. }
            | NodeKind::ElaboratedTypeSpecifier { name, .. }
            | NodeKind::CompositeTypeSpecifier { name, .. }
            | NodeKind::EnumerationSpecifier { name, .. } => {
                let binding = self.resolve(*name);
                self.type_of_type_binding(binding)
            }
            _ => Type::Problem(ProblemKind::InvalidType),
        };
        Type::qualified(ty, qualifiers)
    }

    /// Type denoted by a binding used as a type name.
    pub(crate) fn type_of_type_binding(&mut self, binding: BindingId) -> Type {
        match self.kind_of(binding) {
            BindingKind::Typedef => {
                let aliased = self
                    .binding_type(binding)
                    .unwrap_or(Type::Problem(ProblemKind::InvalidType));
                Type::Typedef(TypedefType {
                    binding,
                    name: self.model.bindings.get(binding).name.clone(),
                    aliased: Arc::new(aliased),
                })
            }
            BindingKind::Composite(_) | BindingKind::Enumeration => self
                .binding_type(binding)
                .unwrap_or(Type::Problem(ProblemKind::InvalidType)),
            BindingKind::Problem { kind, .. } => Type::Problem(kind),
            _ => Type::Problem(ProblemKind::InvalidType),
        }
    }

    pub(crate) fn declarator_type(&mut self, base: Type, declarator: NodeId) -> Type {
        let ast = self.ast;
        let NodeKind::Declarator(d) = ast.kind(declarator) else {
            return base;
        };
        let mut ty = base;
        for op in &d.pointer_ops {
            ty = match *op {
                PointerOp::Pointer { qualifiers } => Type::Pointer(PointerType {
                    target: Arc::new(ty),
                    qualifiers,
                }),
                PointerOp::Reference { rvalue } => Type::reference_to(ty, rvalue),
            };
        }
        match &d.suffix {
            DeclaratorSuffix::None => {}
            DeclaratorSuffix::Array(modifiers) => {
                for modifier in modifiers.iter().rev() {
                    ty = Type::Array(ArrayType {
                        element: Arc::new(ty),
                        size: modifier.size,
                        length: modifier.size.and_then(|size| self.literal_length(size)),
                        qualifiers: modifier.qualifiers,
                    });
                }
            }
            DeclaratorSuffix::Function(suffix) => {
                let parameters = suffix
                    .parameters
                    .iter()
                    .map(|&p| self.parameter_type(p))
                    .collect();
                ty = Type::Function(FunctionType {
                    return_type: Arc::new(ty),
                    parameters,
                    variadic: suffix.variadic,
                    qualifiers: suffix.qualifiers,
                });
            }
        }
        match d.nested {
            Some(nested) => self.declarator_type(ty, nested),
            None => ty,
        }
    }

    fn literal_length(&self, size: NodeId) -> Option<u64> {
        match self.ast.kind(size) {
            NodeKind::LiteralExpression {
                literal: LiteralKind::Integer,
                value,
            } => integer_value(value),
            _ => None,
        }
    }

    /// Adjusted type of a parameter declaration.
    pub(crate) fn parameter_type(&mut self, parameter: NodeId) -> Type {
        let NodeKind::ParameterDeclaration {
            specifier,
            declarator,
        } = self.ast.kind(parameter)
        else {
            return Type::Problem(ProblemKind::InvalidType);
        };
        let (specifier, declarator) = (*specifier, *declarator);
        let base = self.specifier_type(specifier);
        let ty = self.declarator_type(base, declarator);
        adjust_parameter(ty)
    }

    pub(crate) fn type_id_type(&mut self, type_id: NodeId) -> Type {
        match self.ast.kind(type_id) {
            NodeKind::TypeId {
                specifier,
                declarator,
            } => {
                let (specifier, declarator) = (*specifier, *declarator);
                let base = self.specifier_type(specifier);
                self.declarator_type(base, declarator)
            }
            _ => Type::Problem(ProblemKind::InvalidType),
        }
    }

    /// Fields of a composite, in declaration order.
    pub(crate) fn composite_fields(&mut self, composite: BindingId) -> Vec<BindingId> {
        let Some(definition) = self.definition_node(composite) else {
            return Vec::new();
        };
        let NodeKind::CompositeTypeSpecifier { members, .. } = self.ast.kind(definition) else {
            return Vec::new();
        };
        let mut fields = Vec::new();
        for member in members.clone() {
            let NodeKind::SimpleDeclaration { declarators, .. } = self.ast.kind(member) else {
                continue;
            };
            for declarator in declarators.clone() {
                let Some(name) = self.ast.innermost_name(declarator) else {
                    continue;
                };
                let binding = self.resolve(name);
                if matches!(self.kind_of(binding), BindingKind::Field { .. }) {
                    fields.push(binding);
                }
            }
        }
        fields
    }

    /// Type of the object whose member a field designator names.
    pub(crate) fn designator_owner_type(&mut self, designator: NodeId) -> Option<Type> {
        let designated = self.ast.parent(designator)?;
        let NodeKind::DesignatedInitializer { designators, .. } = self.ast.kind(designated) else {
            return None;
        };
        let designators = designators.clone();
        let list = self.ast.parent(designated)?;
        let mut ty = self.initializer_list_type(list)?;
        for current in designators {
            if current == designator {
                return Some(ty);
            }
            ty = self.designator_step(ty, current)?;
        }
        None
    }

    fn designator_step(&mut self, owner: Type, designator: NodeId) -> Option<Type> {
        match self.ast.kind(designator) {
            NodeKind::FieldDesignator { name } => {
                let binding = self.resolve(*name);
                self.binding_type(binding)
            }
            NodeKind::ArrayDesignator { .. } => owner.pointee().cloned(),
            _ => None,
        }
    }

    /// Type initialized by an initializer list.
    fn initializer_list_type(&mut self, list: NodeId) -> Option<Type> {
        let parent = self.ast.parent(list)?;
        match self.ast.kind(parent) {
            NodeKind::Declarator(_) => {
                let name = self.ast.innermost_name(parent)?;
                Some(self.declared_type(name))
            }
            NodeKind::CompoundLiteral { type_id, .. } => Some(self.type_id_type(*type_id)),
            NodeKind::DesignatedInitializer { designators, .. } => {
                let designators = designators.clone();
                let mut ty = self.initializer_list_type(self.ast.parent(parent)?)?;
                for designator in designators {
                    ty = self.designator_step(ty, designator)?;
                }
                Some(ty)
            }
            NodeKind::InitializerList { initializers } => {
                let position = initializers.iter().position(|&i| i == list)?;
                let outer = self.initializer_list_type(parent)?;
                if let Some(element) = outer.pointee() {
                    return Some(element.clone());
                }
                let composite = outer.as_composite()?.binding;
                let field = *self.composite_fields(composite).get(position)?;
                self.binding_type(field)
            }
            _ => None,
        }
    }
}

/// Parameter adjustment: arrays become pointers qualified by the array's qualifiers and
/// functions become pointers to functions.
pub(crate) fn adjust_parameter(ty: Type) -> Type {
    match ty.strip_typedefs() {
        Type::Array(array) => Type::Pointer(PointerType {
            target: array.element.clone(),
            qualifiers: array.qualifiers.pointer_qualifiers(),
        }),
        Type::Function(_) => Type::pointer_to(ty),
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Language, TagKind};
    use crate::context::TranslationUnitContext;
    use crate::semantic::SemanticModel;
    use crate::types::{ArrayQualifiers, BasicKind};

    #[test]
    fn tag_name_has_no_declared_type() {
        // struct A;
        let mut b = AstBuilder::new(Language::C);
        let tag = b.elaborated(TagKind::Struct, "A");
        let declaration = b.simple_declaration(tag, vec![]);
        let tu = b.translation_unit(vec![declaration]);
        let ast = b.finish(tu).unwrap();
        let name = ast
            .preorder()
            .iter()
            .copied()
            .find(|&id| ast.is_name(id))
            .unwrap();

        let context = TranslationUnitContext::default();
        let mut model = SemanticModel::new();
        let mut resolver = Resolver::new(&ast, &context, &mut model);
        assert_eq!(
            resolver.declared_type(name),
            Type::Problem(ProblemKind::InvalidType)
        );
    }

    #[test]
    fn array_parameter_becomes_qualified_pointer() {
        let array = Type::Array(ArrayType {
            element: Arc::new(Type::int()),
            size: None,
            length: None,
            qualifiers: ArrayQualifiers::CONST | ArrayQualifiers::STATIC,
        });
        let adjusted = adjust_parameter(array);
        assert_eq!(adjusted.to_string(), "int * const");
    }

    #[test]
    fn function_parameter_becomes_pointer() {
        let function = Type::Function(FunctionType {
            return_type: Arc::new(Type::basic(BasicKind::Char)),
            parameters: vec![Type::int()],
            variadic: false,
            qualifiers: TypeQualifiers::empty(),
        });
        assert!(adjust_parameter(function).is_pointer());
        assert_eq!(adjust_parameter(Type::int()), Type::int());
    }
}
