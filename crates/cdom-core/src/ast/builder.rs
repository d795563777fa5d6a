//! Bottom-up construction of a syntax tree.

use super::{
    Ast, AstError, Declarator, Language, LiteralKind, NodeId, NodeKind, NodeLocation,
    SimpleDeclSpecifier, SpecifierCommon, StorageClass, TagKind, TypeIdOperator,
};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::problems::ProblemKind;
use crate::types::{BasicKind, BasicModifiers, CompositeKind, TypeQualifiers};

/// Arena builder used by parsers (and tests) to hand a skeleton to the resolver.
///
/// Children are created before their parents; [`AstBuilder::finish`] links parents, assigns
/// pre-order positions and validates the result.
#[derive(Debug, Default)]
pub struct AstBuilder {
    language: Language,
    nodes: Vec<(NodeKind, NodeLocation)>,
}

impl AstBuilder {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            nodes: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push((kind, NodeLocation::default()));
        id
    }

    pub fn locate(&mut self, id: NodeId, location: NodeLocation) {
        if let Some(entry) = self.nodes.get_mut(id.index()) {
            entry.1 = location;
        }
    }

    pub fn finish(self, root: NodeId) -> Result<Ast, AstError> {
        Ast::link(self.language, root, self.nodes)
    }

    pub fn name(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Name {
            text: text.to_string(),
        })
    }

    // Declaration specifiers

    pub fn basic(&mut self, kind: BasicKind) -> NodeId {
        self.simple_spec(SimpleDeclSpecifier {
            kind,
            ..SimpleDeclSpecifier::default()
        })
    }

    pub fn basic_with(&mut self, kind: BasicKind, modifiers: BasicModifiers) -> NodeId {
        self.simple_spec(SimpleDeclSpecifier {
            kind,
            modifiers,
            ..SimpleDeclSpecifier::default()
        })
    }

    pub fn simple_spec(&mut self, spec: SimpleDeclSpecifier) -> NodeId {
        self.push(NodeKind::SimpleDeclSpecifier(spec))
    }

    pub fn named_type(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::NamedTypeSpecifier {
            name,
            common: SpecifierCommon::default(),
        })
    }

    pub fn elaborated(&mut self, tag: TagKind, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::ElaboratedTypeSpecifier {
            tag,
            name,
            common: SpecifierCommon::default(),
        })
    }

    pub fn composite(&mut self, key: CompositeKind, name: &str, members: Vec<NodeId>) -> NodeId {
        self.derived_composite(key, name, &[], members)
    }

    pub fn derived_composite(
        &mut self,
        key: CompositeKind,
        name: &str,
        bases: &[&str],
        members: Vec<NodeId>,
    ) -> NodeId {
        let name = self.name(name);
        let bases = bases
            .iter()
            .map(|base| {
                let name = self.name(base);
                self.push(NodeKind::BaseSpecifier { name })
            })
            .collect();
        self.push(NodeKind::CompositeTypeSpecifier {
            key,
            name,
            bases,
            members,
            common: SpecifierCommon::default(),
        })
    }

    pub fn enumeration(&mut self, name: &str, enumerators: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::EnumerationSpecifier {
            name,
            enumerators,
            common: SpecifierCommon::default(),
        })
    }

    pub fn enumerator(&mut self, name: &str, value: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Enumerator { name, value })
    }

    /// Sets the storage class of an already created specifier.
    pub fn set_storage(&mut self, specifier: NodeId, storage: StorageClass) {
        if let Some(common) = self.common_mut(specifier) {
            common.storage = storage;
        }
    }

    pub fn set_qualifiers(&mut self, specifier: NodeId, qualifiers: TypeQualifiers) {
        if let Some(common) = self.common_mut(specifier) {
            common.qualifiers = qualifiers;
        }
    }

    pub fn set_explicit(&mut self, specifier: NodeId) {
        if let Some(common) = self.common_mut(specifier) {
            common.explicit = true;
        }
    }

    fn common_mut(&mut self, specifier: NodeId) -> Option<&mut SpecifierCommon> {
        match &mut self.nodes.get_mut(specifier.index())?.0 {
            NodeKind::SimpleDeclSpecifier(spec) => Some(&mut spec.common),
            NodeKind::NamedTypeSpecifier { common, .. }
            | NodeKind::ElaboratedTypeSpecifier { common, .. }
            | NodeKind::CompositeTypeSpecifier { common, .. }
            | NodeKind::EnumerationSpecifier { common, .. } => Some(common),
            _ => None,
        }
    }

    // Declarators and declarations

    pub fn declarator(&mut self, declarator: Declarator) -> NodeId {
        self.push(NodeKind::Declarator(declarator))
    }

    /// Plain declarator naming `text`.
    pub fn named_declarator(&mut self, text: &str) -> NodeId {
        let name = self.name(text);
        self.declarator(Declarator::named(name))
    }

    pub fn parameter(&mut self, specifier: NodeId, declarator: NodeId) -> NodeId {
        self.push(NodeKind::ParameterDeclaration {
            specifier,
            declarator,
        })
    }

    pub fn type_id(&mut self, specifier: NodeId, declarator: NodeId) -> NodeId {
        self.push(NodeKind::TypeId {
            specifier,
            declarator,
        })
    }

    pub fn simple_declaration(&mut self, specifier: NodeId, declarators: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::SimpleDeclaration {
            specifier,
            declarators,
        })
    }

    /// `specifier text;`
    pub fn variable(&mut self, specifier: NodeId, text: &str) -> NodeId {
        let declarator = self.named_declarator(text);
        self.simple_declaration(specifier, vec![declarator])
    }

    pub fn function_definition(
        &mut self,
        specifier: NodeId,
        declarator: NodeId,
        body: NodeId,
    ) -> NodeId {
        self.push(NodeKind::FunctionDefinition {
            specifier,
            declarator,
            body,
        })
    }

    pub fn namespace(&mut self, name: &str, declarations: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::NamespaceDefinition { name, declarations })
    }

    pub fn using_directive(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::UsingDirective { name })
    }

    pub fn translation_unit(&mut self, declarations: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::TranslationUnit { declarations })
    }

    pub fn problem(&mut self, problem: ProblemKind, raw_signature: &str) -> NodeId {
        self.push(NodeKind::Problem {
            problem,
            raw_signature: raw_signature.to_string(),
        })
    }

    pub fn problem_declaration(&mut self, problem: ProblemKind, raw_signature: &str) -> NodeId {
        let problem = self.problem(problem, raw_signature);
        self.push(NodeKind::ProblemDeclaration { problem })
    }

    // Initializers

    pub fn expression_initializer(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::ExpressionInitializer { expression })
    }

    pub fn initializer_list(&mut self, initializers: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::InitializerList { initializers })
    }

    pub fn designated(&mut self, designators: Vec<NodeId>, value: NodeId) -> NodeId {
        self.push(NodeKind::DesignatedInitializer { designators, value })
    }

    pub fn field_designator(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::FieldDesignator { name })
    }

    pub fn array_designator(&mut self, index: NodeId) -> NodeId {
        self.push(NodeKind::ArrayDesignator { index })
    }

    pub fn constructor_initializer(&mut self, arguments: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ConstructorInitializer { arguments })
    }

    // Statements

    pub fn compound(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::CompoundStatement { statements })
    }

    pub fn declaration_statement(&mut self, declaration: NodeId) -> NodeId {
        self.push(NodeKind::DeclarationStatement { declaration })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::ExpressionStatement { expression })
    }

    pub fn if_statement(
        &mut self,
        condition: NodeId,
        then_clause: NodeId,
        else_clause: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::IfStatement {
            condition,
            then_clause,
            else_clause,
        })
    }

    pub fn while_statement(&mut self, condition: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::WhileStatement { condition, body })
    }

    pub fn do_statement(&mut self, body: NodeId, condition: NodeId) -> NodeId {
        self.push(NodeKind::DoStatement { body, condition })
    }

    pub fn for_statement(
        &mut self,
        init: Option<NodeId>,
        condition: Option<NodeId>,
        iteration: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.push(NodeKind::ForStatement {
            init,
            condition,
            iteration,
            body,
        })
    }

    pub fn switch_statement(&mut self, controller: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::SwitchStatement { controller, body })
    }

    pub fn case_statement(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::CaseStatement { expression })
    }

    pub fn default_statement(&mut self) -> NodeId {
        self.push(NodeKind::DefaultStatement)
    }

    pub fn break_statement(&mut self) -> NodeId {
        self.push(NodeKind::BreakStatement)
    }

    pub fn continue_statement(&mut self) -> NodeId {
        self.push(NodeKind::ContinueStatement)
    }

    pub fn null_statement(&mut self) -> NodeId {
        self.push(NodeKind::NullStatement)
    }

    pub fn return_statement(&mut self, value: Option<NodeId>) -> NodeId {
        self.push(NodeKind::ReturnStatement { value })
    }

    pub fn label(&mut self, name: &str, statement: NodeId) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::LabelStatement { name, statement })
    }

    pub fn goto(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::GotoStatement { name })
    }

    pub fn problem_statement(&mut self, problem: ProblemKind, raw_signature: &str) -> NodeId {
        let problem = self.problem(problem, raw_signature);
        self.push(NodeKind::ProblemStatement { problem })
    }

    // Expressions

    pub fn id_expression(&mut self, text: &str) -> NodeId {
        let name = self.name(text);
        self.push(NodeKind::IdExpression { name })
    }

    pub fn literal(&mut self, literal: LiteralKind, value: &str) -> NodeId {
        self.push(NodeKind::LiteralExpression {
            literal,
            value: value.to_string(),
        })
    }

    pub fn int_literal(&mut self, value: &str) -> NodeId {
        self.literal(LiteralKind::Integer, value)
    }

    pub fn unary(&mut self, operator: UnaryOperator, operand: NodeId) -> NodeId {
        self.push(NodeKind::UnaryExpression { operator, operand })
    }

    pub fn binary(&mut self, operator: BinaryOperator, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.push(NodeKind::BinaryExpression { operator, lhs, rhs })
    }

    pub fn conditional(
        &mut self,
        condition: NodeId,
        positive: Option<NodeId>,
        negative: NodeId,
    ) -> NodeId {
        self.push(NodeKind::ConditionalExpression {
            condition,
            positive,
            negative,
        })
    }

    pub fn call(&mut self, function: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::FunctionCallExpression {
            function,
            arguments,
        })
    }

    /// `callee(arguments)` where the callee is a plain identifier.
    pub fn call_named(&mut self, callee: &str, arguments: Vec<NodeId>) -> NodeId {
        let function = self.id_expression(callee);
        self.call(function, arguments)
    }

    pub fn field_reference(&mut self, owner: NodeId, name: &str, arrow: bool) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::FieldReference { owner, name, arrow })
    }

    pub fn subscript(&mut self, array: NodeId, subscript: NodeId) -> NodeId {
        self.push(NodeKind::ArraySubscriptExpression { array, subscript })
    }

    pub fn cast(&mut self, type_id: NodeId, operand: NodeId) -> NodeId {
        self.push(NodeKind::CastExpression { type_id, operand })
    }

    pub fn type_id_expression(&mut self, operator: TypeIdOperator, type_id: NodeId) -> NodeId {
        self.push(NodeKind::TypeIdExpression { operator, type_id })
    }

    pub fn compound_literal(&mut self, type_id: NodeId, initializer: NodeId) -> NodeId {
        self.push(NodeKind::CompoundLiteral {
            type_id,
            initializer,
        })
    }

    pub fn expression_list(&mut self, expressions: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ExpressionList { expressions })
    }

    pub fn problem_expression(&mut self, problem: ProblemKind, raw_signature: &str) -> NodeId {
        let problem = self.problem(problem, raw_signature);
        self.push(NodeKind::ProblemExpression { problem })
    }
}
