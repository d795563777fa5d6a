//! Node kinds of the syntax tree
//!
//! The tree is an arena: nodes refer to their children by [`NodeId`]. Children are always
//! listed in source order, which is the order traversal and position-sensitive lookup rely on.

use serde::{Deserialize, Serialize};

use crate::problems::ProblemKind;
use crate::types::{ArrayQualifiers, BasicKind, BasicModifiers, CompositeKind, TypeQualifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    None,
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
}

/// Qualifiers, storage class and function specifiers shared by every declaration specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecifierCommon {
    pub qualifiers: TypeQualifiers,
    pub storage: StorageClass,
    pub inline: bool,
    pub explicit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimpleDeclSpecifier {
    pub kind: BasicKind,
    #[serde(default)]
    pub modifiers: BasicModifiers,
    #[serde(default)]
    pub common: SpecifierCommon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Struct,
    Union,
    Class,
    Enum,
}

impl TagKind {
    pub fn composite_kind(self) -> Option<CompositeKind> {
        match self {
            TagKind::Struct => Some(CompositeKind::Struct),
            TagKind::Union => Some(CompositeKind::Union),
            TagKind::Class => Some(CompositeKind::Class),
            TagKind::Enum => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerOp {
    Pointer {
        #[serde(default)]
        qualifiers: TypeQualifiers,
    },
    Reference {
        #[serde(default)]
        rvalue: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrayModifier {
    #[serde(default)]
    pub size: Option<NodeId>,
    #[serde(default)]
    pub qualifiers: ArrayQualifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionSuffix {
    pub parameters: Vec<NodeId>,
    #[serde(default)]
    pub variadic: bool,
    /// cv-qualifiers after the parameter list of a member function.
    #[serde(default)]
    pub qualifiers: TypeQualifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaratorSuffix {
    #[default]
    None,
    Array(Vec<ArrayModifier>),
    Function(FunctionSuffix),
}

/// A declarator: pointer operators, then either a name or a parenthesized nested declarator,
/// then an array or function suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Declarator {
    pub pointer_ops: Vec<PointerOp>,
    pub name: Option<NodeId>,
    pub nested: Option<NodeId>,
    pub suffix: DeclaratorSuffix,
    pub bit_field: Option<NodeId>,
    pub initializer: Option<NodeId>,
}

impl Declarator {
    pub fn named(name: NodeId) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn nested(inner: NodeId) -> Self {
        Self {
            nested: Some(inner),
            ..Self::default()
        }
    }

    /// Declarator without a name, as in a type-id or an unnamed parameter.
    pub fn abstract_() -> Self {
        Self::default()
    }

    pub fn pointer(mut self) -> Self {
        self.pointer_ops.push(PointerOp::Pointer {
            qualifiers: TypeQualifiers::empty(),
        });
        self
    }

    pub fn qualified_pointer(mut self, qualifiers: TypeQualifiers) -> Self {
        self.pointer_ops.push(PointerOp::Pointer { qualifiers });
        self
    }

    pub fn reference(mut self) -> Self {
        self.pointer_ops.push(PointerOp::Reference { rvalue: false });
        self
    }

    pub fn array(mut self, modifier: ArrayModifier) -> Self {
        match &mut self.suffix {
            DeclaratorSuffix::Array(mods) => mods.push(modifier),
            _ => self.suffix = DeclaratorSuffix::Array(vec![modifier]),
        }
        self
    }

    pub fn function(mut self, parameters: Vec<NodeId>) -> Self {
        self.suffix = DeclaratorSuffix::Function(FunctionSuffix {
            parameters,
            ..FunctionSuffix::default()
        });
        self
    }

    pub fn variadic_function(mut self, parameters: Vec<NodeId>) -> Self {
        self.suffix = DeclaratorSuffix::Function(FunctionSuffix {
            parameters,
            variadic: true,
            qualifiers: TypeQualifiers::empty(),
        });
        self
    }

    pub fn const_member_function(mut self, parameters: Vec<NodeId>) -> Self {
        self.suffix = DeclaratorSuffix::Function(FunctionSuffix {
            parameters,
            variadic: false,
            qualifiers: TypeQualifiers::CONST,
        });
        self
    }

    pub fn with_initializer(mut self, initializer: NodeId) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_bit_field(mut self, width: NodeId) -> Self {
        self.bit_field = Some(width);
        self
    }

    pub fn function_suffix(&self) -> Option<&FunctionSuffix> {
        match &self.suffix {
            DeclaratorSuffix::Function(f) => Some(f),
            _ => None,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        out.extend(self.name);
        out.extend(self.nested);
        match &self.suffix {
            DeclaratorSuffix::None => {}
            DeclaratorSuffix::Array(mods) => out.extend(mods.iter().filter_map(|m| m.size)),
            DeclaratorSuffix::Function(f) => out.extend(f.parameters.iter().copied()),
        }
        out.extend(self.bit_field);
        out.extend(self.initializer);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Integer,
    Float,
    Char,
    String,
    True,
    False,
    Nullptr,
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    Tilde,
    Star,
    Amper,
    PrefixIncr,
    PrefixDecr,
    PostfixIncr,
    PostfixDecr,
    Sizeof,
    Bracketed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Modulo,
    Plus,
    Minus,
    ShiftLeft,
    ShiftRight,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equals,
    NotEquals,
    BinaryAnd,
    BinaryXor,
    BinaryOr,
    LogicalAnd,
    LogicalOr,
    Assign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    PlusAssign,
    MinusAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    BinaryAndAssign,
    BinaryXorAssign,
    BinaryOrAssign,
}

impl BinaryOperator {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOperator::Assign
                | BinaryOperator::MultiplyAssign
                | BinaryOperator::DivideAssign
                | BinaryOperator::ModuloAssign
                | BinaryOperator::PlusAssign
                | BinaryOperator::MinusAssign
                | BinaryOperator::ShiftLeftAssign
                | BinaryOperator::ShiftRightAssign
                | BinaryOperator::BinaryAndAssign
                | BinaryOperator::BinaryXorAssign
                | BinaryOperator::BinaryOrAssign
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOperator::Less
                | BinaryOperator::Greater
                | BinaryOperator::LessEqual
                | BinaryOperator::GreaterEqual
                | BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::LogicalAnd
                | BinaryOperator::LogicalOr
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeIdOperator {
    Sizeof,
    Alignof,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeKind {
    TranslationUnit {
        declarations: Vec<NodeId>,
    },

    SimpleDeclaration {
        specifier: NodeId,
        declarators: Vec<NodeId>,
    },
    FunctionDefinition {
        specifier: NodeId,
        declarator: NodeId,
        body: NodeId,
    },
    NamespaceDefinition {
        name: NodeId,
        declarations: Vec<NodeId>,
    },
    UsingDirective {
        name: NodeId,
    },
    ProblemDeclaration {
        problem: NodeId,
    },

    SimpleDeclSpecifier(SimpleDeclSpecifier),
    NamedTypeSpecifier {
        name: NodeId,
        #[serde(default)]
        common: SpecifierCommon,
    },
    ElaboratedTypeSpecifier {
        tag: TagKind,
        name: NodeId,
        #[serde(default)]
        common: SpecifierCommon,
    },
    CompositeTypeSpecifier {
        key: CompositeKind,
        name: NodeId,
        #[serde(default)]
        bases: Vec<NodeId>,
        members: Vec<NodeId>,
        #[serde(default)]
        common: SpecifierCommon,
    },
    EnumerationSpecifier {
        name: NodeId,
        enumerators: Vec<NodeId>,
        #[serde(default)]
        common: SpecifierCommon,
    },
    Enumerator {
        name: NodeId,
        #[serde(default)]
        value: Option<NodeId>,
    },
    BaseSpecifier {
        name: NodeId,
    },

    Declarator(Declarator),
    ParameterDeclaration {
        specifier: NodeId,
        declarator: NodeId,
    },
    TypeId {
        specifier: NodeId,
        declarator: NodeId,
    },

    ExpressionInitializer {
        expression: NodeId,
    },
    InitializerList {
        initializers: Vec<NodeId>,
    },
    DesignatedInitializer {
        designators: Vec<NodeId>,
        value: NodeId,
    },
    FieldDesignator {
        name: NodeId,
    },
    ArrayDesignator {
        index: NodeId,
    },
    ConstructorInitializer {
        arguments: Vec<NodeId>,
    },

    CompoundStatement {
        statements: Vec<NodeId>,
    },
    DeclarationStatement {
        declaration: NodeId,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    IfStatement {
        condition: NodeId,
        then_clause: NodeId,
        #[serde(default)]
        else_clause: Option<NodeId>,
    },
    WhileStatement {
        condition: NodeId,
        body: NodeId,
    },
    DoStatement {
        body: NodeId,
        condition: NodeId,
    },
    ForStatement {
        #[serde(default)]
        init: Option<NodeId>,
        #[serde(default)]
        condition: Option<NodeId>,
        #[serde(default)]
        iteration: Option<NodeId>,
        body: NodeId,
    },
    SwitchStatement {
        controller: NodeId,
        body: NodeId,
    },
    CaseStatement {
        expression: NodeId,
    },
    DefaultStatement,
    BreakStatement,
    ContinueStatement,
    NullStatement,
    ReturnStatement {
        #[serde(default)]
        value: Option<NodeId>,
    },
    LabelStatement {
        name: NodeId,
        statement: NodeId,
    },
    GotoStatement {
        name: NodeId,
    },
    ProblemStatement {
        problem: NodeId,
    },

    IdExpression {
        name: NodeId,
    },
    LiteralExpression {
        literal: LiteralKind,
        value: String,
    },
    UnaryExpression {
        operator: UnaryOperator,
        operand: NodeId,
    },
    BinaryExpression {
        operator: BinaryOperator,
        lhs: NodeId,
        rhs: NodeId,
    },
    ConditionalExpression {
        condition: NodeId,
        #[serde(default)]
        positive: Option<NodeId>,
        negative: NodeId,
    },
    FunctionCallExpression {
        function: NodeId,
        arguments: Vec<NodeId>,
    },
    FieldReference {
        owner: NodeId,
        name: NodeId,
        #[serde(default)]
        arrow: bool,
    },
    ArraySubscriptExpression {
        array: NodeId,
        subscript: NodeId,
    },
    CastExpression {
        type_id: NodeId,
        operand: NodeId,
    },
    TypeIdExpression {
        operator: TypeIdOperator,
        type_id: NodeId,
    },
    CompoundLiteral {
        type_id: NodeId,
        initializer: NodeId,
    },
    ExpressionList {
        expressions: Vec<NodeId>,
    },
    ProblemExpression {
        problem: NodeId,
    },

    Name {
        text: String,
    },
    Problem {
        problem: ProblemKind,
        raw_signature: String,
    },
}

/// Coarse node categories, used for visitor dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    TranslationUnit,
    Declaration,
    DeclSpecifier,
    Declarator,
    Parameter,
    TypeId,
    Initializer,
    Statement,
    Expression,
    Enumerator,
    BaseSpecifier,
    Designator,
    Name,
    Problem,
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeKind::TranslationUnit { .. } => NodeCategory::TranslationUnit,
            NodeKind::SimpleDeclaration { .. }
            | NodeKind::FunctionDefinition { .. }
            | NodeKind::NamespaceDefinition { .. }
            | NodeKind::UsingDirective { .. }
            | NodeKind::ProblemDeclaration { .. } => NodeCategory::Declaration,
            NodeKind::SimpleDeclSpecifier(_)
            | NodeKind::NamedTypeSpecifier { .. }
            | NodeKind::ElaboratedTypeSpecifier { .. }
            | NodeKind::CompositeTypeSpecifier { .. }
            | NodeKind::EnumerationSpecifier { .. } => NodeCategory::DeclSpecifier,
            NodeKind::Enumerator { .. } => NodeCategory::Enumerator,
            NodeKind::BaseSpecifier { .. } => NodeCategory::BaseSpecifier,
            NodeKind::Declarator(_) => NodeCategory::Declarator,
            NodeKind::ParameterDeclaration { .. } => NodeCategory::Parameter,
            NodeKind::TypeId { .. } => NodeCategory::TypeId,
            NodeKind::ExpressionInitializer { .. }
            | NodeKind::InitializerList { .. }
            | NodeKind::DesignatedInitializer { .. }
            | NodeKind::ConstructorInitializer { .. } => NodeCategory::Initializer,
            NodeKind::FieldDesignator { .. } | NodeKind::ArrayDesignator { .. } => {
                NodeCategory::Designator
            }
            NodeKind::CompoundStatement { .. }
            | NodeKind::DeclarationStatement { .. }
            | NodeKind::ExpressionStatement { .. }
            | NodeKind::IfStatement { .. }
            | NodeKind::WhileStatement { .. }
            | NodeKind::DoStatement { .. }
            | NodeKind::ForStatement { .. }
            | NodeKind::SwitchStatement { .. }
            | NodeKind::CaseStatement { .. }
            | NodeKind::DefaultStatement
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::NullStatement
            | NodeKind::ReturnStatement { .. }
            | NodeKind::LabelStatement { .. }
            | NodeKind::GotoStatement { .. }
            | NodeKind::ProblemStatement { .. } => NodeCategory::Statement,
            NodeKind::IdExpression { .. }
            | NodeKind::LiteralExpression { .. }
            | NodeKind::UnaryExpression { .. }
            | NodeKind::BinaryExpression { .. }
            | NodeKind::ConditionalExpression { .. }
            | NodeKind::FunctionCallExpression { .. }
            | NodeKind::FieldReference { .. }
            | NodeKind::ArraySubscriptExpression { .. }
            | NodeKind::CastExpression { .. }
            | NodeKind::TypeIdExpression { .. }
            | NodeKind::CompoundLiteral { .. }
            | NodeKind::ExpressionList { .. }
            | NodeKind::ProblemExpression { .. } => NodeCategory::Expression,
            NodeKind::Name { .. } => NodeCategory::Name,
            NodeKind::Problem { .. } => NodeCategory::Problem,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::TranslationUnit { declarations } => declarations.clone(),
            NodeKind::SimpleDeclaration {
                specifier,
                declarators,
            } => std::iter::once(*specifier)
                .chain(declarators.iter().copied())
                .collect(),
            NodeKind::FunctionDefinition {
                specifier,
                declarator,
                body,
            } => vec![*specifier, *declarator, *body],
            NodeKind::NamespaceDefinition { name, declarations } => std::iter::once(*name)
                .chain(declarations.iter().copied())
                .collect(),
            NodeKind::UsingDirective { name } => vec![*name],
            NodeKind::ProblemDeclaration { problem }
            | NodeKind::ProblemStatement { problem }
            | NodeKind::ProblemExpression { problem } => vec![*problem],
            NodeKind::SimpleDeclSpecifier(_) => Vec::new(),
            NodeKind::NamedTypeSpecifier { name, .. }
            | NodeKind::ElaboratedTypeSpecifier { name, .. } => vec![*name],
            NodeKind::CompositeTypeSpecifier {
                name,
                bases,
                members,
                ..
            } => std::iter::once(*name)
                .chain(bases.iter().copied())
                .chain(members.iter().copied())
                .collect(),
            NodeKind::EnumerationSpecifier {
                name, enumerators, ..
            } => std::iter::once(*name)
                .chain(enumerators.iter().copied())
                .collect(),
            NodeKind::Enumerator { name, value } => {
                std::iter::once(*name).chain(*value).collect()
            }
            NodeKind::BaseSpecifier { name } => vec![*name],
            NodeKind::Declarator(declarator) => declarator.children(),
            NodeKind::ParameterDeclaration {
                specifier,
                declarator,
            }
            | NodeKind::TypeId {
                specifier,
                declarator,
            } => vec![*specifier, *declarator],
            NodeKind::ExpressionInitializer { expression } => vec![*expression],
            NodeKind::InitializerList { initializers } => initializers.clone(),
            NodeKind::DesignatedInitializer { designators, value } => designators
                .iter()
                .copied()
                .chain(std::iter::once(*value))
                .collect(),
            NodeKind::FieldDesignator { name } => vec![*name],
            NodeKind::ArrayDesignator { index } => vec![*index],
            NodeKind::ConstructorInitializer { arguments } => arguments.clone(),
            NodeKind::CompoundStatement { statements } => statements.clone(),
            NodeKind::DeclarationStatement { declaration } => vec![*declaration],
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::IfStatement {
                condition,
                then_clause,
                else_clause,
            } => [*condition, *then_clause]
                .into_iter()
                .chain(*else_clause)
                .collect(),
            NodeKind::WhileStatement { condition, body } => vec![*condition, *body],
            NodeKind::DoStatement { body, condition } => vec![*body, *condition],
            NodeKind::ForStatement {
                init,
                condition,
                iteration,
                body,
            } => init
                .iter()
                .chain(condition.iter())
                .chain(iteration.iter())
                .copied()
                .chain(std::iter::once(*body))
                .collect(),
            NodeKind::SwitchStatement { controller, body } => vec![*controller, *body],
            NodeKind::CaseStatement { expression } => vec![*expression],
            NodeKind::DefaultStatement
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::NullStatement => Vec::new(),
            NodeKind::ReturnStatement { value } => value.iter().copied().collect(),
            NodeKind::LabelStatement { name, statement } => vec![*name, *statement],
            NodeKind::GotoStatement { name } => vec![*name],
            NodeKind::IdExpression { name } => vec![*name],
            NodeKind::LiteralExpression { .. } => Vec::new(),
            NodeKind::UnaryExpression { operand, .. } => vec![*operand],
            NodeKind::BinaryExpression { lhs, rhs, .. } => vec![*lhs, *rhs],
            NodeKind::ConditionalExpression {
                condition,
                positive,
                negative,
            } => std::iter::once(*condition)
                .chain(*positive)
                .chain(std::iter::once(*negative))
                .collect(),
            NodeKind::FunctionCallExpression {
                function,
                arguments,
            } => std::iter::once(*function)
                .chain(arguments.iter().copied())
                .collect(),
            NodeKind::FieldReference { owner, name, .. } => vec![*owner, *name],
            NodeKind::ArraySubscriptExpression { array, subscript } => vec![*array, *subscript],
            NodeKind::CastExpression { type_id, operand } => vec![*type_id, *operand],
            NodeKind::TypeIdExpression { type_id, .. } => vec![*type_id],
            NodeKind::CompoundLiteral {
                type_id,
                initializer,
            } => vec![*type_id, *initializer],
            NodeKind::ExpressionList { expressions } => expressions.clone(),
            NodeKind::Name { .. } | NodeKind::Problem { .. } => Vec::new(),
        }
    }

    /// Short kind label used in logs and dumps.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::TranslationUnit { .. } => "translation-unit",
            NodeKind::SimpleDeclaration { .. } => "simple-declaration",
            NodeKind::FunctionDefinition { .. } => "function-definition",
            NodeKind::NamespaceDefinition { .. } => "namespace-definition",
            NodeKind::UsingDirective { .. } => "using-directive",
            NodeKind::ProblemDeclaration { .. } => "problem-declaration",
            NodeKind::SimpleDeclSpecifier(_) => "simple-decl-specifier",
            NodeKind::NamedTypeSpecifier { .. } => "named-type-specifier",
            NodeKind::ElaboratedTypeSpecifier { .. } => "elaborated-type-specifier",
            NodeKind::CompositeTypeSpecifier { .. } => "composite-type-specifier",
            NodeKind::EnumerationSpecifier { .. } => "enumeration-specifier",
            NodeKind::Enumerator { .. } => "enumerator",
            NodeKind::BaseSpecifier { .. } => "base-specifier",
            NodeKind::Declarator(_) => "declarator",
            NodeKind::ParameterDeclaration { .. } => "parameter-declaration",
            NodeKind::TypeId { .. } => "type-id",
            NodeKind::ExpressionInitializer { .. } => "expression-initializer",
            NodeKind::InitializerList { .. } => "initializer-list",
            NodeKind::DesignatedInitializer { .. } => "designated-initializer",
            NodeKind::FieldDesignator { .. } => "field-designator",
            NodeKind::ArrayDesignator { .. } => "array-designator",
            NodeKind::ConstructorInitializer { .. } => "constructor-initializer",
            NodeKind::CompoundStatement { .. } => "compound-statement",
            NodeKind::DeclarationStatement { .. } => "declaration-statement",
            NodeKind::ExpressionStatement { .. } => "expression-statement",
            NodeKind::IfStatement { .. } => "if-statement",
            NodeKind::WhileStatement { .. } => "while-statement",
            NodeKind::DoStatement { .. } => "do-statement",
            NodeKind::ForStatement { .. } => "for-statement",
            NodeKind::SwitchStatement { .. } => "switch-statement",
            NodeKind::CaseStatement { .. } => "case-statement",
            NodeKind::DefaultStatement => "default-statement",
            NodeKind::BreakStatement => "break-statement",
            NodeKind::ContinueStatement => "continue-statement",
            NodeKind::NullStatement => "null-statement",
            NodeKind::ReturnStatement { .. } => "return-statement",
            NodeKind::LabelStatement { .. } => "label-statement",
            NodeKind::GotoStatement { .. } => "goto-statement",
            NodeKind::ProblemStatement { .. } => "problem-statement",
            NodeKind::IdExpression { .. } => "id-expression",
            NodeKind::LiteralExpression { .. } => "literal-expression",
            NodeKind::UnaryExpression { .. } => "unary-expression",
            NodeKind::BinaryExpression { .. } => "binary-expression",
            NodeKind::ConditionalExpression { .. } => "conditional-expression",
            NodeKind::FunctionCallExpression { .. } => "function-call",
            NodeKind::FieldReference { .. } => "field-reference",
            NodeKind::ArraySubscriptExpression { .. } => "array-subscript",
            NodeKind::CastExpression { .. } => "cast-expression",
            NodeKind::TypeIdExpression { .. } => "type-id-expression",
            NodeKind::CompoundLiteral { .. } => "compound-literal",
            NodeKind::ExpressionList { .. } => "expression-list",
            NodeKind::ProblemExpression { .. } => "problem-expression",
            NodeKind::Name { .. } => "name",
            NodeKind::Problem { .. } => "problem",
        }
    }

    /// Common specifier flags, for declaration specifiers.
    pub fn specifier_common(&self) -> Option<SpecifierCommon> {
        match self {
            NodeKind::SimpleDeclSpecifier(spec) => Some(spec.common),
            NodeKind::NamedTypeSpecifier { common, .. }
            | NodeKind::ElaboratedTypeSpecifier { common, .. }
            | NodeKind::CompositeTypeSpecifier { common, .. }
            | NodeKind::EnumerationSpecifier { common, .. } => Some(*common),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarator_children_follow_source_order() {
        let d = Declarator::named(NodeId(1))
            .array(ArrayModifier {
                size: Some(NodeId(2)),
                qualifiers: ArrayQualifiers::empty(),
            })
            .with_initializer(NodeId(3));
        assert_eq!(
            NodeKind::Declarator(d).children(),
            vec![NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn array_modifiers_accumulate() {
        let d = Declarator::named(NodeId(0))
            .array(ArrayModifier::default())
            .array(ArrayModifier::default());
        match d.suffix {
            DeclaratorSuffix::Array(mods) => assert_eq!(mods.len(), 2),
            other => panic!("expected array suffix, got {other:?}"),
        }
    }

    #[test]
    fn for_statement_children_skip_missing_clauses() {
        let kind = NodeKind::ForStatement {
            init: None,
            condition: Some(NodeId(4)),
            iteration: None,
            body: NodeId(5),
        };
        assert_eq!(kind.children(), vec![NodeId(4), NodeId(5)]);
        assert_eq!(kind.category(), NodeCategory::Statement);
    }

    #[test]
    fn node_kind_round_trips_through_json() {
        let kind = NodeKind::ElaboratedTypeSpecifier {
            tag: TagKind::Struct,
            name: NodeId(7),
            common: SpecifierCommon::default(),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"node\":\"elaborated_type_specifier\""));
        let back: NodeKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
