//! Expression types
//!
//! Enough typing for overload resolution and member access: value category, the type after
//! the usual arithmetic conversions and whether the expression is a null pointer constant.

use std::sync::Arc;

use super::bindings::BindingKind;
use super::resolver::Resolver;
use super::roles::{enclosing_function, member_of};
use crate::ast::{BinaryOperator, LiteralKind, NodeCategory, NodeId, NodeKind, UnaryOperator};
use crate::problems::ProblemKind;
use crate::types::{
    ArrayType, ArrayQualifiers, BasicKind, BasicModifiers, BasicType, PointerType, Type,
    TypeQualifiers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    LValue,
    PRValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprType {
    pub ty: Type,
    pub category: ValueCategory,
    /// Integer literal zero or `nullptr`.
    pub null_constant: bool,
}

impl ExprType {
    pub fn lvalue(ty: Type) -> Self {
        Self {
            ty,
            category: ValueCategory::LValue,
            null_constant: false,
        }
    }

    pub fn prvalue(ty: Type) -> Self {
        Self {
            ty,
            category: ValueCategory::PRValue,
            null_constant: false,
        }
    }

    pub fn problem(kind: ProblemKind) -> Self {
        Self::prvalue(Type::Problem(kind))
    }

    pub fn is_lvalue(&self) -> bool {
        self.category == ValueCategory::LValue
    }

    /// A reference-typed result designates the referenced object.
    fn from_declared(ty: Type, category: ValueCategory) -> Self {
        match ty.referenced() {
            Some(reference) => Self::lvalue((*reference.target).clone()),
            None => Self {
                ty,
                category,
                null_constant: false,
            },
        }
    }
}

impl Resolver<'_> {
    /// Types `expression` and caches the result for every sub-expression.
    ///
    /// Operands are typed bottom-up in reverse pre-order, so each step only reads cached
    /// operand types and nesting depth never reaches the call stack.
    pub(crate) fn expression_type(&mut self, expression: NodeId) -> ExprType {
        if let Some(cached) = self.model.expressions.get(&expression) {
            return cached.clone();
        }
        let ast = self.ast;
        let operands = ast.subtree(expression).get(1..).unwrap_or_default();
        for &operand in operands.iter().rev() {
            if ast.kind(operand).category() == NodeCategory::Expression
                && !self.model.expressions.contains_key(&operand)
            {
                let ty = self.type_expression(operand);
                self.remember_type(operand, &ty);
            }
        }
        let ty = self.type_expression(expression);
        self.remember_type(expression, &ty);
        ty
    }

    fn remember_type(&mut self, expression: NodeId, ty: &ExprType) {
        // A lookup still in progress may succeed once the cycle unwinds.
        if !matches!(ty.ty, Type::Problem(ProblemKind::RecursionInLookup)) {
            self.model.expressions.insert(expression, ty.clone());
        }
    }

    fn type_expression(&mut self, expression: NodeId) -> ExprType {
        let ast = self.ast;
        let cpp = self.is_cpp();
        match ast.kind(expression) {
            NodeKind::IdExpression { name } => {
                let binding = self.resolve(*name);
                let kind = self.kind_of(binding);
                if let BindingKind::Problem { kind, .. } = kind {
                    return ExprType::problem(kind);
                }
                let ty = self
                    .binding_type(binding)
                    .unwrap_or(Type::Problem(ProblemKind::InvalidType));
                let category = match kind {
                    BindingKind::Enumerator { .. } => ValueCategory::PRValue,
                    _ => ValueCategory::LValue,
                };
                ExprType::from_declared(ty, category)
            }
            NodeKind::LiteralExpression { literal, value } => self.literal_type(*literal, value, expression),
            NodeKind::UnaryExpression { operator, operand } => {
                let operand_type = self.expression_type(*operand);
                unary_type(*operator, operand_type, cpp)
            }
            NodeKind::BinaryExpression { operator, lhs, rhs } => {
                let lhs = self.expression_type(*lhs);
                let rhs = self.expression_type(*rhs);
                binary_type(*operator, lhs, rhs, cpp)
            }
            NodeKind::ConditionalExpression {
                condition,
                positive,
                negative,
            } => {
                let positive = self.expression_type(positive.unwrap_or(*condition));
                let negative = self.expression_type(*negative);
                conditional_type(positive, negative)
            }
            NodeKind::FunctionCallExpression { function, .. } => {
                let callee = self.expression_type(*function);
                if let Type::Problem(kind) = callee.ty.canonical() {
                    return ExprType::problem(*kind);
                }
                match callee.ty.callable() {
                    Some(f) => ExprType::from_declared((*f.return_type).clone(), ValueCategory::PRValue),
                    None => ExprType::problem(ProblemKind::InvalidType),
                }
            }
            NodeKind::FieldReference { owner, name, arrow } => {
                let owner = self.expression_type(*owner);
                let binding = self.resolve(*name);
                if let BindingKind::Problem { kind, .. } = self.kind_of(binding) {
                    return ExprType::problem(kind);
                }
                let ty = self
                    .binding_type(binding)
                    .unwrap_or(Type::Problem(ProblemKind::InvalidType));
                let object = if *arrow {
                    owner.ty.pointee().cloned().unwrap_or(owner.ty.clone())
                } else {
                    owner.ty.clone()
                };
                let category = if *arrow || owner.is_lvalue() {
                    ValueCategory::LValue
                } else {
                    ValueCategory::PRValue
                };
                if ty.as_function().is_some() || ty.referenced().is_some() {
                    return ExprType::from_declared(ty, category);
                }
                ExprType::from_declared(Type::qualified(ty, object.qualifiers()), category)
            }
            NodeKind::ArraySubscriptExpression { array, subscript } => {
                let array = self.expression_type(*array);
                let subscript = self.expression_type(*subscript);
                let element = array
                    .ty
                    .pointee()
                    .or_else(|| subscript.ty.pointee())
                    .cloned()
                    .unwrap_or(Type::Problem(ProblemKind::InvalidType));
                ExprType::lvalue(element)
            }
            NodeKind::CastExpression { type_id, .. } => {
                let ty = self.type_id_type(*type_id);
                ExprType::from_declared(ty, ValueCategory::PRValue)
            }
            NodeKind::TypeIdExpression { .. } => ExprType::prvalue(size_type()),
            NodeKind::CompoundLiteral { type_id, .. } => ExprType::lvalue(self.type_id_type(*type_id)),
            NodeKind::ExpressionList { expressions } => match expressions.last() {
                Some(&last) => self.expression_type(last),
                None => ExprType::prvalue(Type::void()),
            },
            NodeKind::ProblemExpression { problem } => match ast.kind(*problem) {
                NodeKind::Problem { problem, .. } => ExprType::problem(*problem),
                _ => ExprType::problem(ProblemKind::SyntaxError),
            },
            _ => ExprType::problem(ProblemKind::InvalidType),
        }
    }

    fn literal_type(&mut self, literal: LiteralKind, value: &str, expression: NodeId) -> ExprType {
        let cpp = self.is_cpp();
        match literal {
            LiteralKind::Integer => {
                let mut ty = ExprType::prvalue(integer_literal_type(value));
                ty.null_constant = integer_value(value) == Some(0);
                ty
            }
            LiteralKind::Float => {
                let kind = if value.ends_with(['f', 'F']) {
                    BasicKind::Float
                } else {
                    BasicKind::Double
                };
                ExprType::prvalue(Type::basic(kind))
            }
            LiteralKind::Char if cpp => ExprType::prvalue(Type::basic(BasicKind::Char)),
            LiteralKind::Char => ExprType::prvalue(Type::int()),
            LiteralKind::String => {
                let element = Type::basic(BasicKind::Char);
                let element = if cpp {
                    Type::qualified(element, TypeQualifiers::CONST)
                } else {
                    element
                };
                ExprType::lvalue(Type::Array(ArrayType {
                    element: Arc::new(element),
                    size: None,
                    length: None,
                    qualifiers: ArrayQualifiers::empty(),
                }))
            }
            LiteralKind::True | LiteralKind::False if cpp => {
                ExprType::prvalue(Type::basic(BasicKind::Bool))
            }
            LiteralKind::True | LiteralKind::False => ExprType::prvalue(Type::int()),
            LiteralKind::Nullptr => {
                let mut ty = ExprType::prvalue(Type::pointer_to(Type::void()));
                ty.null_constant = true;
                ty
            }
            LiteralKind::This => self.this_type(expression),
        }
    }

    fn this_type(&mut self, expression: NodeId) -> ExprType {
        let class = enclosing_function(self.ast, expression)
            .and_then(|function| member_of(self.ast, function))
            .and_then(|composite| self.composite_binding(composite));
        match class {
            Some(class) => {
                let object = self
                    .binding_type(class)
                    .unwrap_or(Type::Problem(ProblemKind::InvalidType));
                ExprType::prvalue(Type::pointer_to(object))
            }
            None => ExprType::problem(ProblemKind::InvalidType),
        }
    }
}

fn unary_type(operator: UnaryOperator, operand: ExprType, cpp: bool) -> ExprType {
    if operand.ty.is_problem() && operator != UnaryOperator::Sizeof {
        return operand;
    }
    match operator {
        UnaryOperator::Plus | UnaryOperator::Minus | UnaryOperator::Tilde => {
            ExprType::prvalue(promote(&operand.ty))
        }
        UnaryOperator::Not => ExprType::prvalue(truth_type(cpp)),
        UnaryOperator::Star => match decay(&operand.ty).pointee() {
            Some(target) => ExprType::lvalue(target.clone()),
            None => ExprType::problem(ProblemKind::InvalidType),
        },
        UnaryOperator::Amper => ExprType::prvalue(Type::pointer_to(operand.ty)),
        UnaryOperator::PrefixIncr | UnaryOperator::PrefixDecr => {
            if cpp {
                ExprType::lvalue(operand.ty)
            } else {
                ExprType::prvalue(operand.ty.unqualified())
            }
        }
        UnaryOperator::PostfixIncr | UnaryOperator::PostfixDecr => {
            ExprType::prvalue(operand.ty.unqualified())
        }
        UnaryOperator::Sizeof => ExprType::prvalue(size_type()),
        UnaryOperator::Bracketed => operand,
    }
}

fn binary_type(operator: BinaryOperator, lhs: ExprType, rhs: ExprType, cpp: bool) -> ExprType {
    if operator.is_assignment() {
        return if cpp {
            ExprType::lvalue(lhs.ty)
        } else {
            ExprType::prvalue(lhs.ty.unqualified())
        };
    }
    if operator.is_relational() {
        return ExprType::prvalue(truth_type(cpp));
    }
    if lhs.ty.is_problem() {
        return lhs;
    }
    if rhs.ty.is_problem() {
        return rhs;
    }

    let left = decay(&lhs.ty);
    let right = decay(&rhs.ty);
    match operator {
        BinaryOperator::Plus | BinaryOperator::Minus => {
            match (left.is_pointer(), right.is_pointer()) {
                (true, true) if operator == BinaryOperator::Minus => ExprType::prvalue(
                    Type::with_modifiers(BasicKind::Int, BasicModifiers::LONG),
                ),
                (true, false) => ExprType::prvalue(left.unqualified()),
                (false, true) if operator == BinaryOperator::Plus => {
                    ExprType::prvalue(right.unqualified())
                }
                _ => ExprType::prvalue(usual_arithmetic(&left, &right)),
            }
        }
        BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => {
            ExprType::prvalue(promote(&left))
        }
        _ => ExprType::prvalue(usual_arithmetic(&left, &right)),
    }
}

fn conditional_type(positive: ExprType, negative: ExprType) -> ExprType {
    if positive.ty.is_same_type(&negative.ty) {
        let category = if positive.is_lvalue() && negative.is_lvalue() {
            ValueCategory::LValue
        } else {
            ValueCategory::PRValue
        };
        return ExprType {
            ty: positive.ty,
            category,
            null_constant: false,
        };
    }
    if positive.ty.is_arithmetic() && negative.ty.is_arithmetic() {
        return ExprType::prvalue(usual_arithmetic(&positive.ty, &negative.ty));
    }
    if negative.null_constant && decay(&positive.ty).is_pointer() {
        return ExprType::prvalue(decay(&positive.ty));
    }
    if positive.null_constant && decay(&negative.ty).is_pointer() {
        return ExprType::prvalue(decay(&negative.ty));
    }
    ExprType::prvalue(decay(&positive.ty))
}

fn truth_type(cpp: bool) -> Type {
    if cpp {
        Type::basic(BasicKind::Bool)
    } else {
        Type::int()
    }
}

fn size_type() -> Type {
    Type::with_modifiers(BasicKind::Int, BasicModifiers::UNSIGNED | BasicModifiers::LONG)
}

/// Array-to-pointer and function-to-pointer conversion.
pub(crate) fn decay(ty: &Type) -> Type {
    match ty.canonical() {
        Type::Array(array) => Type::Pointer(PointerType {
            target: array.element.clone(),
            qualifiers: TypeQualifiers::empty(),
        }),
        Type::Function(_) => Type::pointer_to(ty.clone()),
        _ => ty.clone(),
    }
}

/// Integer literal type from its suffix.
fn integer_literal_type(value: &str) -> Type {
    let suffix: String = value
        .chars()
        .rev()
        .take_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'))
        .collect();
    let mut modifiers = BasicModifiers::empty();
    if suffix.contains(['u', 'U']) {
        modifiers |= BasicModifiers::UNSIGNED;
    }
    match suffix.chars().filter(|c| matches!(c, 'l' | 'L')).count() {
        0 => {}
        1 => modifiers |= BasicModifiers::LONG,
        _ => modifiers |= BasicModifiers::LONG_LONG,
    }
    Type::with_modifiers(BasicKind::Int, modifiers)
}

/// Value of an integer literal, ignoring its suffix.
pub(crate) fn integer_value(text: &str) -> Option<u64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok();
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return u64::from_str_radix(&digits[1..], 8).ok();
    }
    digits.parse().ok()
}

/// Conversion rank of an arithmetic type: floating types above every integer type, longer
/// integers above shorter ones.
pub(crate) fn arithmetic_rank(ty: &Type) -> Option<(u8, bool)> {
    let basic = match ty.canonical() {
        Type::Basic(basic) => *basic,
        Type::Enumeration(_) => return Some((2, false)),
        _ => return None,
    };
    let unsigned = basic.modifiers.contains(BasicModifiers::UNSIGNED);
    let rank = match basic.kind {
        BasicKind::Void => return None,
        BasicKind::Bool => 0,
        BasicKind::Char => 1,
        BasicKind::WChar => 2,
        BasicKind::Int | BasicKind::Unspecified => {
            if basic.modifiers.contains(BasicModifiers::LONG_LONG) {
                4
            } else if basic.modifiers.contains(BasicModifiers::LONG) {
                3
            } else if basic.modifiers.contains(BasicModifiers::SHORT) {
                1
            } else {
                2
            }
        }
        BasicKind::Float => 10,
        BasicKind::Double if basic.modifiers.contains(BasicModifiers::LONG) => 12,
        BasicKind::Double => 11,
    };
    Some((rank, unsigned))
}

/// Integral promotion; other types only lose their qualifiers.
pub(crate) fn promote(ty: &Type) -> Type {
    match arithmetic_rank(ty) {
        Some((rank, _)) if rank < 2 => Type::int(),
        Some(_) if matches!(ty.canonical(), Type::Enumeration(_)) => Type::int(),
        _ => ty.unqualified(),
    }
}

/// Whether converting `from` to `to` is an integral or floating-point promotion.
pub(crate) fn is_promotion(from: &Type, to: &Type) -> bool {
    let (Some((from_rank, _)), Some(to)) = (arithmetic_rank(from), basic_of(to)) else {
        return false;
    };
    match to.kind {
        BasicKind::Int | BasicKind::Unspecified => {
            to.modifiers.is_empty()
                && (from_rank < 2 || matches!(from.canonical(), Type::Enumeration(_)))
        }
        BasicKind::Double => {
            !to.modifiers.contains(BasicModifiers::LONG) && from_rank == 10
        }
        _ => false,
    }
}

fn basic_of(ty: &Type) -> Option<BasicType> {
    match ty.canonical() {
        Type::Basic(basic) => Some(*basic),
        _ => None,
    }
}

fn usual_arithmetic(lhs: &Type, rhs: &Type) -> Type {
    let left = promote(lhs);
    let right = promote(rhs);
    match (arithmetic_rank(&left), arithmetic_rank(&right)) {
        (Some(l), Some(r)) => {
            if l.0 > r.0 || (l.0 == r.0 && l.1) {
                left
            } else {
                right
            }
        }
        (Some(_), None) => left,
        _ => right,
    }
}
