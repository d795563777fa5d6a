//! C++ overload resolution
//!
//! Each argument of a call is ranked against the matching parameter of every candidate. A
//! candidate is viable when every argument has an implicit conversion; the best viable candidate
//! is the one at least as good as every other on each argument and strictly better on one.

use super::bindings::BindingId;
use super::expressions::{ExprType, decay, is_promotion};
use crate::types::{FunctionType, Type, TypeQualifiers};

/// Implicit conversion ranks, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConversionRank {
    Exact,
    Promotion,
    Conversion,
    DerivedToBase,
    UserDefined,
    Ellipsis,
}

/// Cost of one implicit conversion. Ties in rank are broken by the number of cv-qualifiers the
/// conversion adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversionCost {
    pub rank: ConversionRank,
    pub cv_adjust: u32,
}

impl ConversionCost {
    pub fn new(rank: ConversionRank) -> Self {
        Self { rank, cv_adjust: 0 }
    }

    fn with_cv(rank: ConversionRank, from: TypeQualifiers, to: TypeQualifiers) -> Self {
        Self {
            rank,
            cv_adjust: (to - from).bits().count_ones(),
        }
    }
}

/// Class hierarchy facts overload resolution needs.
pub trait ClassRelations {
    /// Whether `base` is a direct or indirect base of `derived`.
    fn is_base_of(&mut self, base: BindingId, derived: BindingId) -> bool;

    /// Parameter types of the non-explicit constructors of `class` callable with one argument.
    fn converting_constructors(&mut self, class: BindingId) -> Vec<Type>;
}

/// A function considered for a call.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub parameters: Vec<Type>,
    /// Arguments needed before default arguments take over.
    pub required: usize,
    pub variadic: bool,
    /// cv-qualification of a member function, matched against the implied object argument.
    pub object_qualifiers: Option<TypeQualifiers>,
}

impl Candidate {
    pub fn from_function(function: &FunctionType, required: Option<usize>) -> Self {
        let parameters = function.call_parameters().to_vec();
        Self {
            required: required.unwrap_or(parameters.len()),
            parameters,
            variadic: function.variadic,
            object_qualifiers: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Best(usize),
    Ambiguous,
    NoViable,
}

/// Per-argument costs of calling `candidate`, or `None` when it is not viable. The implied
/// object argument of a member call comes first.
pub fn candidate_costs(
    candidate: &Candidate,
    arguments: &[ExprType],
    object: Option<TypeQualifiers>,
    relations: &mut dyn ClassRelations,
) -> Option<Vec<ConversionCost>> {
    if arguments.len() < candidate.required {
        return None;
    }
    if arguments.len() > candidate.parameters.len() && !candidate.variadic {
        return None;
    }

    let mut costs = Vec::with_capacity(arguments.len() + 1);
    if let (Some(object), Some(function)) = (object, candidate.object_qualifiers) {
        if !function.contains(object) {
            return None;
        }
        costs.push(ConversionCost::with_cv(ConversionRank::Exact, object, function));
    }
    for (index, argument) in arguments.iter().enumerate() {
        let cost = match candidate.parameters.get(index) {
            Some(parameter) => implicit_conversion(argument, parameter, relations, true)?,
            None => ConversionCost::new(ConversionRank::Ellipsis),
        };
        costs.push(cost);
    }
    Some(costs)
}

/// Implicit conversion of `argument` to `parameter`.
pub fn implicit_conversion(
    argument: &ExprType,
    parameter: &Type,
    relations: &mut dyn ClassRelations,
    allow_user_defined: bool,
) -> Option<ConversionCost> {
    if argument.ty.is_problem() || parameter.is_problem() {
        return None;
    }
    match parameter.referenced() {
        Some(reference) => reference_binding(
            argument,
            &reference.target,
            reference.rvalue,
            relations,
            allow_user_defined,
        ),
        None => value_conversion(argument, parameter, relations, allow_user_defined),
    }
}

fn reference_binding(
    argument: &ExprType,
    target: &Type,
    rvalue: bool,
    relations: &mut dyn ClassRelations,
    allow_user_defined: bool,
) -> Option<ConversionCost> {
    let target_quals = target.qualifiers();
    let argument_quals = argument.ty.qualifiers();

    if argument.is_lvalue() != rvalue {
        if argument.ty.is_same_ignoring_cv(target) {
            return target_quals
                .contains(argument_quals)
                .then(|| ConversionCost::with_cv(ConversionRank::Exact, argument_quals, target_quals));
        }
        if let (Some(from), Some(to)) = (argument.ty.as_composite(), target.as_composite()) {
            if relations.is_base_of(to.binding, from.binding) {
                return target_quals.contains(argument_quals).then(|| {
                    ConversionCost::with_cv(ConversionRank::DerivedToBase, argument_quals, target_quals)
                });
            }
        }
    }

    // A temporary only binds to `const T&` or `T&&`.
    let binds_temporary = rvalue
        || (target_quals.contains(TypeQualifiers::CONST)
            && !target_quals.contains(TypeQualifiers::VOLATILE));
    if !binds_temporary {
        return None;
    }
    if rvalue && argument.is_lvalue() && argument.ty.is_same_ignoring_cv(target) {
        return None;
    }
    value_conversion(argument, &target.unqualified(), relations, allow_user_defined)
}

fn value_conversion(
    argument: &ExprType,
    parameter: &Type,
    relations: &mut dyn ClassRelations,
    allow_user_defined: bool,
) -> Option<ConversionCost> {
    let from = decay(&argument.ty);
    let to = parameter;

    if from.is_same_ignoring_cv(to) {
        return Some(ConversionCost::new(ConversionRank::Exact));
    }

    if from.is_pointer() && to.is_pointer() {
        if let Some(added) = qualification_adjustment(&from, to) {
            return Some(ConversionCost {
                rank: ConversionRank::Exact,
                cv_adjust: added,
            });
        }
        return pointer_conversion(&from, to, relations);
    }

    if argument.null_constant && to.is_pointer() {
        return Some(ConversionCost::new(ConversionRank::Conversion));
    }

    if is_bool(to) && (from.is_pointer() || from.is_arithmetic()) {
        return Some(ConversionCost::new(ConversionRank::Conversion));
    }

    if from.is_arithmetic() && to.is_arithmetic() {
        if matches!(to.canonical(), Type::Enumeration(_)) {
            return None;
        }
        let rank = if is_promotion(&from, to) {
            ConversionRank::Promotion
        } else {
            ConversionRank::Conversion
        };
        return Some(ConversionCost::new(rank));
    }

    if let (Some(source), Some(target)) = (from.as_composite(), to.as_composite()) {
        if relations.is_base_of(target.binding, source.binding) {
            return Some(ConversionCost::new(ConversionRank::DerivedToBase));
        }
    }

    if allow_user_defined {
        if let Some(class) = to.as_composite() {
            let converts = relations
                .converting_constructors(class.binding)
                .iter()
                .any(|p| implicit_conversion(argument, p, relations, false).is_some());
            if converts {
                return Some(ConversionCost::new(ConversionRank::UserDefined));
            }
        }
    }
    None
}

fn is_bool(ty: &Type) -> bool {
    matches!(ty.canonical(), Type::Basic(b) if b.kind == crate::types::BasicKind::Bool)
}

/// Pointer to `void` and derived-to-base pointer conversions.
fn pointer_conversion(
    from: &Type,
    to: &Type,
    relations: &mut dyn ClassRelations,
) -> Option<ConversionCost> {
    let source = from.pointee()?;
    let target = to.pointee()?;
    if !target.qualifiers().contains(source.qualifiers()) {
        return None;
    }
    if target.is_void() && source.as_function().is_none() {
        return Some(ConversionCost::new(ConversionRank::Conversion));
    }
    let (Some(source), Some(target)) = (source.as_composite(), target.as_composite()) else {
        return None;
    };
    relations
        .is_base_of(target.binding, source.binding)
        .then(|| ConversionCost::new(ConversionRank::DerivedToBase))
}

/// Qualification conversion between two pointer types with the same innermost type, returning
/// the number of qualifiers added. Adding a qualifier at some level requires `const` at every
/// level in between, so `T**` converts to `T* const*` but not to `const T**`.
pub fn qualification_adjustment(from: &Type, to: &Type) -> Option<u32> {
    let mut source = from.normalized();
    let mut target = to.normalized();
    let mut levels = Vec::new();
    loop {
        let (next_source, next_target) = match (&source, &target) {
            (Type::Pointer(s), Type::Pointer(t)) => ((*s.target).clone(), (*t.target).clone()),
            _ => break,
        };
        levels.push((next_source.qualifiers(), next_target.qualifiers()));
        source = next_source;
        target = next_target;
    }
    if levels.is_empty() || !source.is_same_ignoring_cv(&target) {
        return None;
    }

    let mut const_so_far = true;
    let mut added = 0;
    for (source_quals, target_quals) in levels {
        if !target_quals.contains(source_quals) {
            return None;
        }
        if source_quals != target_quals {
            if !const_so_far {
                return None;
            }
            added += (target_quals - source_quals).bits().count_ones();
        }
        const_so_far &= target_quals.contains(TypeQualifiers::CONST);
    }
    Some(added)
}

/// Picks the best viable candidate from per-candidate costs.
pub fn select_best(costs: &[Option<Vec<ConversionCost>>]) -> Selection {
    let viable: Vec<(usize, &Vec<ConversionCost>)> = costs
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.as_ref().map(|c| (i, c)))
        .collect();
    if viable.is_empty() {
        return Selection::NoViable;
    }

    let best: Vec<usize> = viable
        .iter()
        .filter(|(i, candidate)| {
            viable
                .iter()
                .all(|(j, other)| i == j || is_better(candidate, other))
        })
        .map(|(i, _)| *i)
        .collect();
    match best.as_slice() {
        [only] => Selection::Best(*only),
        _ => Selection::Ambiguous,
    }
}

fn is_better(candidate: &[ConversionCost], other: &[ConversionCost]) -> bool {
    let mut strictly = false;
    for (a, b) in candidate.iter().zip(other) {
        if a > b {
            return false;
        }
        if a < b {
            strictly = true;
        }
    }
    strictly
}

/// Whether two function types declare the same overload.
pub fn same_signature(a: &FunctionType, b: &FunctionType) -> bool {
    let (left, right) = (a.call_parameters(), b.call_parameters());
    a.variadic == b.variadic
        && a.qualifiers == b.qualifiers
        && left.len() == right.len()
        && left.iter().zip(right).all(|(l, r)| l.is_same_ignoring_cv(r))
}
