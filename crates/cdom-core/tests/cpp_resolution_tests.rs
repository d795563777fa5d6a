//! Integration tests for C++ lookup and overload resolution

mod common;

use cdom_core::ast::{AstBuilder, BinaryOperator, Declarator, LiteralKind};
use cdom_core::types::{BasicKind, BasicModifiers, CompositeKind, TypeQualifiers};
use cdom_core::{BindingKind, Language, ProblemKind, TranslationUnit};
use common::*;

fn reference_param(b: &mut AstBuilder, qualifiers: TypeQualifiers, name: &str) -> cdom_core::NodeId {
    let spec = b.basic(BasicKind::Int);
    b.set_qualifiers(spec, qualifiers);
    let n = b.name(name);
    let declarator = b.declarator(Declarator::named(n).reference());
    b.parameter(spec, declarator)
}

fn problem_of(unit: &mut TranslationUnit, name: cdom_core::NodeId) -> Option<ProblemKind> {
    let binding = unit.resolve_binding(name)?;
    unit.binding(binding).kind.problem()
}

mod overloads {
    use super::*;

    fn overloaded_g() -> TranslationUnit {
        // void g(int a);
        // void g(double a);
        // void t() { g(1); g(2.0); g(1, 2); }
        let mut b = AstBuilder::new(Language::Cpp);
        let pi = param(&mut b, BasicKind::Int, "a");
        let gi = prototype(&mut b, BasicKind::Void, "g", vec![pi]);
        let pd = param(&mut b, BasicKind::Double, "a");
        let gd = prototype(&mut b, BasicKind::Void, "g", vec![pd]);
        let one = b.int_literal("1");
        let c1 = call_stmt(&mut b, "g", vec![one]);
        let two = b.literal(LiteralKind::Float, "2.0");
        let c2 = call_stmt(&mut b, "g", vec![two]);
        let x = b.int_literal("1");
        let y = b.int_literal("2");
        let c3 = call_stmt(&mut b, "g", vec![x, y]);
        let t = function(&mut b, BasicKind::Void, "t", vec![], vec![c1, c2, c3]);
        let tu = b.translation_unit(vec![gi, gd, t]);
        TranslationUnit::new(b.finish(tu).unwrap())
    }

    #[test]
    fn exact_match_selects_overload() {
        let mut unit = overloaded_g();
        let gs = names(unit.ast(), "g");
        let by_int = unit.resolve_binding(gs[0]).unwrap();
        let by_double = unit.resolve_binding(gs[1]).unwrap();
        assert_ne!(by_int, by_double);
        assert_eq!(
            unit.binding_type(by_double).map(|t| t.to_string()).as_deref(),
            Some("void (double)")
        );

        assert_eq!(unit.resolve_binding(gs[2]), Some(by_int));
        assert_eq!(unit.resolve_binding(gs[3]), Some(by_double));
        assert_eq!(unit.references(by_int), vec![gs[2]]);
    }

    #[test]
    fn deeply_nested_argument_selects_overload() {
        // void g(int a); void g(double a);
        // void t() { g(1 + 1 + ... + 1); }
        let mut b = AstBuilder::new(Language::Cpp);
        let pi = param(&mut b, BasicKind::Int, "a");
        let gi = prototype(&mut b, BasicKind::Void, "g", vec![pi]);
        let pd = param(&mut b, BasicKind::Double, "a");
        let gd = prototype(&mut b, BasicKind::Void, "g", vec![pd]);
        let mut sum = b.int_literal("1");
        for _ in 0..5000 {
            let one = b.int_literal("1");
            sum = b.binary(BinaryOperator::Plus, sum, one);
        }
        let call = call_stmt(&mut b, "g", vec![sum]);
        let t = function(&mut b, BasicKind::Void, "t", vec![], vec![call]);
        let tu = b.translation_unit(vec![gi, gd, t]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let gs = names(unit.ast(), "g");
        let by_int = unit.resolve_binding(gs[0]).unwrap();
        assert_eq!(unit.resolve_binding(gs[2]), Some(by_int));
        assert!(unit.problems().is_empty());
    }

    #[test]
    fn wrong_argument_count_has_no_viable_overload() {
        let mut unit = overloaded_g();
        let gs = names(unit.ast(), "g");
        assert_eq!(problem_of(&mut unit, gs[4]), Some(ProblemKind::NoViableOverload));

        let kinds: Vec<ProblemKind> = unit.problems().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProblemKind::NoViableOverload]);
    }

    #[test]
    fn equally_good_conversions_are_ambiguous() {
        // void a(long v);
        // void a(short v);
        // void t() { a(1); }
        let mut b = AstBuilder::new(Language::Cpp);
        let long = b.basic_with(BasicKind::Int, BasicModifiers::LONG);
        let lv = b.named_declarator("v");
        let lp = b.parameter(long, lv);
        let al = prototype(&mut b, BasicKind::Void, "a", vec![lp]);
        let short = b.basic_with(BasicKind::Int, BasicModifiers::SHORT);
        let sv = b.named_declarator("v");
        let sp = b.parameter(short, sv);
        let as_ = prototype(&mut b, BasicKind::Void, "a", vec![sp]);
        let one = b.int_literal("1");
        let call = call_stmt(&mut b, "a", vec![one]);
        let t = function(&mut b, BasicKind::Void, "t", vec![], vec![call]);
        let tu = b.translation_unit(vec![al, as_, t]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let calls = names(unit.ast(), "a");
        assert_eq!(problem_of(&mut unit, calls[2]), Some(ProblemKind::AmbiguousCall));
    }

    #[test]
    fn redeclaration_with_same_signature_is_one_function() {
        // void h(int a);
        // void h(int b) {}
        let mut b = AstBuilder::new(Language::Cpp);
        let pa = param(&mut b, BasicKind::Int, "a");
        let proto = prototype(&mut b, BasicKind::Void, "h", vec![pa]);
        let pb = param(&mut b, BasicKind::Int, "b");
        let def = function(&mut b, BasicKind::Void, "h", vec![pb], vec![]);
        let tu = b.translation_unit(vec![proto, def]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let hs = names(unit.ast(), "h");
        let binding = unit.resolve_binding(hs[0]).unwrap();
        assert_eq!(unit.resolve_binding(hs[1]), Some(binding));
        assert_eq!(unit.declarations_in_ast(binding), hs);
        assert_eq!(unit.binding(binding).definition, Some(hs[1]));
        assert!(unit.problems().is_empty());
    }

    #[test]
    fn overload_differing_only_in_return_type_is_invalid() {
        // int f(int a);
        // double f(int a);
        // void f(double a);
        let mut b = AstBuilder::new(Language::Cpp);
        let pa = param(&mut b, BasicKind::Int, "a");
        let first = prototype(&mut b, BasicKind::Int, "f", vec![pa]);
        let pa = param(&mut b, BasicKind::Int, "a");
        let second = prototype(&mut b, BasicKind::Double, "f", vec![pa]);
        let pd = param(&mut b, BasicKind::Double, "a");
        let third = prototype(&mut b, BasicKind::Void, "f", vec![pd]);
        let tu = b.translation_unit(vec![first, second, third]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let fs = names(unit.ast(), "f");
        assert_eq!(problem_of(&mut unit, fs[1]), Some(ProblemKind::InvalidRedeclaration));
        assert_eq!(problem_of(&mut unit, fs[0]), None);
        assert_eq!(problem_of(&mut unit, fs[2]), None);
        assert_ne!(unit.resolve_binding(fs[0]), unit.resolve_binding(fs[2]));

        let kinds: Vec<ProblemKind> = unit.problems().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProblemKind::InvalidRedeclaration]);
    }

    #[test]
    fn temporaries_bind_only_to_const_references() {
        // void r(int& a);
        // void cr(const int& a);
        // void t() { r(1); cr(1); int v; r(v); }
        let mut b = AstBuilder::new(Language::Cpp);
        let ra = reference_param(&mut b, TypeQualifiers::empty(), "a");
        let r = prototype(&mut b, BasicKind::Void, "r", vec![ra]);
        let ca = reference_param(&mut b, TypeQualifiers::CONST, "a");
        let cr = prototype(&mut b, BasicKind::Void, "cr", vec![ca]);
        let one = b.int_literal("1");
        let r_temp = call_stmt(&mut b, "r", vec![one]);
        let one = b.int_literal("1");
        let cr_temp = call_stmt(&mut b, "cr", vec![one]);
        let v = local_int(&mut b, "v");
        let arg = b.id_expression("v");
        let r_lvalue = call_stmt(&mut b, "r", vec![arg]);
        let t = function(&mut b, BasicKind::Void, "t", vec![], vec![r_temp, cr_temp, v, r_lvalue]);
        let tu = b.translation_unit(vec![r, cr, t]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let rs = names(unit.ast(), "r");
        let crs = names(unit.ast(), "cr");
        let r_binding = unit.resolve_binding(rs[0]).unwrap();
        let cr_binding = unit.resolve_binding(crs[0]).unwrap();

        assert_eq!(problem_of(&mut unit, rs[1]), Some(ProblemKind::NoViableOverload));
        assert_eq!(unit.resolve_binding(crs[1]), Some(cr_binding));
        assert_eq!(unit.resolve_binding(rs[2]), Some(r_binding));
        assert_eq!(
            unit.binding_type(cr_binding).map(|t| t.to_string()).as_deref(),
            Some("void (const int &)")
        );
    }
}

mod namespaces {
    use super::*;

    #[test]
    fn using_directive_makes_members_visible() {
        // namespace N { int v; }
        // using namespace N;
        // int w = v;
        let mut b = AstBuilder::new(Language::Cpp);
        let spec = b.basic(BasicKind::Int);
        let v = b.variable(spec, "v");
        let ns = b.namespace("N", vec![v]);
        let using = b.using_directive("N");
        let v_use = b.id_expression("v");
        let w = int_with(&mut b, "w", v_use);
        let tu = b.translation_unit(vec![ns, using, w]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let ns_names = names(unit.ast(), "N");
        let namespace = unit.resolve_binding(ns_names[0]).unwrap();
        assert_eq!(unit.binding(namespace).kind, BindingKind::Namespace);
        assert_eq!(unit.resolve_binding(ns_names[1]), Some(namespace));
        assert_eq!(unit.binding_type(namespace), None);

        let vs = names(unit.ast(), "v");
        let member = unit.resolve_binding(vs[0]).unwrap();
        assert_eq!(unit.resolve_binding(vs[1]), Some(member));
        assert!(unit.problems().is_empty());
    }

    #[test]
    fn namespace_members_are_hidden_without_using() {
        // namespace N { int v; }
        // int w = v;
        let mut b = AstBuilder::new(Language::Cpp);
        let spec = b.basic(BasicKind::Int);
        let v = b.variable(spec, "v");
        let ns = b.namespace("N", vec![v]);
        let v_use = b.id_expression("v");
        let w = int_with(&mut b, "w", v_use);
        let tu = b.translation_unit(vec![ns, w]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let vs = names(unit.ast(), "v");
        assert_eq!(problem_of(&mut unit, vs[1]), Some(ProblemKind::NameNotFound));
    }

    #[test]
    fn reopened_namespace_sees_only_earlier_definitions() {
        // namespace N { void a() { b(); } }
        // namespace N { void b(); void c() { b(); } }
        let mut b = AstBuilder::new(Language::Cpp);
        let early_call = call_stmt(&mut b, "b", vec![]);
        let a = function(&mut b, BasicKind::Void, "a", vec![], vec![early_call]);
        let first = b.namespace("N", vec![a]);
        let proto = prototype(&mut b, BasicKind::Void, "b", vec![]);
        let late_call = call_stmt(&mut b, "b", vec![]);
        let c = function(&mut b, BasicKind::Void, "c", vec![], vec![late_call]);
        let second = b.namespace("N", vec![proto, c]);
        let tu = b.translation_unit(vec![first, second]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let bs = names(unit.ast(), "b");
        let declared = unit.resolve_binding(bs[1]).unwrap();
        assert_eq!(problem_of(&mut unit, bs[0]), Some(ProblemKind::NameNotFound));
        assert_eq!(unit.resolve_binding(bs[2]), Some(declared));

        let ns_names = names(unit.ast(), "N");
        assert_eq!(
            unit.resolve_binding(ns_names[0]),
            unit.resolve_binding(ns_names[1])
        );
    }

    #[test]
    fn using_a_non_namespace_is_invalid() {
        // int N;
        // using namespace N;
        let mut b = AstBuilder::new(Language::Cpp);
        let spec = b.basic(BasicKind::Int);
        let var = b.variable(spec, "N");
        let using = b.using_directive("N");
        let tu = b.translation_unit(vec![var, using]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let ns_names = names(unit.ast(), "N");
        assert_eq!(problem_of(&mut unit, ns_names[1]), Some(ProblemKind::InvalidUsing));
    }
}

mod enumerations {
    use super::*;

    #[test]
    fn enumerators_have_the_enumeration_type() {
        // enum color { red };
        // int v = red;
        let mut b = AstBuilder::new(Language::Cpp);
        let red = b.enumerator("red", None);
        let color = b.enumeration("color", vec![red]);
        let color = b.simple_declaration(color, vec![]);
        let red_use = b.id_expression("red");
        let v = int_with(&mut b, "v", red_use);
        let tu = b.translation_unit(vec![color, v]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let reds = names(unit.ast(), "red");
        let red = unit.resolve_binding(reds[0]).unwrap();
        assert_eq!(unit.resolve_binding(reds[1]), Some(red));
        assert_eq!(
            unit.binding_type(red).map(|t| t.to_string()).as_deref(),
            Some("enum color")
        );
    }
}

mod classes {
    use super::*;

    #[test]
    fn members_are_found_in_base_classes() {
        // struct B { int m; };
        // struct D : B { int n; };
        // void h() { D d; d.m = 1; d.n = 2; }
        let mut b = AstBuilder::new(Language::Cpp);
        let spec = b.basic(BasicKind::Int);
        let m = b.variable(spec, "m");
        let base = b.composite(CompositeKind::Struct, "B", vec![m]);
        let base = b.simple_declaration(base, vec![]);
        let spec = b.basic(BasicKind::Int);
        let n = b.variable(spec, "n");
        let derived = b.derived_composite(CompositeKind::Struct, "D", &["B"], vec![n]);
        let derived = b.simple_declaration(derived, vec![]);
        let d_spec = b.named_type("D");
        let d = b.variable(d_spec, "d");
        let d = b.declaration_statement(d);
        let owner = b.id_expression("d");
        let dm = b.field_reference(owner, "m", false);
        let one = b.int_literal("1");
        let store_m = assign(&mut b, dm, one);
        let owner = b.id_expression("d");
        let dn = b.field_reference(owner, "n", false);
        let two = b.int_literal("2");
        let store_n = assign(&mut b, dn, two);
        let h = function(&mut b, BasicKind::Void, "h", vec![], vec![d, store_m, store_n]);
        let tu = b.translation_unit(vec![base, derived, h]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let ms = names(unit.ast(), "m");
        let ns = names(unit.ast(), "n");
        assert_eq!(unit.resolve_binding(ms[1]), unit.resolve_binding(ms[0]));
        assert_eq!(unit.resolve_binding(ns[1]), unit.resolve_binding(ns[0]));

        let bs = names(unit.ast(), "B");
        let base = unit.resolve_binding(bs[0]).unwrap();
        assert_eq!(unit.resolve_binding(bs[1]), Some(base));
        assert_eq!(unit.composite_fields(base).len(), 1);
        assert!(unit.problems().is_empty());
    }

    fn converting(explicit: bool) -> TranslationUnit {
        // struct P { [explicit] P(int v); };
        // void take(P p);
        // void k() { take(3); }
        let mut b = AstBuilder::new(Language::Cpp);
        let v = param(&mut b, BasicKind::Int, "v");
        let ctor_name = b.name("P");
        let ctor = b.declarator(Declarator::named(ctor_name).function(vec![v]));
        let ctor_spec = b.basic(BasicKind::Unspecified);
        if explicit {
            b.set_explicit(ctor_spec);
        }
        let ctor = b.simple_declaration(ctor_spec, vec![ctor]);
        let class = b.composite(CompositeKind::Struct, "P", vec![ctor]);
        let class = b.simple_declaration(class, vec![]);
        let p_spec = b.named_type("P");
        let p_decl = b.named_declarator("p");
        let p = b.parameter(p_spec, p_decl);
        let take = prototype(&mut b, BasicKind::Void, "take", vec![p]);
        let three = b.int_literal("3");
        let call = call_stmt(&mut b, "take", vec![three]);
        let k = function(&mut b, BasicKind::Void, "k", vec![], vec![call]);
        let tu = b.translation_unit(vec![class, take, k]);
        TranslationUnit::new(b.finish(tu).unwrap())
    }

    #[test]
    fn converting_constructor_makes_argument_viable() {
        let mut unit = converting(false);

        let ps = names(unit.ast(), "P");
        let ctor = unit.resolve_binding(ps[1]).unwrap();
        assert!(matches!(
            unit.binding(ctor).kind,
            BindingKind::Function(info) if info.constructor && !info.explicit
        ));

        let takes = names(unit.ast(), "take");
        let take = unit.resolve_binding(takes[0]).unwrap();
        assert_eq!(unit.resolve_binding(takes[1]), Some(take));
    }

    #[test]
    fn explicit_constructor_does_not_convert() {
        let mut unit = converting(true);

        let takes = names(unit.ast(), "take");
        assert_eq!(problem_of(&mut unit, takes[1]), Some(ProblemKind::NoViableOverload));
    }

    #[test]
    fn const_object_calls_const_member_function() {
        // struct C { int get(); int get() const; };
        // void k() { const C c; c.get(); }
        let mut b = AstBuilder::new(Language::Cpp);
        let plain_name = b.name("get");
        let plain = b.declarator(Declarator::named(plain_name).function(vec![]));
        let spec = b.basic(BasicKind::Int);
        let plain = b.simple_declaration(spec, vec![plain]);
        let const_name = b.name("get");
        let constant = b.declarator(Declarator::named(const_name).const_member_function(vec![]));
        let spec = b.basic(BasicKind::Int);
        let constant = b.simple_declaration(spec, vec![constant]);
        let class = b.composite(CompositeKind::Struct, "C", vec![plain, constant]);
        let class = b.simple_declaration(class, vec![]);

        let c_spec = b.named_type("C");
        b.set_qualifiers(c_spec, TypeQualifiers::CONST);
        let c = b.variable(c_spec, "c");
        let c = b.declaration_statement(c);
        let owner = b.id_expression("c");
        let member = b.field_reference(owner, "get", false);
        let call = b.call(member, vec![]);
        let call = b.expression_statement(call);
        let k = function(&mut b, BasicKind::Void, "k", vec![], vec![c, call]);
        let tu = b.translation_unit(vec![class, k]);
        let mut unit = TranslationUnit::new(b.finish(tu).unwrap());

        let gets = names(unit.ast(), "get");
        let non_const = unit.resolve_binding(gets[0]).unwrap();
        let constant = unit.resolve_binding(gets[1]).unwrap();
        assert_ne!(non_const, constant);
        assert_eq!(unit.resolve_binding(gets[2]), Some(constant));
    }
}
