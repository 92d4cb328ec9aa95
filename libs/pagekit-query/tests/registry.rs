#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

use std::sync::Arc;

use pagekit_query::{
    CompareOp, ConverterRegistration, ConverterRegistry, Driver, FieldKind, FilterError,
    LikeConverter, LikePattern, NotLikeConverter, Predicate, RangeConverter, Value,
};

fn convert(registry: &ConverterRegistry, driver: Driver, raw: &str, kind: FieldKind) -> Option<Predicate> {
    registry
        .resolve(driver, raw)
        .map(|resolved| resolved.convert("f", kind).unwrap())
}

#[test]
fn builtins_convert_through_the_registry() {
    let registry = ConverterRegistry::with_builtins();

    assert_eq!(
        convert(&registry, Driver::Relational, "range[1,2[", FieldKind::I64),
        Some(Predicate::all(vec![
            Predicate::compare("f", CompareOp::Ge, Value::I64(1)),
            Predicate::compare("f", CompareOp::Lt, Value::I64(2)),
        ]))
    );
    assert_eq!(
        convert(&registry, Driver::Document, "range]1.5,[", FieldKind::F64),
        Some(Predicate::compare("f", CompareOp::Gt, Value::F64(1.5)))
    );
    assert_eq!(
        convert(&registry, Driver::Relational, "like*son", FieldKind::String),
        Some(Predicate::like("f", LikePattern::parse("*son")))
    );
    assert_eq!(
        convert(&registry, Driver::Document, "notlikeadmin?", FieldKind::String),
        Some(Predicate::not_like("f", LikePattern::parse("admin?")))
    );
}

#[test]
fn unmatched_values_are_left_to_equality() {
    let registry = ConverterRegistry::with_builtins();
    for raw in ["range[,]", "range(1,2)", "like", "notlike", "Like*x", "active"] {
        assert!(registry.resolve(Driver::Relational, raw).is_none(), "{raw}");
    }
}

#[test]
fn range_bound_cast_failure_surfaces() {
    let registry = ConverterRegistry::with_builtins();
    let err = registry
        .resolve(Driver::Relational, "range[2024-13-01,]")
        .unwrap()
        .convert("created", FieldKind::Date)
        .unwrap_err();
    assert!(matches!(err, FilterError::Conversion { kind: FieldKind::Date, .. }), "{err:?}");
}

#[test]
fn builtins_reused_under_custom_patterns() {
    let registry = ConverterRegistry::with_builtins()
        .register(
            ConverterRegistration::new(&[Driver::Document], r"^!(.+)$", Arc::new(NotLikeConverter))
                .unwrap(),
        )
        .register(
            ConverterRegistration::new(Driver::ALL, r"^between(.+)$", Arc::new(RangeConverter))
                .unwrap(),
        );

    assert_eq!(
        convert(&registry, Driver::Document, "!tmp*", FieldKind::String),
        Some(Predicate::not_like("f", LikePattern::parse("tmp*")))
    );
    assert!(registry.resolve(Driver::Relational, "!tmp*").is_none());
    assert_eq!(
        convert(&registry, Driver::Relational, "between[3,4]", FieldKind::I64),
        Some(Predicate::all(vec![
            Predicate::compare("f", CompareOp::Ge, Value::I64(3)),
            Predicate::compare("f", CompareOp::Le, Value::I64(4)),
        ]))
    );
    assert!(registry.resolve(Driver::Relational, "between[,]").is_none());
}

#[test]
fn later_registrations_only_see_what_builtins_leave() {
    let registry = ConverterRegistry::with_builtins().register(
        ConverterRegistration::new(Driver::ALL, r"^l(.*)$", Arc::new(LikeConverter)).unwrap(),
    );
    let resolved = registry.resolve(Driver::Relational, "like*").unwrap();
    assert_eq!(resolved.operand(), "*");

    let resolved = registry.resolve(Driver::Relational, "lo*").unwrap();
    assert_eq!(resolved.operand(), "o*");
}
