mod support;

use pretty_assertions::assert_eq;
use support::{cast_targets, field, method, rendered_casts, Fixture};
use xl_core::ast::{Expr, FieldDescriptor, MethodDescriptor, Stmt};
use xl_core::pretty::{pretty, PrettyOptions};
use xl_core::types::{PrimitiveType, TypeDescriptor};
use xl_core::Result;
use xl_normalize::type_algebra::{is_denotable, ArityMismatch, SeenTypeVariables};
use xl_normalize::{
    needs_cast, CastInsertionOptions, InsertCastsOnNullabilityMismatch, NormalizationPass,
};

fn run(unit: &mut xl_core::ast::CompilationUnit) -> Result<()> {
    InsertCastsOnNullabilityMismatch::default().apply_to(unit)
}

fn void() -> TypeDescriptor {
    TypeDescriptor::void()
}

#[test]
fn test_nullable_type_argument_assignment_is_cast() -> Result<()> {
    let fx = Fixture::new();
    let source_ty = fx.boxed(fx.string().to_nullable());
    let mut unit = fx.unit(vec![method(
        "assign",
        vec![("source", source_ty.clone())],
        void(),
        vec![Stmt::local(
            "target",
            fx.boxed(fx.string()),
            Some(Expr::local("source", source_ty)),
        )],
    )]);

    run(&mut unit)?;

    let expected = "\
// Holder.java
class Holder {
    void assign(Box<String?> source) {
        Box<String> target = (Box<String>) source;
    }
}
";
    assert_eq!(pretty(&unit, PrettyOptions::default()).to_string(), expected);
    assert_eq!(cast_targets(&unit)?, vec![fx.boxed(fx.string())]);
    Ok(())
}

#[test]
fn test_wildcard_argument_to_concrete_parameter_is_cast() -> Result<()> {
    let fx = Fixture::new();
    let numbers_ty = fx.list(fx.extends_number.clone().into());
    let consume =
        MethodDescriptor::new("consume", vec![fx.list(fx.integer())], void()).with_static();
    let mut unit = fx.unit(vec![method(
        "pass",
        vec![("numbers", numbers_ty.clone())],
        void(),
        vec![Stmt::expr(Expr::invoke(
            None,
            consume,
            vec![Expr::local("numbers", numbers_ty)],
        ))],
    )]);

    run(&mut unit)?;

    assert_eq!(rendered_casts(&unit)?, vec!["(List<Integer>) numbers".to_string()]);
    Ok(())
}

#[test]
fn test_member_qualifier_is_never_cast() -> Result<()> {
    let fx = Fixture::new();
    let x_ty = fx.list(fx.string()).to_nullable();
    let size = MethodDescriptor::new("size", vec![], PrimitiveType::Int.into());
    let mut unit = fx.unit(vec![method(
        "measure",
        vec![("x", x_ty.clone())],
        PrimitiveType::Int.into(),
        vec![Stmt::ret(Some(Expr::invoke(
            Some(Expr::local("x", x_ty)),
            size,
            vec![],
        )))],
    )]);
    let before = unit.clone();

    run(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_return_casts_only_for_mismatched_value_argument() -> Result<()> {
    let fx = Fixture::new();
    let counts_ty = fx.map(fx.string(), fx.integer().to_nullable());
    let declared = fx.map(fx.string(), fx.integer());
    let mut unit = fx.unit(vec![method(
        "counts",
        vec![("counts", counts_ty.clone())],
        declared.clone(),
        vec![Stmt::ret(Some(Expr::local("counts", counts_ty)))],
    )]);

    run(&mut unit)?;

    assert_eq!(cast_targets(&unit)?, vec![declared]);
    assert_eq!(
        rendered_casts(&unit)?,
        vec!["(Map<String, Integer>) counts".to_string()]
    );
    Ok(())
}

#[test]
fn test_self_bounded_type_variable_needs_no_cast() -> Result<()> {
    let fx = Fixture::new();
    let t: TypeDescriptor = fx.comparable_t.clone().into();
    assert!(is_denotable(&t, &fx.store, &mut SeenTypeVariables::new())?);
    assert!(!needs_cast(&t, &t, &fx.store, ArityMismatch::Fail)?);

    let mut unit = fx.unit(vec![method(
        "identity",
        vec![("value", t.clone())],
        t.clone(),
        vec![
            Stmt::local("copy", t.clone(), Some(Expr::local("value", t.clone()))),
            Stmt::ret(Some(Expr::local("copy", t))),
        ],
    )]);
    let before = unit.clone();
    run(&mut unit)?;
    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_second_run_inserts_nothing() -> Result<()> {
    let fx = Fixture::new();
    let maybe = fx.string().to_nullable();
    let numbers_ty = fx.list(fx.extends_number.clone().into());
    let mut unit = fx.unit(vec![
        field("name", fx.string(), Expr::null(fx.string())),
        method(
            "mixed",
            vec![("maybe", maybe.clone()), ("numbers", numbers_ty.clone())],
            fx.list(fx.integer()),
            vec![
                Stmt::local("s", fx.string(), Some(Expr::local("maybe", maybe.clone()))),
                Stmt::ret(Some(Expr::local("numbers", numbers_ty))),
            ],
        ),
    ]);

    run(&mut unit)?;
    let once = unit.clone();
    assert_eq!(rendered_casts(&once)?.len(), 3);

    run(&mut unit)?;
    assert_eq!(unit, once);
    Ok(())
}

#[test]
fn test_nullable_value_narrowed_to_projected_target() -> Result<()> {
    let fx = Fixture::new();
    let maybe = fx.integer().to_nullable();
    let mut unit = fx.unit(vec![method(
        "narrow",
        vec![("maybe", maybe.clone())],
        void(),
        vec![
            Stmt::local("plain", fx.integer(), Some(Expr::local("maybe", maybe.clone()))),
            Stmt::local(
                "captured",
                fx.super_integer.clone().into(),
                Some(Expr::local("maybe", maybe)),
            ),
        ],
    )]);

    run(&mut unit)?;

    assert_eq!(cast_targets(&unit)?, vec![fx.integer(), fx.integer()]);
    Ok(())
}

#[test]
fn test_widening_nullability_never_casts() -> Result<()> {
    let fx = Fixture::new();
    let mut unit = fx.unit(vec![
        field("name", fx.string().to_nullable(), Expr::local("DEFAULT", fx.string())),
        method(
            "widen",
            vec![("value", fx.list(fx.string()))],
            fx.list(fx.string()).to_nullable(),
            vec![Stmt::ret(Some(Expr::local("value", fx.list(fx.string()))))],
        ),
    ]);
    let before = unit.clone();

    run(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_undenotable_targets_are_skipped() -> Result<()> {
    let fx = Fixture::new();
    let union = TypeDescriptor::union([fx.string(), fx.integer()]);
    let intersection = TypeDescriptor::intersection([fx.number(), fx.comparable(fx.integer())]);
    let mut unit = fx.unit(vec![method(
        "gate",
        vec![],
        void(),
        vec![
            Stmt::local("u", union.clone(), Some(Expr::null(union))),
            Stmt::local("i", intersection.clone(), Some(Expr::null(intersection))),
            Stmt::local("a", fx.anonymous(), Some(Expr::null(fx.anonymous()))),
            Stmt::local(
                "l",
                fx.list(fx.anonymous()),
                Some(Expr::null(fx.list(fx.anonymous()))),
            ),
        ],
    )]);
    let before = unit.clone();

    run(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_self_bounded_capture_terminates() -> Result<()> {
    let fx = Fixture::new();
    let capture: TypeDescriptor = fx.comparable_capture.clone().into();
    let mut unit = fx.unit(vec![method(
        "captured",
        vec![],
        void(),
        vec![Stmt::local(
            "c",
            capture.clone(),
            Some(Expr::local("value", capture.to_nullable())),
        )],
    )]);

    run(&mut unit)?;

    assert_eq!(cast_targets(&unit)?, vec![fx.comparable(capture)]);
    Ok(())
}

#[test]
fn test_nested_wildcard_argument_is_cast() -> Result<()> {
    let fx = Fixture::new();
    let source = fx.boxed(fx.list(fx.unbounded.clone().into()));
    let target = fx.boxed(fx.list(fx.string()));
    let mut unit = fx.unit(vec![field(
        "nested",
        target.clone(),
        Expr::local("SOURCE", source),
    )]);

    run(&mut unit)?;

    assert_eq!(cast_targets(&unit)?, vec![target]);
    Ok(())
}

#[test]
fn test_array_elements_and_components_are_cast() -> Result<()> {
    let fx = Fixture::new();
    let strings = TypeDescriptor::array(fx.string());
    let maybe_strings = TypeDescriptor::array(fx.string().to_nullable());
    let mut unit = fx.unit(vec![method(
        "arrays",
        vec![("maybe", fx.string().to_nullable()), ("loose", maybe_strings.clone())],
        void(),
        vec![
            Stmt::local(
                "literal",
                strings.clone(),
                Some(Expr::array_literal(
                    strings.clone(),
                    vec![
                        Expr::local("maybe", fx.string().to_nullable()),
                        Expr::local("FIXED", fx.string()),
                    ],
                )),
            ),
            Stmt::local("copy", strings.clone(), Some(Expr::local("loose", maybe_strings))),
        ],
    )]);

    run(&mut unit)?;

    assert_eq!(
        rendered_casts(&unit)?,
        vec!["(String) maybe".to_string(), "(String[]) loose".to_string()]
    );
    Ok(())
}

#[test]
fn test_assignment_to_field_is_cast() -> Result<()> {
    let fx = Fixture::new();
    let name = FieldDescriptor::new("name", fx.string());
    let mut unit = fx.unit(vec![method(
        "rename",
        vec![("maybe", fx.string().to_nullable())],
        void(),
        vec![Stmt::expr(Expr::assign(
            Expr::field_access(Some(Expr::this(fx.holder())), name),
            Expr::local("maybe", fx.string().to_nullable()),
        ))],
    )]);

    run(&mut unit)?;

    assert_eq!(rendered_casts(&unit)?, vec!["(String) maybe".to_string()]);
    Ok(())
}

#[test]
fn test_arity_mismatch_is_an_internal_error() {
    let fx = Fixture::new();
    let short_map = TypeDescriptor::declared(&fx.map, [fx.string()]);
    let mut unit = fx.unit(vec![field(
        "broken",
        fx.map(fx.string(), fx.integer()),
        Expr::local("SHORT", short_map),
    )]);

    let err = run(&mut unit).unwrap_err();
    assert!(err.is_internal_invariant());
}

#[test]
fn test_lossy_mode_ignores_arity_mismatch() -> Result<()> {
    let fx = Fixture::new();
    let short_map = TypeDescriptor::declared(&fx.map, [fx.string()]);
    let mut unit = fx.unit(vec![field(
        "broken",
        fx.map(fx.string(), fx.integer()),
        Expr::local("SHORT", short_map),
    )]);
    let before = unit.clone();

    InsertCastsOnNullabilityMismatch::new(CastInsertionOptions::lossy()).apply_to(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_raw_and_unrelated_types_are_left_alone() -> Result<()> {
    let fx = Fixture::new();
    let raw_list = TypeDescriptor::declared(&fx.list, []);
    let mut unit = fx.unit(vec![
        field("raw", fx.list(fx.string()), Expr::local("RAW", raw_list)),
        field(
            "unrelated",
            fx.list(fx.string()),
            Expr::local("BOXED", fx.boxed(fx.string().to_nullable())),
        ),
    ]);
    let before = unit.clone();

    run(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}

#[test]
fn test_subtype_with_nullable_argument_is_cast_to_supertype() -> Result<()> {
    let fx = Fixture::new();
    let mut unit = fx.unit(vec![
        field(
            "names",
            fx.list(fx.string()),
            Expr::local("SOURCE", fx.array_list(fx.string().to_nullable())),
        ),
        field(
            "counts",
            fx.map(fx.string(), fx.integer()),
            Expr::local("COUNTS", fx.hash_map(fx.string(), fx.integer().to_nullable())),
        ),
        field(
            "exact",
            fx.list(fx.string()),
            Expr::local("EXACT", fx.array_list(fx.string())),
        ),
    ]);

    run(&mut unit)?;

    assert_eq!(
        rendered_casts(&unit)?,
        vec![
            "(List<String>) SOURCE".to_string(),
            "(Map<String, Integer>) COUNTS".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_raw_subtype_is_left_alone() -> Result<()> {
    let fx = Fixture::new();
    let raw = TypeDescriptor::declared(&fx.array_list, []);
    let mut unit = fx.unit(vec![field("raw", fx.list(fx.string()), Expr::local("RAW", raw))]);
    let before = unit.clone();

    run(&mut unit)?;

    assert_eq!(unit, before);
    Ok(())
}
