//! Rendering of complete expression trees

use ecsql_ast::{
    BinarySqlOperator, BooleanSqlOperator, CastTarget, Exp, RenderMode, TypeListEntry,
    UnarySqlOperator,
};
use ecsql_types::{DateTimeComponent, EnumRef, PrimitiveType, SchemaItemKey, TypeInfo};
use insta::assert_snapshot;
use rstest::rstest;

fn prop(path: &[&str], primitive: PrimitiveType) -> Exp {
    Exp::property_name(path.iter().copied(), TypeInfo::create_primitive(primitive))
}

#[rstest]
#[case(Exp::null_literal(), "NULL")]
#[case(Exp::boolean_literal(false), "FALSE")]
#[case(Exp::string_literal("it's"), "'it''s'")]
#[case(Exp::double_literal("0.25"), "0.25")]
#[case(Exp::long_literal(9_000_000_000), "9000000000")]
#[case(Exp::named_parameter("limit"), ":limit")]
#[case(Exp::date_time_literal(DateTimeComponent::TimeOfDay, "12:30"), "TIME '12:30'")]
fn test_render_leaves(#[case] exp: Exp, #[case] expected: &str) {
    assert_eq!(exp.to_ecsql(), expected);
}

#[test]
fn test_render_iif_and_case() {
    let iif = Exp::iif(
        Exp::parameter(),
        Exp::parameter(),
        Exp::string_literal("literal"),
    );
    assert_snapshot!(iif.to_ecsql(), @"IIF(?, ?, 'literal')");

    let case = Exp::search_case(
        vec![
            Exp::when(
                Exp::binary_boolean(
                    BooleanSqlOperator::GreaterThan,
                    prop(&["Length"], PrimitiveType::Double),
                    Exp::integer_literal(10),
                ),
                Exp::string_literal("long"),
            ),
            Exp::when(Exp::named_parameter("flag"), Exp::string_literal("flagged")),
        ],
        Some(Exp::null_literal()),
    );
    assert_snapshot!(
        case.to_ecsql(),
        @"CASE WHEN Length > 10 THEN 'long' WHEN :flag THEN 'flagged' ELSE NULL END"
    );
}

#[test]
fn test_render_like_and_between() {
    let like = Exp::binary_boolean(
        BooleanSqlOperator::NotLike,
        prop(&["Owner", "Name"], PrimitiveType::String),
        Exp::like_rhs(Exp::string_literal("O''%"), Some(Exp::string_literal("\\"))),
    );
    assert_snapshot!(like.to_ecsql(), @r"Owner.Name NOT LIKE 'O''''%' ESCAPE '\'");

    let between = Exp::binary_boolean(
        BooleanSqlOperator::Between,
        prop(&["Diameter"], PrimitiveType::Double),
        Exp::between_range(Exp::double_literal("1.5"), Exp::parameter()),
    );
    assert_snapshot!(between.to_ecsql(), @"Diameter BETWEEN 1.5 AND ?");
}

#[test]
fn test_render_date_time_and_enum() {
    let cmp = Exp::binary_boolean(
        BooleanSqlOperator::And,
        Exp::binary_boolean(
            BooleanSqlOperator::GreaterThanOrEqualTo,
            prop(&["Installed"], PrimitiveType::DateTime),
            Exp::date_time_literal(DateTimeComponent::Date, "2024-01-31"),
        ),
        Exp::binary_boolean(
            BooleanSqlOperator::EqualTo,
            prop(&["Color"], PrimitiveType::Integer),
            Exp::enum_value(
                EnumRef::new(SchemaItemKey::new("ts", "Color"), PrimitiveType::Integer),
                "Red",
            ),
        ),
    );
    assert_snapshot!(
        cmp.to_ecsql(),
        @"Installed >= DATE '2024-01-31' AND Color = ts.Color.Red"
    );

    let ts = Exp::date_time_literal(DateTimeComponent::DateAndTime, "2024-01-31T08:00:00Z");
    assert_snapshot!(ts.to_ecsql(), @"TIMESTAMP '2024-01-31T08:00:00Z'");
}

#[test]
fn test_render_casts_and_unary() {
    let cast = Exp::cast(
        Exp::unary(UnarySqlOperator::Minus, prop(&["Offset"], PrimitiveType::Long)),
        CastTarget::qualified("ts", "Color"),
    );
    assert_snapshot!(cast.to_ecsql(), @"CAST(-Offset AS ts.Color)");

    let bits = Exp::unary(
        UnarySqlOperator::BitwiseNot,
        Exp::binary(
            BinarySqlOperator::BitwiseAnd,
            Exp::long_literal(255),
            Exp::parameter(),
        )
        .parenthesized(),
    );
    assert_snapshot!(bits.to_ecsql(), @"~(255 & ?)");
}

#[test]
fn test_render_type_list_and_subquery() {
    let is = Exp::binary_boolean(
        BooleanSqlOperator::Is,
        prop(&["ECClassId"], PrimitiveType::Long),
        Exp::type_list(vec![
            TypeListEntry::only("ts", "Pipe"),
            TypeListEntry::new("ts", "Valve"),
        ]),
    );
    assert_snapshot!(is.to_ecsql(), @"ECClassId IS (ONLY ts.Pipe, ts.Valve)");

    let sub = Exp::binary_boolean(
        BooleanSqlOperator::LessThan,
        prop(&["Length"], PrimitiveType::Double),
        Exp::subquery(
            "SELECT max(Length) FROM ts.Pipe",
            TypeInfo::create_primitive(PrimitiveType::Double),
        ),
    );
    assert_snapshot!(sub.to_ecsql(), @"Length < (SELECT max(Length) FROM ts.Pipe)");
}

#[test]
fn test_render_generated_parameter_names() {
    let mut first = Exp::parameter();
    first.as_parameter_mut().unwrap().index = Some(1);
    let mut second = Exp::parameter();
    second.as_parameter_mut().unwrap().index = Some(3);
    let exp = Exp::function_call(
        "coalesce",
        None,
        vec![first, Exp::named_parameter("fallback"), second],
    );

    assert_snapshot!(exp.to_ecsql(), @"coalesce(?, :fallback, ?)");
    assert_snapshot!(
        exp.to_ecsql_with(RenderMode::GenerateNameForUnnamedParameter),
        @"coalesce(:_ecsql_param_ix1, :fallback, :_ecsql_param_ix3)"
    );
}
