//! Finalize walk tests
//!
//! Covers type inference and validation per node kind, parameter typing
//! from context, and how errors reach the issue sink.

use ecsql_ast::{
    BinarySqlOperator, BooleanSqlOperator, CastTarget, Exp, ExpKind, TypeListEntry,
    UnarySqlOperator,
};
use ecsql_diagnostics::{
    Diagnostic, EcsqlError, ErrorCode, IssueCollector, ECSQL0100, ECSQL0101, ECSQL0102,
    ECSQL0103, ECSQL0104, ECSQL0105, ECSQL0107, ECSQL0109, ECSQL0110, ECSQL0111, ECSQL0200,
    ECSQL0201, ECSQL0203,
};
use ecsql_functions::{build_default_registry, BlobArgPolicy, FunctionSignatureSet};
use ecsql_resolver::{finalize, FinalizeOptions, ParameterMap, ParseContext};
use ecsql_types::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn schema() -> InMemorySchema {
    InMemorySchema::new().with_schema(
        EcSchema::new("TestSchema", "ts")
            .with_class("Pipe", ClassKind::Entity)
            .with_class("Address", ClassKind::Struct)
            .with_enumeration(
                "Color",
                PrimitiveType::Integer,
                vec![EcEnumerator::integer("Red", 1), EcEnumerator::integer("Blue", 2)],
            ),
    )
}

fn prop(name: &str, primitive: PrimitiveType) -> Exp {
    Exp::property_name([name], TypeInfo::create_primitive(primitive))
}

struct Outcome {
    exp: Exp,
    result: Result<(), EcsqlError>,
    parameters: ParameterMap,
    issues: Vec<Diagnostic>,
}

impl Outcome {
    fn param_type(&self, index: usize) -> TypeInfo {
        self.parameters
            .get(index)
            .map(|p| p.type_info.clone())
            .unwrap_or_default()
    }

    fn error_code(&self) -> Option<ErrorCode> {
        self.result.as_ref().err().map(EcsqlError::code)
    }
}

fn run_with(mut exp: Exp, functions: &FunctionSignatureSet, options: FinalizeOptions) -> Outcome {
    let schema = schema();
    let mut issues = IssueCollector::new();
    let (result, parameters) = {
        let mut ctx =
            ParseContext::new(&schema, functions, &mut issues).with_options(options);
        let result = finalize(&mut exp, &mut ctx);
        (result, ctx.take_parameters())
    };
    Outcome {
        exp,
        result,
        parameters,
        issues: issues.into_diagnostics(),
    }
}

fn run(exp: Exp) -> Outcome {
    run_with(exp, &build_default_registry(), FinalizeOptions::default())
}

fn member_call(name: &str, args: Vec<Exp>) -> Exp {
    let mut exp = Exp::member_function_call(name, false);
    if let ExpKind::MemberFunctionCall(call) = &mut exp.kind {
        call.args = args;
    }
    exp
}

fn primitive(t: PrimitiveType) -> TypeInfo {
    TypeInfo::create_primitive(t)
}

// === Values and operators ===

#[test]
fn test_null_casts_to_any_primitive() {
    let out = run(Exp::cast(Exp::null_literal(), CastTarget::primitive("INTEGER")));
    assert!(out.result.is_ok());
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::Integer));
}

#[test]
fn test_string_operand_of_addition_is_rejected() {
    let out = run(Exp::binary(
        BinarySqlOperator::Plus,
        Exp::integer_literal(1),
        Exp::string_literal("x"),
    ));

    assert_eq!(out.error_code(), Some(ECSQL0100));
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].code, ECSQL0100);
    assert_eq!(out.issues[0].expression.as_deref(), Some("1 + 'x'"));
}

#[rstest]
#[case(BinarySqlOperator::Plus, PrimitiveType::Double)]
#[case(BinarySqlOperator::ShiftLeft, PrimitiveType::Long)]
#[case(BinarySqlOperator::Concat, PrimitiveType::String)]
fn test_binary_operator_result_types(#[case] op: BinarySqlOperator, #[case] expected: PrimitiveType) {
    let operand = if op == BinarySqlOperator::Concat {
        Exp::string_literal("a")
    } else {
        Exp::integer_literal(2)
    };
    let out = run(Exp::binary(op, operand, Exp::parameter()));
    assert!(out.result.is_ok());
    assert_eq!(out.exp.type_info(), &primitive(expected));
}

#[test]
fn test_parameter_takes_other_operand_type() {
    let out = run(Exp::binary(
        BinarySqlOperator::Multiply,
        Exp::parameter(),
        prop("Length", PrimitiveType::Long),
    ));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Long));
}

#[test]
fn test_bitwise_not_requires_integral_operand() {
    let out = run(Exp::unary(
        UnarySqlOperator::BitwiseNot,
        prop("Diameter", PrimitiveType::Double),
    ));
    assert_eq!(out.error_code(), Some(ECSQL0100));

    let out = run(Exp::unary(UnarySqlOperator::BitwiseNot, Exp::parameter()));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Long));
}

#[test]
fn test_invalid_date_literal() {
    let out = run(Exp::date_time_literal(DateTimeComponent::Date, "2024-13-45"));
    assert_eq!(out.error_code(), Some(ECSQL0105));
}

#[test]
fn test_utc_timestamp_literal() {
    let out = run(Exp::date_time_literal(
        DateTimeComponent::DateAndTime,
        "2024-01-31 08:00:00Z",
    ));
    assert!(out.result.is_ok());
    assert_eq!(
        out.exp.type_info(),
        &TypeInfo::create_date_time(DateTimeInfo::date_and_time(DateTimeKind::Utc))
    );
}

#[test]
fn test_unresolved_property_type_is_an_error() {
    let out = run(Exp::property_name(["Length"], TypeInfo::unset()));
    assert_eq!(out.error_code(), Some(ECSQL0109));
}

// === Parameters ===

#[test]
fn test_parameters_default_to_double() {
    let out = run(Exp::function_call("my_func", None, vec![Exp::parameter()]));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Double));
}

#[test]
fn test_default_parameter_type_is_configurable() {
    let options = FinalizeOptions::default().with_default_parameter_type(PrimitiveType::Long);
    let out = run_with(
        Exp::function_call("my_func", None, vec![Exp::parameter()]),
        &build_default_registry(),
        options,
    );
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Long));
}

#[test]
fn test_named_parameter_keeps_first_type() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::And,
        Exp::binary_boolean(
            BooleanSqlOperator::EqualTo,
            Exp::named_parameter("code"),
            Exp::integer_literal(1),
        ),
        Exp::binary_boolean(
            BooleanSqlOperator::EqualTo,
            Exp::named_parameter("code"),
            Exp::string_literal("x"),
        ),
    ));

    assert!(out.result.is_ok());
    assert_eq!(out.parameters.len(), 1);
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Integer));
}

#[test]
fn test_named_parameter_takes_type_from_later_occurrence() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::And,
        Exp::binary_boolean(
            BooleanSqlOperator::EqualTo,
            Exp::named_parameter("p"),
            Exp::parameter(),
        )
        .parenthesized(),
        Exp::binary_boolean(
            BooleanSqlOperator::EqualTo,
            Exp::named_parameter("p"),
            Exp::string_literal("x"),
        )
        .parenthesized(),
    ));

    assert!(out.result.is_ok());
    assert_eq!(out.parameters.len(), 2);
    assert_eq!(out.parameters.index_of("p"), Some(1));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::String));
    assert_eq!(out.param_type(2), primitive(PrimitiveType::Double));

    let ExpKind::BinaryBoolean(and) = &out.exp.kind else {
        panic!("expected AND");
    };
    for side in [&and.lhs, &and.rhs] {
        assert_eq!(side.children()[0].type_info(), &primitive(PrimitiveType::String));
    }
}

// === Conditionals ===

#[test]
fn test_iif_with_parameters_falls_back_to_literal_type() {
    let out = run(Exp::iif(
        Exp::parameter(),
        Exp::parameter(),
        Exp::string_literal("literal"),
    ));

    assert!(out.result.is_ok());
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::String));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Boolean));
    assert_eq!(out.param_type(2), primitive(PrimitiveType::String));
}

#[test]
fn test_iif_without_typed_branch_is_string() {
    let out = run(Exp::iif(
        prop("Flag", PrimitiveType::Boolean),
        Exp::null_literal(),
        Exp::parameter(),
    ));
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::String));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::String));
}

#[test]
fn test_iif_rejects_point_branch() {
    let out = run(Exp::iif(
        prop("Flag", PrimitiveType::Boolean),
        prop("Origin", PrimitiveType::Point3d),
        Exp::null_literal(),
    ));
    assert_eq!(out.error_code(), Some(ECSQL0107));
}

#[test]
fn test_search_case_types_branches() {
    let out = run(Exp::search_case(
        vec![
            Exp::when(Exp::parameter(), Exp::parameter()),
            Exp::when(
                prop("Flag", PrimitiveType::Boolean),
                Exp::integer_literal(3),
            ),
        ],
        Some(Exp::null_literal()),
    ));

    assert!(out.result.is_ok());
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::Integer));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Boolean));
    assert_eq!(out.param_type(2), primitive(PrimitiveType::Integer));
    assert_eq!(out.exp.children()[0].type_info(), &primitive(PrimitiveType::Integer));
}

// === Predicates ===

#[test]
fn test_like_parameter_is_string() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::Like,
        prop("Name", PrimitiveType::String),
        Exp::like_rhs(Exp::parameter(), Some(Exp::string_literal("\\"))),
    ));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::String));
}

#[test]
fn test_like_rejects_numeric_operand() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::Like,
        Exp::integer_literal(1),
        Exp::like_rhs(Exp::string_literal("1%"), None),
    ));
    assert_eq!(out.error_code(), Some(ECSQL0100));
}

#[test]
fn test_between_bounds_take_left_operand_type() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::Between,
        prop("Length", PrimitiveType::Long),
        Exp::between_range(Exp::parameter(), Exp::parameter()),
    ));

    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Long));
    assert_eq!(out.param_type(2), primitive(PrimitiveType::Long));
    assert_eq!(out.exp.children()[1].type_info(), &primitive(PrimitiveType::Long));
}

#[test]
fn test_between_bound_takes_other_bound_type() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::Between,
        Exp::parameter(),
        Exp::between_range(Exp::parameter(), Exp::double_literal("2.5")),
    ));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(2), primitive(PrimitiveType::Double));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Double));
}

#[test]
fn test_struct_only_compares_with_is_null() {
    let address = || {
        Exp::property_name(
            ["Location"],
            TypeInfo::create_struct(
                ClassRef::new(SchemaItemKey::new("TestSchema", "Address")),
                false,
            ),
        )
    };

    let is_null = run(Exp::binary_boolean(
        BooleanSqlOperator::IsNot,
        address(),
        Exp::null_literal(),
    ));
    assert!(is_null.result.is_ok());

    let equals = run(Exp::binary_boolean(
        BooleanSqlOperator::EqualTo,
        address(),
        Exp::integer_literal(1),
    ));
    assert_eq!(equals.error_code(), Some(ECSQL0111));
}

#[test]
fn test_point_rejects_ordering_comparison() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::LessThan,
        prop("Origin", PrimitiveType::Point2d),
        Exp::parameter(),
    ));
    assert_eq!(out.error_code(), Some(ECSQL0111));
}

#[test]
fn test_type_list_resolves_classes() {
    let out = run(Exp::binary_boolean(
        BooleanSqlOperator::Is,
        Exp::parameter(),
        Exp::type_list(vec![TypeListEntry::only("ts", "Pipe")]),
    ));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::Long));

    let out = run(Exp::type_list(vec![TypeListEntry::new("ts", "Valve")]));
    assert_eq!(out.error_code(), Some(ECSQL0201));
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].expression.as_deref(), Some("(ts.Valve)"));
}

#[rstest]
#[case(CastTarget::qualified("ts", "Valve"), ECSQL0201, "CAST(NULL AS ts.Valve)")]
#[case(CastTarget::qualified("xx", "Pipe"), ECSQL0200, "CAST(NULL AS xx.Pipe)")]
fn test_unknown_cast_target_names_expression(
    #[case] target: CastTarget,
    #[case] code: ErrorCode,
    #[case] text: &str,
) {
    let out = run(Exp::cast(Exp::null_literal(), target));
    assert_eq!(out.error_code(), Some(code));
    assert_eq!(out.result.as_ref().err().and_then(EcsqlError::expression), Some(text));
    assert_eq!(out.issues[0].expression.as_deref(), Some(text));
}

// === Casts ===

#[rstest]
#[case(CastTarget::qualified("ts", "Color"), None)]
#[case(CastTarget::qualified("TestSchema", "Address").array(), None)]
#[case(CastTarget::qualified("ts", "Pipe"), Some(ECSQL0203))]
#[case(CastTarget::qualified("xx", "Pipe"), Some(ECSQL0200))]
#[case(CastTarget::primitive("DECIMAL"), Some(ECSQL0104))]
fn test_cast_targets(#[case] target: CastTarget, #[case] expected: Option<ErrorCode>) {
    let out = run(Exp::cast(Exp::null_literal(), target));
    assert_eq!(out.error_code(), expected);
}

#[test]
fn test_cast_to_enum_type() {
    let out = run(Exp::cast(Exp::integer_literal(1), CastTarget::qualified("ts", "Color")));
    assert!(out.exp.type_info().is_enum());
}

#[test]
fn test_point_cannot_change_type() {
    let out = run(Exp::cast(
        prop("Origin", PrimitiveType::Point2d),
        CastTarget::primitive("POINT3D"),
    ));
    assert_eq!(out.error_code(), Some(ECSQL0104));

    let out = run(Exp::cast(
        prop("Origin", PrimitiveType::Point2d),
        CastTarget::primitive("POINT2D"),
    ));
    assert!(out.result.is_ok());
}

#[test]
fn test_cast_parameter_takes_target_type() {
    let out = run(Exp::cast(Exp::parameter(), CastTarget::primitive("TIMESTAMP")));
    assert!(out.param_type(1).is_date_time());
}

// === Function calls ===

#[test]
fn test_passthrough_function_types_parameters() {
    let out = run(Exp::function_call(
        "coalesce",
        None,
        vec![Exp::parameter(), Exp::string_literal("x")],
    ));
    assert!(out.result.is_ok());
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::String));
    assert_eq!(out.param_type(1), primitive(PrimitiveType::String));
}

#[test]
fn test_function_rejects_point_argument() {
    let out = run(Exp::function_call(
        "max",
        None,
        vec![prop("Origin", PrimitiveType::Point2d)],
    ));
    assert_eq!(out.error_code(), Some(ECSQL0103));

    let count = run(Exp::function_call(
        "count",
        None,
        vec![prop("Origin", PrimitiveType::Point2d)],
    ));
    assert_eq!(count.exp.type_info(), &primitive(PrimitiveType::Long));
}

#[test]
fn test_member_function_arguments_are_verified() {
    let out = run(member_call("json_each", vec![Exp::parameter()]));
    assert!(out.result.is_ok());
    assert_eq!(out.param_type(1), primitive(PrimitiveType::String));
    assert_eq!(out.exp.type_info(), &primitive(PrimitiveType::Double));

    let out = run(member_call("json_each", vec![]));
    assert_eq!(out.error_code(), Some(ECSQL0102));

    let out = run(member_call("no_such_function", vec![]));
    assert_eq!(out.error_code(), Some(ECSQL0101));
}

#[test]
fn test_member_function_rejects_property_argument() {
    let out = run(member_call(
        "json_each",
        vec![prop("Json", PrimitiveType::String)],
    ));
    assert_eq!(out.error_code(), Some(ECSQL0110));
}

#[rstest]
#[case(BlobArgPolicy::Legacy, Some(ECSQL0103))]
#[case(BlobArgPolicy::BinaryOrGeometry, None)]
fn test_blob_argument_policy(#[case] policy: BlobArgPolicy, #[case] expected: Option<ErrorCode>) {
    let mut functions = build_default_registry();
    functions
        .declare("::decode(data:blob):string", "Decode a blob")
        .unwrap();
    let blob = Exp::cast(Exp::null_literal(), CastTarget::primitive("BINARY"));

    let out = run_with(
        member_call("decode", vec![blob]),
        &functions,
        FinalizeOptions::default().with_blob_arg_policy(policy),
    );
    assert_eq!(out.error_code(), expected);
}
