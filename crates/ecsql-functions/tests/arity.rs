//! Arity enforcement of parsed signatures

use ecsql_ast::Exp;
use ecsql_functions::{build_default_registry, BlobArgPolicy, FunctionSignature};
use proptest::prelude::*;

fn declaration(required: usize, optional: usize, variadic: bool) -> String {
    let mut args: Vec<String> = (0..required).map(|i| format!("r{}:any", i)).collect();
    args.extend((0..optional).map(|i| format!("optional o{}:any", i)));
    if variadic {
        args.push("...".to_string());
    }
    format!("f({}):any", args.join(", "))
}

proptest! {
    #[test]
    fn verify_accepts_exactly_the_declared_range(
        required in 0usize..4,
        optional in 0usize..4,
        passed in 0usize..10,
    ) {
        let sig = FunctionSignature::parse(&declaration(required, optional, false), "").unwrap();
        let args: Vec<Exp> = (0..passed).map(|_| Exp::integer_literal(1)).collect();
        let ok = sig.verify(&args, BlobArgPolicy::Legacy).is_ok();
        prop_assert_eq!(ok, required <= passed && passed <= required + optional);
    }

    #[test]
    fn variadic_never_rejects_extra_arguments(
        required in 0usize..4,
        extra in 0usize..12,
    ) {
        let sig = FunctionSignature::parse(&declaration(required, 0, true), "").unwrap();
        prop_assert!(sig.has_variadic_arg());
        let args: Vec<Exp> = (0..required + extra).map(|_| Exp::string_literal("x")).collect();
        prop_assert!(sig.verify(&args, BlobArgPolicy::Legacy).is_ok());
    }
}

#[test]
fn test_registry_coalesce_is_variadic() {
    let registry = build_default_registry();
    let coalesce = registry.find("coalesce").expect("coalesce is declared");
    assert!(coalesce.has_variadic_arg());
    assert!(coalesce.args().last().is_some_and(|a| a.is_variadic()));
}

#[test]
fn test_member_functions_in_default_registry() {
    let registry = build_default_registry();
    let each = registry.find("json_each").expect("json_each is declared");
    assert!(each.is_member());
    assert_eq!(each.required_arg_count(), 1);
    assert_eq!(each.optional_arg_count(), 1);
}
