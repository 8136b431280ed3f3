//! SQL function calls and ECSQL member function calls

use ecsql_ast::{Exp, ExpKind, FunctionCallExp};
use ecsql_diagnostics::{EcsqlError, ECSQL0101, ECSQL0102, ECSQL0103, ECSQL0108};
use ecsql_functions::{
    builtin_return_type, is_value_passthrough, ScalarFunctionRegistry, CLASSNAME_FUNCTION,
    COUNT_FUNCTION,
};
use ecsql_types::{PrimitiveType, TypeInfo};

use super::{exempt, type_error, usable};
use crate::{ParseContext, WalkState};

pub(super) fn function_call_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    exp.set_type_info(TypeInfo::varies());
    Ok(WalkState::NotCompleted)
}

pub(super) fn function_call_after(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<(), EcsqlError> {
    let ExpKind::FunctionCall(call) = &exp.kind else {
        return Ok(());
    };
    check_function_args(call, exp)?;
    let type_info = function_return_type(call, ctx.scalar_functions());
    exp.set_type_info(type_info);
    Ok(())
}

fn check_function_args(call: &FunctionCallExp, exp: &Exp) -> Result<(), EcsqlError> {
    if let Some(quantifier) = call.set_quantifier {
        if call.args.len() != 1 {
            return Err(type_error(
                ECSQL0108,
                format!(
                    "Function '{}' with {} expects exactly one argument",
                    call.name,
                    quantifier.keyword()
                ),
                exp,
            ));
        }
    }
    if call.is_getter && !call.args.is_empty() {
        return Err(type_error(
            ECSQL0102,
            format!("'{}' does not take arguments", call.name),
            exp,
        ));
    }
    if call.name.eq_ignore_ascii_case(COUNT_FUNCTION) {
        return Ok(());
    }
    for arg in &call.args {
        if exempt(arg) {
            continue;
        }
        let arg_type = arg.type_info();
        if !arg_type.is_primitive() || arg_type.is_point() {
            return Err(type_error(
                ECSQL0103,
                format!(
                    "Argument '{}' of function '{}' has type {}; only primitive values other than points can be passed",
                    arg, call.name, arg_type
                ),
                exp,
            ));
        }
    }
    Ok(())
}

fn function_return_type(call: &FunctionCallExp, scalars: &ScalarFunctionRegistry) -> TypeInfo {
    if let Some(function) = scalars.find(&call.name, call.args.len()) {
        return function.return_type.to_type_info();
    }
    if let Some(primitive) = builtin_return_type(&call.name) {
        return TypeInfo::create_primitive(primitive);
    }
    if call.name.eq_ignore_ascii_case(CLASSNAME_FUNCTION) {
        return TypeInfo::create_primitive(PrimitiveType::String);
    }
    if is_value_passthrough(&call.name) {
        if let Some(first) = first_usable_arg(&call.args, None) {
            return first.clone();
        }
    }
    TypeInfo::create_primitive(PrimitiveType::Double)
}

/// Type of the first argument that is not a parameter and has a usable type
fn first_usable_arg(args: &[Exp], skip: Option<usize>) -> Option<&TypeInfo> {
    args.iter()
        .enumerate()
        .filter(|(i, arg)| Some(*i) != skip && !arg.is_parameter())
        .map(|(_, arg)| arg.type_info())
        .find(|t| usable(t))
}

pub(super) fn function_call_parameter_type(parent: &Exp, index: usize) -> Option<TypeInfo> {
    let ExpKind::FunctionCall(call) = &parent.kind else {
        return None;
    };
    if !is_value_passthrough(&call.name) {
        return None;
    }
    first_usable_arg(&call.args, Some(index)).cloned()
}

pub(super) fn member_function_call_before(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<WalkState, EcsqlError> {
    if let ExpKind::MemberFunctionCall(call) = &exp.kind {
        for arg in &call.args {
            call.check_argument(arg)?;
        }
        if !ctx.functions().contains(&call.name) {
            return Err(type_error(
                ECSQL0101,
                format!("Unknown member function '{}'", call.name),
                exp,
            ));
        }
    }
    exp.set_type_info(TypeInfo::varies());
    Ok(WalkState::NotCompleted)
}

pub(super) fn member_function_call_after(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<(), EcsqlError> {
    let functions = ctx.functions();
    let blob_policy = ctx.options().blob_arg_policy;
    let outcome = match &mut exp.kind {
        ExpKind::MemberFunctionCall(call) => match functions.find(&call.name) {
            Some(signature) => signature
                .set_parameter_type(&mut call.args)
                .and_then(|()| signature.verify(&call.args, blob_policy)),
            None => return Ok(()),
        },
        _ => return Ok(()),
    };
    if let Err(mismatch) = outcome {
        return Err(type_error(mismatch.code(), mismatch.to_string(), exp));
    }
    exp.set_type_info(TypeInfo::create_primitive(PrimitiveType::Double));
    Ok(())
}
