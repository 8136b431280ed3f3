//! Per-node-kind typing rules
//!
//! Every node kind has a before-children rule, an after-children rule and
//! a rule telling which type an unresolved parameter child gets from it.

mod conditional;
mod function;
mod operation;
mod predicate;
mod value;

use ecsql_ast::{Exp, ExpKind};
use ecsql_diagnostics::{EcsqlError, ErrorCode};
use ecsql_types::TypeInfo;

use crate::{ParseContext, WalkState};

/// Rule applied before a node's children are finalized
pub(crate) fn before(exp: &mut Exp, ctx: &mut ParseContext<'_>) -> Result<WalkState, EcsqlError> {
    match &exp.kind {
        ExpKind::BinaryValue(_) => operation::binary_value_before(exp),
        ExpKind::UnaryValue(_) => operation::unary_value_before(exp),
        ExpKind::Cast(_) => operation::cast_before(exp, ctx),
        ExpKind::BinaryBoolean(_) | ExpKind::UnaryBoolean(_) => predicate::boolean_before(exp),
        ExpKind::LikeRhs(_) | ExpKind::BetweenRange(_) => predicate::operand_before(exp),
        ExpKind::TypeList(_) => predicate::type_list_before(exp, ctx),
        ExpKind::Iif(_) | ExpKind::SearchCase(_) | ExpKind::When(_) => {
            conditional::conditional_before(exp)
        }
        ExpKind::FunctionCall(_) => function::function_call_before(exp),
        ExpKind::MemberFunctionCall(_) => function::member_function_call_before(exp, ctx),
        ExpKind::Parameter(_) => value::parameter_before(exp, ctx),
        ExpKind::Literal(_) => value::literal_before(exp),
        ExpKind::EnumValue(_) => value::enum_value_before(exp),
        ExpKind::PropertyName(_) | ExpKind::Subquery(_) => value::resolved_leaf_before(exp),
    }
}

/// Rule applied after a node's children are finalized
pub(crate) fn after(exp: &mut Exp, ctx: &mut ParseContext<'_>) -> Result<(), EcsqlError> {
    match &exp.kind {
        ExpKind::BinaryValue(_) => operation::binary_value_after(exp),
        ExpKind::UnaryValue(_) => operation::unary_value_after(exp),
        ExpKind::Cast(_) => operation::cast_after(exp),
        ExpKind::BinaryBoolean(_) => predicate::binary_boolean_after(exp),
        ExpKind::UnaryBoolean(_) => Ok(()),
        ExpKind::LikeRhs(_) => predicate::like_rhs_after(exp),
        ExpKind::BetweenRange(_) => predicate::between_range_after(exp),
        ExpKind::Iif(_) => conditional::iif_after(exp),
        ExpKind::SearchCase(_) => conditional::search_case_after(exp),
        ExpKind::When(_) => conditional::when_after(exp),
        ExpKind::FunctionCall(_) => function::function_call_after(exp, ctx),
        ExpKind::MemberFunctionCall(_) => function::member_function_call_after(exp, ctx),
        ExpKind::TypeList(_)
        | ExpKind::Parameter(_)
        | ExpKind::Literal(_)
        | ExpKind::EnumValue(_)
        | ExpKind::PropertyName(_)
        | ExpKind::Subquery(_) => Ok(()),
    }
}

/// Type the node gives its unresolved parameter child at `index`
///
/// `None` leaves the parameter pending.
pub(crate) fn parameter_type_for(parent: &Exp, index: usize) -> Option<TypeInfo> {
    match &parent.kind {
        ExpKind::BinaryValue(_) | ExpKind::UnaryValue(_) => {
            operation::value_operand_parameter_type(parent, index)
        }
        ExpKind::Cast(_) => Some(parent.type_info().clone()),
        ExpKind::BinaryBoolean(_) => predicate::binary_boolean_parameter_type(parent, index),
        ExpKind::UnaryBoolean(_) => Some(predicate::boolean()),
        ExpKind::LikeRhs(_) => Some(predicate::string()),
        ExpKind::BetweenRange(_) => predicate::between_range_parameter_type(parent, index),
        ExpKind::Iif(_) | ExpKind::SearchCase(_) | ExpKind::When(_) => {
            conditional::conditional_parameter_type(parent, index)
        }
        ExpKind::FunctionCall(_) => function::function_call_parameter_type(parent, index),
        ExpKind::MemberFunctionCall(_)
        | ExpKind::TypeList(_)
        | ExpKind::Parameter(_)
        | ExpKind::Literal(_)
        | ExpKind::EnumValue(_)
        | ExpKind::PropertyName(_)
        | ExpKind::Subquery(_) => None,
    }
}

/// A type another node can be derived from
fn usable(type_info: &TypeInfo) -> bool {
    type_info.is_complete() && !type_info.is_null()
}

/// Parameters and NULL are exempt from operand checks
fn exempt(exp: &Exp) -> bool {
    exp.is_parameter() || exp.type_info().is_null()
}

fn type_error(code: ErrorCode, message: impl Into<String>, exp: &Exp) -> EcsqlError {
    EcsqlError::semantic_in(code, message, exp.to_ecsql())
}
