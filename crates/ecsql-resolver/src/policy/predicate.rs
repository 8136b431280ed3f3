//! Boolean predicates and their right-hand side operands

use ecsql_ast::{Exp, ExpKind};
use ecsql_diagnostics::{EcsqlError, ECSQL0100, ECSQL0111};
use ecsql_types::{PrimitiveType, TypeInfo};

use super::{exempt, type_error, usable};
use crate::{ParseContext, WalkState};

pub(super) fn boolean() -> TypeInfo {
    TypeInfo::create_primitive(PrimitiveType::Boolean)
}

pub(super) fn string() -> TypeInfo {
    TypeInfo::create_primitive(PrimitiveType::String)
}

pub(super) fn boolean_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    exp.set_type_info(boolean());
    Ok(WalkState::NotCompleted)
}

/// LIKE and BETWEEN operands are typed once their children are
pub(super) fn operand_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    exp.set_type_info(TypeInfo::varies());
    Ok(WalkState::NotCompleted)
}

pub(super) fn binary_boolean_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let (op, lhs_type) = match &exp.kind {
        ExpKind::BinaryBoolean(node) => (node.op, node.lhs.type_info().clone()),
        _ => return Ok(()),
    };
    check_boolean_operands(exp)?;

    if op.is_between() && usable(&lhs_type) {
        if let ExpKind::BinaryBoolean(node) = &mut exp.kind {
            propagate_to_range(&mut node.rhs, &lhs_type);
        }
    }
    Ok(())
}

fn check_boolean_operands(exp: &Exp) -> Result<(), EcsqlError> {
    let ExpKind::BinaryBoolean(node) = &exp.kind else {
        return Ok(());
    };
    let op = node.op;
    let operands = [(&*node.lhs, &*node.rhs), (&*node.rhs, &*node.lhs)];
    for (operand, other) in operands {
        if exempt(operand) {
            continue;
        }
        let operand_type = operand.type_info();
        if operand_type.is_struct() || operand_type.is_array() {
            if op.is_is() && other.is_null_literal() {
                continue;
            }
            return Err(type_error(
                ECSQL0111,
                format!(
                    "Struct and array operand '{}' can only be compared with IS [NOT] NULL",
                    operand
                ),
                exp,
            ));
        }
        if operand_type.is_point() && !op.is_equality() {
            return Err(type_error(
                ECSQL0111,
                format!(
                    "Point operand '{}' can only be used with =, <>, IS and IS NOT, not {}",
                    operand,
                    op.symbol()
                ),
                exp,
            ));
        }
    }

    if op.is_like() && !exempt(&node.lhs) && !node.lhs.type_info().is_string() {
        return Err(type_error(
            ECSQL0100,
            format!(
                "Left operand '{}' of {} must be a string, but is {}",
                node.lhs,
                op.symbol(),
                node.lhs.type_info()
            ),
            exp,
        ));
    }
    Ok(())
}

/// Hand the left operand's type to unresolved BETWEEN bounds
fn propagate_to_range(range: &mut Exp, lhs_type: &TypeInfo) {
    let range_id = range.id();
    let mut assigned = false;
    for bound in range.children_mut() {
        assigned |= bound.set_target_exp_info(lhs_type.clone(), range_id);
    }
    if assigned && range.type_info().is_null() {
        range.set_type_info(lhs_type.clone());
    }
}

pub(super) fn binary_boolean_parameter_type(parent: &Exp, index: usize) -> Option<TypeInfo> {
    let ExpKind::BinaryBoolean(node) = &parent.kind else {
        return None;
    };
    if node.op.is_like() {
        return Some(string());
    }
    if node.op.is_logical() {
        return Some(boolean());
    }
    let other = if index == 0 { &node.rhs } else { &node.lhs };
    if node.op.is_is() && matches!(other.kind, ExpKind::TypeList(_)) {
        return Some(TypeInfo::create_primitive(PrimitiveType::Long));
    }
    let other_type = other.type_info();
    usable(other_type).then(|| other_type.clone())
}

pub(super) fn like_rhs_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::LikeRhs(node) = &exp.kind else {
        return Ok(());
    };
    for operand in std::iter::once(&*node.rhs).chain(node.escape.as_deref()) {
        if !exempt(operand) && !operand.type_info().is_string() {
            return Err(type_error(
                ECSQL0100,
                format!(
                    "LIKE operand '{}' must be a string, but is {}",
                    operand,
                    operand.type_info()
                ),
                exp,
            ));
        }
    }
    let type_info = if node.rhs.is_parameter() {
        string()
    } else {
        node.rhs.type_info().clone()
    };
    exp.set_type_info(type_info);
    Ok(())
}

pub(super) fn between_range_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::BetweenRange(node) = &exp.kind else {
        return Ok(());
    };
    for bound in [&*node.lower, &*node.upper] {
        if bound.is_parameter() {
            continue;
        }
        let bound_type = bound.type_info();
        if bound_type.is_null() {
            continue;
        }
        if !bound_type.is_primitive()
            || bound_type.is_geometry()
            || bound_type.is_point()
            || bound_type.is_navigation()
        {
            return Err(type_error(
                ECSQL0100,
                format!(
                    "BETWEEN bound '{}' must be a primitive value other than a point or geometry, but is {}",
                    bound, bound_type
                ),
                exp,
            ));
        }
    }
    let type_info = [&*node.lower, &*node.upper]
        .into_iter()
        .find(|b| !b.is_parameter())
        .map(|b| b.type_info().clone())
        .unwrap_or_else(TypeInfo::null);
    exp.set_type_info(type_info);
    Ok(())
}

pub(super) fn between_range_parameter_type(parent: &Exp, index: usize) -> Option<TypeInfo> {
    let ExpKind::BetweenRange(node) = &parent.kind else {
        return None;
    };
    let other = if index == 0 { &node.upper } else { &node.lower };
    let other_type = other.type_info();
    usable(other_type).then(|| other_type.clone())
}

pub(super) fn type_list_before(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<WalkState, EcsqlError> {
    let node: &Exp = exp;
    let resolved = match &node.kind {
        ExpKind::TypeList(list) => list
            .classes
            .iter()
            .map(|entry| ctx.resolve_class(&entry.schema, &entry.name, node))
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };
    if let ExpKind::TypeList(list) = &mut exp.kind {
        for (entry, class) in list.classes.iter_mut().zip(resolved) {
            entry.class_ref = Some(class.class_ref);
        }
    }
    exp.set_type_info(TypeInfo::create_primitive(PrimitiveType::Long));
    Ok(WalkState::Completed)
}
