//! IIF, searched CASE and its WHEN clauses

use ecsql_ast::{Exp, ExpKind};
use ecsql_diagnostics::{EcsqlError, ECSQL0107};
use ecsql_types::TypeInfo;

use super::predicate::{boolean, string};
use super::{type_error, usable};
use crate::WalkState;

pub(super) fn conditional_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    exp.set_type_info(TypeInfo::varies());
    Ok(WalkState::NotCompleted)
}

/// Branches may only produce plain primitive values
fn check_branch(branch: &Exp, node: &Exp) -> Result<(), EcsqlError> {
    if branch.is_parameter() {
        return Ok(());
    }
    let branch_type = branch.type_info();
    if branch_type.is_null() {
        return Ok(());
    }
    if branch_type.is_geometry()
        || branch_type.is_point()
        || branch_type.is_navigation()
        || !branch_type.is_primitive()
    {
        return Err(type_error(
            ECSQL0107,
            format!(
                "Branch '{}' of {} has type {}, which a conditional expression cannot return",
                branch,
                node.kind.name(),
                branch_type
            ),
            node,
        ));
    }
    Ok(())
}

/// First branch type that is neither a parameter nor NULL, else String
fn branch_type<'e>(branches: impl IntoIterator<Item = &'e Exp>) -> TypeInfo {
    branches
        .into_iter()
        .filter(|b| !b.is_parameter())
        .map(Exp::type_info)
        .find(|t| usable(t))
        .cloned()
        .unwrap_or_else(string)
}

pub(super) fn iif_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::Iif(node) = &exp.kind else {
        return Ok(());
    };
    for branch in [&*node.then_exp, &*node.else_exp] {
        check_branch(branch, exp)?;
    }
    let type_info = branch_type([&*node.then_exp, &*node.else_exp]);
    exp.set_type_info(type_info.clone());

    let id = exp.id();
    if let ExpKind::Iif(node) = &mut exp.kind {
        node.then_exp.set_target_exp_info(type_info.clone(), id);
        node.else_exp.set_target_exp_info(type_info, id);
    }
    Ok(())
}

pub(super) fn search_case_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::SearchCase(node) = &exp.kind else {
        return Ok(());
    };
    for branch in node.then_branches().chain(node.else_exp.as_deref()) {
        check_branch(branch, exp)?;
    }
    let type_info = branch_type(node.then_branches().chain(node.else_exp.as_deref()));
    exp.set_type_info(type_info.clone());

    let id = exp.id();
    if let ExpKind::SearchCase(node) = &mut exp.kind {
        for clause in &mut node.when_clauses {
            let mut assigned = false;
            if let ExpKind::When(when) = &mut clause.kind {
                assigned = when.then.set_target_exp_info(type_info.clone(), id);
            }
            if assigned {
                clause.set_type_info(type_info.clone());
            }
        }
        if let Some(else_exp) = &mut node.else_exp {
            else_exp.set_target_exp_info(type_info, id);
        }
    }
    Ok(())
}

pub(super) fn when_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::When(node) = &exp.kind else {
        return Ok(());
    };
    let then_type = node.then.type_info();
    let type_info = if usable(then_type) {
        then_type.clone()
    } else {
        TypeInfo::null()
    };
    exp.set_type_info(type_info);
    Ok(())
}

pub(super) fn conditional_parameter_type(parent: &Exp, index: usize) -> Option<TypeInfo> {
    match &parent.kind {
        ExpKind::Iif(_) if index == 0 => Some(boolean()),
        ExpKind::Iif(_) => Some(parent.type_info().clone()),
        ExpKind::When(_) if index == 0 => Some(boolean()),
        // THEN branches are typed by the enclosing CASE
        ExpKind::When(_) => None,
        ExpKind::SearchCase(_) => Some(parent.type_info().clone()),
        _ => None,
    }
}
