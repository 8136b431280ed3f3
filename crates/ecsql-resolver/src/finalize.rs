//! Finalize-parsing walk
//!
//! Each node goes through its before rule, then its children, then its
//! after rule. Once a node is finalized, every direct child that is still
//! an untyped parameter is offered the type the node derives for it.
//! Parameters nothing claimed get the configured default type at the end.

use ecsql_ast::Exp;
use ecsql_diagnostics::EcsqlError;
use ecsql_types::TypeInfo;
use log::{debug, trace};

use crate::{policy, ParseContext};

/// Outcome of a node's before rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Continue with the children and the after rule
    NotCompleted,
    /// The node is fully typed; skip its children and after rule
    Completed,
}

/// Type-check `exp` in place and resolve its parameters
///
/// The first error aborts the walk; it is reported to the context's issue
/// sink and returned. On success every node carries a complete type and
/// the context's parameter map lists every parameter with its type.
pub fn finalize(exp: &mut Exp, ctx: &mut ParseContext<'_>) -> Result<(), EcsqlError> {
    debug!("finalizing '{}'", exp);
    if let Err(err) = walk(exp, ctx) {
        debug!("finalize failed: {}", err);
        return Err(ctx.report(err));
    }

    let default_type = TypeInfo::create_primitive(ctx.options().default_parameter_type);
    settle_parameters(exp, &default_type, ctx);
    debug!(
        "finalized '{}' as {} with {} parameter(s)",
        exp,
        exp.type_info(),
        ctx.parameters().len()
    );
    Ok(())
}

fn walk(exp: &mut Exp, ctx: &mut ParseContext<'_>) -> Result<(), EcsqlError> {
    exp.set_id(ctx.next_id());
    trace!("before {} '{}'", exp.kind.name(), exp);
    if policy::before(exp, ctx)? == WalkState::Completed {
        return Ok(());
    }

    for child in exp.children_mut() {
        walk(child, ctx)?;
    }

    policy::after(exp, ctx)?;
    trace!("after {} '{}': {}", exp.kind.name(), exp, exp.type_info());
    resolve_child_parameters(exp);
    Ok(())
}

/// Offer the node-derived type to each untyped parameter child
fn resolve_child_parameters(exp: &mut Exp) {
    let pending: Vec<(usize, TypeInfo)> = exp
        .children()
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is_unresolved_parameter())
        .filter_map(|(i, _)| policy::parameter_type_for(exp, i).map(|t| (i, t)))
        .collect();
    if pending.is_empty() {
        return;
    }

    let source = exp.id();
    let mut children = exp.children_mut();
    for (i, type_info) in pending {
        if let Some(child) = children.get_mut(i) {
            trace!("parameter '{}' typed {} by its parent", child, type_info);
            child.set_target_exp_info(type_info, source);
        }
    }
}

/// Record every parameter's type in the parameter map
///
/// Types a context determined are recorded first, so a named parameter
/// takes the first determined type of any of its occurrences. Occurrences
/// nothing typed then take their index's recorded type, or the default.
fn settle_parameters(exp: &mut Exp, default_type: &TypeInfo, ctx: &mut ParseContext<'_>) {
    record_resolved_parameters(exp, ctx);
    default_parameters(exp, default_type, ctx);
}

fn record_resolved_parameters(exp: &Exp, ctx: &mut ParseContext<'_>) {
    if let Some(index) = exp.as_parameter().and_then(|p| p.index) {
        if exp.type_info().is_complete() {
            ctx.parameters_mut().resolve(index, exp.type_info());
        }
    }
    for child in exp.children() {
        record_resolved_parameters(child, ctx);
    }
}

fn default_parameters(exp: &mut Exp, default_type: &TypeInfo, ctx: &mut ParseContext<'_>) {
    if exp.is_unresolved_parameter() {
        let index = exp.as_parameter().and_then(|p| p.index);
        let type_info = index
            .and_then(|i| ctx.parameters().get(i))
            .map(|p| p.type_info.clone())
            .filter(TypeInfo::is_complete)
            .unwrap_or_else(|| default_type.clone());
        trace!("parameter '{}' settles as {}", exp, type_info);
        if let Some(index) = index {
            ctx.parameters_mut().resolve(index, &type_info);
        }
        exp.set_target_exp_info(type_info, None);
    }
    for child in exp.children_mut() {
        default_parameters(child, default_type, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsql_ast::{BinarySqlOperator, ExpId};
    use ecsql_diagnostics::IssueCollector;
    use ecsql_functions::build_default_registry;
    use ecsql_types::InMemorySchema;

    #[test]
    fn test_ids_are_assigned_in_pre_order() {
        let schema = InMemorySchema::new();
        let functions = build_default_registry();
        let mut issues = IssueCollector::new();
        let mut ctx = ParseContext::new(&schema, &functions, &mut issues);

        let mut exp = Exp::binary(
            BinarySqlOperator::Plus,
            Exp::integer_literal(1),
            Exp::parameter(),
        );
        finalize(&mut exp, &mut ctx).unwrap();

        assert_eq!(exp.id(), Some(ExpId(0)));
        let children = exp.children();
        assert_eq!(children[0].id(), Some(ExpId(1)));
        assert_eq!(children[1].id(), Some(ExpId(2)));
        assert_eq!(
            children[1].as_parameter().and_then(|p| p.target_exp),
            Some(ExpId(0))
        );
    }

    #[test]
    fn test_lone_parameter_gets_default_type() {
        let schema = InMemorySchema::new();
        let functions = build_default_registry();
        let mut issues = IssueCollector::new();
        let mut ctx = ParseContext::new(&schema, &functions, &mut issues);

        let mut exp = Exp::named_parameter("p");
        finalize(&mut exp, &mut ctx).unwrap();

        assert!(exp.type_info().is_approximate_numeric());
        assert_eq!(ctx.parameters().index_of("p"), Some(1));
    }
}
