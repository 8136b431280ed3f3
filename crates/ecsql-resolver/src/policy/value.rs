//! Leaves: parameters, literals, enum values, property references and
//! subqueries

use ecsql_ast::{Exp, ExpKind, LiteralType};
use ecsql_diagnostics::{EcsqlError, ECSQL0105, ECSQL0109};
use ecsql_types::{parse_date_time_literal, DateTimeComponent, TypeInfo};

use super::type_error;
use crate::{ParseContext, WalkState};

pub(super) fn parameter_before(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<WalkState, EcsqlError> {
    if let Some(param) = exp.as_parameter_mut() {
        let index = ctx.parameters_mut().register(param.name.as_deref());
        param.index = Some(index);
    }
    Ok(WalkState::Completed)
}

pub(super) fn literal_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    let ExpKind::Literal(lit) = &exp.kind else {
        return Ok(WalkState::Completed);
    };
    let raw = lit.raw.trim();
    let type_info = match lit.literal_type {
        LiteralType::Date | LiteralType::Time | LiteralType::Timestamp => {
            let component = match lit.literal_type {
                LiteralType::Date => DateTimeComponent::Date,
                LiteralType::Time => DateTimeComponent::TimeOfDay,
                _ => DateTimeComponent::DateAndTime,
            };
            let parsed = parse_date_time_literal(component, raw)
                .map_err(|e| type_error(ECSQL0105, e.to_string(), exp))?;
            TypeInfo::create_date_time(parsed.info())
        }
        LiteralType::Integer if raw.parse::<i32>().is_err() => {
            return Err(invalid_number(exp, raw, "an Integer"));
        }
        LiteralType::Long if raw.parse::<i64>().is_err() => {
            return Err(invalid_number(exp, raw, "a Long"));
        }
        LiteralType::Double if raw.parse::<f64>().is_err() => {
            return Err(invalid_number(exp, raw, "a Double"));
        }
        LiteralType::Boolean
            if !raw.eq_ignore_ascii_case("true") && !raw.eq_ignore_ascii_case("false") =>
        {
            return Err(type_error(
                ECSQL0105,
                format!("'{}' is not a valid Boolean literal", raw),
                exp,
            ));
        }
        _ => lit.type_info(),
    };
    exp.set_type_info(type_info);
    Ok(WalkState::Completed)
}

fn invalid_number(exp: &Exp, raw: &str, what: &str) -> EcsqlError {
    type_error(
        ECSQL0105,
        format!("'{}' is not a valid literal of {} value", raw, what),
        exp,
    )
}

pub(super) fn enum_value_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    if let ExpKind::EnumValue(value) = &exp.kind {
        let type_info = TypeInfo::create_enum(value.enum_ref.clone(), false);
        exp.set_type_info(type_info);
    }
    Ok(WalkState::Completed)
}

/// Property references and subqueries carry the type the host resolved
pub(super) fn resolved_leaf_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    let resolved = match &exp.kind {
        ExpKind::PropertyName(p) => p.property_type.clone(),
        ExpKind::Subquery(s) => s.result_type.clone(),
        _ => return Ok(WalkState::Completed),
    };
    if !resolved.is_complete() {
        return Err(type_error(
            ECSQL0109,
            format!("Type of '{}' has not been resolved", exp),
            exp,
        ));
    }
    exp.set_type_info(resolved);
    Ok(WalkState::Completed)
}
