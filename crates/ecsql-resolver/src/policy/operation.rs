//! Binary and unary value operators, CAST

use ecsql_ast::{CastTarget, Exp, ExpKind, OperatorCategory, UnarySqlOperator};
use ecsql_diagnostics::{EcsqlError, ECSQL0100, ECSQL0104, ECSQL0203};
use ecsql_types::{ClassKind, DateTimeInfo, DateTimeKind, PrimitiveType, TypeInfo};

use super::{exempt, type_error, usable};
use crate::{ParseContext, WalkState};

pub(super) fn binary_value_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    if let ExpKind::BinaryValue(node) = &exp.kind {
        let primitive = match node.op.category() {
            OperatorCategory::Arithmetic => PrimitiveType::Double,
            OperatorCategory::Bitwise => PrimitiveType::Long,
            OperatorCategory::Concatenation => PrimitiveType::String,
        };
        exp.set_type_info(TypeInfo::create_primitive(primitive));
    }
    Ok(WalkState::NotCompleted)
}

pub(super) fn binary_value_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::BinaryValue(node) = &exp.kind else {
        return Ok(());
    };
    let category = node.op.category();
    for operand in [&*node.lhs, &*node.rhs] {
        if exempt(operand) {
            continue;
        }
        let operand_type = operand.type_info();
        let (ok, expected) = match category {
            OperatorCategory::Arithmetic | OperatorCategory::Bitwise => {
                (operand_type.is_numeric(), "numeric")
            }
            OperatorCategory::Concatenation => (operand_type.is_string(), "a string"),
        };
        if !operand_type.is_primitive() || !ok {
            return Err(type_error(
                ECSQL0100,
                format!(
                    "Operand '{}' of operator '{}' must be {}, but is {}",
                    operand,
                    node.op.symbol(),
                    expected,
                    operand_type
                ),
                exp,
            ));
        }
    }
    Ok(())
}

pub(super) fn unary_value_before(exp: &mut Exp) -> Result<WalkState, EcsqlError> {
    if let ExpKind::UnaryValue(node) = &exp.kind {
        let primitive = match node.op {
            UnarySqlOperator::Plus | UnarySqlOperator::Minus => PrimitiveType::Double,
            UnarySqlOperator::BitwiseNot => PrimitiveType::Long,
        };
        exp.set_type_info(TypeInfo::create_primitive(primitive));
    }
    Ok(WalkState::NotCompleted)
}

pub(super) fn unary_value_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::UnaryValue(node) = &exp.kind else {
        return Ok(());
    };
    if exempt(&node.operand) {
        return Ok(());
    }
    let operand_type = node.operand.type_info();
    let (ok, expected) = match node.op {
        UnarySqlOperator::Plus | UnarySqlOperator::Minus => (operand_type.is_numeric(), "numeric"),
        UnarySqlOperator::BitwiseNot => (operand_type.is_exact_numeric(), "an integral number"),
    };
    if !ok {
        return Err(type_error(
            ECSQL0100,
            format!(
                "Operand '{}' of unary operator '{}' must be {}, but is {}",
                node.operand,
                node.op.symbol(),
                expected,
                operand_type
            ),
            exp,
        ));
    }
    Ok(())
}

/// Parameter operands take the other operand's type, else the result type
pub(super) fn value_operand_parameter_type(parent: &Exp, index: usize) -> Option<TypeInfo> {
    if let ExpKind::BinaryValue(node) = &parent.kind {
        let other = if index == 0 { &node.rhs } else { &node.lhs };
        if usable(other.type_info()) {
            return Some(other.type_info().clone());
        }
    }
    Some(parent.type_info().clone())
}

pub(super) fn cast_before(
    exp: &mut Exp,
    ctx: &mut ParseContext<'_>,
) -> Result<WalkState, EcsqlError> {
    let ExpKind::Cast(node) = &exp.kind else {
        return Ok(WalkState::NotCompleted);
    };
    let target = resolve_cast_target(&node.target, ctx, exp)?;
    exp.set_type_info(target);
    Ok(WalkState::NotCompleted)
}

pub(super) fn cast_after(exp: &mut Exp) -> Result<(), EcsqlError> {
    let ExpKind::Cast(node) = &exp.kind else {
        return Ok(());
    };
    if exempt(&node.operand) {
        return Ok(());
    }
    let source = node.operand.type_info();
    let target = exp.type_info();
    if !source.is_primitive() {
        return Err(type_error(
            ECSQL0104,
            format!(
                "Cannot cast '{}' of type {} to {}: only primitive values and NULL can be cast",
                node.operand, source, target
            ),
            exp,
        ));
    }
    if (source.is_point() || target.is_point())
        && (source.primitive_type() != target.primitive_type() || target.is_array())
    {
        return Err(type_error(
            ECSQL0104,
            format!(
                "Cannot cast '{}' of type {} to {}: points can only be cast to the same point type",
                node.operand, source, target
            ),
            exp,
        ));
    }
    Ok(())
}

fn resolve_cast_target(
    target: &CastTarget,
    ctx: &ParseContext<'_>,
    exp: &Exp,
) -> Result<TypeInfo, EcsqlError> {
    let Some(schema) = &target.schema else {
        let resolved = primitive_cast_target(&target.name).ok_or_else(|| {
            type_error(
                ECSQL0104,
                format!("Unknown CAST target type '{}'", target.name),
                exp,
            )
        })?;
        return Ok(if target.is_array {
            resolved.into_array()
        } else {
            resolved
        });
    };

    if let Some(enumeration) = ctx.find_enumeration(schema, &target.name) {
        return Ok(TypeInfo::create_enum(enumeration.enum_ref, target.is_array));
    }
    let class = ctx.resolve_class(schema, &target.name, exp)?;
    if class.kind != ClassKind::Struct {
        return Err(type_error(
            ECSQL0203,
            format!(
                "CAST target '{}' must be an enumeration or a struct class",
                class.class_ref.key
            ),
            exp,
        ));
    }
    Ok(TypeInfo::create_struct(class.class_ref, target.is_array))
}

/// Primitive type named by a CAST keyword
fn primitive_cast_target(keyword: &str) -> Option<TypeInfo> {
    let primitive = |t| Some(TypeInfo::create_primitive(t));
    match keyword.to_ascii_uppercase().as_str() {
        "BINARY" | "BLOB" => primitive(PrimitiveType::Binary),
        "BOOLEAN" => primitive(PrimitiveType::Boolean),
        "DATE" => Some(TypeInfo::create_date_time(DateTimeInfo::date_only())),
        "TIME" => Some(TypeInfo::create_date_time(DateTimeInfo::time_of_day())),
        "TIMESTAMP" | "DATETIME" => Some(TypeInfo::create_date_time(
            DateTimeInfo::date_and_time(DateTimeKind::Unspecified),
        )),
        "DOUBLE" | "REAL" | "FLOAT" => primitive(PrimitiveType::Double),
        "INT" | "INTEGER" => primitive(PrimitiveType::Integer),
        "INT64" | "LONG" | "BIGINT" => primitive(PrimitiveType::Long),
        "STRING" | "TEXT" | "VARCHAR" => primitive(PrimitiveType::String),
        "POINT2D" => primitive(PrimitiveType::Point2d),
        "POINT3D" => primitive(PrimitiveType::Point3d),
        "GEOMETRY" => primitive(PrimitiveType::IGeometry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int", "Integer")]
    #[case("BigInt", "Long")]
    #[case("varchar", "String")]
    #[case("date", "DateTime (Date)")]
    #[case("point3d", "Point3d")]
    #[case("geometry", "IGeometry")]
    fn test_primitive_cast_keywords(#[case] keyword: &str, #[case] expected: &str) {
        assert_eq!(
            primitive_cast_target(keyword).map(|t| t.to_string()),
            Some(expected.to_string())
        );
    }

    #[test]
    fn test_unknown_cast_keyword() {
        assert!(primitive_cast_target("decimal").is_none());
    }
}
