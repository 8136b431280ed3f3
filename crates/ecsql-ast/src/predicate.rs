//! Boolean predicates and their special operands

use ecsql_types::ClassRef;
use serde::{Deserialize, Serialize};

use crate::{BooleanSqlOperator, BoxExp, OptBoxExp};

/// `lhs op rhs` producing a boolean
///
/// For LIKE the right operand is a [`LikeRhsValueExp`]; for BETWEEN it is a
/// [`BetweenRangeValueExp`]; for `IS [NOT] (...)` it may be a [`TypeListExp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryBooleanExp {
    pub op: BooleanSqlOperator,
    pub lhs: BoxExp,
    pub rhs: BoxExp,
}

/// NOT operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryBooleanExp {
    pub operand: BoxExp,
}

/// Pattern of a LIKE predicate with optional ESCAPE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRhsValueExp {
    pub rhs: BoxExp,
    #[serde(default)]
    pub escape: OptBoxExp,
}

/// `lower AND upper` of a BETWEEN predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweenRangeValueExp {
    pub lower: BoxExp,
    pub upper: BoxExp,
}

/// Class list of an `IS (...)` predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeListExp {
    pub classes: Vec<TypeListEntry>,
}

/// One class of a type list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeListEntry {
    pub schema: String,
    pub name: String,
    /// False when written with ONLY
    #[serde(default = "default_polymorphic")]
    pub polymorphic: bool,
    /// Filled in by the finalize walk
    #[serde(skip)]
    pub class_ref: Option<ClassRef>,
}

fn default_polymorphic() -> bool {
    true
}

impl TypeListEntry {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            polymorphic: true,
            class_ref: None,
        }
    }

    /// Entry written as `ONLY schema.Class`
    pub fn only(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            polymorphic: false,
            ..Self::new(schema, name)
        }
    }
}
