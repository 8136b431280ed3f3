//! Value operations: binary and unary operators, CAST

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BinarySqlOperator, BoxExp, UnarySqlOperator};

/// `lhs op rhs` producing a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryValueExp {
    pub op: BinarySqlOperator,
    pub lhs: BoxExp,
    pub rhs: BoxExp,
}

/// `op operand` producing a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryValueExp {
    pub op: UnarySqlOperator,
    pub operand: BoxExp,
}

/// CAST(operand AS target)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastExp {
    pub operand: BoxExp,
    pub target: CastTarget,
}

/// Target type of a CAST as written
///
/// Without a schema the name is a primitive type keyword (`INTEGER`,
/// `TEXT`, `POINT2D`, ...). With a schema it names an enumeration or a
/// struct class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastTarget {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_array: bool,
}

impl CastTarget {
    /// Primitive type keyword target
    pub fn primitive(keyword: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: keyword.into(),
            is_array: false,
        }
    }

    /// Schema-qualified enumeration or struct target
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
            is_array: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name)?,
            None => f.write_str(&self.name.to_ascii_uppercase())?,
        }
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
