//! Leaf value expressions: literals, parameters, enum values, property
//! references and subqueries

use ecsql_types::{DateTimeInfo, DateTimeKind, EnumRef, PrimitiveType, TypeInfo};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ExpId;

/// Lexical category of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralType {
    Null,
    Boolean,
    Integer,
    Long,
    Double,
    String,
    Date,
    Time,
    Timestamp,
}

/// Literal value kept as its source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralValueExp {
    /// Unquoted text: the string value for strings, the quoted part for
    /// DateTime literals, the number as written for numerics
    pub raw: String,
    pub literal_type: LiteralType,
}

impl LiteralValueExp {
    pub fn new(raw: impl Into<String>, literal_type: LiteralType) -> Self {
        Self {
            raw: raw.into(),
            literal_type,
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(
            self.literal_type,
            LiteralType::Date | LiteralType::Time | LiteralType::Timestamp
        )
    }

    /// Type of the literal
    ///
    /// TIMESTAMP literals ending in `Z` are UTC; other timestamps are
    /// unspecified.
    pub fn type_info(&self) -> TypeInfo {
        match self.literal_type {
            LiteralType::Null => TypeInfo::null(),
            LiteralType::Boolean => TypeInfo::create_primitive(PrimitiveType::Boolean),
            LiteralType::Integer => TypeInfo::create_primitive(PrimitiveType::Integer),
            LiteralType::Long => TypeInfo::create_primitive(PrimitiveType::Long),
            LiteralType::Double => TypeInfo::create_primitive(PrimitiveType::Double),
            LiteralType::String => TypeInfo::create_primitive(PrimitiveType::String),
            LiteralType::Date => TypeInfo::create_date_time(DateTimeInfo::date_only()),
            LiteralType::Time => TypeInfo::create_date_time(DateTimeInfo::time_of_day()),
            LiteralType::Timestamp => {
                let kind = if self.raw.trim_end().ends_with('Z') {
                    DateTimeKind::Utc
                } else {
                    DateTimeKind::Unspecified
                };
                TypeInfo::create_date_time(DateTimeInfo::date_and_time(kind))
            }
        }
    }
}

/// `?` or `:name` placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterExp {
    /// Name of a `:name` parameter; `None` for `?`
    #[serde(default)]
    pub name: Option<String>,
    /// 1-based binding index, assigned by the parse context
    #[serde(default)]
    pub index: Option<usize>,
    /// Node the resolved type was taken from
    #[serde(skip)]
    pub target_exp: Option<ExpId>,
}

impl ParameterExp {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// Enumerator of a schema enumeration, e.g. `ts.Color.Red`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueExp {
    pub enum_ref: EnumRef,
    pub enumerator: String,
}

/// Property reference; the host resolves it before finalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNameExp {
    /// Dotted path segments, e.g. `["Address", "City"]`
    pub path: SmallVec<[String; 2]>,
    pub property_type: TypeInfo,
}

/// Nested SELECT with the type of its single result column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubqueryExp {
    pub ecsql: String,
    pub result_type: TypeInfo,
}
