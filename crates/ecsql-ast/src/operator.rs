//! ECSQL operators

use serde::{Deserialize, Serialize};

/// Result category of a binary value operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// `+ - * / %`, numeric result
    Arithmetic,
    /// `& | << >>`, integral result
    Bitwise,
    /// `||`, string result
    Concatenation,
}

/// Binary operators producing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinarySqlOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    ShiftLeft,
    ShiftRight,
    Concat,
}

impl BinarySqlOperator {
    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Concat => "||",
        }
    }

    pub const fn category(&self) -> OperatorCategory {
        match self {
            Self::Plus | Self::Minus | Self::Multiply | Self::Divide | Self::Modulo => {
                OperatorCategory::Arithmetic
            }
            Self::BitwiseAnd | Self::BitwiseOr | Self::ShiftLeft | Self::ShiftRight => {
                OperatorCategory::Bitwise
            }
            Self::Concat => OperatorCategory::Concatenation,
        }
    }

    /// Get the precedence level (higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Concat => 4,
            Self::Multiply | Self::Divide | Self::Modulo => 3,
            Self::Plus | Self::Minus => 2,
            Self::BitwiseAnd | Self::BitwiseOr | Self::ShiftLeft | Self::ShiftRight => 1,
        }
    }
}

/// Unary operators producing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnarySqlOperator {
    Plus,
    Minus,
    BitwiseNot,
}

impl UnarySqlOperator {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitwiseNot => "~",
        }
    }
}

/// Binary operators producing a boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanSqlOperator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Is,
    IsNot,
    Like,
    NotLike,
    Between,
    NotBetween,
    And,
    Or,
}

impl BooleanSqlOperator {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EqualTo => "=",
            Self::NotEqualTo => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// `=`, `<>`, `<`, `<=`, `>`, `>=`
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::EqualTo
                | Self::NotEqualTo
                | Self::LessThan
                | Self::LessThanOrEqualTo
                | Self::GreaterThan
                | Self::GreaterThanOrEqualTo
        )
    }

    /// `=`, `<>`, `IS`, `IS NOT`
    pub const fn is_equality(&self) -> bool {
        matches!(self, Self::EqualTo | Self::NotEqualTo | Self::Is | Self::IsNot)
    }

    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn is_like(&self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }

    pub const fn is_between(&self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }

    pub const fn is_is(&self) -> bool {
        matches!(self, Self::Is | Self::IsNot)
    }
}

/// Set quantifier of an aggregate call (`count(DISTINCT x)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlSetQuantifier {
    Distinct,
    All,
}

impl SqlSetQuantifier {
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
        }
    }
}
