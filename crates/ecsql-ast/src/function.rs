//! Function call expressions

use ecsql_diagnostics::{EcsqlError, ECSQL0110};
use serde::{Deserialize, Serialize};

use crate::{Exp, ExpKind, SqlSetQuantifier};

/// SQL function call, e.g. `count(DISTINCT x)` or `CURRENT_DATE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallExp {
    pub name: String,
    #[serde(default)]
    pub set_quantifier: Option<SqlSetQuantifier>,
    #[serde(default)]
    pub args: Vec<Exp>,
    /// Niladic keyword form rendered without parentheses
    #[serde(default)]
    pub is_getter: bool,
}

/// Call of an ECSQL member function declared in the signature set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFunctionCallExp {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Exp>,
    /// Whether the call appears as a table-valued function in FROM
    #[serde(default)]
    pub table_valued: bool,
}

impl MemberFunctionCallExp {
    pub fn new(name: impl Into<String>, table_valued: bool) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            table_valued,
        }
    }

    /// Append an argument after [`check_argument`](Self::check_argument)
    pub fn add_argument(&mut self, arg: Exp) -> Result<(), EcsqlError> {
        self.check_argument(&arg)?;
        self.args.push(arg);
        Ok(())
    }

    /// Arguments may not contain a subquery, and may only reference
    /// properties when the call is table-valued.
    pub fn check_argument(&self, arg: &Exp) -> Result<(), EcsqlError> {
        if arg.contains(&|e| matches!(e.kind, ExpKind::Subquery(_))) {
            return Err(EcsqlError::semantic_in(
                ECSQL0110,
                format!(
                    "Subqueries are not allowed as arguments of member function '{}'",
                    self.name
                ),
                arg.to_ecsql(),
            ));
        }
        if !self.table_valued && arg.contains(&|e| matches!(e.kind, ExpKind::PropertyName(_))) {
            return Err(EcsqlError::semantic_in(
                ECSQL0110,
                format!(
                    "Property references are not allowed as arguments of member function '{}'",
                    self.name
                ),
                arg.to_ecsql(),
            ));
        }
        Ok(())
    }
}
