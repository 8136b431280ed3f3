//! Conditional expressions: IIF and searched CASE

use serde::{Deserialize, Serialize};

use crate::{BoxExp, Exp, OptBoxExp};

/// IIF(condition, then, else)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IifExp {
    pub condition: BoxExp,
    pub then_exp: BoxExp,
    pub else_exp: BoxExp,
}

/// CASE WHEN ... THEN ... [ELSE ...] END
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCaseValueExp {
    /// [`WhenExp`] nodes in order
    pub when_clauses: Vec<Exp>,
    #[serde(default)]
    pub else_exp: OptBoxExp,
}

impl SearchCaseValueExp {
    /// THEN branches in order, skipping anything that is not a WHEN clause
    pub fn then_branches(&self) -> impl Iterator<Item = &Exp> {
        self.when_clauses.iter().filter_map(|w| match &w.kind {
            crate::ExpKind::When(when) => Some(&*when.then),
            _ => None,
        })
    }
}

/// WHEN condition THEN value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenExp {
    pub when: BoxExp,
    pub then: BoxExp,
}
