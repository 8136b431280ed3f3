//! ECSQL expression typing and rendering for Rust
//!
//! This crate bundles the ECSQL expression engine:
//! - Expression trees as built by an external ECSQL parser
//! - Type inference and validation of those trees (finalize-parsing)
//! - Typing of `?` and `:name` parameters from their context
//! - Function signatures and the built-in function registry
//! - Rendering typed trees back to canonical ECSQL
//!
//! # Example
//!
//! ```
//! use ecsql::ast::{BinarySqlOperator, Exp};
//! use ecsql::diagnostics::IssueCollector;
//! use ecsql::functions::build_default_registry;
//! use ecsql::types::InMemorySchema;
//! use ecsql::{finalize_expression, ParseContext};
//!
//! let schema = InMemorySchema::new();
//! let functions = build_default_registry();
//! let mut issues = IssueCollector::new();
//! let mut ctx = ParseContext::new(&schema, &functions, &mut issues);
//!
//! let exp = Exp::binary(BinarySqlOperator::Plus, Exp::integer_literal(1), Exp::parameter());
//! let finalized = finalize_expression(exp, &mut ctx)?;
//! assert_eq!(finalized.to_ecsql(), "1 + ?");
//! # Ok::<(), ecsql::EcsqlError>(())
//! ```

pub use ecsql_ast as ast;
pub use ecsql_diagnostics as diagnostics;
pub use ecsql_functions as functions;
pub use ecsql_resolver as resolver;
pub use ecsql_types as types;

pub use ecsql_ast::{Exp, ExpKind, RenderMode};
pub use ecsql_diagnostics::{EcsqlError, Result};
pub use ecsql_resolver::{finalize, FinalizeOptions, ParameterMap, ParseContext};
pub use ecsql_types::TypeInfo;

use serde::Serialize;

/// A typed expression together with its statement parameters
#[derive(Debug, Clone, Serialize)]
pub struct FinalizedExpression {
    pub exp: Exp,
    pub parameters: ParameterMap,
}

impl FinalizedExpression {
    pub fn type_info(&self) -> &TypeInfo {
        self.exp.type_info()
    }

    /// Canonical ECSQL with positional parameters rendered as `?`
    pub fn to_ecsql(&self) -> String {
        self.exp.to_ecsql()
    }

    pub fn to_ecsql_with(&self, mode: RenderMode) -> String {
        self.exp.to_ecsql_with(mode)
    }
}

/// Finalize an untyped tree and take the parameters it declared
///
/// Errors have already been reported to the context's issue sink when
/// they are returned.
pub fn finalize_expression(mut exp: Exp, ctx: &mut ParseContext<'_>) -> Result<FinalizedExpression> {
    finalize(&mut exp, ctx)?;
    let parameters = ctx.take_parameters();
    log::debug!(
        "finalized expression of type {} with {} parameter(s)",
        exp.type_info(),
        parameters.len()
    );
    Ok(FinalizedExpression { exp, parameters })
}

/// Render a tree as ECSQL text
pub fn render_expression(exp: &Exp, mode: RenderMode) -> String {
    exp.to_ecsql_with(mode)
}
