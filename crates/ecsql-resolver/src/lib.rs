//! ECSQL finalize-parsing
//!
//! Takes an untyped [`Exp`](ecsql_ast::Exp) tree and, in one walk,
//! - infers the type of every node,
//! - validates operand and argument compatibility,
//! - types `?` and `:name` parameters from their context.
//!
//! The walk runs against a [`ParseContext`], which bundles the schema
//! lookup, function registries, issue sink and [`FinalizeOptions`] and
//! collects the statement's [`ParameterMap`].

mod context;
mod finalize;
mod options;
mod parameters;
mod policy;

pub use context::ParseContext;
pub use finalize::{finalize, WalkState};
pub use options::FinalizeOptions;
pub use parameters::{ParameterInfo, ParameterMap};
