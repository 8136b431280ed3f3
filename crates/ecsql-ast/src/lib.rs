//! ECSQL expression tree definitions
//!
//! This crate defines the expression nodes the ECSQL finalize walk types and
//! validates, and the render walk that turns a tree back into canonical
//! ECSQL text. Nodes are built by an external parser (or by hand through the
//! constructors on [`Exp`]); they start untyped except for literals and enum
//! values, whose type is fixed at construction.

mod conditional;
mod exp;
mod function;
mod operation;
mod operator;
mod predicate;
mod render;
mod value;

pub use conditional::*;
pub use exp::*;
pub use function::*;
pub use operation::*;
pub use operator::*;
pub use predicate::*;
pub use render::*;
pub use value::*;

/// Type alias for boxed expressions
pub type BoxExp = Box<Exp>;

/// Type alias for optional boxed expressions
pub type OptBoxExp = Option<Box<Exp>>;
