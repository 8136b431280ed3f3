//! ECSQL type system
//!
//! This crate defines the value types an ECSQL expression can take:
//! - Primitive types (Boolean, Integer, Long, Double, String, Binary, DateTime, points, geometry)
//! - References to schema enumerations and struct classes
//! - The schema lookup seam the finalize walk consumes
//! - DateTime literal parsing

pub mod datetime;
pub mod schema;
pub mod type_info;

pub use datetime::*;
pub use schema::*;
pub use type_info::*;
