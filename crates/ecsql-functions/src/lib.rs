//! ECSQL function typing
//!
//! - [`FunctionSignature`]: the declaration mini-language, argument
//!   verification and parameter typing for member functions
//! - [`FunctionSignatureSet`]: the signature registry
//! - [`builtin_return_type`]: return types of built-in SQL functions
//! - [`ScalarFunctionRegistry`]: scalar functions added by the host

mod builtins;
mod registry;
mod scalar;
mod signature;

pub use builtins::*;
pub use registry::*;
pub use scalar::*;
pub use signature::*;
