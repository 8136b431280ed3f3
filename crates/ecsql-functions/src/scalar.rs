//! Custom scalar functions registered by the host
//!
//! Hosts can add SQL functions to the underlying database. Their declared
//! storage class takes precedence over the built-in return type table when
//! a call is typed. Lookup is by `(name, num_args)` with a fallback to the
//! variadic registration (`num_args == -1`).

use ecsql_types::{PrimitiveType, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage class a scalar function declares for its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbValueType {
    Blob,
    Integer,
    Text,
    Float,
    Null,
}

impl DbValueType {
    /// ECSQL type of a value of this storage class
    pub fn to_type_info(self) -> TypeInfo {
        let primitive = match self {
            Self::Blob => PrimitiveType::Binary,
            Self::Integer => PrimitiveType::Long,
            Self::Text => PrimitiveType::String,
            Self::Float | Self::Null => PrimitiveType::Double,
        };
        TypeInfo::create_primitive(primitive)
    }
}

/// A registered scalar function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarFunction {
    pub name: String,
    /// Number of arguments, -1 for any
    pub num_args: i32,
    pub return_type: DbValueType,
}

impl ScalarFunction {
    pub fn new(name: impl Into<String>, num_args: i32, return_type: DbValueType) -> Self {
        Self {
            name: name.into(),
            num_args,
            return_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionKey {
    name: String,
    num_args: i32,
}

impl FunctionKey {
    fn new(name: &str, num_args: i32) -> Self {
        Self {
            name: canonical_name(name),
            num_args,
        }
    }
}

fn canonical_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Registry of host scalar functions
#[derive(Debug, Clone, Default)]
pub struct ScalarFunctionRegistry {
    functions: HashMap<FunctionKey, ScalarFunction>,
}

impl ScalarFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any with the same name and arity
    pub fn register(&mut self, function: ScalarFunction) -> Option<ScalarFunction> {
        let key = FunctionKey::new(&function.name, function.num_args);
        self.functions.insert(key, function)
    }

    /// Find a function by name and argument count
    ///
    /// An exact arity match wins over a variadic registration.
    pub fn find(&self, name: &str, num_args: usize) -> Option<&ScalarFunction> {
        let arity = i32::try_from(num_args).unwrap_or(i32::MAX);
        if let Some(f) = self.functions.get(&FunctionKey::new(name, arity)) {
            log::trace!("scalar function lookup {}({}): exact", name, num_args);
            return Some(f);
        }
        let found = self.functions.get(&FunctionKey::new(name, -1));
        log::trace!(
            "scalar function lookup {}({}): {}",
            name,
            num_args,
            if found.is_some() { "variadic" } else { "miss" }
        );
        found
    }

    pub fn contains(&self, name: &str) -> bool {
        let canon = canonical_name(name);
        self.functions.keys().any(|k| k.name == canon)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_arity_beats_variadic() {
        let mut registry = ScalarFunctionRegistry::new();
        registry.register(ScalarFunction::new("scale", -1, DbValueType::Float));
        registry.register(ScalarFunction::new("scale", 2, DbValueType::Integer));

        assert_eq!(
            registry.find("SCALE", 2).map(|f| f.return_type),
            Some(DbValueType::Integer)
        );
        assert_eq!(
            registry.find("scale", 5).map(|f| f.return_type),
            Some(DbValueType::Float)
        );
        assert!(registry.find("other", 1).is_none());
    }

    #[test]
    fn test_storage_class_mapping() {
        assert!(DbValueType::Blob.to_type_info().is_binary());
        assert!(DbValueType::Integer.to_type_info().is_exact_numeric());
        assert!(DbValueType::Text.to_type_info().is_string());
        assert!(DbValueType::Null.to_type_info().is_approximate_numeric());
    }

    #[test]
    fn test_register_replaces_same_key() {
        let mut registry = ScalarFunctionRegistry::new();
        assert!(registry
            .register(ScalarFunction::new("f", 1, DbValueType::Text))
            .is_none());
        assert!(registry
            .register(ScalarFunction::new("F", 1, DbValueType::Blob))
            .is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("f"));
    }
}
