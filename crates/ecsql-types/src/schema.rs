//! Schema metadata lookup
//!
//! The finalize walk never owns schema metadata. It asks a [`SchemaLookup`]
//! for classes and enumerations by schema and name, and keeps only
//! lightweight [`ClassRef`] / [`EnumRef`] handles in the typed tree.
//! [`InMemorySchema`] is a small self-contained implementation that can be
//! built in code or loaded from JSON.

use ecsql_diagnostics::{EcsqlError, ECSQL0403};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PrimitiveType;

/// Schema-qualified name of a class or enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaItemKey {
    /// Schema name (or alias, as resolved)
    pub schema: String,
    /// Item name
    pub name: String,
}

impl SchemaItemKey {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SchemaItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Non-owning reference to a schema enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumRef {
    pub key: SchemaItemKey,
    /// Primitive type the enumerator values are stored as
    pub backing_type: PrimitiveType,
}

impl EnumRef {
    pub fn new(key: SchemaItemKey, backing_type: PrimitiveType) -> Self {
        Self { key, backing_type }
    }
}

/// Non-owning reference to a schema class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassRef {
    pub key: SchemaItemKey,
}

impl ClassRef {
    pub fn new(key: SchemaItemKey) -> Self {
        Self { key }
    }
}

/// Kind of EC class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Entity,
    Struct,
    CustomAttribute,
    Relationship,
    Mixin,
}

/// How the schema part of a qualified name is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaLookupMode {
    /// Match the schema name only
    ByName,
    /// Match the schema alias only
    ByAlias,
    /// Match either name or alias
    #[default]
    AutoDetect,
}

/// A class as returned by a schema lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub class_ref: ClassRef,
    pub kind: ClassKind,
}

/// An enumeration as returned by a schema lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationInfo {
    pub enum_ref: EnumRef,
    pub enumerators: Vec<EcEnumerator>,
}

impl EnumerationInfo {
    /// Find an enumerator by name (case-insensitive)
    pub fn find_enumerator(&self, name: &str) -> Option<&EcEnumerator> {
        self.enumerators
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// Schema metadata store consumed by the finalize walk
pub trait SchemaLookup {
    /// Whether a schema with the given name or alias is known
    fn has_schema(&self, schema: &str, mode: SchemaLookupMode) -> bool;

    /// Look up a class by schema and class name
    fn get_class(&self, schema: &str, name: &str, mode: SchemaLookupMode) -> Option<ClassInfo>;

    /// Look up an enumeration by schema and enumeration name
    fn get_enumeration(
        &self,
        schema: &str,
        name: &str,
        mode: SchemaLookupMode,
    ) -> Option<EnumerationInfo>;
}

/// Enumerator value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumeratorValue {
    Integer(i32),
    String(String),
}

/// A single enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcEnumerator {
    pub name: String,
    pub value: EnumeratorValue,
}

impl EcEnumerator {
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value: EnumeratorValue::Integer(value),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: EnumeratorValue::String(value.into()),
        }
    }
}

/// Class definition inside an [`EcSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcClass {
    pub name: String,
    pub kind: ClassKind,
}

/// Enumeration definition inside an [`EcSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcEnumeration {
    pub name: String,
    pub backing_type: PrimitiveType,
    #[serde(default)]
    pub enumerators: Vec<EcEnumerator>,
}

/// A schema with its classes and enumerations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcSchema {
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub classes: Vec<EcClass>,
    #[serde(default)]
    pub enumerations: Vec<EcEnumeration>,
}

impl EcSchema {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            classes: Vec::new(),
            enumerations: Vec::new(),
        }
    }

    /// Add a class
    pub fn with_class(mut self, name: impl Into<String>, kind: ClassKind) -> Self {
        self.classes.push(EcClass {
            name: name.into(),
            kind,
        });
        self
    }

    /// Add an enumeration
    pub fn with_enumeration(
        mut self,
        name: impl Into<String>,
        backing_type: PrimitiveType,
        enumerators: Vec<EcEnumerator>,
    ) -> Self {
        self.enumerations.push(EcEnumeration {
            name: name.into(),
            backing_type,
            enumerators,
        });
        self
    }

    fn matches(&self, schema: &str, mode: SchemaLookupMode) -> bool {
        match mode {
            SchemaLookupMode::ByName => self.name.eq_ignore_ascii_case(schema),
            SchemaLookupMode::ByAlias => self.alias.eq_ignore_ascii_case(schema),
            SchemaLookupMode::AutoDetect => {
                self.name.eq_ignore_ascii_case(schema) || self.alias.eq_ignore_ascii_case(schema)
            }
        }
    }
}

/// In-memory schema store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemorySchema {
    #[serde(default)]
    pub schemas: Vec<EcSchema>,
}

impl InMemorySchema {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema
    pub fn with_schema(mut self, schema: EcSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Load a store from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, EcsqlError> {
        serde_json::from_str(json).map_err(|e| {
            EcsqlError::system(ECSQL0403, format!("Invalid schema JSON: {}", e))
        })
    }

    fn find_schema(&self, schema: &str, mode: SchemaLookupMode) -> Option<&EcSchema> {
        self.schemas.iter().find(|s| s.matches(schema, mode))
    }
}

impl SchemaLookup for InMemorySchema {
    fn has_schema(&self, schema: &str, mode: SchemaLookupMode) -> bool {
        self.find_schema(schema, mode).is_some()
    }

    fn get_class(&self, schema: &str, name: &str, mode: SchemaLookupMode) -> Option<ClassInfo> {
        let s = self.find_schema(schema, mode)?;
        let class = s
            .classes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))?;
        Some(ClassInfo {
            class_ref: ClassRef::new(SchemaItemKey::new(&s.name, &class.name)),
            kind: class.kind,
        })
    }

    fn get_enumeration(
        &self,
        schema: &str,
        name: &str,
        mode: SchemaLookupMode,
    ) -> Option<EnumerationInfo> {
        let s = self.find_schema(schema, mode)?;
        let enumeration = s
            .enumerations
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))?;
        Some(EnumerationInfo {
            enum_ref: EnumRef::new(
                SchemaItemKey::new(&s.name, &enumeration.name),
                enumeration.backing_type,
            ),
            enumerators: enumeration.enumerators.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemorySchema {
        InMemorySchema::new().with_schema(
            EcSchema::new("TestSchema", "ts")
                .with_class("Address", ClassKind::Struct)
                .with_class("Pipe", ClassKind::Entity)
                .with_enumeration(
                    "Color",
                    PrimitiveType::Integer,
                    vec![EcEnumerator::integer("Red", 1), EcEnumerator::integer("Blue", 2)],
                ),
        )
    }

    #[test]
    fn test_lookup_modes() {
        let schema = sample();
        assert!(schema.get_class("ts", "Pipe", SchemaLookupMode::AutoDetect).is_some());
        assert!(schema.get_class("TestSchema", "pipe", SchemaLookupMode::ByName).is_some());
        assert!(schema.get_class("ts", "Pipe", SchemaLookupMode::ByName).is_none());
        assert!(schema.get_class("TestSchema", "Pipe", SchemaLookupMode::ByAlias).is_none());
    }

    #[test]
    fn test_refs_use_schema_name() {
        let schema = sample();
        let class = schema
            .get_class("ts", "address", SchemaLookupMode::AutoDetect)
            .unwrap();
        assert_eq!(class.class_ref.key.to_string(), "TestSchema.Address");
        assert_eq!(class.kind, ClassKind::Struct);
    }

    #[test]
    fn test_enumeration_lookup() {
        let schema = sample();
        let color = schema
            .get_enumeration("ts", "Color", SchemaLookupMode::AutoDetect)
            .unwrap();
        assert_eq!(color.enum_ref.backing_type, PrimitiveType::Integer);
        assert!(color.find_enumerator("BLUE").is_some());
        assert!(color.find_enumerator("Green").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "schemas": [{
                "name": "TestSchema",
                "alias": "ts",
                "classes": [{ "name": "Address", "kind": "Struct" }],
                "enumerations": [{
                    "name": "Status",
                    "backing_type": "String",
                    "enumerators": [{ "name": "On", "value": "on" }]
                }]
            }]
        }"#;
        let schema = InMemorySchema::from_json(json).unwrap();
        assert!(schema.has_schema("ts", SchemaLookupMode::AutoDetect));
        let status = schema
            .get_enumeration("ts", "Status", SchemaLookupMode::AutoDetect)
            .unwrap();
        assert_eq!(
            status.enumerators[0].value,
            EnumeratorValue::String("on".to_string())
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = InMemorySchema::from_json("{ not json").unwrap_err();
        assert_eq!(err.code(), ECSQL0403);
    }
}
