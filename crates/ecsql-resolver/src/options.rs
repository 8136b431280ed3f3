//! Finalize walk configuration

use ecsql_functions::BlobArgPolicy;
use ecsql_types::{PrimitiveType, SchemaLookupMode};
use serde::{Deserialize, Serialize};

/// Settings of one finalize walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeOptions {
    /// How `blob` arguments of member functions are checked
    pub blob_arg_policy: BlobArgPolicy,
    /// How schema qualifiers in casts and type lists are matched
    pub schema_lookup_mode: SchemaLookupMode,
    /// Type of parameters no context determined
    pub default_parameter_type: PrimitiveType,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            blob_arg_policy: BlobArgPolicy::default(),
            schema_lookup_mode: SchemaLookupMode::default(),
            default_parameter_type: PrimitiveType::Double,
        }
    }
}

impl FinalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob_arg_policy(mut self, policy: BlobArgPolicy) -> Self {
        self.blob_arg_policy = policy;
        self
    }

    pub fn with_schema_lookup_mode(mut self, mode: SchemaLookupMode) -> Self {
        self.schema_lookup_mode = mode;
        self
    }

    pub fn with_default_parameter_type(mut self, primitive: PrimitiveType) -> Self {
        self.default_parameter_type = primitive;
        self
    }
}
