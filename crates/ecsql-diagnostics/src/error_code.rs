//! ECSQL error codes following a structured numbering system
//!
//! Error code ranges:
//! - ECSQL0001-ECSQL0099: Function signature declaration errors
//! - ECSQL0100-ECSQL0199: Semantic errors (type checking, resolution)
//! - ECSQL0200-ECSQL0299: Schema lookup errors
//! - ECSQL0400-ECSQL0499: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a signature declaration error (0001-0099)
    pub const fn is_signature_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a semantic error (0100-0199)
    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a schema lookup error (0200-0299)
    pub const fn is_schema_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECSQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Signature declaration errors (0001-0099)
    map.insert(1, ErrorInfo::new("Malformed function signature"));
    map.insert(2, ErrorInfo::new("Missing parentheses in function signature"));
    map.insert(3, ErrorInfo::new("Malformed argument declaration"));
    map.insert(4, ErrorInfo::new("Unknown value type keyword")
        .with_help("Valid types are string, integer, int, float, double, real, blob, resultset, numeric and any"));
    map.insert(5, ErrorInfo::new("Resultset used as argument type"));
    map.insert(6, ErrorInfo::new("Optional argument declared before a required one"));
    map.insert(7, ErrorInfo::new("Variadic argument is not the last argument"));
    map.insert(8, ErrorInfo::new("Variadic argument marked optional"));
    map.insert(9, ErrorInfo::new("Duplicate argument name"));
    map.insert(10, ErrorInfo::new("Resultset return type on a non-member signature")
        .with_help("Prefix the declaration with '::' to declare a member function"));
    map.insert(11, ErrorInfo::new("Duplicate function declaration"));

    // Semantic errors (0100-0199)
    map.insert(100, ErrorInfo::new("Type mismatch"));
    map.insert(101, ErrorInfo::new("Unknown function")
        .with_help("Check that the function is declared in the function signature set"));
    map.insert(102, ErrorInfo::new("Invalid argument count"));
    map.insert(103, ErrorInfo::new("Invalid argument type"));
    map.insert(104, ErrorInfo::new("Invalid cast"));
    map.insert(105, ErrorInfo::new("Invalid literal value"));
    map.insert(106, ErrorInfo::new("Ambiguous parameter type")
        .with_help("Parameters cannot be passed as variadic function arguments"));
    map.insert(107, ErrorInfo::new("Invalid conditional branch type"));
    map.insert(108, ErrorInfo::new("Invalid set quantifier usage"));
    map.insert(109, ErrorInfo::new("Expression type could not be determined"));
    map.insert(110, ErrorInfo::new("Invalid member function argument"));
    map.insert(111, ErrorInfo::new("Invalid comparison operand"));

    // Schema lookup errors (0200-0299)
    map.insert(200, ErrorInfo::new("Unknown schema"));
    map.insert(201, ErrorInfo::new("Unknown class"));
    map.insert(202, ErrorInfo::new("Unknown enumeration"));
    map.insert(203, ErrorInfo::new("Class is not a struct"));
    map.insert(204, ErrorInfo::new("Unknown enumerator"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("I/O error"));
    map.insert(402, ErrorInfo::new("Configuration error"));
    map.insert(403, ErrorInfo::new("Invalid format"));

    map
});

// Signature declaration errors
pub const ECSQL0001: ErrorCode = ErrorCode::new(1);
pub const ECSQL0002: ErrorCode = ErrorCode::new(2);
pub const ECSQL0003: ErrorCode = ErrorCode::new(3);
pub const ECSQL0004: ErrorCode = ErrorCode::new(4);
pub const ECSQL0005: ErrorCode = ErrorCode::new(5);
pub const ECSQL0006: ErrorCode = ErrorCode::new(6);
pub const ECSQL0007: ErrorCode = ErrorCode::new(7);
pub const ECSQL0008: ErrorCode = ErrorCode::new(8);
pub const ECSQL0009: ErrorCode = ErrorCode::new(9);
pub const ECSQL0010: ErrorCode = ErrorCode::new(10);
pub const ECSQL0011: ErrorCode = ErrorCode::new(11);

// Semantic errors
pub const ECSQL0100: ErrorCode = ErrorCode::new(100);
pub const ECSQL0101: ErrorCode = ErrorCode::new(101);
pub const ECSQL0102: ErrorCode = ErrorCode::new(102);
pub const ECSQL0103: ErrorCode = ErrorCode::new(103);
pub const ECSQL0104: ErrorCode = ErrorCode::new(104);
pub const ECSQL0105: ErrorCode = ErrorCode::new(105);
pub const ECSQL0106: ErrorCode = ErrorCode::new(106);
pub const ECSQL0107: ErrorCode = ErrorCode::new(107);
pub const ECSQL0108: ErrorCode = ErrorCode::new(108);
pub const ECSQL0109: ErrorCode = ErrorCode::new(109);
pub const ECSQL0110: ErrorCode = ErrorCode::new(110);
pub const ECSQL0111: ErrorCode = ErrorCode::new(111);

// Schema lookup errors
pub const ECSQL0200: ErrorCode = ErrorCode::new(200);
pub const ECSQL0201: ErrorCode = ErrorCode::new(201);
pub const ECSQL0202: ErrorCode = ErrorCode::new(202);
pub const ECSQL0203: ErrorCode = ErrorCode::new(203);
pub const ECSQL0204: ErrorCode = ErrorCode::new(204);

// System errors
pub const ECSQL0400: ErrorCode = ErrorCode::new(400);
pub const ECSQL0401: ErrorCode = ErrorCode::new(401);
pub const ECSQL0402: ErrorCode = ErrorCode::new(402);
pub const ECSQL0403: ErrorCode = ErrorCode::new(403);
