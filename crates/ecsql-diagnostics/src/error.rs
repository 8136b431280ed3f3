//! ECSQL error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - finalization cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Broad area an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    /// Problem in user-authored ECSQL
    BusinessProperties,
    /// Problem with schema metadata the statement refers to
    SchemaLookup,
    /// Problem in the engine or its host configuration
    Internal,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCategory::BusinessProperties => write!(f, "business-properties"),
            IssueCategory::SchemaLookup => write!(f, "schema-lookup"),
            IssueCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Component that raised an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    /// ECSQL expression typing
    Ecsql,
    /// Function signature declarations
    FunctionSignature,
    /// Host environment (I/O, configuration)
    Host,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Ecsql => write!(f, "ECSQL"),
            IssueType::FunctionSignature => write!(f, "FunctionSignature"),
            IssueType::Host => write!(f, "Host"),
        }
    }
}

/// A diagnostic message as delivered to the issue sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Issue category
    pub category: IssueCategory,
    /// Issue type
    pub issue_type: IssueType,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Rendered ECSQL of the offending expression
    pub expression: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category_for(code),
            issue_type: issue_type_for(code),
            code,
            message: message.into(),
            expression: None,
            help: code.info().help.map(str::to_string),
        }
    }

    /// Attach the rendered offending expression
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(expr) = &self.expression {
            write!(f, " in '{}'", expr)?;
        }
        Ok(())
    }
}

fn category_for(code: ErrorCode) -> IssueCategory {
    if code.is_schema_error() {
        IssueCategory::SchemaLookup
    } else if code.is_system_error() {
        IssueCategory::Internal
    } else {
        IssueCategory::BusinessProperties
    }
}

fn issue_type_for(code: ErrorCode) -> IssueType {
    if code.is_signature_error() {
        IssueType::FunctionSignature
    } else if code.is_system_error() {
        IssueType::Host
    } else {
        IssueType::Ecsql
    }
}

/// Main ECSQL error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsqlError {
    /// Malformed function signature declaration
    #[error("{code}: {message}")]
    Signature {
        code: ErrorCode,
        message: String,
        signature: String,
    },

    /// Semantic error (type checking, resolution)
    #[error("{code}: {message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        expression: Option<String>,
        context: Option<String>,
    },

    /// Schema lookup error
    #[error("{code}: {message}")]
    Schema {
        code: ErrorCode,
        message: String,
        schema: Option<String>,
        expression: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl EcsqlError {
    /// Create a signature declaration error
    pub fn signature(
        code: ErrorCode,
        message: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self::Signature {
            code,
            message: message.into(),
            signature: signature.into(),
        }
    }

    /// Create a semantic error
    pub fn semantic(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            expression: None,
            context: None,
        }
    }

    /// Create a semantic error naming the offending expression
    pub fn semantic_in(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            expression: Some(expression.into()),
            context: None,
        }
    }

    /// Create a schema lookup error
    pub fn schema(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Schema {
            code,
            message: message.into(),
            schema: None,
            expression: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Signature { code, .. } => *code,
            Self::Semantic { code, .. } => *code,
            Self::Schema { code, .. } => *code,
            Self::System { code, .. } => *code,
        }
    }

    /// Get the error message without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Signature { message, .. }
            | Self::Semantic { message, .. }
            | Self::Schema { message, .. }
            | Self::System { message, .. } => message,
        }
    }

    /// Get the offending expression text if available
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Semantic { expression, .. } | Self::Schema { expression, .. } => {
                expression.as_deref()
            }
            Self::Signature { signature, .. } => Some(signature),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Signature {
                code,
                message,
                signature,
            } => Diagnostic::error(*code, message.clone()).with_expression(signature.clone()),
            Self::Semantic {
                code,
                message,
                expression,
                context,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(expr) = expression {
                    diag = diag.with_expression(expr.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Schema {
                code,
                message,
                schema,
                expression,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(expr) = expression {
                    diag = diag.with_expression(expr.clone());
                }
                if let Some(schema) = schema {
                    diag = diag.with_help(format!("while looking up schema '{}'", schema));
                }
                diag
            }
            Self::System {
                code,
                message,
                context,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
        }
    }
}

/// Builder for creating ECSQL errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    expression: Option<String>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            expression: None,
            context: None,
        }
    }

    /// Name the offending expression
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build a semantic error
    pub fn semantic(self) -> EcsqlError {
        EcsqlError::Semantic {
            code: self.code,
            message: self.message,
            expression: self.expression,
            context: self.context,
        }
    }

    /// Build a schema lookup error
    pub fn schema(self, schema: Option<String>) -> EcsqlError {
        EcsqlError::Schema {
            code: self.code,
            message: self.message,
            schema,
            expression: self.expression,
        }
    }
}
