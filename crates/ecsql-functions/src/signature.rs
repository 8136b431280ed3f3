//! Function signature declarations
//!
//! A signature is declared in a compact mini-language:
//!
//! ```text
//! [::]name(arg[, arg]*)[:returnType]
//! arg        := [optional] argName:type | ...
//! type       := string | integer | int | float | double | real
//!             | blob | resultset | numeric | any
//! ```
//!
//! A leading `::` declares a member function, callable as a table-valued
//! function when it returns `resultset` and as a property function
//! otherwise. `...` declares a variadic tail.

use ecsql_ast::Exp;
use ecsql_diagnostics::{
    EcsqlError, ErrorCode, ECSQL0001, ECSQL0002, ECSQL0003, ECSQL0004, ECSQL0005, ECSQL0006,
    ECSQL0007, ECSQL0008, ECSQL0009, ECSQL0010, ECSQL0102, ECSQL0103, ECSQL0106,
};
use ecsql_types::{PrimitiveType, TypeInfo};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Name of the sentinel argument standing for a variadic tail
pub const VARIADIC_ARG_NAME: &str = "...";

const MEMBER_PREFIX: &str = "::";
const OPTIONAL_KEYWORD: &str = "optional";

/// Value type tag of a signature argument or return value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Blob,
    Resultset,
    Numeric,
    Any,
}

impl ValueType {
    /// Parse a type keyword (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "float" | "double" | "real" => Some(Self::Float),
            "blob" => Some(Self::Blob),
            "resultset" => Some(Self::Resultset),
            "numeric" => Some(Self::Numeric),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Canonical keyword
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Blob => "blob",
            Self::Resultset => "resultset",
            Self::Numeric => "numeric",
            Self::Any => "any",
        }
    }

    const fn expectation(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Float => "a floating point number",
            Self::Blob => "a binary value",
            Self::Resultset => "a result set",
            Self::Numeric => "a numeric value",
            Self::Any => "any value",
        }
    }

    /// Type given to an untyped parameter bound to an argument of this type
    pub fn parameter_type(&self) -> TypeInfo {
        let primitive = match self {
            Self::String => PrimitiveType::String,
            Self::Blob => PrimitiveType::Binary,
            Self::Float | Self::Numeric => PrimitiveType::Double,
            Self::Integer | Self::Any => PrimitiveType::Long,
            Self::Resultset => PrimitiveType::Binary,
        };
        TypeInfo::create_primitive(primitive)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where a function may be called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionScope {
    /// Plain SQL function
    Global,
    /// Member function returning a result set (table-valued)
    Class,
    /// Member function returning a scalar
    Property,
}

/// How a `blob` argument is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlobArgPolicy {
    /// Historical check: rejects unless the argument is both binary and a
    /// geometry, which no single type is
    #[default]
    Legacy,
    /// Accept binary and geometry arguments
    BinaryOrGeometry,
}

impl BlobArgPolicy {
    fn accepts(&self, type_info: &TypeInfo) -> bool {
        match self {
            Self::Legacy => type_info.is_binary() && type_info.is_geometry(),
            Self::BinaryOrGeometry => type_info.is_binary() || type_info.is_geometry(),
        }
    }
}

/// A declared argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    pub value_type: ValueType,
    pub optional: bool,
}

impl Arg {
    pub fn is_variadic(&self) -> bool {
        self.name == VARIADIC_ARG_NAME
    }

    fn variadic() -> Self {
        Self {
            name: VARIADIC_ARG_NAME.to_string(),
            value_type: ValueType::Any,
            optional: false,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_variadic() {
            return f.write_str(VARIADIC_ARG_NAME);
        }
        if self.optional {
            write!(f, "{} ", OPTIONAL_KEYWORD)?;
        }
        write!(f, "{}:{}", self.name, self.value_type)
    }
}

/// Reasons a signature declaration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("function name is missing or not an identifier")]
    Malformed,

    #[error("argument list must be enclosed in parentheses")]
    MissingParentheses,

    #[error("malformed argument '{token}'")]
    MalformedArgument { token: String },

    #[error("unknown type keyword '{keyword}'")]
    UnknownType { keyword: String },

    #[error("argument '{name}' cannot be a resultset")]
    ResultsetArgument { name: String },

    #[error("required argument '{name}' follows an optional argument")]
    OptionalBeforeRequired { name: String },

    #[error("variadic argument must be the last argument")]
    VariadicNotLast,

    #[error("variadic argument cannot be optional")]
    OptionalVariadic,

    #[error("duplicate argument name '{name}'")]
    DuplicateArgument { name: String },

    #[error("only member functions can return a resultset")]
    ResultsetReturnNotMember,
}

impl SignatureError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed => ECSQL0001,
            Self::MissingParentheses => ECSQL0002,
            Self::MalformedArgument { .. } => ECSQL0003,
            Self::UnknownType { .. } => ECSQL0004,
            Self::ResultsetArgument { .. } => ECSQL0005,
            Self::OptionalBeforeRequired { .. } => ECSQL0006,
            Self::VariadicNotLast => ECSQL0007,
            Self::OptionalVariadic => ECSQL0008,
            Self::DuplicateArgument { .. } => ECSQL0009,
            Self::ResultsetReturnNotMember => ECSQL0010,
        }
    }

    /// Convert to an [`EcsqlError`] naming the rejected declaration
    pub fn into_error(self, signature: &str) -> EcsqlError {
        EcsqlError::signature(
            self.code(),
            format!("Invalid function signature: {}", self),
            signature,
        )
    }
}

/// Mismatch between a signature and the arguments of a call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentMismatch {
    #[error("Function '{function}' expects {expected} argument(s) but {actual} were passed")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Argument '{arg}' of function '{function}' expects {expected}, got {actual}")]
    ArgumentType {
        function: String,
        arg: String,
        expected: &'static str,
        actual: String,
    },

    #[error(
        "Type of the parameter at position {position} of function '{function}' cannot be determined because the position is variadic"
    )]
    VariadicParameter { function: String, position: usize },
}

impl ArgumentMismatch {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Arity { .. } => ECSQL0102,
            Self::ArgumentType { .. } => ECSQL0103,
            Self::VariadicParameter { .. } => ECSQL0106,
        }
    }
}

/// A parsed function signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    name: String,
    scope: FunctionScope,
    is_member: bool,
    args: Vec<Arg>,
    return_type: ValueType,
    description: String,
}

impl FunctionSignature {
    /// Parse a declaration, logging and dropping it when malformed
    pub fn parse(signature: &str, description: &str) -> Option<Self> {
        match Self::parse_detailed(signature, description) {
            Ok(sig) => Some(sig),
            Err(e) => {
                log::warn!("Dropping function signature '{}': {}", signature, e);
                None
            }
        }
    }

    /// Parse a declaration, returning the reason on failure
    pub fn parse_detailed(signature: &str, description: &str) -> Result<Self, SignatureError> {
        let text = signature.trim();
        let (is_member, text) = match text.strip_prefix(MEMBER_PREFIX) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };

        let open = text.find('(').ok_or(SignatureError::MissingParentheses)?;
        let close = text.rfind(')').ok_or(SignatureError::MissingParentheses)?;
        if close < open {
            return Err(SignatureError::MissingParentheses);
        }

        let name = text[..open].trim();
        if !is_identifier(name) {
            return Err(SignatureError::Malformed);
        }

        let args = parse_args(&text[open + 1..close])?;

        let tail = text[close + 1..].trim();
        let return_type = if tail.is_empty() {
            ValueType::Any
        } else {
            let keyword = tail
                .strip_prefix(':')
                .map(str::trim)
                .ok_or(SignatureError::Malformed)?;
            ValueType::from_keyword(keyword).ok_or_else(|| SignatureError::UnknownType {
                keyword: keyword.to_string(),
            })?
        };

        if return_type == ValueType::Resultset && !is_member {
            return Err(SignatureError::ResultsetReturnNotMember);
        }

        let scope = match (is_member, return_type) {
            (true, ValueType::Resultset) => FunctionScope::Class,
            (true, _) => FunctionScope::Property,
            (false, _) => FunctionScope::Global,
        };

        Ok(Self {
            name: name.to_string(),
            scope,
            is_member,
            args,
            return_type,
            description: description.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> FunctionScope {
        self.scope
    }

    pub fn is_member(&self) -> bool {
        self.is_member
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of arguments that must be passed
    pub fn required_arg_count(&self) -> usize {
        self.args
            .iter()
            .filter(|a| !a.optional && !a.is_variadic())
            .count()
    }

    pub fn optional_arg_count(&self) -> usize {
        self.args.iter().filter(|a| a.optional).count()
    }

    pub fn has_variadic_arg(&self) -> bool {
        self.args.last().is_some_and(Arg::is_variadic)
    }

    /// Give unresolved parameter arguments the type their position declares
    ///
    /// Parameters past the declared arguments are left alone unless they
    /// fall on the variadic tail, which carries no type and is an error.
    pub fn set_parameter_type(&self, args: &mut [Exp]) -> Result<(), ArgumentMismatch> {
        for (position, exp) in args.iter_mut().enumerate() {
            if !exp.is_unresolved_parameter() {
                continue;
            }
            let declared = match self.args.get(position) {
                Some(arg) if !arg.is_variadic() => arg,
                Some(_) => return Err(self.variadic_parameter(position)),
                None if self.has_variadic_arg() => return Err(self.variadic_parameter(position)),
                None => continue,
            };
            exp.set_target_exp_info(declared.value_type.parameter_type(), None);
        }
        Ok(())
    }

    fn variadic_parameter(&self, position: usize) -> ArgumentMismatch {
        ArgumentMismatch::VariadicParameter {
            function: self.name.clone(),
            position: position + 1,
        }
    }

    /// Check argument count and argument types
    ///
    /// Parameters and NULL are accepted in any position; arguments on the
    /// variadic tail are not checked.
    pub fn verify(&self, args: &[Exp], blob_policy: BlobArgPolicy) -> Result<(), ArgumentMismatch> {
        let required = self.required_arg_count();
        let optional = self.optional_arg_count();
        let too_few = args.len() < required;
        let too_many = !self.has_variadic_arg() && args.len() > required + optional;
        if too_few || too_many {
            return Err(ArgumentMismatch::Arity {
                function: self.name.clone(),
                expected: self.describe_arity(),
                actual: args.len(),
            });
        }

        for (declared, exp) in self.args.iter().zip(args) {
            if declared.is_variadic() {
                break;
            }
            if exp.is_parameter() || exp.type_info().is_null() {
                continue;
            }
            let type_info = exp.type_info();
            let ok = match declared.value_type {
                ValueType::String => type_info.is_string(),
                ValueType::Integer => type_info.is_exact_numeric(),
                ValueType::Float => type_info.is_approximate_numeric(),
                ValueType::Numeric => type_info.is_numeric(),
                ValueType::Blob => blob_policy.accepts(type_info),
                ValueType::Any => true,
                ValueType::Resultset => false,
            };
            if !ok {
                return Err(ArgumentMismatch::ArgumentType {
                    function: self.name.clone(),
                    arg: declared.name.clone(),
                    expected: declared.value_type.expectation(),
                    actual: type_info.to_string(),
                });
            }
        }
        Ok(())
    }

    fn describe_arity(&self) -> String {
        let required = self.required_arg_count();
        let optional = self.optional_arg_count();
        if self.has_variadic_arg() {
            format!("at least {}", required)
        } else if optional == 0 {
            required.to_string()
        } else {
            format!("{} to {}", required, required + optional)
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_member {
            f.write_str(MEMBER_PREFIX)?;
        }
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "):{}", self.return_type)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_optional(token: &str) -> (bool, &str) {
    let keyword_len = OPTIONAL_KEYWORD.len();
    if token
        .get(..keyword_len)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(OPTIONAL_KEYWORD))
        && token[keyword_len..].starts_with(char::is_whitespace)
    {
        (true, token[keyword_len..].trim_start())
    } else {
        (false, token)
    }
}

fn parse_args(list: &str) -> Result<Vec<Arg>, SignatureError> {
    let mut args: Vec<Arg> = Vec::new();
    if list.trim().is_empty() {
        return Ok(args);
    }

    let mut seen_optional = false;
    for raw in list.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            return Err(SignatureError::MalformedArgument {
                token: raw.to_string(),
            });
        }
        if args.last().is_some_and(Arg::is_variadic) {
            return Err(SignatureError::VariadicNotLast);
        }

        let (optional, body) = strip_optional(token);
        if body == VARIADIC_ARG_NAME {
            if optional {
                return Err(SignatureError::OptionalVariadic);
            }
            args.push(Arg::variadic());
            continue;
        }

        let (name, keyword) = body
            .split_once(':')
            .map(|(n, t)| (n.trim(), t.trim()))
            .ok_or_else(|| SignatureError::MalformedArgument {
                token: token.to_string(),
            })?;
        if !is_identifier(name) {
            return Err(SignatureError::MalformedArgument {
                token: token.to_string(),
            });
        }
        let value_type =
            ValueType::from_keyword(keyword).ok_or_else(|| SignatureError::UnknownType {
                keyword: keyword.to_string(),
            })?;
        if value_type == ValueType::Resultset {
            return Err(SignatureError::ResultsetArgument {
                name: name.to_string(),
            });
        }
        if optional {
            seen_optional = true;
        } else if seen_optional {
            return Err(SignatureError::OptionalBeforeRequired {
                name: name.to_string(),
            });
        }
        if args.iter().any(|a| a.name.eq_ignore_ascii_case(name)) {
            return Err(SignatureError::DuplicateArgument {
                name: name.to_string(),
            });
        }

        args.push(Arg {
            name: name.to_string(),
            value_type,
            optional,
        });
    }
    Ok(args)
}
