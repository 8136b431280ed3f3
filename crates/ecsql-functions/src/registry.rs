//! Function signature registry
//!
//! [`FunctionSignatureSet`] maps case-insensitive function names to their
//! parsed signatures. Build one with [`build_default_registry`], extend it
//! with [`FunctionSignatureSet::declare`] or
//! [`FunctionSignatureSet::register`], then share it by reference.

use ecsql_diagnostics::{EcsqlError, ECSQL0011};
use std::collections::HashMap;

use crate::FunctionSignature;

/// Declarations compiled into the default registry
const DEFAULT_SIGNATURES: &[(&str, &str)] = &[
    // core scalar functions
    ("abs(value:numeric):numeric", "Absolute value of a number"),
    ("char(code:integer, ...):string", "String composed of the given unicode code points"),
    ("coalesce(value1:any, value2:any, ...):any", "First non-NULL argument"),
    ("glob(pattern:string, value:string):integer", "Case sensitive glob match"),
    ("hex(value:any):string", "Upper case hexadecimal rendering of a value"),
    ("ifnull(value:any, fallback:any):any", "First non-NULL of two arguments"),
    ("iif(condition:any, then_value:any, else_value:any):any", "Conditional value"),
    ("instr(haystack:string, needle:string):integer", "1-based position of a substring"),
    ("length(value:any):integer", "Number of characters or bytes"),
    ("like(pattern:string, value:string, optional escape:string):integer", "LIKE match"),
    ("likelihood(value:any, probability:float):any", "Planner hint with probability"),
    ("likely(value:any):any", "Planner hint that the value is usually true"),
    ("lower(value:string):string", "Lower case copy of a string"),
    ("ltrim(value:string, optional characters:string):string", "Strip leading characters"),
    ("max(value:any, ...):any", "Largest argument, or aggregate maximum"),
    ("min(value:any, ...):any", "Smallest argument, or aggregate minimum"),
    ("nullif(value1:any, value2:any):any", "NULL when both arguments are equal"),
    ("printf(format:string, ...):string", "Formatted string"),
    ("format(format:string, ...):string", "Formatted string"),
    ("quote(value:any):string", "SQL literal text of a value"),
    ("random():integer", "Pseudo-random 64-bit integer"),
    ("randomblob(length:integer):blob", "Blob of random bytes"),
    ("replace(value:string, pattern:string, replacement:string):string", "Replace substrings"),
    ("round(value:numeric, optional digits:integer):float", "Rounded number"),
    ("rtrim(value:string, optional characters:string):string", "Strip trailing characters"),
    ("soundex(value:string):string", "Soundex encoding"),
    ("substr(value:string, start:integer, optional length:integer):string", "Substring"),
    ("substring(value:string, start:integer, optional length:integer):string", "Substring"),
    ("trim(value:string, optional characters:string):string", "Strip characters at both ends"),
    ("typeof(value:any):string", "Storage class name of a value"),
    ("unicode(value:string):integer", "Code point of the first character"),
    ("unlikely(value:any):any", "Planner hint that the value is usually false"),
    ("upper(value:string):string", "Upper case copy of a string"),
    ("zeroblob(length:integer):blob", "Blob of zero bytes"),
    // date and time
    ("date(time_value:any, ...):string", "Date as YYYY-MM-DD"),
    ("time(time_value:any, ...):string", "Time as HH:MM:SS"),
    ("datetime(time_value:any, ...):string", "Timestamp as YYYY-MM-DD HH:MM:SS"),
    ("julianday(time_value:any, ...):float", "Julian day number"),
    ("unixepoch(time_value:any, ...):integer", "Seconds since 1970-01-01"),
    ("strftime(format:string, time_value:any, ...):string", "Formatted date and time"),
    // aggregates
    ("avg(value:numeric):float", "Average of non-NULL values"),
    ("count(optional value:any):integer", "Number of rows or non-NULL values"),
    ("group_concat(value:any, optional separator:string):string", "Concatenated values"),
    ("sum(value:numeric):numeric", "Sum of non-NULL values"),
    ("total(value:numeric):float", "Floating point sum of non-NULL values"),
    // math
    ("acos(value:numeric):float", "Arc cosine"),
    ("asin(value:numeric):float", "Arc sine"),
    ("atan(value:numeric):float", "Arc tangent"),
    ("atan2(y:numeric, x:numeric):float", "Arc tangent of y/x"),
    ("ceil(value:numeric):float", "Smallest integral value not less than the argument"),
    ("cos(value:numeric):float", "Cosine"),
    ("exp(value:numeric):float", "e raised to the argument"),
    ("floor(value:numeric):float", "Largest integral value not greater than the argument"),
    ("ln(value:numeric):float", "Natural logarithm"),
    ("log10(value:numeric):float", "Base-10 logarithm"),
    ("log2(value:numeric):float", "Base-2 logarithm"),
    ("mod(x:numeric, y:numeric):float", "Remainder of x/y"),
    ("pi():float", "The constant pi"),
    ("pow(x:numeric, y:numeric):float", "x raised to y"),
    ("sin(value:numeric):float", "Sine"),
    ("sqrt(value:numeric):float", "Square root"),
    ("tan(value:numeric):float", "Tangent"),
    // json
    ("json(value:string):string", "Minified JSON"),
    ("json_array(...):string", "JSON array of the arguments"),
    ("json_array_length(json:string, optional path:string):integer", "Length of a JSON array"),
    ("json_extract(json:string, path:string, ...):any", "Values extracted from JSON"),
    ("json_object(...):string", "JSON object from label/value pairs"),
    ("json_type(json:string, optional path:string):string", "Type of a JSON element"),
    ("json_valid(json:string):integer", "Whether the argument is well-formed JSON"),
    ("::json_each(json:string, optional root:string):resultset", "Elements of a JSON array or object"),
    ("::json_tree(json:string, optional root:string):resultset", "Recursive walk of a JSON value"),
    // ECSQL extensions
    ("regexp(pattern:string, value:string):integer", "Regular expression match"),
    ("ec_classname(class_id:integer, optional format:string):string", "Name of a class"),
    ("ec_classid(class_name:string):integer", "Id of a class"),
    ("ec_instanceof(class_id:integer, class_name:string, ...):integer", "Class membership test"),
];

/// Registry of function signatures keyed by case-insensitive name
#[derive(Debug, Clone, Default)]
pub struct FunctionSignatureSet {
    signatures: HashMap<String, FunctionSignature>,
}

impl FunctionSignatureSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration and add it
    pub fn declare(
        &mut self,
        signature: &str,
        description: &str,
    ) -> Result<&FunctionSignature, EcsqlError> {
        let parsed = FunctionSignature::parse_detailed(signature, description)
            .map_err(|e| e.into_error(signature))?;
        self.insert(parsed)
    }

    /// Add a parsed signature; a name can only be declared once
    pub fn register(&mut self, signature: FunctionSignature) -> Result<(), EcsqlError> {
        self.insert(signature).map(|_| ())
    }

    fn insert(&mut self, signature: FunctionSignature) -> Result<&FunctionSignature, EcsqlError> {
        let key = signature.name().to_ascii_lowercase();
        if self.signatures.contains_key(&key) {
            return Err(EcsqlError::signature(
                ECSQL0011,
                format!("Function '{}' is already declared", signature.name()),
                signature.to_string(),
            ));
        }
        let inserted: &FunctionSignature = self.signatures.entry(key).or_insert(signature);
        Ok(inserted)
    }

    /// Find a signature by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&FunctionSignature> {
        let found = self.signatures.get(&name.to_ascii_lowercase());
        log::trace!("signature lookup '{}': {}", name, found.is_some());
        found
    }

    pub fn contains(&self, name: &str) -> bool {
        self.signatures.contains_key(&name.to_ascii_lowercase())
    }

    /// All signatures ordered by name
    pub fn signatures(&self) -> Vec<&FunctionSignature> {
        let mut all: Vec<_> = self.signatures.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Build the registry of compiled-in function signatures
///
/// Malformed or duplicate declarations are logged and dropped; in debug
/// builds they trip an assertion.
pub fn build_default_registry() -> FunctionSignatureSet {
    let mut set = FunctionSignatureSet::new();
    for (signature, description) in DEFAULT_SIGNATURES {
        if let Err(e) = set.declare(signature, description) {
            log::warn!("Dropping built-in function signature '{}': {}", signature, e);
            debug_assert!(false, "invalid built-in signature '{}': {}", signature, e);
        }
    }
    log::debug!("Built default function signature registry with {} entries", set.len());
    set
}
