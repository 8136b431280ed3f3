//! Return types of the built-in SQL functions
//!
//! Function calls that are not member functions are typed from this table
//! unless a custom scalar function with the same name is registered.
//! Functions whose result is one of their arguments (`max`, `coalesce`,
//! ...) are not in the table; see [`is_value_passthrough`].

use ecsql_types::PrimitiveType;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Function returning the name of a class from its id
pub const CLASSNAME_FUNCTION: &str = "ec_classname";

/// Function name that accepts any argument, including arrays and points
pub const COUNT_FUNCTION: &str = "count";

static BUILTIN_RETURN_TYPES: LazyLock<HashMap<&'static str, PrimitiveType>> =
    LazyLock::new(|| {
        use PrimitiveType::{Binary, Boolean, Double, Long, String};

        let entries: &[(&str, PrimitiveType)] = &[
            // core scalar functions
            ("changes", Long),
            ("char", String),
            ("glob", Boolean),
            ("hex", String),
            ("instr", Long),
            ("last_insert_rowid", Long),
            ("length", Long),
            ("like", Boolean),
            ("lower", String),
            ("ltrim", String),
            ("printf", String),
            ("format", String),
            ("quote", String),
            ("random", Long),
            ("randomblob", Binary),
            ("replace", String),
            ("round", Double),
            ("rtrim", String),
            ("soundex", String),
            ("sqlite_version", String),
            ("substr", String),
            ("substring", String),
            ("total_changes", Long),
            ("trim", String),
            ("typeof", String),
            ("unicode", Long),
            ("upper", String),
            ("zeroblob", Binary),
            // date and time
            ("date", String),
            ("time", String),
            ("datetime", String),
            ("julianday", Double),
            ("unixepoch", Long),
            ("strftime", String),
            // aggregates
            ("count", Long),
            ("avg", Double),
            ("total", Double),
            ("group_concat", String),
            ("string_agg", String),
            // math
            ("acos", Double),
            ("asin", Double),
            ("atan", Double),
            ("atan2", Double),
            ("ceil", Double),
            ("ceiling", Double),
            ("cos", Double),
            ("degrees", Double),
            ("exp", Double),
            ("floor", Double),
            ("ln", Double),
            ("log", Double),
            ("log10", Double),
            ("log2", Double),
            ("mod", Double),
            ("pi", Double),
            ("pow", Double),
            ("power", Double),
            ("radians", Double),
            ("sin", Double),
            ("sqrt", Double),
            ("tan", Double),
            ("trunc", Double),
            // json
            ("json", String),
            ("json_array", String),
            ("json_object", String),
            ("json_type", String),
            ("json_valid", Boolean),
            ("json_array_length", Long),
            // ECSQL extensions
            ("regexp", Boolean),
            ("ec_instanceof", Boolean),
            ("ec_classid", Long),
        ];
        entries.iter().copied().collect()
    });

const VALUE_PASSTHROUGH_FUNCTIONS: &[&str] = &[
    "abs",
    "coalesce",
    "ifnull",
    "nullif",
    "max",
    "min",
    "sum",
    "likely",
    "unlikely",
    "likelihood",
];

/// Return type of a built-in function (case-insensitive)
pub fn builtin_return_type(name: &str) -> Option<PrimitiveType> {
    BUILTIN_RETURN_TYPES
        .get(name.to_ascii_lowercase().as_str())
        .copied()
}

/// Whether the function returns the value of its first non-NULL argument
pub fn is_value_passthrough(name: &str) -> bool {
    VALUE_PASSTHROUGH_FUNCTIONS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(name))
}

/// Names of all functions with a fixed built-in return type
pub fn builtin_function_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_RETURN_TYPES.keys().copied()
}
