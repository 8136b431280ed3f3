//! Parameter bookkeeping for the statement-binding layer

use ecsql_types::TypeInfo;
use indexmap::IndexMap;
use serde::Serialize;

/// A statement parameter as seen by the binding layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    /// 1-based binding index
    pub index: usize,
    pub name: Option<String>,
    pub type_info: TypeInfo,
}

/// Parameters of a statement in index order
///
/// Positional parameters get a new index each time; a named parameter
/// keeps the index of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterMap {
    parameters: IndexMap<usize, ParameterInfo>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occurrence and return its binding index
    pub fn register(&mut self, name: Option<&str>) -> usize {
        if let Some(index) = name.and_then(|n| self.index_of(n)) {
            return index;
        }
        let index = self.parameters.len() + 1;
        self.parameters.insert(
            index,
            ParameterInfo {
                index,
                name: name.map(str::to_string),
                type_info: TypeInfo::unset(),
            },
        );
        index
    }

    /// Record the type of a parameter unless it already has one
    pub fn resolve(&mut self, index: usize, type_info: &TypeInfo) -> bool {
        match self.parameters.get_mut(&index) {
            Some(info) if !info.type_info.is_complete() => {
                info.type_info = type_info.clone();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&ParameterInfo> {
        self.parameters.get(&index)
    }

    /// Index of a named parameter (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters
            .values()
            .find(|p| p.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|p| p.index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
