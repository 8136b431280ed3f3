//! Parse context shared by the finalize walk of one statement

use ecsql_ast::{Exp, ExpId};
use ecsql_diagnostics::{
    EcsqlError, ErrorBuilder, ErrorCode, IssueReporter, ECSQL0200, ECSQL0201, ECSQL0202, ECSQL0204,
};
use ecsql_functions::{FunctionSignatureSet, ScalarFunctionRegistry};
use ecsql_types::{ClassInfo, EnumerationInfo, SchemaLookup};
use std::sync::LazyLock;

use crate::{FinalizeOptions, ParameterMap};

static NO_SCALAR_FUNCTIONS: LazyLock<ScalarFunctionRegistry> =
    LazyLock::new(ScalarFunctionRegistry::new);

/// Collaborators and state of the finalize walk of one statement
pub struct ParseContext<'a> {
    schema: &'a dyn SchemaLookup,
    functions: &'a FunctionSignatureSet,
    scalars: &'a ScalarFunctionRegistry,
    issues: &'a mut dyn IssueReporter,
    options: FinalizeOptions,
    parameters: ParameterMap,
    next_id: u32,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        schema: &'a dyn SchemaLookup,
        functions: &'a FunctionSignatureSet,
        issues: &'a mut dyn IssueReporter,
    ) -> Self {
        Self {
            schema,
            functions,
            scalars: &NO_SCALAR_FUNCTIONS,
            issues,
            options: FinalizeOptions::default(),
            parameters: ParameterMap::new(),
            next_id: 0,
        }
    }

    /// Use the host's custom scalar functions when typing calls
    pub fn with_scalar_functions(mut self, scalars: &'a ScalarFunctionRegistry) -> Self {
        self.scalars = scalars;
        self
    }

    pub fn with_options(mut self, options: FinalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FinalizeOptions {
        &self.options
    }

    pub fn functions(&self) -> &'a FunctionSignatureSet {
        self.functions
    }

    pub fn scalar_functions(&self) -> &'a ScalarFunctionRegistry {
        self.scalars
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut ParameterMap {
        &mut self.parameters
    }

    /// Take the parameter map, leaving an empty one
    pub fn take_parameters(&mut self) -> ParameterMap {
        std::mem::take(&mut self.parameters)
    }

    pub(crate) fn next_id(&mut self) -> ExpId {
        let id = ExpId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Forward an error to the issue sink and hand it back
    pub fn report(&mut self, error: EcsqlError) -> EcsqlError {
        self.issues.report(error.to_diagnostic());
        error
    }

    /// Look up a class named in `exp`, distinguishing unknown schemas from
    /// unknown classes
    pub fn resolve_class(
        &self,
        schema: &str,
        name: &str,
        exp: &Exp,
    ) -> Result<ClassInfo, EcsqlError> {
        let mode = self.options.schema_lookup_mode;
        if let Some(class) = self.schema.get_class(schema, name, mode) {
            return Ok(class);
        }
        Err(self.missing_item(schema, name, ECSQL0201, "class", Some(exp)))
    }

    /// Look up an enumeration, distinguishing unknown schemas from unknown
    /// enumerations
    pub fn resolve_enumeration(
        &self,
        schema: &str,
        name: &str,
    ) -> Result<EnumerationInfo, EcsqlError> {
        let mode = self.options.schema_lookup_mode;
        if let Some(enumeration) = self.schema.get_enumeration(schema, name, mode) {
            return Ok(enumeration);
        }
        Err(self.missing_item(schema, name, ECSQL0202, "enumeration", None))
    }

    /// Look up an enumeration only, without reporting anything
    pub(crate) fn find_enumeration(&self, schema: &str, name: &str) -> Option<EnumerationInfo> {
        self.schema
            .get_enumeration(schema, name, self.options.schema_lookup_mode)
    }

    /// Build an enum value node for `schema.Enumeration.Enumerator`
    pub fn resolve_enum_value(
        &self,
        schema: &str,
        enumeration: &str,
        enumerator: &str,
    ) -> Result<Exp, EcsqlError> {
        let info = self.resolve_enumeration(schema, enumeration)?;
        let found = info.find_enumerator(enumerator).ok_or_else(|| {
            ErrorBuilder::new(
                ECSQL0204,
                format!(
                    "Enumeration '{}' has no enumerator '{}'",
                    info.enum_ref.key, enumerator
                ),
            )
            .schema(Some(schema.to_string()))
        })?;
        Ok(Exp::enum_value(info.enum_ref.clone(), found.name.clone()))
    }

    fn missing_item(
        &self,
        schema: &str,
        name: &str,
        code: ErrorCode,
        what: &str,
        exp: Option<&Exp>,
    ) -> EcsqlError {
        let builder = if self
            .schema
            .has_schema(schema, self.options.schema_lookup_mode)
        {
            ErrorBuilder::new(code, format!("Unknown {} '{}.{}'", what, schema, name))
        } else {
            ErrorBuilder::new(ECSQL0200, format!("Unknown schema '{}'", schema))
        };
        let builder = match exp {
            Some(exp) => builder.expression(exp.to_ecsql()),
            None => builder,
        };
        builder.schema(Some(schema.to_string()))
    }
}
