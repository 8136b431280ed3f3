//! Finalize command implementation

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use colored::Colorize;
use ecsql::diagnostics::{Diagnostic, IssueCollector};
use ecsql::functions::{build_default_registry, BlobArgPolicy};
use ecsql::types::InMemorySchema;
use ecsql::{
    finalize_expression, EcsqlError, Exp, FinalizeOptions, FinalizedExpression, ParseContext,
    RenderMode,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the finalize command
pub struct FinalizeConfig {
    /// JSON file holding the untyped expression tree
    pub tree: PathBuf,
    /// JSON file describing the schemas the tree refers to
    pub schema: Option<PathBuf>,
    pub named_params: bool,
    pub strict_blob_check: bool,
    pub format: OutputFormat,
}

/// Outcome of finalizing one tree
pub struct FinalizeReport {
    pub outcome: std::result::Result<FinalizedExpression, EcsqlError>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn finalize(config: FinalizeConfig) -> Result<()> {
    let tree = read_file(&config.tree, "expression tree")?;
    let schema = config
        .schema
        .as_deref()
        .map(|path| read_file(path, "schema"))
        .transpose()?;

    let options = FinalizeOptions::new().with_blob_arg_policy(if config.strict_blob_check {
        BlobArgPolicy::BinaryOrGeometry
    } else {
        BlobArgPolicy::Legacy
    });
    let mode = if config.named_params {
        RenderMode::GenerateNameForUnnamedParameter
    } else {
        RenderMode::Default
    };

    let report = finalize_tree(&tree, schema.as_deref(), options)?;
    for diagnostic in &report.diagnostics {
        eprintln!("{}", diagnostic.to_colored_string());
    }

    let finalized = report
        .outcome
        .with_context(|| format!("Failed to finalize {}", config.tree.display()))?;
    match config.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&to_json(&finalized, mode))?);
        }
        OutputFormat::Text => print_text(&finalized, mode),
    }
    Ok(())
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}: {}", what, path.display()))
}

/// Finalize a JSON expression tree against an optional JSON schema
///
/// Only unreadable input is an `Err`; a tree that fails to type is
/// reported through the returned report.
pub fn finalize_tree(
    tree_json: &str,
    schema_json: Option<&str>,
    options: FinalizeOptions,
) -> Result<FinalizeReport> {
    let exp: Exp = serde_json::from_str(tree_json).context("Malformed expression tree")?;
    let schema = match schema_json {
        Some(json) => InMemorySchema::from_json(json).context("Malformed schema")?,
        None => InMemorySchema::new(),
    };
    let functions = build_default_registry();
    let mut issues = IssueCollector::new();

    let outcome = {
        let mut ctx = ParseContext::new(&schema, &functions, &mut issues).with_options(options);
        finalize_expression(exp, &mut ctx)
    };
    Ok(FinalizeReport {
        outcome,
        diagnostics: issues.into_diagnostics(),
    })
}

fn to_json(finalized: &FinalizedExpression, mode: RenderMode) -> serde_json::Value {
    json!({
        "ecsql": finalized.to_ecsql_with(mode),
        "type": finalized.type_info().to_string(),
        "parameters": finalized.parameters.iter().collect::<Vec<_>>(),
    })
}

fn print_text(finalized: &FinalizedExpression, mode: RenderMode) {
    println!("{}", finalized.to_ecsql_with(mode));
    println!("{} {}", "type:".dimmed(), finalized.type_info());
    if finalized.parameters.is_empty() {
        return;
    }
    println!();
    println!("{}", output::format_heading("Parameters"));
    for parameter in finalized.parameters.iter() {
        let name = parameter.name.as_deref().unwrap_or("?");
        println!(
            "  {:>3}  {:<20} {}",
            parameter.index,
            name.cyan(),
            parameter.type_info
        );
    }
}
