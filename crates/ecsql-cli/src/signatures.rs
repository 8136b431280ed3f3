//! Signatures command implementation

use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use ecsql::functions::{build_default_registry, FunctionSignature};
use std::fs;
use std::path::PathBuf;

/// Configuration for the signatures command
pub struct SignaturesConfig {
    /// File of declarations to check instead of listing the registry
    pub check: Option<PathBuf>,
}

/// A declaration that failed to parse
#[derive(Debug, PartialEq, Eq)]
pub struct RejectedSignature {
    pub line: usize,
    pub declaration: String,
    pub reason: String,
}

pub fn signatures(config: SignaturesConfig) -> Result<()> {
    match config.check {
        Some(file) => check(&file),
        None => {
            list();
            Ok(())
        }
    }
}

fn list() {
    let registry = build_default_registry();
    for signature in registry.signatures() {
        println!("{}  {}", signature.to_string().cyan(), signature.description().dimmed());
    }
    println!();
    println!("{} signature(s)", registry.len());
}

fn check(file: &PathBuf) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read signature file: {}", file.display()))?;
    let (accepted, rejected) = check_declarations(&content);

    for rejection in &rejected {
        eprintln!(
            "{}:{}: {} {}",
            file.display().to_string().cyan(),
            rejection.line,
            rejection.reason.red(),
            rejection.declaration.dimmed()
        );
    }
    if !rejected.is_empty() {
        anyhow::bail!(
            "{} of {} signature(s) are malformed",
            rejected.len(),
            rejected.len() + accepted
        );
    }
    println!(
        "{}",
        output::format_success(&format!("{} signature(s) are well-formed", accepted))
    );
    Ok(())
}

/// Parse each non-empty, non-comment line as a declaration
///
/// Returns the number of accepted declarations and the rejected ones.
pub fn check_declarations(content: &str) -> (usize, Vec<RejectedSignature>) {
    let mut accepted = 0;
    let mut rejected = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let declaration = line.trim();
        if declaration.is_empty() || declaration.starts_with('#') {
            continue;
        }
        match FunctionSignature::parse_detailed(declaration, "") {
            Ok(_) => accepted += 1,
            Err(e) => rejected.push(RejectedSignature {
                line: i + 1,
                declaration: declaration.to_string(),
                reason: e.to_string(),
            }),
        }
    }
    (accepted, rejected)
}
