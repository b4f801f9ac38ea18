//! The compiler's standard JSON input and output model.

use std::{collections::BTreeMap, fmt::Display};

use alloy_json_abi::JsonAbi;
use serde::{Deserialize, Serialize};

/// Standard JSON input handed to the compiler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerInput {
    /// Source language, always `Solidity` here.
    pub language: String,
    /// Source texts keyed by source unit name.
    pub sources: BTreeMap<String, Source>,
    /// Compilation settings.
    pub settings: Settings,
}

impl CompilerInput {
    /// Build an input over the given sources with the sandbox's fixed
    /// settings.
    pub fn new(sources: BTreeMap<String, Source>) -> Self {
        Self { language: "Solidity".to_string(), sources, settings: Settings::default() }
    }
}

/// A single source unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// The full source text.
    pub content: String,
}

/// Compilation settings. The sandbox always compiles with the optimizer on
/// and requests every output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Optimizer configuration.
    pub optimizer: Optimizer,
    /// Requested outputs, per file and contract.
    pub output_selection: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut output_selection = BTreeMap::new();
        output_selection
            .insert("*".to_string(), BTreeMap::from([("*".to_string(), vec!["*".to_string()])]));

        Self { optimizer: Optimizer { enabled: true, runs: 200 }, output_selection }
    }
}

/// Optimizer settings.
#[derive(Debug, Clone, Serialize)]
pub struct Optimizer {
    /// Whether the optimizer runs at all.
    pub enabled: bool,
    /// The optimizer's runs parameter.
    pub runs: u32,
}

/// Standard JSON output returned by the compiler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOutput {
    /// Diagnostics reported during compilation. Empty on a clean compile.
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    /// Compiled contracts, keyed by source unit name then contract name.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, Contract>>,
    /// Per-source metadata.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceArtifact>,
}

impl CompilerOutput {
    /// Whether the compiler reported any diagnostics.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Look up a compiled contract by source unit and contract name.
    pub fn contract(&self, source: &str, name: &str) -> Option<&Contract> {
        self.contracts.get(source).and_then(|contracts| contracts.get(name))
    }
}

/// One compiled contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// The contract's JSON ABI.
    #[serde(default)]
    pub abi: Option<JsonAbi>,
    /// EVM artifacts (bytecode).
    #[serde(default)]
    pub evm: Option<Evm>,
    /// The contract metadata blob.
    #[serde(default)]
    pub metadata: Option<String>,
}

/// EVM artifacts of a compiled contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evm {
    /// Creation bytecode.
    #[serde(default)]
    pub bytecode: Option<Bytecode>,
    /// Runtime bytecode.
    #[serde(default)]
    pub deployed_bytecode: Option<Bytecode>,
}

/// A bytecode artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bytecode {
    /// The bytecode as an unprefixed hex string.
    pub object: String,
}

/// Per-source output metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceArtifact {
    /// The source unit's numeric id.
    #[serde(default)]
    pub id: Option<u32>,
}

/// One compiler diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Diagnostic kind, e.g. `ParserError`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Diagnostic severity.
    pub severity: Severity,
    /// The plain diagnostic message.
    pub message: String,
    /// The formatted, human-readable message with source context.
    #[serde(default)]
    pub formatted_message: Option<String>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.formatted_message {
            Some(formatted) => write!(f, "{formatted}"),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A fatal error.
    Error,
    /// A warning.
    Warning,
    /// An informational note.
    Info,
}
