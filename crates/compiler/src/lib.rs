//! Solidity compiler management for Crucible.
//!
//! Provides a handle over a solc executable, compilation of sandbox sources
//! with import resolution, and fetching/caching of version-pinned compiler
//! binaries from the well-known binary host.

pub mod error;

mod artifacts;
mod fetch;
mod solc;

// re-export the public interface
pub use artifacts::{
    Bytecode, CompilerInput, CompilerOutput, Contract, Diagnostic, Evm, Optimizer, Settings,
    Severity, Source, SourceArtifact,
};
pub use fetch::{fetch_artifact, get_specific_solc, get_specific_solc_in, solc_binary_url, version};
pub use solc::{compile, compile_with_resolver, Solc};
