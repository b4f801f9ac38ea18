//! The compiler handle and the compile entry points.

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crucible_common::utils::io::file::read_file;
use fancy_regex::Regex;
use lazy_static::lazy_static;
use tracing::{debug, info, trace};

use crate::{
    artifacts::{CompilerInput, CompilerOutput, Source},
    error::Error,
};

lazy_static! {
    // matches plain, aliased and symbol imports; the path is capture group 1
    static ref IMPORT_RE: Regex = Regex::new(
        r#"import\s+(?:(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)\s+from\s+)?["']([^"']+)["']"#
    )
    .expect("invalid regex");
}

/// A handle to a solc executable, either the process default (`solc` on
/// `PATH`) or a version-pinned binary from the artifact cache.
#[derive(Debug, Clone)]
pub struct Solc {
    path: PathBuf,
}

impl Default for Solc {
    fn default() -> Self {
        Self { path: PathBuf::from("solc") }
    }
}

impl Solc {
    /// A handle to the executable at the given path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the underlying executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The version identifier reported by the executable, e.g.
    /// `0.8.24+commit.e11b9ed9.Linux.g++`.
    pub fn version(&self) -> Result<String, Error> {
        let output = Command::new(&self.path).arg("--version").output().map_err(|e| {
            Error::SolcError(format!("failed to run '{}': {e}", self.path.display()))
        })?;

        if !output.status.success() {
            return Err(Error::SolcError(format!(
                "'{} --version' exited with {}",
                self.path.display(),
                output.status
            )));
        }

        parse_version_output(&String::from_utf8_lossy(&output.stdout))
    }

    /// Run the compiler over the given standard JSON input and parse its
    /// output. Diagnostics are returned as part of the output; callers decide
    /// whether they abort.
    pub fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput, Error> {
        trace!("invoking '{}' with {} source(s)", self.path.display(), input.sources.len());

        let mut child = Command::new(&self.path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::SolcError(format!("failed to spawn '{}': {e}", self.path.display()))
            })?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| Error::Generic("failed to open solc stdin".to_string()))?;
            stdin.write_all(serde_json::to_string(input)?.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::SolcError(format!(
                "solc exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Compile the listed files from `dir`, resolving imports from the same
/// directory. Falls back to the default compiler when no handle is given.
///
/// A listed file that cannot be read is an error. A non-empty diagnostic list
/// in the compiler output aborts with [`Error::Compilation`] before any
/// artifact is returned.
pub fn compile(
    dir: impl AsRef<Path>,
    files: &[&str],
    solc: Option<&Solc>,
) -> Result<CompilerOutput, Error> {
    let dir = dir.as_ref();
    compile_with_resolver(dir, files, solc, |path| {
        read_file(dir.join(path)).map_err(|e| e.to_string())
    })
}

/// Compile the listed files from `dir` with an explicit import resolver.
///
/// The resolver is handed each import path found while scanning the sources
/// (transitively through resolved imports). A resolver failure is data, not
/// an error: the import is left unresolved and the compiler reports it as a
/// missing source.
pub fn compile_with_resolver<F>(
    dir: impl AsRef<Path>,
    files: &[&str],
    solc: Option<&Solc>,
    resolver: F,
) -> Result<CompilerOutput, Error>
where
    F: Fn(&str) -> Result<String, String>, {
    info!("compiling files: {:?}", files);

    let sources = gather_sources(dir.as_ref(), files, &resolver)?;
    let input = CompilerInput::new(sources);

    let default_solc = Solc::default();
    let output = solc.unwrap_or(&default_solc).compile(&input)?;
    let output = check_output(output)?;

    debug!("compilation success");
    Ok(output)
}

/// Abort with the full diagnostic list if the output carries any, even when
/// partial artifacts are present.
pub(crate) fn check_output(output: CompilerOutput) -> Result<CompilerOutput, Error> {
    if output.has_errors() {
        return Err(Error::Compilation(output.errors));
    }

    Ok(output)
}

/// Read the listed files and pull in their imports through the resolver.
pub(crate) fn gather_sources<F>(
    dir: &Path,
    files: &[&str],
    resolver: &F,
) -> Result<BTreeMap<String, Source>, Error>
where
    F: Fn(&str) -> Result<String, String>, {
    let mut sources = BTreeMap::new();
    let mut pending = Vec::new();

    for file in files {
        let content = read_file(dir.join(file))
            .map_err(|e| Error::Generic(format!("failed to read source '{file}': {e}")))?;
        pending.extend(scan_imports(&content));
        sources.insert(file.to_string(), Source { content });
    }

    while let Some(path) = pending.pop() {
        if sources.contains_key(&path) {
            continue;
        }

        match resolver(&path) {
            Ok(content) => {
                pending.extend(scan_imports(&content));
                sources.insert(path, Source { content });
            }
            Err(e) => {
                // left for the compiler to report as a missing source
                debug!("unresolved import '{}': {}", path, e);
            }
        }
    }

    Ok(sources)
}

/// Collect the import paths referenced by a source text.
pub(crate) fn scan_imports(source: &str) -> Vec<String> {
    IMPORT_RE
        .captures_iter(source)
        .filter_map(|capture| capture.ok())
        .filter_map(|capture| capture.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Extract the version identifier from `solc --version` output.
pub(crate) fn parse_version_output(output: &str) -> Result<String, Error> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Version: "))
        .map(|version| version.trim().to_string())
        .ok_or_else(|| Error::SolcError(format!("unexpected version output: {output}")))
}
