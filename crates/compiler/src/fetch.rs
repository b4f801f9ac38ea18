//! Fetching and caching of version-pinned compiler binaries.

use std::path::Path;

use crucible_cache::{with_artifact, ArtifactCache, FsCache};
use crucible_common::utils::http::get_bytes_from_url;
use tracing::debug;

use crate::{error::Error, solc::Solc};

/// Download timeout for compiler binaries, in seconds.
const FETCH_TIMEOUT: u64 = 300;

/// The version identifier of the process-default compiler (`solc` on `PATH`).
///
/// ```no_run
/// use crucible_compiler::version;
///
/// let version = version().expect("no default solc installed");
/// ```
pub fn version() -> Result<String, Error> {
    Solc::default().version()
}

/// The well-known binary host URL for the given compiler version on the
/// current platform. A leading `v` in the version string is tolerated.
///
/// ```
/// use crucible_compiler::solc_binary_url;
///
/// let url = solc_binary_url("0.8.24+commit.e11b9ed9");
/// assert!(url.starts_with("https://binaries.soliditylang.org/"));
/// ```
pub fn solc_binary_url(version: &str) -> String {
    let version = version.trim_start_matches('v');
    let platform = platform();
    format!("https://binaries.soliditylang.org/{platform}/solc-{platform}-v{version}")
}

/// Get the raw compiler artifact for the given version, from the cache if
/// present, otherwise from the binary host (one attempt, cached on success).
pub async fn fetch_artifact<C>(version: &str, cache: &C) -> Result<Vec<u8>, Error>
where
    C: ArtifactCache + ?Sized, {
    with_artifact(cache, version, || async {
        let url = solc_binary_url(version);
        let body = get_bytes_from_url(&url, FETCH_TIMEOUT).await?;
        Ok(body.to_vec())
    })
    .await
    .map_err(Error::Eyre)
}

/// Get a compiler handle pinned to the given version, fetching and caching
/// the binary in the default cache directory if necessary.
pub async fn get_specific_solc(version: &str) -> Result<Solc, Error> {
    get_specific_solc_in(version, &FsCache::default()).await
}

/// Get a version-pinned compiler handle backed by the given cache directory.
pub async fn get_specific_solc_in(version: &str, cache: &FsCache) -> Result<Solc, Error> {
    fetch_artifact(version, cache).await?;

    let path = cache.path_for(version);
    set_executable(&path)?;
    debug!("using solc {} at '{}'", version, path.display());

    Ok(Solc::at(path))
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;

    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), Error> {
    Ok(())
}

fn platform() -> &'static str {
    if cfg!(target_os = "linux") {
        "linux-amd64"
    } else if cfg!(target_os = "macos") {
        "macosx-amd64"
    } else {
        "windows-amd64"
    }
}
