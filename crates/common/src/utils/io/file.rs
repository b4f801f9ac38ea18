use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use eyre::Result;

/// Write contents to a file on the disc
///
/// ```no_run
/// use crucible_common::utils::io::file::write_file;
///
/// let path = "/tmp/test.txt";
/// let contents = "Hello, World!";
/// let result = write_file(path, contents);
/// ```
pub fn write_file(path_str: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path_str.as_ref();

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(
        path.parent().ok_or_else(|| eyre::eyre!("unable to create directory"))?,
    )?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use crucible_common::utils::io::file::read_file;
///
/// let path = "/tmp/test.txt";
/// let contents = read_file(path);
/// ```
pub fn read_file(path_str: impl AsRef<Path>) -> Result<String> {
    let mut file = File::open(path_str.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_file() {
        let path = std::env::temp_dir().join("crucible-io-tests").join("test.sol");
        write_file(&path, "contract Test {}").expect("unable to write file");

        let contents = read_file(&path).expect("unable to read file");
        assert_eq!(contents, "contract Test {}");
    }

    #[test]
    fn test_read_file_missing() {
        let path = std::env::temp_dir().join("crucible-io-tests").join("missing.sol");
        assert!(read_file(&path).is_err());
    }
}
