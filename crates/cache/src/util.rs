use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::error::Error;

/// Write raw contents to a file on the disc
/// If the parent directory does not exist, it will be created
pub(crate) fn write_bytes(path: &Path, contents: &[u8]) -> Result<(), Error> {
    if let Some(prefix) = path.parent() {
        std::fs::create_dir_all(prefix)?;
    } else {
        return Err(Error::IOError(std::io::Error::other("Unable to create directory")));
    }

    let mut file = File::create(path)?;
    file.write_all(contents)?;

    Ok(())
}

/// Read raw contents from a file on the disc
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    let mut file = File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}
