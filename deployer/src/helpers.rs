use std::{fs, io, path::Path};

/// Copies `source` over `destination`, creating missing parent directories.
/// Nothing is copied when both paths resolve to the same file.
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    if same_file(source, destination)? {
        debug!("{:?} and {:?} are the same file, skipping copy", source, destination);
        return Ok(());
    }
    create_parent_dirs(destination)?;
    fs::copy(source, destination)
        .inspect(|bytes| debug!("Copied {} bytes from {:?} to {:?}", bytes, source, destination))
        .inspect_err(|e| error!("Copy from {:?} to {:?} failed {:?}", source, destination, e))?;
    Ok(())
}

pub fn write_file(destination: &Path, content: &[u8]) -> io::Result<()> {
    create_parent_dirs(destination)?;
    fs::write(destination, content)
}

fn same_file(source: &Path, destination: &Path) -> io::Result<bool> {
    if !destination.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(source)? == fs::canonicalize(destination)?)
}

fn create_parent_dirs(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
