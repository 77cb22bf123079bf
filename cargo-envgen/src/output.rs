//! Output writers for `cargo-envgen`.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::CliError;

/// Writes `contents` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the parent directory cannot be opened or
/// the file cannot be written.
pub fn write_file(path: &Utf8Path, contents: &str) -> Result<(), CliError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| CliError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(CliError::io(parent))?;
    dir.write(name, contents).map_err(CliError::io(path))?;
    tracing::info!(%path, bytes = contents.len(), "file written");
    Ok(())
}
