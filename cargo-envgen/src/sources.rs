//! Source loading for `cargo-envgen`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use envgen::SchemaGraph;

use crate::error::CliError;

/// Suffix of files written by the generator; never read back as input.
pub const GENERATED_SUFFIX: &str = "_gen.rs";

/// Reads every `.rs` file directly inside `dir` into one schema graph.
///
/// Files are read in name order. Generated files and the file named by
/// `skip` are ignored.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the directory or a file cannot be read,
/// [`CliError::NoSources`] when no file qualifies, and
/// [`CliError::Generate`] when a file fails to parse.
pub fn load_graph(dir: &Utf8Path, skip: Option<&Utf8Path>) -> Result<SchemaGraph, CliError> {
    let handle = Dir::open_ambient_dir(dir, ambient_authority()).map_err(CliError::io(dir))?;
    let mut names = Vec::new();
    for entry in handle.entries().map_err(CliError::io(dir))? {
        let entry = entry.map_err(CliError::io(dir))?;
        if !entry.file_type().map_err(CliError::io(dir))?.is_file() {
            continue;
        }
        let name = entry.file_name().map_err(CliError::io(dir))?;
        if is_input(&name, dir, skip) {
            names.push(name);
        }
    }
    names.sort();
    if names.is_empty() {
        return Err(CliError::NoSources(dir.to_path_buf()));
    }

    let mut graph = SchemaGraph::new();
    for name in names {
        let path = dir.join(&name);
        let text = handle.read_to_string(&name).map_err(CliError::io(&path))?;
        tracing::debug!(%path, "reading source");
        graph.add_source(path.as_str(), &text)?;
    }
    Ok(graph)
}

fn is_input(name: &str, dir: &Utf8Path, skip: Option<&Utf8Path>) -> bool {
    let path: Utf8PathBuf = dir.join(name);
    name.ends_with(".rs")
        && !name.ends_with(GENERATED_SUFFIX)
        && skip.is_none_or(|skip| skip != path.as_path())
}

/// Output path derived from the file that declares the root record:
/// `src/config.rs` becomes `src/config_gen.rs`.
///
/// # Errors
///
/// Returns [`CliError::MissingRootSource`] when the root was not read from
/// a file.
pub fn default_output(graph: &SchemaGraph, root: &str) -> Result<Utf8PathBuf, CliError> {
    let origin = graph
        .origin(root)
        .map(Utf8Path::new)
        .ok_or_else(|| CliError::MissingRootSource(root.to_owned()))?;
    let stem = origin
        .file_stem()
        .ok_or_else(|| CliError::MissingRootSource(root.to_owned()))?;
    Ok(origin.with_file_name(format!("{stem}{GENERATED_SUFFIX}")))
}
