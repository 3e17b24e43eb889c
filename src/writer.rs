use std::{fs, io::Write as _, path::Path};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Destination of rendered manifests
pub trait Writer {
	fn ensure_dir(&mut self, path: &Path) -> Result<()>;
	/// Replace file contents, creating the file if needed
	fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes to the local filesystem
///
/// Every file is first written to a temporary sibling and then renamed over
/// the destination, so readers never observe a half-written manifest.
#[derive(Debug, Default)]
pub struct FsWriter;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
	move |source| Error::Write {
		path: path.to_owned(),
		source,
	}
}

impl Writer for FsWriter {
	fn ensure_dir(&mut self, path: &Path) -> Result<()> {
		fs::create_dir_all(path).map_err(io_error(path))
	}

	fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
		let dir = match path.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir,
			_ => Path::new("."),
		};
		let mut file = NamedTempFile::new_in(dir).map_err(io_error(path))?;
		file.write_all(bytes).map_err(io_error(path))?;
		file.persist(path)
			.map_err(|e| e.error)
			.map_err(io_error(path))?;
		Ok(())
	}
}
