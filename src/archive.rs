use std::io::{Cursor, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use log::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ARCHIVE_FILE_NAME: &str = "transcripts.zip";
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";

/// Zip every file under `folder` into memory, named by path relative to `folder`.
///
/// The returned cursor is rewound to the start.
pub fn zip_folder(folder: &Path) -> Result<Cursor<Vec<u8>>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(folder) {
        let entry = entry.wrap_err_with(|| format!("failed to walk {}", folder.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry_name(folder, entry.path())?;
        let data = std::fs::read(entry.path()).wrap_err_with(|| format!("failed to read {}", entry.path().display()))?;

        debug!("Adding {name} ({} bytes) to archive", data.len());
        zip.start_file(name, options)?;
        zip.write_all(&data)?;
    }

    let mut buffer = zip.finish()?;
    buffer.set_position(0);
    Ok(buffer)
}

// Archive entries always use '/' whatever the host separator is
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root)?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
