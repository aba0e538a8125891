//! File I/O utilities with atomic writes
//!
//! Reading the envelope and writing decrypted output happen here, outside
//! the decryption pipeline. Writes go to a temp file that is renamed into
//! place, so a crash never leaves half a configuration behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::NetNodeError;

/// Read a whole text file, returning an error if it doesn't exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, NetNodeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NetNodeError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| NetNodeError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write text to a file atomically (write to temp, then rename)
pub fn write_text_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), NetNodeError> {
    write_atomic(path.as_ref(), |writer| {
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| NetNodeError::Storage(format!("Failed to write data: {}", e)))
    })
}

fn write_atomic<F>(path: &Path, fill: F) -> Result<(), NetNodeError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), NetNodeError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            NetNodeError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must sit in the same directory for the rename to be atomic
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let file = File::create(temp_path)
        .map_err(|e| NetNodeError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = fill(&mut writer).and_then(|()| {
        writer
            .flush()
            .map_err(|e| NetNodeError::Storage(format!("Failed to flush data: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| NetNodeError::Storage(format!("Failed to sync data: {}", e)))
    });
    drop(writer);
    if let Err(e) = written {
        let _ = fs::remove_file(temp_path);
        return Err(e);
    }

    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        NetNodeError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
