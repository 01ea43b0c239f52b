//! SQL seed script reader.

use crate::error::SourceError;
use std::path::Path;
use tracing::debug;

/// Read the whole script. The text is executed as-is; statements are not
/// split or rewritten.
pub async fn read_script(path: &Path) -> Result<String, SourceError> {
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    debug!("Read {} bytes of SQL from {}", sql.len(), path.display());
    Ok(sql)
}
