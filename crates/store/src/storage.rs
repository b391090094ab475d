//! Storage location preparation.

use std::path::Path;

use crate::error::StoreError;

/// Ensure the store's data directory exists and is usable by this
/// process.
///
/// Creates the full directory tree if absent and restricts it to owner
/// read/write/execute. Calling this on an already-existing directory is
/// a no-op. Any failure is [`StoreError::StorageUnavailable`], which is
/// fatal to startup.
pub fn ensure_storage_location(path: &Path) -> Result<(), StoreError> {
    if path.is_dir() {
        tracing::debug!(path = %path.display(), "Storage location already exists");
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|source| StoreError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700)).map_err(
            |source| StoreError::StorageUnavailable {
                path: path.to_path_buf(),
                source,
            },
        )?;
    }

    tracing::info!(path = %path.display(), "Created storage location");
    Ok(())
}
