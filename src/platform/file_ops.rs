//! Platform-specific file operations.

use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Apply the permission bits of a Unix mode value.
#[cfg(unix)]
pub fn set_permissions_from_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))
}

/// Windows has no POSIX permission bits; files keep their creation defaults.
#[cfg(not(unix))]
pub fn set_permissions_from_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

/// Permission bits of an existing file, if the platform exposes them.
#[cfg(unix)]
pub fn permission_bits(path: &Path) -> std::io::Result<Option<u32>> {
    Ok(Some(fs::metadata(path)?.permissions().mode() & 0o777))
}

#[cfg(not(unix))]
pub fn permission_bits(_path: &Path) -> std::io::Result<Option<u32>> {
    Ok(None)
}

/// Replace `to` with `from`.
///
/// Rename is atomic on Unix. Windows refuses to rename over an existing
/// file, so the destination is removed first.
pub fn atomic_rename(from: &Path, to: &Path) -> std::io::Result<()> {
    #[cfg(windows)]
    {
        if to.exists() {
            fs::remove_file(to)?;
        }
    }

    fs::rename(from, to)
}
