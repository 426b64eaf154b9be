//! File metadata helpers used by the CLI.
//!
//! Output files inherit the input's modification time, permission bits and
//! (on Unix, best effort) ownership, like the `bzip2` tool does.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

/// Metadata copied from an input file onto its output.
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub mtime: SystemTime,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl FileStat {
    pub fn of(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        let mtime = meta.modified()?;
        #[cfg(unix)]
        let (mode, uid, gid) = {
            use std::os::unix::fs::MetadataExt;
            (meta.mode(), meta.uid(), meta.gid())
        };
        #[cfg(not(unix))]
        let (mode, uid, gid) = (if meta.permissions().readonly() { 0o444 } else { 0o644 }, 0, 0);
        Ok(FileStat { mtime, mode, uid, gid })
    }
}

/// Applies `stat` to the regular file at `path`.
///
/// Times and permissions must succeed; a failed `chown` is ignored, since an
/// unprivileged user can rarely change ownership.
pub fn set_file_stat(path: &Path, stat: &FileStat) -> io::Result<()> {
    if !is_reg_file(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: not a regular file", path.display()),
        ));
    }

    let atime = FileTime::from_system_time(SystemTime::now());
    filetime::set_file_times(path, atime, FileTime::from_system_time(stat.mtime))?;

    #[cfg(unix)]
    {
        use nix::unistd::{chown, Gid, Uid};
        use std::os::unix::fs::PermissionsExt;
        let _ = chown(path, Some(Uid::from_raw(stat.uid)), Some(Gid::from_raw(stat.gid)));
        fs::set_permissions(path, fs::Permissions::from_mode(stat.mode & 0o7777))?;
    }
    #[cfg(not(unix))]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(stat.mode & 0o200 == 0);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Returns `true` if `path` refers to a regular file (symlinks resolved).
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}
