use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use zip::result::ZipResult;
use zip::ZipArchive;

/// Unpack every entry of the zip file at `archive` into `dest`.
///
/// Entries are written to a sibling staging directory that is renamed to `dest` once every entry
/// is out, so `dest` only ever appears complete. Entries whose names would escape the staging
/// directory are rejected by [`ZipArchive::extract`].
pub(crate) fn extract_all(archive: &Path, dest: &Path) -> ZipResult<usize> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let entries = zip.len();

    let staging = staging_dir(dest);
    if staging.exists() {
        log::debug!("Removing stale staging directory {}", staging.display());
        std::fs::remove_dir_all(&staging)?;
    }
    std::fs::create_dir_all(&staging)?;

    let unpacked = zip
        .extract(&staging)
        .and_then(|()| std::fs::rename(&staging, dest).map_err(Into::into));
    if let Err(e) = unpacked {
        std::fs::remove_dir_all(&staging).ok();
        return Err(e);
    }

    Ok(entries)
}

/// `<parent>/.<name>.partial` for a destination of `<parent>/<name>`.
fn staging_dir(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".partial");
    dest.with_file_name(name)
}
