use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions reachable through previous/next navigation. Matched exactly,
/// so `PNG` is not the same as `png`.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "cur", "gif", "ico", "jpg", "lbm", "pcx", "png", "pnm", "tga", "tif", "xcf", "xpm", "xv",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Regular files in `dir`, sorted by name. Directories and symlinks are skipped.
pub fn list_regular_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let Ok(ft) = entry.file_type() else {
            continue;
        };
        if ft.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_current(entry: &Path, current: Option<&OsStr>) -> bool {
    current.is_some() && entry.file_name() == current
}

/// The last recognized image before `current` in `entries`.
pub fn previous_in(entries: &[PathBuf], current: &Path) -> Option<PathBuf> {
    let name = current.file_name();
    let mut last_image: Option<&PathBuf> = None;
    for entry in entries {
        if is_current(entry, name) {
            return last_image.cloned();
        }
        if is_image_file(entry) {
            last_image = Some(entry);
        }
    }
    None
}

/// The first recognized image after `current` in `entries`.
pub fn next_in(entries: &[PathBuf], current: &Path) -> Option<PathBuf> {
    let name = current.file_name();
    let mut rest = entries.iter().skip_while(|e| !is_current(e, name));
    rest.next()?;
    rest.find(|e| is_image_file(e)).cloned()
}

fn siblings(current: &Path) -> Option<Vec<PathBuf>> {
    let dir = current.parent()?;
    match list_regular_files(dir) {
        Ok(entries) => Some(entries),
        Err(e) => {
            log::warn!("Could not scan {}: {}", dir.display(), e);
            None
        }
    }
}

pub fn find_previous(current: &Path) -> Option<PathBuf> {
    previous_in(&siblings(current)?, current)
}

pub fn find_next(current: &Path) -> Option<PathBuf> {
    next_in(&siblings(current)?, current)
}
