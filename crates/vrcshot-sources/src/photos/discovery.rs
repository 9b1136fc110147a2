use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

use super::filename::{PhotoMeta, parse_photo_file_name};

/// One discovered screenshot with its filename-derived metadata
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub meta: PhotoMeta,
}

/// Lazily walk a photo root for screenshots.
///
/// The iterator never opens image bytes; indexing touches paths and names
/// only, which is what keeps 10k+ libraries cheap to scan. Unreadable
/// entries and non-matching filenames are skipped silently; the missing-root
/// case is reported up front so each configured root can fail independently.
pub fn discover_photos(root: &Path) -> Result<PhotoWalk> {
    if !root.is_dir() {
        return Err(Error::DirectoryMissing(root.to_path_buf()));
    }
    Ok(PhotoWalk {
        inner: WalkDir::new(root).into_iter(),
    })
}

pub struct PhotoWalk {
    inner: walkdir::IntoIter,
}

impl Iterator for PhotoWalk {
    type Item = PhotoFile;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.inner.by_ref() {
            let Ok(entry) = entry else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if let Some(meta) = parse_photo_file_name(name) {
                return Some(PhotoFile {
                    path: entry.into_path(),
                    meta,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_finds_nested_screenshots_only() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("2024-01");
        fs::create_dir(&sub).unwrap();
        fs::write(
            dir.path().join("VRChat_2024-01-15_10-15-30.123_1920x1080.png"),
            [],
        )
        .unwrap();
        fs::write(sub.join("VRChat_2024-01-16_11-00-00.000_1280x720.png"), []).unwrap();
        fs::write(sub.join("notes.txt"), []).unwrap();
        fs::write(dir.path().join("IMG_1234.png"), []).unwrap();

        let mut found: Vec<_> = discover_photos(dir.path())
            .unwrap()
            .map(|p| p.meta.width)
            .collect();
        found.sort();
        assert_eq!(found, vec![1280, 1920]);
    }

    #[test]
    fn test_missing_root_reports_directory_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("photos");
        match discover_photos(&missing) {
            Err(Error::DirectoryMissing(p)) => assert_eq!(p, missing),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
