use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::generator::{POSE_EXTENSION, VIDEO_EXTENSION};
use crate::errors::PrepError;
use crate::types::DatumId;

/// Filesystem scan of one split directory for input videos.
///
/// Symlinked videos are followed.
pub struct VideoScan {
    root: PathBuf,
}

impl VideoScan {
    /// Create a scan rooted at a split directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Videos directly under the root, sorted by path, optionally truncated to `limit`.
    ///
    /// Only the top level is scanned; nested directories are not split members.
    pub fn discover(&self, limit: Option<usize>) -> Result<Vec<PathBuf>, PrepError> {
        if !self.root.is_dir() {
            return Err(PrepError::MissingSplitDirectory {
                path: self.root.clone(),
            });
        }
        let mut videos = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable entries only matter when they would be split members.
                Err(err) if err.depth() > 0 && !err.path().is_some_and(is_candidate) => continue,
                Err(err) => return Err(walk_error(err)),
            };
            if is_candidate(entry.path()) && entry.file_type().is_file() {
                videos.push(entry.into_path());
            }
        }
        videos.sort();
        if let Some(limit) = limit {
            videos.truncate(limit);
        }
        Ok(videos)
    }
}

fn walk_error(err: walkdir::Error) -> PrepError {
    match err.into_io_error() {
        Some(io) => PrepError::Io(io),
        None => PrepError::Configuration("filesystem loop detected during video scan".to_string()),
    }
}

/// Discover the sorted videos of a split directory.
pub fn discover_videos(split_dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>, PrepError> {
    VideoScan::new(split_dir).discover(limit)
}

/// True if the path has an `.mp4` extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == VIDEO_EXTENSION)
        .unwrap_or(false)
}

fn is_candidate(path: &Path) -> bool {
    !is_hidden(path) && is_video_file(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Identifier of a file: its basename without the final extension.
///
/// Fails for paths without a stem and for stems that are not valid UTF-8.
pub fn datum_id_from_path(path: &Path) -> Result<DatumId, PrepError> {
    let stem = path.file_stem().filter(|stem| !stem.is_empty()).ok_or_else(|| {
        PrepError::Configuration(format!("path '{}' has no file name", path.display()))
    })?;
    stem.to_str().map(str::to_string).ok_or_else(|| {
        PrepError::Configuration(format!(
            "file name of '{}' is not valid UTF-8",
            path.display()
        ))
    })
}

/// Expected pose artifact location: `{pose_dir}/{datum_id}.pose`.
pub fn pose_path_for(pose_dir: &Path, datum_id: &str) -> PathBuf {
    pose_dir.join(format!("{datum_id}.{POSE_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovery_is_sorted_and_filters_extensions() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        for name in [
            "charlie.mp4",
            "alpha.mp4",
            "bravo.mp4",
            "notes.txt",
            "clip.MP4",
            ".partial.mp4",
        ] {
            fs::write(root.join(name), b"").unwrap();
        }
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("deep.mp4"), b"").unwrap();

        let videos = discover_videos(root, None).unwrap();
        let names: Vec<String> = videos
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.mp4", "bravo.mp4", "charlie.mp4"]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlinks_outside_the_video_set_are_ignored() {
        use std::os::unix::fs::symlink;

        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.mp4"), b"").unwrap();
        symlink(root.join("gone"), root.join("notes.txt")).unwrap();
        symlink(root.join("gone"), root.join(".partial.mp4")).unwrap();

        let videos = discover_videos(root, None).unwrap();
        assert_eq!(videos, vec![root.join("a.mp4")]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_video_symlink_is_reported() {
        use std::os::unix::fs::symlink;

        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.mp4"), b"").unwrap();
        symlink(root.join("gone.mp4"), root.join("b.mp4")).unwrap();

        let err = discover_videos(root, None).unwrap_err();
        assert!(matches!(err, PrepError::Io(_)));
    }

    #[test]
    fn discovery_applies_limit_after_sorting() {
        let temp = tempdir().unwrap();
        for idx in (0..15).rev() {
            fs::write(temp.path().join(format!("v{idx:02}.mp4")), b"").unwrap();
        }

        let videos = discover_videos(temp.path(), Some(10)).unwrap();
        assert_eq!(videos.len(), 10);
        assert_eq!(videos[0].file_name().unwrap(), "v00.mp4");
        assert_eq!(videos[9].file_name().unwrap(), "v09.mp4");
    }

    #[test]
    fn missing_split_directory_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("train");
        let err = discover_videos(&missing, None).unwrap_err();
        assert!(matches!(err, PrepError::MissingSplitDirectory { path } if path == missing));
    }

    #[test]
    fn datum_id_strips_directory_and_last_extension() {
        assert_eq!(
            datum_id_from_path(Path::new("train/01April_2010.mp4")).unwrap(),
            "01April_2010"
        );
        assert_eq!(datum_id_from_path(Path::new("a.b.pose")).unwrap(), "a.b");
        assert!(matches!(
            datum_id_from_path(Path::new("")),
            Err(PrepError::Configuration(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_stem_is_rejected_with_its_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("train").join(OsStr::from_bytes(b"clip\xff.mp4"));
        let err = datum_id_from_path(&path).unwrap_err();
        assert!(
            matches!(err, PrepError::Configuration(ref msg) if msg.contains("UTF-8") && msg.contains("train"))
        );
    }

    #[test]
    fn pose_path_uses_pose_extension() {
        assert_eq!(
            pose_path_for(Path::new("poses/train"), "a"),
            PathBuf::from("poses/train/a.pose")
        );
    }
}
