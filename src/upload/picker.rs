use super::types::{FileId, Payload, SelectedFile};
use crate::error::PickError;
use bytes::Bytes;
use glob::{MatchOptions, Pattern};
use ignore::Walk;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Files accepted by a pick, plus the ones that were turned away.
#[derive(Debug, Default)]
pub struct Picked {
    pub files: Vec<SelectedFile>,
    pub rejected: Vec<PickError>,
}

/// Turns user picks (dialog paths, drops, folders) into selection entries,
/// keeping only images.
#[derive(Debug, Clone)]
pub struct ImagePicker {
    patterns: Vec<Pattern>,
}

impl Default for ImagePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePicker {
    pub fn new() -> Self {
        let patterns = IMAGE_EXTENSIONS
            .iter()
            .filter_map(|ext| Pattern::new(&format!("*.{}", ext)).ok())
            .collect();
        Self { patterns }
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }

    pub fn pick_path(&self, path: &Path) -> Result<SelectedFile, PickError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if !self.accepts(&name) {
            return Err(PickError::NotAnImage(path.display().to_string()));
        }

        let metadata = fs::metadata(path).map_err(|source| PickError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(SelectedFile::new(
            name,
            metadata.len(),
            Payload::Path(path.to_path_buf()),
        ))
    }

    pub fn pick_bytes(&self, name: &str, bytes: Bytes) -> Result<SelectedFile, PickError> {
        if !self.accepts(name) {
            return Err(PickError::NotAnImage(name.to_string()));
        }
        Ok(SelectedFile::new(
            name,
            bytes.len() as u64,
            Payload::Bytes(bytes),
        ))
    }

    pub fn from_paths(&self, paths: impl IntoIterator<Item = PathBuf>) -> Picked {
        let mut picked = Picked::default();
        for path in paths {
            match self.pick_path(&path) {
                Ok(file) => picked.files.push(file),
                Err(e) => picked.rejected.push(e),
            }
        }
        picked
    }

    /// Every image below `root`, skipping whatever `.gitignore` and hidden
    /// file rules exclude. Non-images are skipped silently.
    pub fn from_folder(&self, root: &Path) -> Picked {
        let mut paths: Vec<PathBuf> = Walk::new(root)
            .filter_map(Result::ok)
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| self.accepts(name))
            })
            .collect();
        paths.sort();

        debug!("Found {} images under {}", paths.len(), root.display());
        self.from_paths(paths)
    }
}

/// The picker always hands over a whole new list; these build it.
pub fn appended(current: &[SelectedFile], added: Vec<SelectedFile>) -> Vec<SelectedFile> {
    let mut files = current.to_vec();
    files.extend(added);
    files
}

pub fn without(current: &[SelectedFile], id: FileId) -> Vec<SelectedFile> {
    current.iter().filter(|file| file.id != id).cloned().collect()
}

pub fn mime_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn accepts_images_in_any_case() {
        let picker = ImagePicker::new();
        for name in ["a.png", "B.JPG", "c.jpeg", "d.Gif", "e.bmp", "my photo.png"] {
            assert!(picker.accepts(name), "{name}");
        }
        for name in ["notes.txt", "png", "archive.png.zip", "image.webp", ""] {
            assert!(!picker.accepts(name), "{name}");
        }
    }

    #[test]
    fn from_paths_reads_sizes_and_reports_rejects() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("cat.png");
        let text = dir.path().join("readme.txt");
        fs::write(&image, vec![0u8; 1234]).unwrap();
        fs::write(&text, b"hello").unwrap();
        let missing = dir.path().join("gone.jpg");

        let picked = ImagePicker::new().from_paths(vec![image.clone(), text, missing]);

        assert_eq!(picked.files.len(), 1);
        assert_eq!(picked.files[0].name, "cat.png");
        assert_eq!(picked.files[0].size, 1234);
        assert!(matches!(&picked.files[0].payload, Payload::Path(p) if *p == image));

        assert_eq!(picked.rejected.len(), 2);
        assert!(matches!(picked.rejected[0], PickError::NotAnImage(_)));
        assert!(matches!(picked.rejected[1], PickError::Io { .. }));
    }

    #[test]
    fn from_folder_walks_nested_images_in_path_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.gif"), b"gif").unwrap();
        fs::write(dir.path().join("a.bmp"), b"bmp").unwrap();
        fs::write(dir.path().join("nested").join("c.jpeg"), b"jpeg").unwrap();
        fs::write(dir.path().join("notes.md"), b"# notes").unwrap();

        let picked = ImagePicker::new().from_folder(dir.path());
        let names: Vec<_> = picked.files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, vec!["a.bmp", "b.gif", "c.jpeg"]);
        assert!(picked.rejected.is_empty());
    }

    #[test]
    fn dropped_bytes_become_entries() {
        let picker = ImagePicker::new();
        let file = picker
            .pick_bytes("drop.png", Bytes::from_static(b"12345"))
            .unwrap();
        assert_eq!(file.size, 5);
        assert!(picker.pick_bytes("drop.exe", Bytes::new()).is_err());
    }

    #[test]
    fn replacement_lists_keep_order_and_duplicates() {
        let picker = ImagePicker::new();
        let a = picker.pick_bytes("a.png", Bytes::new()).unwrap();
        let b = picker.pick_bytes("a.png", Bytes::new()).unwrap();
        let c = picker.pick_bytes("c.png", Bytes::new()).unwrap();
        let b_id = b.id;

        let list = appended(&[a.clone()], vec![b, c]);
        assert_eq!(list.len(), 3);

        let list = without(&list, b_id);
        let ids: Vec<_> = list.iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], a.id);
        assert_eq!(list[1].name, "c.png");
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("x.PNG"), "image/png");
        assert_eq!(mime_for("x.jpg"), "image/jpeg");
        assert_eq!(mime_for("x"), "application/octet-stream");
    }
}
