use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use ignore::{DirEntry, Error as IgnoreError, WalkBuilder, WalkState};

use super::probe::{has_image_extension, image_dimensions, is_binary};
use super::{Catalog, PayloadLoader};
use crate::error::SourceError;
use crate::types::{MediaKind, Payload, ResultItem};

/// Files above this size are never read.
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// Text files above this size are described but not previewed.
const MAX_PREVIEW_SIZE: u64 = 512 * 1024;
/// Lines kept in a text preview.
const MAX_PREVIEW_LINES: usize = 40;

/// Options controlling which files a [`FilesystemCatalog`] indexes.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub include_hidden: bool,
    pub respect_ignore_files: bool,
    pub max_depth: Option<usize>,
    /// Lower-case extensions to keep. `None` keeps every file.
    pub extensions: Option<Vec<String>>,
    pub threads: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            respect_ignore_files: true,
            max_depth: None,
            extensions: None,
            threads: None,
        }
    }
}

impl ScanOptions {
    /// Restrict the scan to the given extensions. Leading `.` or `*.` is ignored.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        self.extensions = if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        };
        self
    }

    fn allows(&self, path: &Path) -> bool {
        let Some(allowed) = &self.extensions else {
            return true;
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext)))
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('*')
        .trim_start_matches('.')
        .to_ascii_lowercase()
}

/// Loads payloads by reading files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FilePayloads {
    root: PathBuf,
}

impl FilePayloads {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PayloadLoader for FilePayloads {
    fn load(&self, item: &ResultItem) -> Result<Option<Payload>, SourceError> {
        let path = self.root.join(item.id.as_str());
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SourceError::io(path, err)),
        };
        if !metadata.is_file() {
            return Ok(None);
        }
        describe_file(&path, metadata.len()).map(Some)
    }
}

fn describe_file(path: &Path, size: u64) -> Result<Payload, SourceError> {
    let image = has_image_extension(path);
    if size > MAX_FILE_SIZE {
        let kind = if image { MediaKind::Image } else { MediaKind::Binary };
        return Ok(Payload {
            kind,
            size: Some(size),
            dimensions: None,
            preview: Vec::new(),
            note: Some("too large to inspect".into()),
        });
    }

    if size == 0 {
        return Ok(Payload {
            kind: MediaKind::Empty,
            size: Some(0),
            dimensions: None,
            preview: Vec::new(),
            note: None,
        });
    }

    if image {
        return Ok(Payload {
            kind: MediaKind::Image,
            size: Some(size),
            dimensions: image_dimensions(path)?,
            preview: Vec::new(),
            note: None,
        });
    }

    if size > MAX_PREVIEW_SIZE {
        return Ok(Payload {
            kind: MediaKind::Text,
            size: Some(size),
            dimensions: None,
            preview: Vec::new(),
            note: Some("too large to preview".into()),
        });
    }

    let bytes = fs::read(path).map_err(|err| SourceError::io(path, err))?;
    if is_binary(&bytes) {
        return Ok(Payload {
            kind: MediaKind::Binary,
            size: Some(size),
            dimensions: None,
            preview: Vec::new(),
            note: None,
        });
    }

    let text = String::from_utf8_lossy(&bytes);
    Ok(Payload::text(text.lines().take(MAX_PREVIEW_LINES)).with_size(size))
}


/// A catalog of the files below a directory, keyed by relative path.
pub type FilesystemCatalog = Catalog<FilePayloads>;

impl Catalog<FilePayloads> {
    /// Walk `root` and index every file the options allow.
    ///
    /// # Errors
    ///
    /// Returns an error when `root` cannot be read or is not a directory.
    /// Unreadable entries below the root are skipped.
    pub fn scan(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Self, SourceError> {
        let root = root.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).map_err(|err| SourceError::io(&root, err))?;
        if !metadata.is_dir() {
            return Err(SourceError::InvalidRequest(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let (tx, rx) = mpsc::channel();
        let walker_root = Arc::new(root.clone());
        let threads = options.threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        });
        let filter = Arc::new(options.clone());

        WalkBuilder::new(walker_root.as_path())
            .hidden(!options.include_hidden)
            .git_ignore(options.respect_ignore_files)
            .git_global(options.respect_ignore_files)
            .git_exclude(options.respect_ignore_files)
            .ignore(options.respect_ignore_files)
            .parents(options.respect_ignore_files)
            .max_depth(options.max_depth)
            .threads(threads)
            .build_parallel()
            .run(|| {
                let sender = tx.clone();
                let root = Arc::clone(&walker_root);
                let filter = Arc::clone(&filter);
                Box::new(move |entry: Result<DirEntry, IgnoreError>| {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(err) => {
                            tracing::debug!(error = %err, "skipping unreadable entry");
                            return WalkState::Continue;
                        }
                    };
                    if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                        return WalkState::Continue;
                    }

                    let path = entry.path();
                    if !filter.allows(path) {
                        return WalkState::Continue;
                    }
                    let relative = path.strip_prefix(root.as_path()).unwrap_or(path);
                    let relative = relative.to_string_lossy().replace('\\', "/");
                    if sender.send(relative).is_err() {
                        return WalkState::Quit;
                    }
                    WalkState::Continue
                })
            });

        drop(tx);

        let mut paths: Vec<String> = rx.into_iter().collect();
        // Walk order is nondeterministic across threads.
        paths.sort();
        tracing::debug!(root = %root.display(), files = paths.len(), "indexed directory");

        let items = paths
            .into_iter()
            .map(|path| ResultItem::new(path.as_str(), path.clone()))
            .collect();
        Ok(Self::new(items, FilePayloads::new(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemId, SearchCriteria};
    use crate::SelectorSource;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height)
            .save(path)
            .expect("write png");
    }

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::Builder::new()
            .prefix("lazypick-scan")
            .tempdir()
            .expect("tempdir");
        fs::create_dir_all(dir.path().join("photos")).expect("mkdir");
        write_png(&dir.path().join("photos/cat.png"), 64, 32);
        write_png(&dir.path().join("photos/dog.png"), 8, 8);
        fs::write(dir.path().join("notes.txt"), "first line\nsecond line\n").expect("write txt");
        fs::write(dir.path().join("blob.bin"), [0u8, 1, 2, 3]).expect("write bin");
        dir
    }

    #[test]
    fn scan_indexes_relative_paths() {
        let dir = sample_tree();
        let catalog = FilesystemCatalog::scan(dir.path(), &ScanOptions::default()).expect("scan");
        let labels: Vec<_> = catalog.items().iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["blob.bin", "notes.txt", "photos/cat.png", "photos/dog.png"]);
    }

    #[test]
    fn extension_filter_keeps_matching_files() {
        let dir = sample_tree();
        let options = ScanOptions::default().with_extensions(["*.PNG"]);
        let catalog = FilesystemCatalog::scan(dir.path(), &options).expect("scan");
        assert_eq!(catalog.len(), 2);
        let page = catalog
            .search(&SearchCriteria::new("cat"), 12, 0)
            .expect("search");
        assert_eq!(page.items[0].id.as_str(), "photos/cat.png");
    }

    #[test]
    fn payloads_describe_file_contents() {
        let dir = sample_tree();
        let catalog = FilesystemCatalog::scan(dir.path(), &ScanOptions::default()).expect("scan");

        let image = catalog
            .fetch_payload(&ItemId::from("photos/cat.png"))
            .expect("fetch image")
            .expect("image payload");
        assert_eq!(image.kind, MediaKind::Image);
        assert_eq!(image.dimensions, Some((64, 32)));

        let text = catalog
            .fetch_payload(&ItemId::from("notes.txt"))
            .expect("fetch text")
            .expect("text payload");
        assert_eq!(text.preview, ["first line", "second line"]);

        let binary = catalog
            .fetch_payload(&ItemId::from("blob.bin"))
            .expect("fetch binary")
            .expect("binary payload");
        assert_eq!(binary.kind, MediaKind::Binary);
    }

    #[test]
    fn deleted_files_have_no_payload() {
        let dir = sample_tree();
        let catalog = FilesystemCatalog::scan(dir.path(), &ScanOptions::default()).expect("scan");
        fs::remove_file(dir.path().join("notes.txt")).expect("remove");
        let payload = catalog
            .fetch_payload(&ItemId::from("notes.txt"))
            .expect("fetch");
        assert!(payload.is_none());
    }

    #[test]
    fn scanning_a_file_is_rejected() {
        let dir = sample_tree();
        let err = FilesystemCatalog::scan(dir.path().join("notes.txt"), &ScanOptions::default())
            .expect_err("not a directory");
        assert!(matches!(err, SourceError::InvalidRequest(_)));
    }
}
