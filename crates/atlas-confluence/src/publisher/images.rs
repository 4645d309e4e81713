//! Image collection for published documents.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use atlas_adf::{Document, MediaAttrs};
use tracing::warn;

use super::error::PublishError;

/// How an image is referenced in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ImageRef {
    /// `![alt](path)` with a local path.
    Local(String),
    /// `{{diagram:VIEW}}` placeholder.
    Diagram(String),
}

impl ImageRef {
    fn as_str(&self) -> &str {
        match self {
            Self::Local(url) => url,
            Self::Diagram(view_id) => view_id,
        }
    }
}

/// Image file to upload as an attachment.
#[derive(Debug, Clone)]
pub(crate) struct ImageFile {
    /// Attachment filename, unique within the page.
    pub filename: String,
    /// File on disk.
    pub path: PathBuf,
    /// MIME type derived from the extension.
    pub content_type: &'static str,
}

/// Images of a document keyed by reference.
#[derive(Debug, Default)]
pub(crate) struct ImageSet {
    pub files: Vec<ImageFile>,
    by_ref: HashMap<ImageRef, usize>,
}

impl ImageSet {
    /// Collect local images and diagram placeholders from `doc`.
    ///
    /// Relative paths resolve against `source_dir`; placeholders against
    /// `diagrams_dir` (itself relative to `source_dir` when not absolute).
    /// Every referenced file must exist.
    pub(crate) fn collect(
        doc: &Document,
        source_dir: &Path,
        diagrams_dir: &Path,
    ) -> Result<Self, PublishError> {
        let diagrams_dir = source_dir.join(diagrams_dir);
        let mut refs = Vec::new();

        for url in doc.media_urls().into_iter().filter(|url| is_local(url)) {
            match contained_join(source_dir, url) {
                Some(path) => refs.push((ImageRef::Local(url.to_owned()), path)),
                None => warn!("Skipping image '{}' outside {}", url, source_dir.display()),
            }
        }
        for view_id in doc.placeholders() {
            match contained_join(&diagrams_dir, &format!("{view_id}.png")) {
                Some(path) => refs.push((ImageRef::Diagram(view_id.to_owned()), path)),
                None => warn!(
                    "Skipping diagram '{}' outside {}",
                    view_id,
                    diagrams_dir.display()
                ),
            }
        }

        let mut set = Self::default();
        let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

        for (reference, path) in refs {
            if set.by_ref.contains_key(&reference) {
                continue;
            }
            if !path.is_file() {
                return Err(PublishError::MissingImage {
                    reference: reference.as_str().to_owned(),
                    path,
                });
            }

            let index = if let Some(&index) = by_path.get(&path) {
                index
            } else {
                let filename = set.unique_filename(&path);
                set.files.push(ImageFile {
                    filename,
                    content_type: content_type(&path),
                    path: path.clone(),
                });
                by_path.insert(path, set.files.len() - 1);
                set.files.len() - 1
            };
            set.by_ref.insert(reference, index);
        }

        Ok(set)
    }

    /// File backing `reference`, if it was collected.
    pub(crate) fn get(&self, reference: &ImageRef) -> Option<&ImageFile> {
        self.by_ref.get(reference).map(|&i| &self.files[i])
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn filenames(&self) -> Vec<String> {
        self.files.iter().map(|f| f.filename.clone()).collect()
    }

    fn unique_filename(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_owned();
        if !self.files.iter().any(|f| f.filename == name) {
            return name;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        let ext = path.extension().and_then(|e| e.to_str());
        (2..)
            .map(|n| match ext {
                Some(ext) => format!("{stem}-{n}.{ext}"),
                None => format!("{stem}-{n}"),
            })
            .find(|candidate| !self.files.iter().any(|f| &f.filename == candidate))
            .unwrap_or(name)
    }
}

/// Reference used to look up the image behind a media node.
pub(crate) fn media_ref(attrs: &MediaAttrs) -> ImageRef {
    match attrs {
        MediaAttrs::External { url, .. } => ImageRef::Local(url.clone()),
        MediaAttrs::Placeholder { view_id } => ImageRef::Diagram(view_id.clone()),
    }
}

/// Join relative `path` onto `base`, or `None` if `path` is absolute or
/// climbs above `base` with `..`.
fn contained_join(base: &Path, path: &str) -> Option<PathBuf> {
    let mut joined = base.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth.checked_sub(1)?;
                joined.pop();
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(joined)
}

/// Whether `url` points at a file next to the markdown source.
fn is_local(url: &str) -> bool {
    !(url.contains("://") || url.starts_with("//") || url.starts_with("data:"))
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
