//! Resolution of media references against the project's asset folders.
//!
//! Media items reference assets by bare filename. Whether such a reference
//! resolves depends on the files actually present in the project's
//! `Images` and `Videos` folders, so this is the one place in the crate
//! which touches the file system, through the [`AssetLister`] collaborator.
//!
//! Validation is asynchronous and cancellable. Each request gets a
//! generation number; starting a new request supersedes all earlier ones,
//! whose outcomes then report stale and must not be applied. Directory
//! listings run on the blocking pool and are taken once per folder no
//! matter how many items resolve against it.

use crate::{
    consts::{IMAGE_EXTENSIONS, IMAGE_FOLDER, VIDEO_EXTENSIONS, VIDEO_FOLDER},
    content::{ContentItem, ContentKind, ItemId, MediaKind},
    document::{Knot, ParsedInk},
};

use std::{
    io,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Collaborator which supplies directory listings for asset folders.
///
/// Implementations may block; the validator calls them on the blocking
/// pool. A missing folder should be reported as an error, which the
/// validator treats the same as an empty folder.
pub trait AssetLister: Send + Sync {
    /// List the file names (with extensions) in the given folder,
    /// relative to the project root.
    fn list_files(&self, folder: &str) -> io::Result<Vec<String>>;
}

/// [`AssetLister`] backed by a directory on disk.
pub struct DirectoryAssetLister {
    root: PathBuf,
}

impl DirectoryAssetLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryAssetLister { root: root.into() }
    }
}

impl AssetLister for DirectoryAssetLister {
    fn list_files(&self, folder: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(self.root.join(folder))? {
            let entry = entry?;

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }
}

/// Resolution result for one media item.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaStatus {
    /// Identifier of the media item.
    pub id: ItemId,
    /// Media variant of the item.
    pub kind: MediaKind,
    /// Bare filename the item references.
    pub name: String,
    /// Whether a matching file exists in the asset folder.
    pub is_valid: bool,
}

/// Outcome of one validation request.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationOutcome {
    generation: u64,
    /// One status per media item, in document order.
    pub statuses: Vec<MediaStatus>,
}

/// Asynchronous, cancellable validator of media references.
pub struct MediaValidator {
    lister: Arc<dyn AssetLister>,
    generation: Arc<AtomicU64>,
}

impl MediaValidator {
    pub fn new(lister: Arc<dyn AssetLister>) -> Self {
        MediaValidator {
            lister,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether an outcome is from the latest request.
    ///
    /// Outcomes from superseded requests must be discarded by the caller
    /// instead of being applied out of order.
    pub fn is_current(&self, outcome: &ValidationOutcome) -> bool {
        outcome.generation == self.generation.load(Ordering::SeqCst)
    }

    /// Validate every media item of one knot.
    pub async fn validate_knot(&self, knot: &Knot) -> ValidationOutcome {
        let mut references = Vec::new();
        collect_media(&knot.items, &mut references);

        self.validate(references).await
    }

    /// Validate every media item of the whole document in one request.
    pub async fn validate_document(&self, document: &ParsedInk) -> ValidationOutcome {
        let mut references = Vec::new();

        for knot in &document.knots {
            collect_media(&knot.items, &mut references);
        }

        self.validate(references).await
    }

    async fn validate(&self, references: Vec<MediaReference>) -> ValidationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let needs_images = references.iter().any(|r| !r.kind.is_video());
        let needs_videos = references.iter().any(|r| r.kind.is_video());

        let images = if needs_images {
            self.list_folder(IMAGE_FOLDER).await
        } else {
            Vec::new()
        };
        let videos = if needs_videos {
            self.list_folder(VIDEO_FOLDER).await
        } else {
            Vec::new()
        };

        let statuses = references
            .into_iter()
            .map(|reference| {
                let (files, extensions) = if reference.kind.is_video() {
                    (&videos, VIDEO_EXTENSIONS)
                } else {
                    (&images, IMAGE_EXTENSIONS)
                };

                let is_valid = resolves(&reference.name, files, extensions);

                MediaStatus {
                    id: reference.id,
                    kind: reference.kind,
                    name: reference.name,
                    is_valid,
                }
            })
            .collect();

        ValidationOutcome {
            generation,
            statuses,
        }
    }

    /// List one asset folder on the blocking pool.
    ///
    /// A file system failure, including the folder not existing, is the
    /// same as the folder being empty: every item comes back unresolved.
    async fn list_folder(&self, folder: &str) -> Vec<String> {
        let lister = Arc::clone(&self.lister);
        let folder = folder.to_string();

        tokio::task::spawn_blocking(move || lister.list_files(&folder))
            .await
            .ok()
            .and_then(|listing| listing.ok())
            .unwrap_or_default()
    }
}

struct MediaReference {
    id: ItemId,
    kind: MediaKind,
    name: String,
}

/// Whether a bare filename matches any listed file with a valid extension.
fn resolves(name: &str, files: &[String], extensions: &[&str]) -> bool {
    files.iter().any(|file| {
        let mut parts = file.rsplitn(2, '.');

        let extension = parts.next().unwrap_or("");
        let stem = parts.next().unwrap_or("");

        stem == name && extensions.contains(&extension.to_lowercase().as_str())
    })
}

/// Collect every media item in a content tree, in order.
fn collect_media(items: &[ContentItem], references: &mut Vec<MediaReference>) {
    for item in items {
        match &item.kind {
            ContentKind::Media { kind, name } => references.push(MediaReference {
                id: item.id,
                kind: *kind,
                name: name.clone(),
            }),
            ContentKind::Choice(choice) => collect_media(&choice.nested, references),
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    collect_media(&branch.content, references);
                }
            }
            _ => (),
        }
    }
}
