//! Collaborators the session talks to but does not implement: file
//! persistence, native dialogs, and the host window.

use mm_core::model::MindMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("cannot access {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
    #[error("unsupported map format: {0}")]
    Format(String),
    #[error("{0}")]
    Other(String),
}

/// Reads and writes map files.
pub trait Persistence {
    fn load(&mut self, path: &Path) -> Result<MindMap, PortError>;

    /// Write `map` to `path`. Returns the path actually written, which may
    /// differ (an added extension, a normalised location).
    fn save(&mut self, path: &Path, map: &MindMap) -> Result<PathBuf, PortError>;
}

/// A named group of file extensions offered by a file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl DialogFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Filters for opening any supported map format.
pub fn open_filters() -> Vec<DialogFilter> {
    let mut filters = vec![DialogFilter::new(
        "MindMap Files",
        &["mm", "xmind", "opml", "mmap", "mindnode", "smmx"],
    )];
    filters.extend(save_filters());
    filters
}

/// One filter per writable format.
pub fn save_filters() -> Vec<DialogFilter> {
    vec![
        DialogFilter::new("FreeMind", &["mm"]),
        DialogFilter::new("XMind", &["xmind"]),
        DialogFilter::new("OPML", &["opml"]),
        DialogFilter::new("MindManager", &["mmap"]),
        DialogFilter::new("MindNode", &["mindnode"]),
        DialogFilter::new("SimpleMind", &["smmx"]),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub title: String,
    pub kind: DialogKind,
}

impl ConfirmOptions {
    pub fn warning(title: &str) -> Self {
        Self {
            title: title.to_string(),
            kind: DialogKind::Warning,
        }
    }
}

/// Native file pickers and message boxes. `None` / `false` mean the user
/// cancelled.
pub trait Dialogs {
    fn pick_open(&mut self, filters: &[DialogFilter]) -> Option<PathBuf>;
    fn pick_save(&mut self, filters: &[DialogFilter], default: Option<&Path>) -> Option<PathBuf>;
    fn confirm(&mut self, message: &str, options: &ConfirmOptions) -> bool;
}

/// The window hosting the canvas.
pub trait Window {
    fn set_title(&mut self, title: &str);
    fn close(&mut self);
}

/// Everything a session needs from its host, in one value.
pub trait Host: Persistence + Dialogs + Window {}

impl<T: Persistence + Dialogs + Window> Host for T {}
