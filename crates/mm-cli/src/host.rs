//! Host for runs without a window: no dialogs, no files, titles go to the log.

use mm_core::model::MindMap;
use mm_editor::ports::{ConfirmOptions, DialogFilter, Dialogs, Persistence, PortError, Window};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct HeadlessHost {
    title: String,
}

impl HeadlessHost {
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Persistence for HeadlessHost {
    fn load(&mut self, path: &Path) -> Result<MindMap, PortError> {
        Err(PortError::Format(format!(
            "{}: the headless driver cannot read map files",
            path.display()
        )))
    }

    fn save(&mut self, path: &Path, _map: &MindMap) -> Result<PathBuf, PortError> {
        Err(PortError::Format(format!(
            "{}: the headless driver cannot write map files",
            path.display()
        )))
    }
}

impl Dialogs for HeadlessHost {
    fn pick_open(&mut self, _filters: &[DialogFilter]) -> Option<PathBuf> {
        None
    }

    fn pick_save(&mut self, _filters: &[DialogFilter], _default: Option<&Path>) -> Option<PathBuf> {
        None
    }

    /// Nobody to ask; proceed.
    fn confirm(&mut self, message: &str, options: &ConfirmOptions) -> bool {
        log::info!("{}: {message} (auto-confirmed)", options.title);
        true
    }
}

impl Window for HeadlessHost {
    fn set_title(&mut self, title: &str) {
        log::info!("title: {title}");
        self.title = title.to_string();
    }

    fn close(&mut self) {
        log::info!("window closed");
    }
}
