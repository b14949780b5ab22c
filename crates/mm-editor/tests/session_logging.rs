//! Integration tests: failed use-cases are logged where the session returns
//! them.

use log::{Level, LevelFilter, Log, Metadata, Record};
use mm_core::layout::LayoutConfig;
use mm_core::model::MindMap;
use mm_core::viewport::Viewport;
use mm_editor::ports::{ConfirmOptions, DialogFilter, Dialogs, Persistence, PortError, Window};
use mm_editor::session::{NodeMode, Session};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ─── Capturing logger ────────────────────────────────────────────────────

struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata())
            && let Ok(mut records) = self.records.lock()
        {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

/// Install the capturing logger (once per test binary) and drain what it
/// has seen so far.
fn drain() -> Vec<(Level, String)> {
    if log::set_logger(&CAPTURE).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
    CAPTURE
        .records
        .lock()
        .map(|mut records| std::mem::take(&mut *records))
        .unwrap_or_default()
}

// ─── Host that cannot touch files ────────────────────────────────────────

struct NoFiles;

impl Persistence for NoFiles {
    fn load(&mut self, path: &Path) -> Result<MindMap, PortError> {
        Err(PortError::Io {
            path: path.to_path_buf(),
            reason: "denied".into(),
        })
    }

    fn save(&mut self, path: &Path, _map: &MindMap) -> Result<PathBuf, PortError> {
        Err(PortError::Io {
            path: path.to_path_buf(),
            reason: "denied".into(),
        })
    }
}

impl Dialogs for NoFiles {
    fn pick_open(&mut self, _filters: &[DialogFilter]) -> Option<PathBuf> {
        None
    }

    fn pick_save(&mut self, _filters: &[DialogFilter], _default: Option<&Path>) -> Option<PathBuf> {
        None
    }

    fn confirm(&mut self, _message: &str, _options: &ConfirmOptions) -> bool {
        true
    }
}

impl Window for NoFiles {
    fn set_title(&mut self, _title: &str) {}
    fn close(&mut self) {}
}

// Single test: the logger is process-global.
#[test]
fn failures_are_logged_at_the_session_boundary() {
    drain();
    let mut s = Session::new(NoFiles, LayoutConfig::default(), Viewport::default());

    assert!(s.add_node(NodeMode::Child).is_err());
    assert_eq!(
        drain(),
        vec![(Level::Warn, "add_node: no tab is open".to_string())]
    );

    assert!(s.open_path(Path::new("/maps/locked.mm")).is_err());
    assert_eq!(
        drain(),
        vec![(
            Level::Error,
            "open_path: cannot access /maps/locked.mm: denied".to_string()
        )]
    );

    // Cancelled or refused-but-harmless paths stay quiet.
    s.new_tab("Untitled").unwrap();
    assert_eq!(s.remove_selected().unwrap(), None);
    assert_eq!(drain(), Vec::new());
}
