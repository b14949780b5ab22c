pub mod inline;
pub mod pointer;
pub mod ports;
pub mod session;
pub mod shortcuts;
pub mod tabs;

pub use inline::InlineEditor;
pub use pointer::{PointerEvent, PointerGesture, PointerOutcome};
pub use ports::{
    ConfirmOptions, DialogFilter, DialogKind, Dialogs, Host, Persistence, PortError, Window,
    open_filters, save_filters,
};
pub use session::{EditorError, NodeMode, Outcome, RenderCommand, Session};
pub use shortcuts::{KeyInput, ShortcutAction, ShortcutMap};
pub use tabs::{APP_TITLE, Tab, TabId, Tabs, format_title};
