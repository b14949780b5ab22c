//! Editor session: the use-cases a UI shell calls.
//!
//! A `Session` owns the open tabs, the host ports, the layout config and
//! the current viewport. Each use-case runs synchronously against the active
//! tab and returns the `RenderCommand` the host should draw next, or `None`
//! when nothing visible changed.
//!
//! Every edit of a map is followed by a layout pass, marks its tab dirty and
//! refreshes the window title. Selection changes keep the selected node on
//! screen.

use crate::inline::InlineEditor;
use crate::pointer::{PointerEvent, PointerGesture, PointerOutcome};
use crate::ports::{ConfirmOptions, DialogFilter, Host, PortError, open_filters, save_filters};
use crate::shortcuts::{KeyInput, ShortcutAction, ShortcutMap};
use crate::tabs::{Tab, TabId, Tabs, file_name, format_title};
use mm_core::clock::{Clock, SystemClock};
use mm_core::id::{AnonymousIds, IdSource, NodeId};
use mm_core::layout::{LayoutConfig, compute_layout};
use mm_core::model::{Direction, MapError, MindMap};
use mm_core::viewport::{Point, Viewport, compute_fit_offset, ensure_visible};
use mm_render::hit::hit_test;
use mm_render::surface::Rect;
use std::path::Path;
use thiserror::Error;

/// Label of a node created from the keyboard.
pub const NEW_NODE_CONTENT: &str = "New Node";
/// Title of a tab that has never been saved.
pub const UNTITLED: &str = "Untitled";
/// Icon tag that removes the last icon instead of adding one.
pub const TRASH_ICON: &str = "trash";

const UNSAVED_CHANGES: &str = "Unsaved Changes";
const CLOSE_TAB_PROMPT: &str = "You have unsaved changes. Close this tab?";
const CLOSE_APP_PROMPT: &str = "You have unsaved changes. Are you sure you want to exit?";

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("no tab is open")]
    NoActiveTab,
}

/// Log a failed use-case at the session boundary and hand the error on.
/// Host (port) failures are errors; refused edits are warnings.
fn logged<T, E: Into<EditorError>>(op: &str, result: Result<T, E>) -> Result<T, EditorError> {
    result.map_err(|err| {
        let err = err.into();
        match &err {
            EditorError::Port(_) => log::error!("{op}: {err}"),
            _ => log::warn!("{op}: {err}"),
        }
        err
    })
}

// ─── Results ─────────────────────────────────────────────────────────────

/// What the host should draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub map: MindMap,
    pub offset: Point,
}

impl RenderCommand {
    fn of(tab: &Tab) -> Self {
        Self {
            map: tab.map.clone(),
            offset: tab.offset,
        }
    }
}

pub type Outcome = Result<Option<RenderCommand>, EditorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    Child,
    /// Falls back to `Child` when the root is selected.
    Sibling,
}

// ─── Session ─────────────────────────────────────────────────────────────

pub struct Session<H: Host> {
    host: H,
    tabs: Tabs,
    layout: LayoutConfig,
    viewport: Viewport,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    editor: InlineEditor,
    pointer: PointerGesture,
}

impl<H: Host> Session<H> {
    /// A session with no tabs, wall-clock timestamps and anonymous ids.
    pub fn new(host: H, layout: LayoutConfig, viewport: Viewport) -> Self {
        Self {
            host,
            tabs: Tabs::new(),
            layout,
            viewport,
            clock: Box::new(SystemClock),
            ids: Box::new(AnonymousIds),
            editor: InlineEditor::default(),
            pointer: PointerGesture::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.active()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn editor(&self) -> &InlineEditor {
        &self.editor
    }

    /// What to draw right now.
    pub fn render_command(&self) -> Option<RenderCommand> {
        self.tabs.active().map(RenderCommand::of)
    }

    fn refresh_title(&mut self) {
        let title = format_title(self.tabs.active());
        self.host.set_title(&title);
    }

    /// Lay out a fresh map and fit it into the viewport.
    fn fitted(&self, map: &MindMap) -> (MindMap, Point) {
        let laid = compute_layout(map, &self.layout);
        let offset = compute_fit_offset(&laid, self.viewport, &self.layout);
        (laid, offset)
    }

    // ─── Tabs & files ────────────────────────────────────────────────────

    /// Open a new tab holding a fresh map, fitted and active.
    pub fn new_tab(&mut self, title: &str) -> Outcome {
        let map = MindMap::new(&*self.clock, &mut *self.ids);
        let (map, offset) = self.fitted(&map);
        let id = self.tabs.add(title, None, map, offset, true);
        log::debug!("new tab {id} ({title})");
        self.editor.cancel();
        self.refresh_title();
        Ok(self.tabs.get(id).map(RenderCommand::of))
    }

    /// Activate a tab as it was left: its layout and pan offset are kept.
    /// Unknown tabs are ignored.
    pub fn switch_to(&mut self, id: TabId) -> Outcome {
        if !self.tabs.set_active(id) {
            log::warn!("switch_to: no tab {id}");
            return Ok(None);
        }
        self.editor.cancel();
        self.pointer = PointerGesture::new();
        self.refresh_title();
        Ok(self.tabs.get(id).map(RenderCommand::of))
    }

    /// Open a map file in a new tab, or switch to the tab that already has
    /// it open.
    pub fn open_path(&mut self, path: &Path) -> Outcome {
        if let Some(id) = self.tabs.find_by_path(path) {
            log::debug!("open_path: {} already open in {id}", path.display());
            return self.switch_to(id);
        }
        let map = logged("open_path", self.host.load(path))?;
        let (map, offset) = self.fitted(&map);
        let id = self
            .tabs
            .add(file_name(path), Some(path.to_path_buf()), map, offset, true);
        log::debug!("opened {} in {id}", path.display());
        self.editor.cancel();
        self.refresh_title();
        Ok(self.tabs.get(id).map(RenderCommand::of))
    }

    /// Ask the host for a file to open. Cancelling the dialog does nothing.
    pub fn open_from_dialog(&mut self, filters: &[DialogFilter]) -> Outcome {
        match self.host.pick_open(filters) {
            Some(path) => self.open_path(&path),
            None => Ok(None),
        }
    }

    /// Write a tab to disk. The save dialog is shown for "save as" and for
    /// tabs that have never been saved; cancelling it leaves the tab as is.
    pub fn save(&mut self, id: TabId, save_as: bool, filters: &[DialogFilter]) -> Outcome {
        let Some(tab) = self.tabs.get(id) else {
            return Ok(None);
        };
        let path = match (&tab.file_path, save_as) {
            (Some(path), false) => path.clone(),
            _ => match self.host.pick_save(filters, tab.file_path.as_deref()) {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        let saved = logged("save", self.host.save(&path, &tab.map))?;
        log::debug!("saved {id} to {}", saved.display());
        if let Some(tab) = self.tabs.get_mut(id) {
            tab.title = file_name(&saved);
            tab.file_path = Some(saved);
            tab.is_dirty = false;
        }
        self.refresh_title();
        Ok(None)
    }

    /// Close a tab, asking first when it has unsaved changes. Closing the
    /// last tab opens a fresh untitled one.
    pub fn close_tab(&mut self, id: TabId) -> Outcome {
        let Some(tab) = self.tabs.get(id) else {
            return Ok(None);
        };
        if tab.is_dirty
            && !self
                .host
                .confirm(CLOSE_TAB_PROMPT, &ConfirmOptions::warning(UNSAVED_CHANGES))
        {
            log::debug!("close of {id} cancelled");
            return Ok(None);
        }

        let was_active = self.tabs.active_id() == Some(id);
        self.tabs.close(id);
        log::debug!("closed {id}");

        if self.tabs.is_empty() {
            return self.new_tab(UNTITLED);
        }
        match self.tabs.active_id() {
            Some(next) if was_active => self.switch_to(next),
            _ => {
                self.refresh_title();
                Ok(None)
            }
        }
    }

    /// Whether the app may quit. Asks when any tab is dirty and closes the
    /// window once confirmed.
    pub fn confirm_close_app(&mut self) -> bool {
        let confirmed = !self.tabs.any_dirty()
            || self
                .host
                .confirm(CLOSE_APP_PROMPT, &ConfirmOptions::warning(UNSAVED_CHANGES));
        if confirmed {
            self.host.close();
        }
        confirmed
    }

    // ─── Map edits ───────────────────────────────────────────────────────

    /// Run `edit` on the active tab's map, lay the result out and mark the
    /// tab dirty. With `reveal`, the offset is adjusted so the selected node
    /// stays on screen.
    fn edit_active(
        &mut self,
        op: &str,
        reveal: bool,
        edit: impl FnOnce(&MindMap, &dyn Clock, &mut dyn IdSource) -> Result<MindMap, MapError>,
    ) -> Outcome {
        let tab = logged(op, self.tabs.active_mut().ok_or(EditorError::NoActiveTab))?;
        let edited = logged(op, edit(&tab.map, &*self.clock, &mut *self.ids))?;
        let laid = compute_layout(&edited, &self.layout);
        if reveal {
            tab.offset = ensure_visible(
                &laid,
                tab.offset,
                laid.selected_node_id(),
                self.viewport,
                &self.layout,
            );
        }
        tab.map = laid;
        tab.is_dirty = true;
        let render = RenderCommand::of(tab);
        self.refresh_title();
        Ok(Some(render))
    }

    /// Insert a "New Node" next to or under the selection and select it.
    pub fn add_node(&mut self, mode: NodeMode) -> Outcome {
        self.edit_active("add_node", true, |map, clock, ids| {
            let selected = map.selected_node_id();
            let (next, new_id) = if mode == NodeMode::Sibling && selected != map.root_id() {
                map.add_sibling(selected, NEW_NODE_CONTENT, clock, ids)?
            } else {
                map.add_child(selected, NEW_NODE_CONTENT, clock, ids)?
            };
            next.select_node(new_id)
        })
    }

    /// Delete the selected node and its subtree. The root cannot be removed;
    /// asking to is a no-op.
    pub fn remove_selected(&mut self) -> Outcome {
        let map = &logged("remove_selected", self.tabs.active().ok_or(EditorError::NoActiveTab))?.map;
        if map.selected_node_id() == map.root_id() {
            log::debug!("remove_selected: root is selected, nothing to do");
            return Ok(None);
        }
        self.edit_active("remove_selected", false, |map, _, _| map.remove_node(map.selected_node_id()))
    }

    pub fn rename(&mut self, node: NodeId, content: String) -> Outcome {
        self.edit_active("rename", false, |map, clock, _| map.change_node(node, content, clock))
    }

    /// Add `icon` to the selected node; [`TRASH_ICON`] removes its last icon.
    pub fn update_icon(&mut self, icon: &str) -> Outcome {
        self.edit_active("update_icon", false, |map, clock, _| {
            let selected = map.selected_node_id();
            if icon == TRASH_ICON {
                map.remove_last_icon(selected, clock)
            } else {
                map.add_icon(selected, icon, clock)
            }
        })
    }

    // ─── Selection & view ────────────────────────────────────────────────

    pub fn select(&mut self, node: NodeId) -> Outcome {
        let tab = logged("select", self.tabs.active_mut().ok_or(EditorError::NoActiveTab))?;
        let map = logged("select", tab.map.select_node(node))?;
        tab.offset = ensure_visible(&map, tab.offset, node, self.viewport, &self.layout);
        tab.map = map;
        Ok(Some(RenderCommand::of(tab)))
    }

    pub fn navigate(&mut self, direction: Direction) -> Outcome {
        let tab = logged("navigate", self.tabs.active_mut().ok_or(EditorError::NoActiveTab))?;
        let map = tab.map.navigate(direction);
        tab.offset = ensure_visible(
            &map,
            tab.offset,
            map.selected_node_id(),
            self.viewport,
            &self.layout,
        );
        tab.map = map;
        Ok(Some(RenderCommand::of(tab)))
    }

    pub fn pan_to(&mut self, offset: Point) -> Outcome {
        let tab = logged("pan_to", self.tabs.active_mut().ok_or(EditorError::NoActiveTab))?;
        tab.offset = offset;
        Ok(Some(RenderCommand::of(tab)))
    }

    /// Lay out every tab again (after the measure or viewport changed),
    /// keeping each tab's selection on screen.
    pub fn relayout_all(&mut self) -> Outcome {
        for tab in self.tabs.iter_mut() {
            let laid = compute_layout(&tab.map, &self.layout);
            tab.offset = ensure_visible(
                &laid,
                tab.offset,
                laid.selected_node_id(),
                self.viewport,
                &self.layout,
            );
            tab.map = laid;
        }
        Ok(self.render_command())
    }

    pub fn resize(&mut self, viewport: Viewport) -> Outcome {
        self.viewport = viewport;
        self.relayout_all()
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) -> Outcome {
        self.layout = layout;
        self.relayout_all()
    }

    // ─── Inline editing ──────────────────────────────────────────────────

    /// Open the label editor on the selected node.
    pub fn start_edit(&mut self) -> Result<(), EditorError> {
        let tab = logged("start_edit", self.tabs.active().ok_or(EditorError::NoActiveTab))?;
        let selected = tab.map.selected_node_id();
        self.open_editor(selected)
    }

    fn open_editor(&mut self, node: NodeId) -> Result<(), EditorError> {
        let tab = logged("open_editor", self.tabs.active().ok_or(EditorError::NoActiveTab))?;
        let target = logged("open_editor", tab.map.node(node).ok_or(MapError::NotFound(node)))?;
        let rect = Rect::new(
            target.x + tab.offset.x,
            target.y + tab.offset.y,
            self.layout.node_width(target),
            self.layout.node_height,
        );
        self.editor.open(node, rect, &target.content);
        Ok(())
    }

    /// Replace the text in the open editor.
    pub fn type_text(&mut self, text: &str) {
        self.editor.set_buffer(text);
    }

    /// Write the editor's text to its node and close it.
    pub fn finish_edit(&mut self) -> Outcome {
        match self.editor.commit() {
            Some((node, text)) => self.rename(node, text),
            None => Ok(None),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed a pointer event in canvas coordinates.
    pub fn pointer(&mut self, event: PointerEvent) -> Outcome {
        if matches!(event, PointerEvent::Down { .. }) && self.editor.is_editing() {
            self.finish_edit()?;
        }
        let Some(tab) = self.tabs.active() else {
            return Ok(None);
        };

        let hit = match event {
            PointerEvent::Down { x, y } | PointerEvent::DoubleClick { x, y } => {
                hit_test(&tab.map, tab.offset, Point::new(x, y), &self.layout)
            }
            PointerEvent::Move { .. } | PointerEvent::Up { .. } => None,
        };
        let outcome = self
            .pointer
            .handle(event, hit, tab.map.selected_node_id(), tab.offset);

        match outcome {
            PointerOutcome::Idle => Ok(None),
            PointerOutcome::Select(node) => self.select(node),
            PointerOutcome::Pan(offset) => self.pan_to(offset),
            PointerOutcome::Edit(node) => {
                self.open_editor(node)?;
                Ok(None)
            }
        }
    }

    /// Resolve a key press and run the bound use-case.
    pub fn handle_key(&mut self, input: &KeyInput) -> Outcome {
        let Some(action) = ShortcutMap::resolve(input, self.editor.is_editing()) else {
            return Ok(None);
        };
        log::debug!("key {:?} → {action:?}", input.key);

        match action {
            ShortcutAction::NewTab => self.new_tab(UNTITLED),
            ShortcutAction::CloseTab => match self.tabs.active_id() {
                Some(id) => self.close_tab(id),
                None => Ok(None),
            },
            ShortcutAction::NextTab | ShortcutAction::PrevTab => {
                let step = if action == ShortcutAction::NextTab { 1 } else { -1 };
                match self.tabs.cycle(step) {
                    Some(id) => self.switch_to(id),
                    None => Ok(None),
                }
            }
            ShortcutAction::Save | ShortcutAction::SaveAs => {
                let id = logged("save", self.tabs.active_id().ok_or(EditorError::NoActiveTab))?;
                self.save(id, action == ShortcutAction::SaveAs, &save_filters())
            }
            ShortcutAction::Open => self.open_from_dialog(&open_filters()),
            ShortcutAction::Navigate(direction) => self.navigate(direction),
            ShortcutAction::AddSibling | ShortcutAction::AddChild => {
                let mode = if action == ShortcutAction::AddChild {
                    NodeMode::Child
                } else {
                    NodeMode::Sibling
                };
                let render = self.add_node(mode)?;
                self.start_edit()?;
                Ok(render)
            }
            ShortcutAction::RemoveNode => self.remove_selected(),
            ShortcutAction::Rename => {
                self.start_edit()?;
                Ok(None)
            }
            ShortcutAction::CommitEdit => self.finish_edit(),
            ShortcutAction::CancelEdit => {
                self.cancel_edit();
                Ok(None)
            }
        }
    }
}
