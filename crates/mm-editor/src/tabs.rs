//! Open documents.
//!
//! Each tab owns one map and its pan offset. Exactly one tab is active
//! whenever any tab is open.

use mm_core::model::MindMap;
use mm_core::viewport::Point;
use std::fmt;
use std::path::{Path, PathBuf};

/// Window title when no tab is open.
pub const APP_TITLE: &str = "BrainRust";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub file_path: Option<PathBuf>,
    pub is_dirty: bool,
    pub map: MindMap,
    pub offset: Point,
}

/// `"title"`, `"title*"` when dirty, or [`APP_TITLE`] with no tab.
pub fn format_title(tab: Option<&Tab>) -> String {
    match tab {
        None => APP_TITLE.to_string(),
        Some(tab) if tab.is_dirty => format!("{}*", tab.title),
        Some(tab) => tab.title.clone(),
    }
}

/// Last path component, or the whole path if it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Default)]
pub struct Tabs {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
}

impl Tabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab, optionally making it active. The first tab is always
    /// made active.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        file_path: Option<PathBuf>,
        map: MindMap,
        offset: Point,
        activate: bool,
    ) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(Tab {
            id,
            title: title.into(),
            file_path,
            is_dirty: false,
            map,
            offset,
        });
        if activate || self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active(&self) -> Option<&Tab> {
        self.get(self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active?;
        self.get_mut(id)
    }

    /// Returns false (and changes nothing) for an unknown id.
    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Remove a tab. If it was active, the tab that slides into its slot
    /// becomes active, or the one before it when it was last.
    pub fn close(&mut self, id: TabId) -> Option<Tab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        let closed = self.tabs.remove(index);
        if self.active == Some(id) {
            self.active = self
                .tabs
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.tabs.get(i)))
                .map(|t| t.id);
        }
        Some(closed)
    }

    /// Activate the tab `step` positions away from the active one, wrapping
    /// around both ends.
    pub fn cycle(&mut self, step: isize) -> Option<TabId> {
        let len = self.tabs.len() as isize;
        if len == 0 {
            return None;
        }
        let current = self
            .active
            .and_then(|id| self.tabs.iter().position(|t| t.id == id))
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        let id = self.tabs[next].id;
        self.active = Some(id);
        Some(id)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.file_path.as_deref() == Some(path))
            .map(|t| t.id)
    }

    pub fn any_dirty(&self) -> bool {
        self.tabs.iter().any(|t| t.is_dirty)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::SequentialIds;
    use pretty_assertions::assert_eq;

    fn map() -> MindMap {
        MindMap::new(&|| 0u64, &mut SequentialIds::new("tab"))
    }

    fn three() -> (Tabs, [TabId; 3]) {
        let mut tabs = Tabs::new();
        let a = tabs.add("a", None, map(), Point::default(), true);
        let b = tabs.add("b", Some("/maps/b.mm".into()), map(), Point::default(), true);
        let c = tabs.add("c", None, map(), Point::default(), true);
        (tabs, [a, b, c])
    }

    #[test]
    fn title_formatting() {
        assert_eq!(format_title(None), "BrainRust");
        let (mut tabs, [a, ..]) = three();
        assert_eq!(format_title(tabs.get(a)), "a");
        tabs.get_mut(a).unwrap().is_dirty = true;
        assert_eq!(format_title(tabs.get(a)), "a*");
    }

    #[test]
    fn first_tab_is_active_even_without_activate() {
        let mut tabs = Tabs::new();
        let a = tabs.add("a", None, map(), Point::default(), false);
        let _b = tabs.add("b", None, map(), Point::default(), false);
        assert_eq!(tabs.active_id(), Some(a));
    }

    #[test]
    fn closing_active_picks_the_slot_then_the_previous() {
        let (mut tabs, [a, b, c]) = three();
        tabs.set_active(b);
        tabs.close(b);
        assert_eq!(tabs.active_id(), Some(c));
        tabs.close(c);
        assert_eq!(tabs.active_id(), Some(a));
        tabs.close(a);
        assert_eq!(tabs.active_id(), None);
        assert!(tabs.is_empty());
    }

    #[test]
    fn closing_inactive_keeps_active() {
        let (mut tabs, [a, _, c]) = three();
        assert_eq!(tabs.active_id(), Some(c));
        assert_eq!(tabs.close(a).map(|t| t.title), Some("a".to_string()));
        assert_eq!(tabs.active_id(), Some(c));
    }

    #[test]
    fn cycle_wraps() {
        let (mut tabs, [a, b, c]) = three();
        assert_eq!(tabs.cycle(1), Some(a));
        assert_eq!(tabs.cycle(-1), Some(c));
        assert_eq!(tabs.cycle(-1), Some(b));
        assert_eq!(Tabs::new().cycle(1), None);
    }

    #[test]
    fn find_by_path_and_dirty() {
        let (mut tabs, [_, b, c]) = three();
        assert_eq!(tabs.find_by_path(Path::new("/maps/b.mm")), Some(b));
        assert_eq!(tabs.find_by_path(Path::new("/maps/x.mm")), None);
        assert!(!tabs.any_dirty());
        tabs.get_mut(c).unwrap().is_dirty = true;
        assert!(tabs.any_dirty());
    }

    #[test]
    fn file_name_of_path() {
        assert_eq!(file_name(Path::new("/home/u/plan.mm")), "plan.mm");
        assert_eq!(file_name(Path::new("plan.opml")), "plan.opml");
    }
}
