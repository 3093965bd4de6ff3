//! `src/store/navigator.rs`
//! ============================================================================
//! # Path Navigator: what the user sees right now
//!
//! Read-side views over the entity store plus the session-state setters that
//! drive them (current path, search text, view mode, selection).
//!
//! Search is global: a non-empty query matches names across every path, not
//! just the current directory.

use compact_str::CompactString;
use serde::Serialize;
use tracing::debug;

use crate::model::{
    records::{EntityId, FileRecord, FolderRecord},
    ui_state::ViewMode,
    vpath::VirtualPath,
};
use crate::store::{backend::KeyValueBackend, entity_store::EntityStore};

pub const HOME_CRUMB: &str = "Home";

/// One row of a listing. Folders always precede files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListedItem<'a> {
    Folder(&'a FolderRecord),
    File(&'a FileRecord),
}

impl<'a> ListedItem<'a> {
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match *self {
            Self::Folder(f) => f.id,
            Self::File(f) => f.id,
        }
    }

    /// Borrows from the store, not from the listing.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Folder(f) => f.name.as_str(),
            Self::File(f) => f.name.as_str(),
        }
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: CompactString,
    pub path: VirtualPath,
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

impl<B: KeyValueBackend> EntityStore<B> {
    /// Folders then non-trashed files, either in the current directory or,
    /// while a search query is set, anywhere whose name matches it.
    #[must_use]
    pub fn current_items(&self) -> Vec<ListedItem<'_>> {
        let folders = self.folders.iter();
        let files = self.files.iter().filter(|f| !f.trashed);

        if self.ui.is_searching() {
            let needle = self.ui.search_query.to_lowercase();

            folders
                .filter(|f| name_matches(&f.name, &needle))
                .map(ListedItem::Folder)
                .chain(
                    files
                        .filter(|f| name_matches(&f.name, &needle))
                        .map(ListedItem::File),
                )
                .collect()
        } else {
            let cwd = &self.ui.current_path;

            folders
                .filter(|f| &f.path == cwd)
                .map(ListedItem::Folder)
                .chain(files.filter(|f| &f.path == cwd).map(ListedItem::File))
                .collect()
        }
    }

    pub fn navigate_to(&mut self, path: VirtualPath) {
        debug!("Navigate {} -> {}", self.ui.current_path, path);
        self.ui.navigate(path);
    }

    /// Enter a folder by id. Returns false if no such folder.
    pub fn open_folder(&mut self, id: EntityId) -> bool {
        let Some(target) = self.folder(id).map(FolderRecord::full_path) else {
            return false;
        };
        self.navigate_to(target);
        true
    }

    /// Go to the parent directory. Root stays root.
    pub fn navigate_up(&mut self) {
        if let Some(parent) = self.ui.current_path.parent() {
            self.navigate_to(parent);
        }
    }

    /// Home first, then one crumb per segment with its cumulative path.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            name: CompactString::const_new(HOME_CRUMB),
            path: VirtualPath::root(),
        }];

        let mut prefix = VirtualPath::root();
        for segment in self.ui.current_path.segments() {
            prefix = prefix.join(segment);
            crumbs.push(Breadcrumb {
                name: CompactString::from(segment),
                path: prefix.clone(),
            });
        }

        crumbs
    }

    /// Files in the trash, in insertion order.
    #[must_use]
    pub fn trashed_files(&self) -> Vec<&FileRecord> {
        self.files.iter().filter(|f| f.trashed).collect()
    }

    /// Starred files that are not in the trash.
    #[must_use]
    pub fn starred_files(&self) -> Vec<&FileRecord> {
        self.files
            .iter()
            .filter(|f| f.starred && !f.trashed)
            .collect()
    }

    /// Non-trashed files at or beneath `path`.
    #[must_use]
    pub fn files_under(&self, path: &VirtualPath) -> Vec<&FileRecord> {
        self.files
            .iter()
            .filter(|f| !f.trashed && f.path.starts_with(path))
            .collect()
    }

    pub fn set_search_query(&mut self, query: impl Into<CompactString>) {
        self.ui.search_query = query.into();
    }

    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.ui.view_mode = mode;
    }

    pub const fn toggle_view_mode(&mut self) -> ViewMode {
        self.ui.view_mode = self.ui.view_mode.toggled();
        self.ui.view_mode
    }

    pub fn select(&mut self, id: EntityId) {
        self.ui.selected.insert(id);
    }

    pub fn deselect(&mut self, id: EntityId) {
        self.ui.selected.remove(&id);
    }

    pub fn toggle_selection(&mut self, id: EntityId) -> bool {
        self.ui.toggle_selected(id)
    }

    /// Select everything `current_items` would show.
    pub fn select_all_current(&mut self) {
        let ids: Vec<EntityId> = self.current_items().iter().map(ListedItem::id).collect();
        self.ui.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.ui.selected.clear();
    }

    /// Selected ids that refer to files (folders are skipped).
    #[must_use]
    pub fn selected_files(&self) -> Vec<&FileRecord> {
        self.files
            .iter()
            .filter(|f| self.ui.is_selected(&f.id))
            .collect()
    }

    #[must_use]
    pub fn selected_size(&self) -> u64 {
        self.selected_files()
            .iter()
            .map(|f| f.size)
            .fold(0, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{backend::MemoryBackend, mutations::UploadSource};

    fn path(s: &str) -> VirtualPath {
        VirtualPath::parse(s).unwrap()
    }

    fn upload(store: &mut EntityStore<MemoryBackend>, name: &str, at: &str) -> FileRecord {
        store
            .upload_file(UploadSource::from_bytes(name, vec![0u8; 10]), path(at))
            .unwrap()
    }

    #[test]
    fn test_report_and_work_scenario() {
        let mut store = EntityStore::open(MemoryBackend::new());
        store
            .upload_file(
                UploadSource::new("report.pdf", "application/pdf", vec![0u8; 1000]),
                VirtualPath::root(),
            )
            .unwrap();
        store.create_folder("Work", VirtualPath::root()).unwrap();
        store.navigate_to(VirtualPath::root());

        let items = store.current_items();
        let names: Vec<&str> = items.iter().map(ListedItem::name).collect();
        assert_eq!(names, vec!["Work", "report.pdf"]);
        assert!(items[0].is_folder());
        assert!(!items[1].is_folder());
    }

    #[test]
    fn test_listing_is_scoped_and_hides_trash() {
        let mut store = EntityStore::open(MemoryBackend::new());
        let keep = upload(&mut store, "a.txt", "/docs");
        let gone = upload(&mut store, "b.txt", "/docs");
        upload(&mut store, "c.txt", "/");
        store.create_folder("inner", path("/docs")).unwrap();
        store.create_folder("elsewhere", path("/")).unwrap();
        store.delete_file(gone.id).unwrap();

        store.navigate_to(path("/docs"));
        let names: Vec<&str> = store.current_items().iter().map(ListedItem::name).collect();
        assert_eq!(names, vec!["inner", keep.name.as_str()]);
    }

    #[test]
    fn test_search_is_global_and_case_insensitive() {
        let mut store = EntityStore::open(MemoryBackend::new());
        upload(&mut store, "Quarterly-REPORT.pdf", "/work/2024");
        upload(&mut store, "report-draft.txt", "/");
        let trashed = upload(&mut store, "old report.txt", "/");
        upload(&mut store, "holiday.png", "/");
        store.create_folder("Reports", path("/archive")).unwrap();
        store.delete_file(trashed.id).unwrap();

        store.navigate_to(path("/somewhere/else"));
        store.set_search_query("RePoRt");

        let names: Vec<&str> = store.current_items().iter().map(ListedItem::name).collect();
        assert_eq!(
            names,
            vec!["Reports", "Quarterly-REPORT.pdf", "report-draft.txt"]
        );

        store.set_search_query("");
        assert!(store.current_items().is_empty());
    }

    #[test]
    fn test_breadcrumbs() {
        let mut store = EntityStore::open(MemoryBackend::new());
        store.navigate_to(path("/a/b"));

        let crumbs = store.breadcrumbs();
        let pairs: Vec<(&str, &str)> = crumbs
            .iter()
            .map(|c| (c.name.as_str(), c.path.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Home", "/"), ("a", "/a"), ("b", "/a/b")]);

        store.navigate_to(VirtualPath::root());
        assert_eq!(store.breadcrumbs().len(), 1);
    }

    #[test]
    fn test_open_folder_and_navigate_up() {
        let mut store = EntityStore::open(MemoryBackend::new());
        let work = store.create_folder("Work", VirtualPath::root()).unwrap();
        let file = upload(&mut store, "x.txt", "/");
        store.select(file.id);

        assert!(store.open_folder(work.id));
        assert_eq!(store.ui().current_path.as_str(), "/Work");
        assert!(store.ui().selected.is_empty());

        store.navigate_up();
        assert_eq!(store.ui().current_path, VirtualPath::root());
        store.navigate_up();
        assert_eq!(store.ui().current_path, VirtualPath::root());

        assert!(!store.open_folder(EntityId::new()));
    }

    #[test]
    fn test_trash_and_starred_views() {
        let mut store = EntityStore::open(MemoryBackend::new());
        let a = upload(&mut store, "a.txt", "/");
        let b = upload(&mut store, "b.txt", "/");
        store.toggle_starred(a.id).unwrap();
        store.toggle_starred(b.id).unwrap();
        store.delete_file(b.id).unwrap();

        let starred: Vec<EntityId> = store.starred_files().iter().map(|f| f.id).collect();
        let trashed: Vec<EntityId> = store.trashed_files().iter().map(|f| f.id).collect();
        assert_eq!(starred, vec![a.id]);
        assert_eq!(trashed, vec![b.id]);
    }

    #[test]
    fn test_files_under() {
        let mut store = EntityStore::open(MemoryBackend::new());
        upload(&mut store, "a.txt", "/work");
        upload(&mut store, "b.txt", "/work/deep");
        upload(&mut store, "c.txt", "/workshop");

        assert_eq!(store.files_under(&path("/work")).len(), 2);
        assert_eq!(store.files_under(&VirtualPath::root()).len(), 3);
    }

    #[test]
    fn test_selection_helpers() {
        let mut store = EntityStore::open(MemoryBackend::new());
        let a = upload(&mut store, "a.txt", "/");
        upload(&mut store, "b.txt", "/");
        store.create_folder("dir", VirtualPath::root()).unwrap();

        store.select_all_current();
        assert_eq!(store.ui().selected.len(), 3);
        assert_eq!(store.selected_files().len(), 2);
        assert_eq!(store.selected_size(), 20);

        store.deselect(a.id);
        assert_eq!(store.selected_size(), 10);
        assert!(store.toggle_selection(a.id));

        store.clear_selection();
        assert!(store.ui().selected.is_empty());
    }

    #[test]
    fn test_view_mode_toggle() {
        let mut store = EntityStore::open(MemoryBackend::new()).with_view_mode(ViewMode::List);
        assert_eq!(store.toggle_view_mode(), ViewMode::Grid);
        store.set_view_mode(ViewMode::List);
        assert_eq!(store.ui().view_mode, ViewMode::List);
    }
}
