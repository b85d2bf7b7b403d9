//! Toolkit independent state of the package removal spoke.
//!
//! Both front ends drive the same model: fetch the candidates, toggle rows,
//! push the checked names back when the user leaves the spoke.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::proxy::PackageRemoveProxy;

/// Marker a candidate entry may carry to be checked initially
const PRECHECK_MARKER: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpokeState {
    Uninitialized,
    Ready,
    Applied,
}

/// One checkbox row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone)]
pub struct SpokeModel {
    rows: Vec<PackageRow>,
    state: SpokeState,
}

impl Default for SpokeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpokeModel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            state: SpokeState::Uninitialized,
        }
    }

    /// Fetch the candidates and build the rows
    pub fn initialize(&mut self, proxy: &mut dyn PackageRemoveProxy) -> Result<()> {
        let lines = proxy.lines()?;
        self.load(&lines);
        Ok(())
    }

    /// Build rows from candidate entries.
    ///
    /// `+name` (optionally `+ name`) is checked initially. A repeated name keeps
    /// its first position; the last entry decides whether it is checked.
    /// The service's current selection is not consulted, so applying after
    /// entering the spoke replaces a selection that came from kickstart data.
    pub fn load(&mut self, lines: &[String]) {
        self.rows.clear();
        for line in lines {
            let (name, checked) = match line.strip_prefix(PRECHECK_MARKER) {
                Some(rest) => (rest.trim_start_matches(' '), true),
                None => (line.as_str(), false),
            };

            match self.rows.iter_mut().find(|row| row.name == name) {
                Some(row) => row.checked = checked,
                None => self.rows.push(PackageRow {
                    name: name.to_string(),
                    checked,
                }),
            }
        }
        self.state = SpokeState::Ready;
        debug!("Spoke loaded with {} packages", self.rows.len());
    }

    pub fn state(&self) -> SpokeState {
        self.state
    }

    pub fn rows(&self) -> &[PackageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flip the row at `index`. Returns false if there is no such row.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.checked = !row.checked;
                self.state = SpokeState::Ready;
                true
            }
            None => false,
        }
    }

    pub fn toggle_name(&mut self, name: &str) -> bool {
        match self.rows.iter().position(|row| row.name == name) {
            Some(index) => self.toggle(index),
            None => false,
        }
    }

    /// Checked names in row order
    pub fn checked(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| row.name.clone())
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.checked).count()
    }

    /// Short description shown on the hub
    pub fn status(&self) -> String {
        match self.checked_count() {
            0 => "Select packages, that would be removed in installed system".to_string(),
            n => format!("You selected {} packages", n),
        }
    }

    /// Push the checked names to the service
    pub fn apply(&mut self, proxy: &mut dyn PackageRemoveProxy) -> Result<()> {
        proxy.set_lines(self.checked())?;
        self.state = SpokeState::Applied;
        Ok(())
    }

    pub fn ready(&self) -> bool {
        true
    }

    pub fn completed(&self) -> bool {
        true
    }

    pub fn mandatory(&self) -> bool {
        false
    }

    /// The spoke is offered only when a candidate file exists
    pub fn showable(candidates_path: &Path) -> bool {
        candidates_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory proxy recording what the spoke pushes
    #[derive(Default)]
    struct FakeProxy {
        lines: Vec<String>,
        pushed: Vec<Vec<String>>,
    }

    impl FakeProxy {
        fn with(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                pushed: Vec::new(),
            }
        }
    }

    impl PackageRemoveProxy for FakeProxy {
        fn lines(&mut self) -> Result<Vec<String>> {
            Ok(self.lines.clone())
        }

        fn set_lines(&mut self, names: Vec<String>) -> Result<()> {
            self.pushed.push(names);
            Ok(())
        }
    }

    #[test]
    fn kickstart_selection_is_replaced_on_apply() {
        use crate::kickstart::KickstartDocument;
        use crate::service::PackageRemove;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("removable_pkgs.list");
        std::fs::write(&path, "nano\nvim\n").unwrap();

        let mut service = PackageRemove::with_candidates_path(&path);
        let mut data = KickstartDocument::default();
        data.package_remove_mut().remove = vec!["vim".into()];
        service.process_kickstart(&data);

        let mut spoke = SpokeModel::new();
        spoke.initialize(&mut service).unwrap();
        assert!(spoke.checked().is_empty());
        spoke.apply(&mut service).unwrap();
        assert!(service.selection().is_empty());
    }

    #[test]
    fn initialize_builds_unchecked_rows() {
        let mut proxy = FakeProxy::with(&["bar", "foo"]);
        let mut spoke = SpokeModel::new();
        assert_eq!(spoke.state(), SpokeState::Uninitialized);

        spoke.initialize(&mut proxy).unwrap();
        assert_eq!(spoke.state(), SpokeState::Ready);
        assert_eq!(spoke.len(), 2);
        assert!(spoke.checked().is_empty());
    }

    #[test]
    fn marker_prechecks_and_is_stripped() {
        let mut proxy = FakeProxy::with(&["+ httpd", "+vim", "nano"]);
        let mut spoke = SpokeModel::new();
        spoke.initialize(&mut proxy).unwrap();

        let names: Vec<_> = spoke.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["httpd", "vim", "nano"]);
        assert_eq!(spoke.checked(), vec!["httpd", "vim"]);
    }

    #[test]
    fn duplicate_names_collapse() {
        let mut spoke = SpokeModel::new();
        spoke.load(&["vim".to_string(), "nano".to_string(), "+vim".to_string()]);
        assert_eq!(spoke.len(), 2);
        assert_eq!(spoke.checked(), vec!["vim"]);
    }

    #[test]
    fn toggle_flips_rows() {
        let mut spoke = SpokeModel::new();
        spoke.load(&["a".to_string(), "b".to_string(), "c".to_string()]);

        assert!(spoke.toggle(2));
        assert!(spoke.toggle(0));
        assert_eq!(spoke.checked(), vec!["a", "c"]);

        assert!(spoke.toggle_name("a"));
        assert_eq!(spoke.checked(), vec!["c"]);

        assert!(!spoke.toggle(3));
        assert!(!spoke.toggle_name("zzz"));
    }

    #[test]
    fn status_text() {
        let mut spoke = SpokeModel::new();
        spoke.load(&["a".to_string(), "b".to_string()]);
        assert_eq!(
            spoke.status(),
            "Select packages, that would be removed in installed system"
        );

        spoke.toggle(0);
        spoke.toggle(1);
        assert_eq!(spoke.status(), "You selected 2 packages");
    }

    #[test]
    fn status_does_not_push() {
        let mut proxy = FakeProxy::with(&["a"]);
        let mut spoke = SpokeModel::new();
        spoke.initialize(&mut proxy).unwrap();
        spoke.toggle(0);

        let _ = spoke.status();
        let _ = spoke.status();
        assert!(proxy.pushed.is_empty());
    }

    #[test]
    fn apply_pushes_checked_names_in_row_order() {
        let mut proxy = FakeProxy::with(&["vim", "nano", "httpd"]);
        let mut spoke = SpokeModel::new();
        spoke.initialize(&mut proxy).unwrap();
        spoke.toggle(2);
        spoke.toggle(0);

        spoke.apply(&mut proxy).unwrap();
        assert_eq!(spoke.state(), SpokeState::Applied);
        assert_eq!(proxy.pushed, vec![vec!["vim".to_string(), "httpd".to_string()]]);

        spoke.toggle(1);
        assert_eq!(spoke.state(), SpokeState::Ready);
    }

    #[test]
    fn spoke_properties() {
        let spoke = SpokeModel::new();
        assert!(spoke.ready());
        assert!(spoke.completed());
        assert!(!spoke.mandatory());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("removable_pkgs.list");
        assert!(!SpokeModel::showable(&path));
        std::fs::write(&path, "vim\n").unwrap();
        assert!(SpokeModel::showable(&path));
    }
}
