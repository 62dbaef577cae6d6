//! Two-way selection link between table rows and map markers.
//!
//! A row click and a marker click both route through
//! [`SelectionSync::select_project`], so the two views always agree on which
//! project is selected. Highlighting is separate: hovering a marker can
//! highlight it without changing the selection.

use crate::project::{Project, ProjectId};

/// Shared selection state for the table and the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSync {
    selected_id: Option<ProjectId>,
    highlighted_marker: Option<ProjectId>,
}

impl SelectionSync {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected project id.
    #[must_use]
    pub fn selected_id(&self) -> Option<ProjectId> {
        self.selected_id
    }

    /// The highlighted marker id.
    #[must_use]
    pub fn highlighted_marker(&self) -> Option<ProjectId> {
        self.highlighted_marker
    }

    /// Select a project and highlight its marker.
    pub fn select_project(&mut self, id: ProjectId) {
        self.selected_id = Some(id);
        self.highlighted_marker = Some(id);
    }

    /// Clear both the selection and the highlight.
    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.highlighted_marker = None;
    }

    /// Highlight a marker without touching the selection.
    pub fn highlight_marker(&mut self, id: ProjectId) {
        self.highlighted_marker = Some(id);
    }

    /// A table row was clicked.
    pub fn on_row_click(&mut self, project: &Project) {
        self.select_project(project.id);
    }

    /// A map marker was clicked.
    pub fn on_marker_click(&mut self, project: &Project) {
        self.select_project(project.id);
    }

    /// Check whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: ProjectId) -> bool {
        self.selected_id == Some(id)
    }

    /// Check whether `id`'s marker is highlighted.
    #[must_use]
    pub fn is_highlighted(&self, id: ProjectId) -> bool {
        self.highlighted_marker == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{fixtures, ProjectStatus};

    #[test]
    fn test_starts_empty() {
        let sync = SelectionSync::new();
        assert_eq!(sync.selected_id(), None);
        assert_eq!(sync.highlighted_marker(), None);
    }

    #[test]
    fn test_select_sets_both() {
        let mut sync = SelectionSync::new();
        sync.select_project(7);
        assert!(sync.is_selected(7));
        assert!(sync.is_highlighted(7));
    }

    #[test]
    fn test_highlight_keeps_selection() {
        let mut sync = SelectionSync::new();
        sync.select_project(7);
        sync.highlight_marker(9);
        assert_eq!(sync.selected_id(), Some(7));
        assert_eq!(sync.highlighted_marker(), Some(9));
    }

    #[test]
    fn test_clear() {
        let mut sync = SelectionSync::new();
        sync.select_project(7);
        sync.clear_selection();
        assert_eq!(sync, SelectionSync::default());
    }

    #[test]
    fn test_row_and_marker_clicks_converge() {
        let project = fixtures::project(4, "Urban-Pro-004", 22.5, 88.3, ProjectStatus::Active);

        let mut from_table = SelectionSync::new();
        from_table.on_row_click(&project);

        let mut from_map = SelectionSync::new();
        from_map.highlight_marker(1);
        from_map.on_marker_click(&project);

        assert_eq!(from_table, from_map);
        assert_eq!(from_map.selected_id(), Some(4));
    }
}
