//! Dashboard shell tying the store, selection, map, and table together.

use std::time::Duration;

use serde::Serialize;

use crate::geo::BoundingBox;
use crate::map::{MapView, Marker, Popup, Viewport};
use crate::project::{Project, ProjectId, ProjectStatus};
use crate::selection::SelectionSync;
use crate::source::ProjectSource;
use crate::store::GeoData;
use crate::table::{self, Pagination, Row};

/// Heading of the page-level error panel.
pub const ERROR_HEADING: &str = "Error loading data";

/// Summary counts shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// All loaded projects, ignoring the filter.
    pub total: usize,
    /// Visible projects with status Active.
    pub active: usize,
    /// Visible projects with status Completed.
    pub completed: usize,
    /// Visible projects with status Pending.
    pub pending: usize,
}

impl DashboardStats {
    /// Count statuses over the visible `rows`; `total` is the unfiltered size.
    #[must_use]
    pub fn compute(rows: &[&Project], total: usize) -> Self {
        rows.iter().fold(
            Self {
                total,
                ..Self::default()
            },
            |mut stats, project| {
                match project.status {
                    ProjectStatus::Active => stats.active += 1,
                    ProjectStatus::Completed => stats.completed += 1,
                    ProjectStatus::Pending => stats.pending += 1,
                }
                stats
            },
        )
    }
}

impl std::fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Projects: {}", self.total)?;
        writeln!(f, "Active:         {}", self.active)?;
        writeln!(f, "Completed:      {}", self.completed)?;
        write!(f, "Pending:        {}", self.pending)
    }
}

/// Text of the page-level error panel.
#[must_use]
pub fn error_panel(message: &str) -> String {
    format!("{ERROR_HEADING}\n{message}")
}

/// Everything the dashboard page holds.
#[derive(Debug)]
pub struct Dashboard {
    store: GeoData,
    selection: SelectionSync,
    map: MapView,
    pagination: Pagination,
}

impl Dashboard {
    /// Load the data and build the dashboard around it.
    pub async fn load(
        source: &dyn ProjectSource,
        debounce: Duration,
        bounds: BoundingBox,
        pagination: Pagination,
    ) -> Self {
        Self {
            store: GeoData::load(source, debounce).await,
            selection: SelectionSync::new(),
            map: MapView::new(bounds),
            pagination,
        }
    }

    /// The data store.
    #[must_use]
    pub fn store(&self) -> &GeoData {
        &self.store
    }

    /// Mutable access to the data store.
    pub fn store_mut(&mut self) -> &mut GeoData {
        &mut self.store
    }

    /// The shared selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSync {
        &self.selection
    }

    /// The map view.
    #[must_use]
    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Current pagination.
    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Mutable pagination.
    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    /// The error panel text when the load failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.store.error().map(error_panel)
    }

    /// Recompute rows and keep the page in range.
    pub fn refresh(&mut self) {
        self.store.refresh();
        self.pagination.clamp(self.store.filtered_count());
    }

    /// Stats over the current rows.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.store.rows(), self.store.total_count())
    }

    /// Table rows on the current page.
    #[must_use]
    pub fn table_rows(&self) -> Vec<Row> {
        table::page_rows(&self.store.rows(), &self.pagination, &self.selection)
    }

    /// Markers for every visible row.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        self.map.markers(&self.store.rows(), &self.selection)
    }

    /// Popup for the selected project, if it is visible.
    #[must_use]
    pub fn popup(&self) -> Option<Popup> {
        let id = self.selection.selected_id()?;
        self.store
            .rows()
            .into_iter()
            .find(|p| p.id == id)
            .map(Popup::for_project)
    }

    /// Filter summary label.
    #[must_use]
    pub fn summary(&self) -> String {
        table::summary_label(self.store.filtered_count(), self.store.total_count())
    }

    /// Select a project and re-centre the map on it.
    ///
    /// Returns the new viewport if the project is visible.
    pub fn select(&mut self, id: ProjectId) -> Option<Viewport> {
        self.selection.select_project(id);
        self.map.focus(&self.selection, &self.store.rows())
    }

    /// A table row was clicked.
    pub fn on_row_click(&mut self, id: ProjectId) -> Option<Viewport> {
        let project = self.store.project(id)?;
        self.selection.on_row_click(project);
        self.map.focus(&self.selection, &self.store.rows())
    }

    /// A map marker was clicked.
    pub fn on_marker_click(&mut self, id: ProjectId) -> Option<Viewport> {
        let project = self.store.project(id)?;
        self.selection.on_marker_click(project);
        self.map.focus(&self.selection, &self.store.rows())
    }

    /// Highlight a marker without selecting it.
    pub fn on_marker_hover(&mut self, id: ProjectId) {
        self.selection.highlight_marker(id);
    }

    /// Clear the selection and fit the map back to its bounds.
    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
        self.map.reset();
    }
}
