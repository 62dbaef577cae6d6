//! Map view model: markers, popups, and the viewport.
//!
//! The map starts fitted to its bounds (which are also the pan limits) and
//! re-centres on the selected project whenever the selection points at a
//! project present in the current rows.

use serde::Serialize;

use crate::geo::{BoundingBox, LatLng};
use crate::project::{Project, ProjectId};
use crate::selection::SelectionSync;

/// Zoom level used when focusing a selected project.
pub const SELECTION_ZOOM: u8 = 12;

/// Marker size in pixels for a regular project.
pub const MARKER_SIZE: u16 = 25;

/// Marker size in pixels for the selected project.
pub const SELECTED_MARKER_SIZE: u16 = 35;

/// What part of the map is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Viewport {
    /// Fit the whole bounding box.
    FitBounds {
        /// The box to fit.
        bounds: BoundingBox,
    },
    /// Centre on a point at a fixed zoom.
    Centered {
        /// Map centre.
        center: LatLng,
        /// Zoom level.
        zoom: u8,
    },
}

/// A project marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Project id.
    pub id: ProjectId,
    /// Marker latitude.
    pub latitude: f64,
    /// Marker longitude.
    pub longitude: f64,
    /// Fill colour derived from the status.
    pub color: &'static str,
    /// Whether this is the selected project.
    pub selected: bool,
    /// Icon size in pixels.
    pub size: u16,
}

impl Marker {
    /// Build the marker for a project.
    #[must_use]
    pub fn for_project(project: &Project, selected: bool) -> Self {
        Self {
            id: project.id,
            latitude: project.latitude,
            longitude: project.longitude,
            color: project.status.color(),
            selected,
            size: if selected {
                SELECTED_MARKER_SIZE
            } else {
                MARKER_SIZE
            },
        }
    }
}

/// The popup shown when a marker is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Project name.
    pub title: String,
    /// Status name.
    pub status: String,
    /// Status colour for the badge.
    pub status_color: &'static str,
    /// `lat, lon` with six decimals.
    pub location: String,
    /// `Mon D, YYYY`.
    pub last_updated: String,
}

impl Popup {
    /// Build the popup for a project.
    #[must_use]
    pub fn for_project(project: &Project) -> Self {
        Self {
            title: project.project_name.clone(),
            status: project.status.to_string(),
            status_color: project.status.color(),
            location: format!("{:.6}, {:.6}", project.latitude, project.longitude),
            last_updated: project.display_date(),
        }
    }
}

impl std::fmt::Display for Popup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.status)?;
        writeln!(f, "  Location:     {}", self.location)?;
        write!(f, "  Last Updated: {}", self.last_updated)
    }
}

/// Map state.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    bounds: BoundingBox,
    viewport: Viewport,
}

impl MapView {
    /// Create a map fitted to `bounds`.
    #[must_use]
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            viewport: Viewport::FitBounds { bounds },
        }
    }

    /// The pan limits.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Centre on the selected project if it is among `rows`.
    ///
    /// Returns the new viewport. An empty selection or an id that is not in
    /// `rows` leaves the viewport unchanged and returns `None`.
    pub fn focus(&mut self, selection: &SelectionSync, rows: &[&Project]) -> Option<Viewport> {
        let id = selection.selected_id()?;
        let project = rows.iter().find(|p| p.id == id)?;
        self.viewport = Viewport::Centered {
            center: self.clamp(project.location()),
            zoom: SELECTION_ZOOM,
        };
        Some(self.viewport)
    }

    /// Go back to fitting the bounds.
    pub fn reset(&mut self) {
        self.viewport = Viewport::FitBounds {
            bounds: self.bounds,
        };
    }

    /// Markers for `rows`, with the selected project flagged.
    #[must_use]
    pub fn markers(&self, rows: &[&Project], selection: &SelectionSync) -> Vec<Marker> {
        rows.iter()
            .map(|project| Marker::for_project(project, selection.is_selected(project.id)))
            .collect()
    }

    // `f64::clamp` panics on inverted or NaN limits, which `new` accepts.
    fn clamp(&self, point: LatLng) -> LatLng {
        LatLng::new(
            point.lat.max(self.bounds.south).min(self.bounds.north),
            point.lng.max(self.bounds.west).min(self.bounds.east),
        )
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(BoundingBox::INDIA)
    }
}
