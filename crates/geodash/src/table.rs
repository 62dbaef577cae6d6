//! Project table: columns, row formatting, pagination, and terminal output.

use std::io::Write;
use std::ops::Range;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::project::{Project, ProjectId};
use crate::query::SortField;
use crate::selection::SelectionSync;

/// Page sizes the table offers.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [25, 50, 100];

/// Initial page size.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field the column shows and sorts by.
    pub field: SortField,
    /// Header text.
    pub header: &'static str,
    /// Minimum width in characters for text output.
    pub width: usize,
}

/// Table columns in display order.
pub const COLUMNS: [Column; 6] = [
    Column {
        field: SortField::Id,
        header: "ID",
        width: 5,
    },
    Column {
        field: SortField::ProjectName,
        header: "Project Name",
        width: 26,
    },
    Column {
        field: SortField::Latitude,
        header: "Latitude",
        width: 12,
    },
    Column {
        field: SortField::Longitude,
        header: "Longitude",
        width: 12,
    },
    Column {
        field: SortField::Status,
        header: "Status",
        width: 10,
    },
    Column {
        field: SortField::LastUpdated,
        header: "Last Updated",
        width: 12,
    },
];

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    /// Create pagination at a zero-based `page`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPageSize`] if `page_size` is not one of
    /// [`PAGE_SIZE_OPTIONS`].
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Self { page, page_size })
    }

    /// Zero-based page index.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and go back to the first page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPageSize`] for sizes outside the options.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        *self = Self::new(0, page_size)?;
        Ok(())
    }

    /// Move to `page`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Number of pages for `rows` rows; at least one.
    #[must_use]
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    /// Pull the page back onto the last page if `rows` shrank.
    pub fn clamp(&mut self, rows: usize) {
        self.page = self.page.min(self.page_count(rows) - 1);
    }

    /// Row range for the current page, after clamping.
    #[must_use]
    pub fn range(&self, rows: usize) -> Range<usize> {
        let page = self.page.min(self.page_count(rows) - 1);
        let start = (page * self.page_size).min(rows);
        let end = (start + self.page_size).min(rows);
        start..end
    }

    /// The slice of `rows` on the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A project formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Project id.
    pub id: ProjectId,
    /// Project name.
    pub project_name: String,
    /// Latitude with six decimals and a degree sign.
    pub latitude: String,
    /// Longitude with six decimals and a degree sign.
    pub longitude: String,
    /// Status name.
    pub status: String,
    /// Status colour.
    pub status_color: &'static str,
    /// `Mon D, YYYY`.
    pub last_updated: String,
    /// Whether the row is selected.
    pub selected: bool,
}

impl Row {
    /// Format a project.
    #[must_use]
    pub fn new(project: &Project, selected: bool) -> Self {
        Self {
            id: project.id,
            project_name: project.project_name.clone(),
            latitude: format_coordinate(project.latitude),
            longitude: format_coordinate(project.longitude),
            status: project.status.to_string(),
            status_color: project.status.color(),
            last_updated: project.display_date(),
            selected,
        }
    }

    fn cells(&self) -> [String; 6] {
        [
            self.id.to_string(),
            self.project_name.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
            self.status.clone(),
            self.last_updated.clone(),
        ]
    }
}

/// Format a coordinate as `12.345678°`.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}°")
}

/// The filter summary shown under the table.
#[must_use]
pub fn summary_label(filtered: usize, total: usize) -> String {
    format!("{filtered} of {total} projects")
}

/// Rows on the current page, formatted.
#[must_use]
pub fn page_rows(rows: &[&Project], pagination: &Pagination, selection: &SelectionSync) -> Vec<Row> {
    pagination
        .slice(rows)
        .iter()
        .map(|project| Row::new(project, selection.is_selected(project.id)))
        .collect()
}

/// Write the current page as a fixed-width text table.
///
/// The selected row is prefixed with `>`; a footer shows the page and the
/// filter summary.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render<W: Write>(
    out: &mut W,
    rows: &[&Project],
    total: usize,
    pagination: &Pagination,
    selection: &SelectionSync,
) -> Result<()> {
    let header: Vec<String> = COLUMNS
        .iter()
        .map(|c| format!("{:<width$}", c.header, width = c.width))
        .collect();
    writeln!(out, "  {}", header.join(" ").trim_end())?;
    let rule: usize = COLUMNS.iter().map(|c| c.width + 1).sum();
    writeln!(out, "  {}", "-".repeat(rule - 1))?;

    let page = page_rows(rows, pagination, selection);
    if page.is_empty() {
        writeln!(out, "  No projects match the current filter.")?;
    }
    for row in &page {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, c)| format!("{cell:<width$}", width = c.width))
            .collect();
        let mark = if row.selected { '>' } else { ' ' };
        writeln!(out, "{mark} {}", cells.join(" ").trim_end())?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Page {} of {} | {}",
        pagination.page().min(pagination.page_count(rows.len()) - 1) + 1,
        pagination.page_count(rows.len()),
        summary_label(rows.len(), total)
    )?;
    Ok(())
}
