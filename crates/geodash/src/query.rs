//! Global filtering and column sorting.
//!
//! The dashboard keeps a few thousand projects in memory and re-derives the
//! visible rows whenever the settled filter text or the sort model changes.
//! Both steps are pure: the input slice is never reordered.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::project::Project;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Sequential id.
    Id,
    /// Project name.
    ProjectName,
    /// Latitude.
    Latitude,
    /// Longitude.
    Longitude,
    /// Status name.
    Status,
    /// Last-updated timestamp.
    LastUpdated,
}

impl SortField {
    /// The field name used in JSON sort models.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ProjectName => "projectName",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Status => "status",
            Self::LastUpdated => "lastUpdated",
        }
    }

    fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::ProjectName => a.project_name.cmp(&b.project_name),
            Self::Latitude => a.latitude.total_cmp(&b.latitude),
            Self::Longitude => a.longitude.total_cmp(&b.longitude),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// One entry of a sort model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortItem {
    /// Column to sort by.
    pub field: SortField,
    /// Direction.
    pub sort: SortDirection,
}

impl SortItem {
    /// Ascending sort on `field`.
    #[must_use]
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            sort: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    #[must_use]
    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            sort: SortDirection::Desc,
        }
    }
}

/// The table's sort model.
///
/// Several entries may be present, but only the first one is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortModel(Vec<SortItem>);

impl SortModel {
    /// A model that leaves rows in load order.
    #[must_use]
    pub fn unsorted() -> Self {
        Self(Vec::new())
    }

    /// A model with a single entry.
    #[must_use]
    pub fn by(item: SortItem) -> Self {
        Self(vec![item])
    }

    /// A model with the given entries.
    #[must_use]
    pub fn from_items(items: Vec<SortItem>) -> Self {
        Self(items)
    }

    /// The entry that drives sorting, if any.
    #[must_use]
    pub fn primary(&self) -> Option<SortItem> {
        self.0.first().copied()
    }

    /// Check whether the model sorts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<SortItem> for SortModel {
    fn from(item: SortItem) -> Self {
        Self::by(item)
    }
}

/// Check whether a project matches the global filter.
///
/// `needle` is lower-cased and matched as a substring against the name, the
/// status, both coordinates as shortest decimal strings, and the numeric US
/// short date. An empty needle matches everything.
#[must_use]
pub fn matches(project: &Project, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    project.project_name.to_lowercase().contains(&needle)
        || project.status.as_str().to_lowercase().contains(&needle)
        || project.latitude.to_string().contains(&needle)
        || project.longitude.to_string().contains(&needle)
        || project.short_date().contains(&needle)
}

/// Compute the indices of the rows to show, in display order.
#[must_use]
pub fn apply_indices(data: &[Project], needle: &str, sort: &SortModel) -> Vec<usize> {
    let mut indices: Vec<usize> = if needle.is_empty() {
        (0..data.len()).collect()
    } else {
        let needle = needle.to_lowercase();
        data.iter()
            .enumerate()
            .filter(|(_, project)| matches(project, &needle))
            .map(|(index, _)| index)
            .collect()
    };

    if let Some(SortItem { field, sort }) = sort.primary() {
        // sort_by is stable, so ties keep load order in both directions.
        indices.sort_by(|&a, &b| {
            let ordering = field.compare(&data[a], &data[b]);
            match sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    indices
}

/// Filter then sort, returning borrowed rows in display order.
#[must_use]
pub fn apply<'a>(data: &'a [Project], needle: &str, sort: &SortModel) -> Vec<&'a Project> {
    apply_indices(data, needle, sort)
        .into_iter()
        .map(|index| &data[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{fixtures, ProjectStatus};
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Project> {
        let mut projects = vec![
            fixtures::project(1, "Mining-Beta-412", 19.076, 72.8777, ProjectStatus::Completed),
            fixtures::project(2, "Urban-Alpha-009", 28.6139, 77.209, ProjectStatus::Active),
            fixtures::project(3, "Rural-Max-300", 13.0827, 80.2707, ProjectStatus::Pending),
            fixtures::project(4, "GeoSurvey-Pro-128", 22.5726, 88.3639, ProjectStatus::Active),
        ];
        projects[2].last_updated = Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap();
        projects[3].last_updated = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 0).unwrap();
        projects
    }

    fn ids(rows: &[&Project]) -> Vec<u32> {
        rows.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_all_in_load_order() {
        let data = sample();
        assert_eq!(ids(&apply(&data, "", &SortModel::unsorted())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let data = sample();
        assert_eq!(ids(&apply(&data, "mINing", &SortModel::unsorted())), vec![1]);
    }

    #[test]
    fn test_filter_by_status() {
        let data = sample();
        assert_eq!(ids(&apply(&data, "active", &SortModel::unsorted())), vec![2, 4]);
        assert_eq!(ids(&apply(&data, "PEND", &SortModel::unsorted())), vec![3]);
    }

    #[test]
    fn test_filter_by_coordinates() {
        let data = sample();
        assert_eq!(ids(&apply(&data, "28.61", &SortModel::unsorted())), vec![2]);
        assert_eq!(ids(&apply(&data, "88.3639", &SortModel::unsorted())), vec![4]);
    }

    #[test]
    fn test_filter_by_short_date() {
        let data = sample();
        assert_eq!(ids(&apply(&data, "11/2/2023", &SortModel::unsorted())), vec![3]);
        assert_eq!(ids(&apply(&data, "1/15/2024", &SortModel::unsorted())), vec![1, 2]);
    }

    #[test]
    fn test_filter_without_matches() {
        let data = sample();
        assert!(apply(&data, "zzz", &SortModel::unsorted()).is_empty());
    }

    #[test]
    fn test_sort_by_latitude() {
        let data = sample();
        let model = SortModel::by(SortItem::asc(SortField::Latitude));
        assert_eq!(ids(&apply(&data, "", &model)), vec![3, 1, 4, 2]);
        let model = SortModel::by(SortItem::desc(SortField::Latitude));
        assert_eq!(ids(&apply(&data, "", &model)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_by_name() {
        let data = sample();
        let model = SortModel::by(SortItem::asc(SortField::ProjectName));
        assert_eq!(ids(&apply(&data, "", &model)), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sort_by_last_updated() {
        let data = sample();
        let model = SortModel::by(SortItem::desc(SortField::LastUpdated));
        assert_eq!(ids(&apply(&data, "", &model)), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let data = sample();
        let asc = SortModel::by(SortItem::asc(SortField::Status));
        assert_eq!(ids(&apply(&data, "", &asc)), vec![2, 4, 1, 3]);
        let desc = SortModel::by(SortItem::desc(SortField::Status));
        assert_eq!(ids(&apply(&data, "", &desc)), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_only_first_sort_item_applies() {
        let data = sample();
        let model = SortModel::from_items(vec![
            SortItem::desc(SortField::Id),
            SortItem::asc(SortField::Latitude),
        ]);
        assert_eq!(ids(&apply(&data, "", &model)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_filter_then_sort() {
        let data = sample();
        let model = SortModel::by(SortItem::desc(SortField::Longitude));
        assert_eq!(ids(&apply(&data, "a", &model)), vec![4, 3, 2, 1]);
        assert_eq!(ids(&apply(&data, "active", &model)), vec![4, 2]);
    }

    #[test]
    fn test_input_is_not_reordered() {
        let data = sample();
        let before = data.clone();
        let _ = apply(&data, "", &SortModel::by(SortItem::desc(SortField::Id)));
        assert_eq!(data, before);
    }

    #[test]
    fn test_sort_model_json_shape() {
        let model = SortModel::by(SortItem::desc(SortField::LastUpdated));
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"[{"field":"lastUpdated","sort":"desc"}]"#);
        let parsed: SortModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, model);
    }
}
