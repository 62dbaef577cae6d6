//! Core project types for geodash.
//!
//! A [`Project`] is a synthetic record with geographic coordinates and a
//! lifecycle status. Records are immutable once generated; the JSON layout
//! matches what the dashboard front end consumes (`projectName`,
//! `lastUpdated`, ...).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geo::LatLng;

/// Sequential project identifier, starting at 1.
pub type ProjectId = u32;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Work is ongoing.
    Active,
    /// Work has finished.
    Completed,
    /// Work has not started yet.
    Pending,
}

impl ProjectStatus {
    /// Every status, in generation order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Completed, Self::Pending];

    /// The status name as it appears in JSON and in the table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Pending => "Pending",
        }
    }

    /// Chip and marker colour for this status.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Active => "#4ade80",
            Self::Completed => "#06b6d4",
            Self::Pending => "#f59e0b",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

/// A synthetic geo project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Sequential identifier.
    pub id: ProjectId,

    /// Templated name such as `Mining-Delta-042`.
    pub project_name: String,

    /// Latitude in degrees, six decimals.
    pub latitude: f64,

    /// Longitude in degrees, six decimals.
    pub longitude: f64,

    /// Lifecycle status.
    pub status: ProjectStatus,

    /// When the project was last touched.
    #[serde(with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
}

impl Project {
    /// The project's position.
    #[must_use]
    pub fn location(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Numeric US short date, e.g. `1/15/2024`.
    #[must_use]
    pub fn short_date(&self) -> String {
        self.last_updated.format("%-m/%-d/%Y").to_string()
    }

    /// Display date used by the table and map popups, e.g. `Jan 15, 2024`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.last_updated.format("%b %-d, %Y").to_string()
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix,
/// e.g. `2024-01-15T10:30:00.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer rejects the string.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Deserialize a timestamp from any RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid RFC 3339 timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use super::{Project, ProjectStatus};

    /// Build a project with a fixed date, for tests.
    pub fn project(id: u32, name: &str, lat: f64, lon: f64, status: ProjectStatus) -> Project {
        Project {
            id,
            project_name: name.to_string(),
            latitude: lat,
            longitude: lon,
            status,
            last_updated: Utc
                .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
                .single()
                .expect("valid date"),
        }
    }
}
