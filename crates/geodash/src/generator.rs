//! Mock project generator.
//!
//! Fabricates [`Project`] records with uniformly random coordinates inside a
//! bounding box, a random status, and a random last-updated timestamp inside a
//! date window. The generator is a pure function of its RNG and settings, so a
//! seeded generator always reproduces the same dataset.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{round6, BoundingBox};
use crate::project::{Project, ProjectStatus};

/// Number of records the API serves by default.
pub const DEFAULT_PROJECT_COUNT: usize = 5000;

const FULL_TYPES: &[&str] = &[
    "GeoSurvey",
    "Mining",
    "Construction",
    "Infrastructure",
    "Environmental",
    "Urban",
    "Rural",
];

const FULL_SUFFIXES: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Prime", "Pro", "Max", "Plus", "Advanced", "Standard",
];

const COMPACT_TYPES: &[&str] = &[
    "GeoSurvey",
    "Mining",
    "Construction",
    "Infrastructure",
    "Environmental",
];

const COMPACT_SUFFIXES: &[&str] = &["Alpha", "Beta", "Gamma", "Delta", "Prime"];

/// Fixed records that open the compact dataset: name, lat, lon, status,
/// and (day, hour, minute) in January 2024.
const LANDMARKS: &[(&str, f64, f64, ProjectStatus, (u32, u32, u32))] = &[
    ("GeoSurvey-Alpha-0001", 28.6139, 77.2090, ProjectStatus::Active, (15, 10, 30)),
    ("Mining-Beta-0002", 19.0760, 72.8777, ProjectStatus::Completed, (14, 14, 20)),
    ("Construction-Gamma-0003", 13.0827, 80.2707, ProjectStatus::Pending, (13, 9, 15)),
    ("Infrastructure-Delta-0004", 22.5726, 88.3639, ProjectStatus::Active, (12, 16, 45)),
    ("Environmental-Prime-0005", 12.9716, 77.5946, ProjectStatus::Completed, (11, 11, 30)),
];

/// Vocabulary and naming style of generated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProfile {
    /// Seven project types, ten suffixes, random three-digit name numbers.
    #[default]
    Full,
    /// Five types, five suffixes, four-digit name numbers taken from the id,
    /// and five fixed landmark projects first.
    Compact,
}

impl GeneratorProfile {
    fn types(self) -> &'static [&'static str] {
        match self {
            Self::Full => FULL_TYPES,
            Self::Compact => COMPACT_TYPES,
        }
    }

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Full => FULL_SUFFIXES,
            Self::Compact => COMPACT_SUFFIXES,
        }
    }
}

impl std::fmt::Display for GeneratorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Settings that shape generated records.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Coordinates are drawn uniformly inside this box.
    pub bounds: BoundingBox,
    /// Earliest possible last-updated timestamp.
    pub window_start: DateTime<Utc>,
    /// Latest possible last-updated timestamp; `None` means "now".
    pub window_end: Option<DateTime<Utc>>,
    /// Vocabulary and naming style.
    pub profile: GeneratorProfile,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::INDIA,
            window_start: default_window_start(),
            window_end: None,
            profile: GeneratorProfile::Full,
        }
    }
}

/// Start of the last-updated window, 2023-01-01T00:00:00Z.
#[must_use]
pub fn default_window_start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_672_531_200, 0).unwrap_or_default()
}

/// Random project generator.
#[derive(Debug)]
pub struct ProjectGenerator {
    settings: GeneratorSettings,
    rng: StdRng,
}

impl ProjectGenerator {
    /// Create a generator seeded from the operating system.
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a generator that always produces the same sequence.
    #[must_use]
    pub fn with_seed(settings: GeneratorSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The settings this generator uses.
    #[must_use]
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate exactly `count` projects with ids `1..=count`.
    pub fn generate(&mut self, count: usize) -> Vec<Project> {
        let window_end = self.settings.window_end.unwrap_or_else(Utc::now);
        let projects: Vec<Project> = (0..count)
            .zip(1u32..)
            .map(|(_, id)| match self.landmark(id) {
                Some(project) => project,
                None => self.random_project(id, window_end),
            })
            .collect();
        debug!(
            count = projects.len(),
            profile = %self.settings.profile,
            "generated mock projects"
        );
        projects
    }

    fn landmark(&self, id: u32) -> Option<Project> {
        if self.settings.profile != GeneratorProfile::Compact {
            return None;
        }
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        let &(name, latitude, longitude, status, (day, hour, minute)) = LANDMARKS.get(index)?;
        let last_updated = Utc
            .with_ymd_and_hms(2024, 1, day, hour, minute, 0)
            .single()?;
        Some(Project {
            id,
            project_name: name.to_string(),
            latitude,
            longitude,
            status,
            last_updated,
        })
    }

    fn random_project(&mut self, id: u32, window_end: DateTime<Utc>) -> Project {
        let profile = self.settings.profile;
        let project_type = self.pick(profile.types());
        let suffix = self.pick(profile.suffixes());
        let project_name = match profile {
            GeneratorProfile::Full => {
                let number: u32 = self.rng.random_range(1..=999);
                format!("{project_type}-{suffix}-{number:03}")
            }
            GeneratorProfile::Compact => format!("{project_type}-{suffix}-{id:04}"),
        };

        let bounds = self.settings.bounds;
        let latitude = self.coordinate(bounds.south, bounds.north);
        let longitude = self.coordinate(bounds.west, bounds.east);
        let status = ProjectStatus::ALL[self.rng.random_range(0..ProjectStatus::ALL.len())];
        let last_updated = self.timestamp(window_end);

        Project {
            id,
            project_name,
            latitude,
            longitude,
            status,
            last_updated,
        }
    }

    fn pick(&mut self, items: &'static [&'static str]) -> &'static str {
        items[self.rng.random_range(0..items.len())]
    }

    fn coordinate(&mut self, a: f64, b: f64) -> f64 {
        let (low, high) = (a.min(b), a.max(b));
        round6(self.rng.random_range(low..=high)).clamp(low, high)
    }

    fn timestamp(&mut self, window_end: DateTime<Utc>) -> DateTime<Utc> {
        let start = self.settings.window_start.timestamp_millis();
        let end = window_end.timestamp_millis();
        let millis = if end > start {
            self.rng.random_range(start..end)
        } else {
            start
        };
        DateTime::from_timestamp_millis(millis).unwrap_or(self.settings.window_start)
    }
}

/// Generate `count` projects with the default settings.
#[must_use]
pub fn generate_projects(count: usize) -> Vec<Project> {
    ProjectGenerator::new(GeneratorSettings::default()).generate(count)
}
