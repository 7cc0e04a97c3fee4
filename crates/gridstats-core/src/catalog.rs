// Static catalog of the available stat exports.
//
// One descriptor per (category, season kind, year) triple; the resource name
// is the file name served under the data base URL.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Statistical domain of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Receiving,
    Passing,
    Rushing,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Receiving, Category::Passing, Category::Rushing];

    /// Lowercase identifier used in resource names.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Receiving => "receiving",
            Category::Passing => "passing",
            Category::Rushing => "rushing",
        }
    }

    /// Capitalized label, as it appears in export banners.
    pub fn label(self) -> &'static str {
        match self {
            Category::Receiving => "Receiving",
            Category::Passing => "Passing",
            Category::Rushing => "Rushing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Regular season vs playoff partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonKind {
    Regular,
    Playoff,
}

impl SeasonKind {
    pub const ALL: [SeasonKind; 2] = [SeasonKind::Regular, SeasonKind::Playoff];

    pub fn as_str(self) -> &'static str {
        match self {
            SeasonKind::Regular => "regular",
            SeasonKind::Playoff => "playoff",
        }
    }

    pub fn toggled(self) -> SeasonKind {
        match self {
            SeasonKind::Regular => SeasonKind::Playoff,
            SeasonKind::Playoff => SeasonKind::Regular,
        }
    }
}

/// Seasons with published exports, newest first.
pub const SUPPORTED_YEARS: [u16; 3] = [2024, 2023, 2022];

/// The key that identifies one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub category: Category,
    pub season: SeasonKind,
    pub year: u16,
}

impl Selection {
    pub fn new(category: Category, season: SeasonKind, year: u16) -> Self {
        Selection {
            category,
            season,
            year,
        }
    }

    /// Same selection with the next supported year (wrapping, newest first).
    pub fn with_next_year(self) -> Selection {
        let idx = SUPPORTED_YEARS
            .iter()
            .position(|&y| y == self.year)
            .map_or(0, |i| (i + 1) % SUPPORTED_YEARS.len());
        Selection {
            year: SUPPORTED_YEARS[idx],
            ..self
        }
    }

    pub fn descriptor(&self) -> Option<DataFileDescriptor> {
        find(self.category, self.season, self.year)
    }
}

/// Identifies exactly one source resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileDescriptor {
    pub category: Category,
    pub season: SeasonKind,
    pub year: u16,
    pub resource_name: String,
    pub display_name: String,
}

impl DataFileDescriptor {
    fn new(category: Category, season: SeasonKind, year: u16) -> Self {
        let resource_name = format!(
            "pff-nfl-{}-{}-{}.csv",
            season.as_str(),
            category.as_str(),
            year
        );
        let display_name = match season {
            SeasonKind::Regular => format!("{year} Regular Season {}", category.label()),
            SeasonKind::Playoff => format!("{year} Playoff {}", category.label()),
        };
        DataFileDescriptor {
            category,
            season,
            year,
            resource_name,
            display_name,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection::new(self.category, self.season, self.year)
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Every known export, ordered by category, then season kind, then year
/// (newest first).
pub fn all_descriptors() -> Vec<DataFileDescriptor> {
    let mut out = Vec::with_capacity(Category::ALL.len() * SeasonKind::ALL.len() * SUPPORTED_YEARS.len());
    for category in Category::ALL {
        for season in SeasonKind::ALL {
            for year in SUPPORTED_YEARS {
                out.push(DataFileDescriptor::new(category, season, year));
            }
        }
    }
    out
}

/// Look up the descriptor for a triple. `None` for unsupported years.
pub fn find(category: Category, season: SeasonKind, year: u16) -> Option<DataFileDescriptor> {
    SUPPORTED_YEARS
        .contains(&year)
        .then(|| DataFileDescriptor::new(category, season, year))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
