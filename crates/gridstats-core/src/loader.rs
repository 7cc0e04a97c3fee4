// Loading pipeline: fetch -> normalize -> parse -> validate.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::{info, warn};

use crate::catalog::{Category, DataFileDescriptor};
use crate::error::{LoadError, ParseError};
use crate::fetch::RecordSource;
use crate::metrics::{derive_all, DerivedRecord};
use crate::normalize::normalize;
use crate::parse::parse_records;
use crate::record::RawRecord;
use crate::schema::{self, ColumnSpec};
use crate::validate::retain_data_rows;

// ---------------------------------------------------------------------------
// StatTable
// ---------------------------------------------------------------------------

/// The validated record set of one export. Replaced wholesale on reload.
#[derive(Debug, Clone)]
pub struct StatTable {
    pub descriptor: DataFileDescriptor,
    pub records: Vec<RawRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl StatTable {
    /// An empty table, used when a fetch in a batch fails.
    pub fn empty(descriptor: DataFileDescriptor) -> Self {
        StatTable {
            descriptor,
            records: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn category(&self) -> Category {
        self.descriptor.category
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        schema::columns_for(self.descriptor.category)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records with their derived metrics, computed on demand.
    pub fn derived(&self) -> Vec<DerivedRecord<'_>> {
        derive_all(&self.records)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the text stages of the pipeline on one export's raw text.
pub fn records_from_text(raw: &str) -> Result<Vec<RawRecord>, ParseError> {
    let normalized = normalize(raw);
    let parsed = parse_records(&normalized)?;
    Ok(retain_data_rows(parsed))
}

/// Fetch and parse one export.
pub async fn load_table(
    source: &dyn RecordSource,
    descriptor: &DataFileDescriptor,
) -> Result<StatTable, LoadError> {
    let text = source.fetch_text(&descriptor.resource_name).await?;
    let records = records_from_text(&text).map_err(|e| LoadError::Parse {
        resource: descriptor.resource_name.clone(),
        source: e,
    })?;

    warn_missing_columns(descriptor, &records);
    info!(
        "Loaded {} rows from {} ({})",
        records.len(),
        descriptor.resource_name,
        source.describe()
    );

    Ok(StatTable {
        descriptor: descriptor.clone(),
        records,
        loaded_at: Utc::now(),
    })
}

/// Fetch several exports concurrently. A failed fetch degrades to an empty
/// table in its own slot and never affects the others.
pub async fn load_many(
    source: &dyn RecordSource,
    descriptors: &[DataFileDescriptor],
) -> Vec<StatTable> {
    let loads = descriptors.iter().map(|d| async move {
        match load_table(source, d).await {
            Ok(table) => table,
            Err(e) => {
                warn!("{} unavailable, using empty set: {}", d.resource_name, e);
                StatTable::empty(d.clone())
            }
        }
    });
    join_all(loads).await
}

/// Check which exports the source can serve, concurrently. Any failure
/// counts as unavailable.
pub async fn probe_availability(
    source: &dyn RecordSource,
    descriptors: &[DataFileDescriptor],
) -> Vec<(DataFileDescriptor, bool)> {
    let probes = descriptors.iter().map(|d| async move {
        let ok = source.fetch_text(&d.resource_name).await.is_ok();
        (d.clone(), ok)
    });
    let results = join_all(probes).await;
    let available = results.iter().filter(|(_, ok)| *ok).count();
    info!("{available} of {} exports available", results.len());
    results
}

/// Schema columns absent from the export still render (as "-") but are
/// worth a log line: the registry may be out of date for this source.
fn warn_missing_columns(descriptor: &DataFileDescriptor, records: &[RawRecord]) {
    let Some(first) = records.first() else {
        return;
    };
    let missing: Vec<&str> = schema::columns_for(descriptor.category)
        .iter()
        .filter(|c| !first.columns().iter().any(|h| h == c.key))
        .map(|c| c.key)
        .collect();
    if !missing.is_empty() {
        warn!(
            "{} lacks schema columns: {}",
            descriptor.resource_name,
            missing.join(", ")
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
