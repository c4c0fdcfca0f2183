//! Distribution loading and time-window bookkeeping.
//!
//! A distribution is loaded once per session and owned by the engine for its
//! lifetime. Windows are validated here (inverted intervals and windows
//! without a position key are dropped with recorded issues) and grouped per
//! position in a `BTreeMap`, so every iteration order an overlay session can
//! observe is documented and stable.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use overcue_types::{DistributionDoc, ExternalId, SettingsMap};

use super::validation::{ParseError, ValidationIssue};

/// An interval of playback position during which one activation is eligible
/// to show at one position.
///
/// The interval is half-open: `start_ms <= t < end_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub external_id: ExternalId,
    pub start_ms: u64,
    pub end_ms: u64,
    pub position: String,
    /// Position-scoped presentation settings (alignment etc.), passed through
    /// to the native layer with every show.
    pub settings: SettingsMap,
}

impl TimeWindow {
    pub fn contains(&self, timestamp_ms: u64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms < self.end_ms
    }
}

/// One activation reference with its surviving windows, declaration order.
#[derive(Debug, Clone)]
pub struct DistributionEntry {
    pub external_id: ExternalId,
    pub windows: Vec<TimeWindow>,
}

/// A loaded distribution. Immutable after load.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub id: String,
    pub name: String,
    entries: Vec<DistributionEntry>,
    by_position: BTreeMap<String, Vec<TimeWindow>>,
}

/// A loaded distribution plus the parts dropped during validation.
#[derive(Debug, Clone)]
pub struct DistributionLoad {
    pub distribution: Distribution,
    pub issues: Vec<ValidationIssue>,
}

impl Distribution {
    /// Validate a parsed document into a distribution.
    ///
    /// Windows violating `start < end` and windows with no position key are
    /// dropped and recorded; sibling windows and entries still load.
    pub fn load(doc: DistributionDoc) -> DistributionLoad {
        let mut issues = Vec::new();
        let mut entries = Vec::with_capacity(doc.data.len());
        let mut by_position: BTreeMap<String, Vec<TimeWindow>> = BTreeMap::new();

        for entry in doc.data {
            let mut windows = Vec::with_capacity(entry.instances.len());

            for instance in entry.instances {
                if instance.end_time <= instance.start_time {
                    issues.push(ValidationIssue::WindowOutOfOrder {
                        external_id: entry.external_id.clone(),
                        start_ms: instance.start_time,
                        end_ms: instance.end_time,
                    });
                    continue;
                }
                let Some(position) = instance.settings.position else {
                    issues.push(ValidationIssue::WindowMissingPosition {
                        external_id: entry.external_id.clone(),
                    });
                    continue;
                };

                let window = TimeWindow {
                    external_id: entry.external_id.clone(),
                    start_ms: instance.start_time,
                    end_ms: instance.end_time,
                    position,
                    settings: instance.settings.extra,
                };
                by_position
                    .entry(window.position.clone())
                    .or_default()
                    .push(window.clone());
                windows.push(window);
            }

            entries.push(DistributionEntry {
                external_id: entry.external_id,
                windows,
            });
        }

        for issue in &issues {
            tracing::warn!(distribution = %doc.id, %issue, "dropped window during load");
        }

        DistributionLoad {
            distribution: Distribution {
                id: doc.id,
                name: doc.name,
                entries,
                by_position,
            },
            issues,
        }
    }

    /// Parse and load a distribution from JSON text.
    pub fn from_json_str(json: &str) -> Result<DistributionLoad, ParseError> {
        let doc: DistributionDoc = serde_json::from_str(json)?;
        Ok(Self::load(doc))
    }

    /// Read, parse, and load a distribution document from disk.
    pub fn from_json_path(path: &Path) -> Result<DistributionLoad, ParseError> {
        let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    /// Windows scheduled at a position, in declaration order.
    pub fn windows_for(&self, position: &str) -> &[TimeWindow] {
        self.by_position
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every position referenced by at least one window, in sorted order.
    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.by_position.keys().map(String::as_str)
    }
}
