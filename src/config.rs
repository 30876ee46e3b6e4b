use crate::align::aligner::{AlignOptions, DuplicatePolicy};
use bon::Builder;
use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_UTC_OFFSET: &str = "WSVIEW_UTC_OFFSET";
pub const ENV_DUPLICATES: &str = "WSVIEW_DUPLICATES";
pub const ENV_URL: &str = "WSVIEW_URL";
pub const ENV_ARCHIVE: &str = "WSVIEW_ARCHIVE";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{variable}='{value}' is not a UTC offset in seconds east of UTC")]
    InvalidOffset { variable: &'static str, value: String },

    #[error("{variable}='{value}': {reason}")]
    InvalidDuplicates {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings shared by every chart and table a [`crate::WsView`] renders.
///
/// # Examples
///
/// ```
/// use wsview::{DuplicatePolicy, ViewConfig};
/// use chrono::FixedOffset;
///
/// let config = ViewConfig::builder()
///     .utc_offset(FixedOffset::east_opt(3600).unwrap())
///     .duplicates(DuplicatePolicy::Reject)
///     .base_url("http://station.local/wsview")
///     .build();
/// assert_eq!(config.archive_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ViewConfig {
    /// Wall-clock offset used for epoch-second times and for local days in archive aggregates.
    #[builder(default = Utc.fix())]
    pub utc_offset: FixedOffset,
    #[builder(default)]
    pub duplicates: DuplicatePolicy,
    #[builder(into)]
    pub base_url: Option<String>,
    #[builder(into)]
    pub archive_path: Option<PathBuf>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig::builder().build()
    }
}

impl ViewConfig {
    /// Reads `WSVIEW_UTC_OFFSET`, `WSVIEW_DUPLICATES`, `WSVIEW_URL` and `WSVIEW_ARCHIVE`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let utc_offset = match lookup(ENV_UTC_OFFSET) {
            Some(value) => value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(FixedOffset::east_opt)
                .ok_or(ConfigError::InvalidOffset {
                    variable: ENV_UTC_OFFSET,
                    value,
                })?,
            None => Utc.fix(),
        };
        let duplicates = match lookup(ENV_DUPLICATES) {
            Some(value) => value
                .parse::<DuplicatePolicy>()
                .map_err(|reason| ConfigError::InvalidDuplicates {
                    variable: ENV_DUPLICATES,
                    value: value.clone(),
                    reason,
                })?,
            None => DuplicatePolicy::default(),
        };

        Ok(ViewConfig::builder()
            .utc_offset(utc_offset)
            .duplicates(duplicates)
            .maybe_base_url(lookup(ENV_URL))
            .maybe_archive_path(lookup(ENV_ARCHIVE).map(PathBuf::from))
            .build())
    }

    pub fn align_options(&self) -> AlignOptions {
        AlignOptions {
            offset: self.utc_offset,
            duplicates: self.duplicates,
        }
    }
}
