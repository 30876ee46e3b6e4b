mod align;
mod archive;
mod chart;
mod config;
mod error;
mod fetch;
mod running_total;
mod table;
mod types;
mod utils;
mod wsview;

pub use error::WsViewError;
pub use wsview::*;

pub use config::{ConfigError, ViewConfig};

pub use align::aligner::{align, AlignOptions, AlignedFrame, AlignedSeries, Aligner, DuplicatePolicy};
pub use align::axis::Axis;
pub use running_total::{annotate_running_total, running_total};
pub use utils::wind_dir;

pub use types::dataset::Dataset;
pub use types::index_range::IndexRange;
pub use types::label::Label;
pub use types::period::BucketPeriod;
pub use types::record::{Record, RecordTime};

pub use chart::chartjs::*;
pub use chart::presets::{presets, ChartKind};
pub use chart::spec::*;

pub use table::writer::{render_table, Table, TableColumn, TableKind, TableRow, TableSpec};

pub use fetch::fetcher::DatasetFetcher;

pub use archive::frame_ext::*;
pub use archive::loader::ArchiveLoader;
pub use archive::records::records_from_frame;

pub use align::error::AlignError;
pub use archive::error::ArchiveError;
pub use chart::error::ChartError;
pub use fetch::error::FetchError;
pub use table::error::TableError;
