pub(crate) mod calendar;
pub mod dataset;
pub mod index_range;
pub mod label;
pub mod period;
pub mod record;
