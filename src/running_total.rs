//! Running totals over record order, used for accumulated rainfall.

use crate::types::record::Record;

/// Cumulative sum of `field` in record order. A missing or null value adds nothing.
pub fn running_total(records: &[Record], field: &str) -> Vec<f64> {
    records
        .iter()
        .scan(0.0, |total, record| {
            *total += record.get(field).unwrap_or(0.0);
            Some(*total)
        })
        .collect()
}

/// Returns a copy of `records` where each record carries
/// `output_field = sum(field)` over itself and every record before it.
///
/// This works on the dense record order and must run before alignment; gap buckets
/// created by the aligner have no running total of their own.
///
/// # Examples
///
/// ```
/// use wsview::{annotate_running_total, Record};
///
/// let records = vec![
///     Record::new(1u32).with("rain", 1.0),
///     Record::new(2u32).with_missing("rain"),
///     Record::new(3u32).with("rain", 3.0),
/// ];
/// let annotated = annotate_running_total(&records, "rain", "rain_sum");
/// let totals: Vec<_> = annotated.iter().map(|r| r.get("rain_sum")).collect();
/// assert_eq!(totals, vec![Some(1.0), Some(1.0), Some(4.0)]);
/// ```
pub fn annotate_running_total(records: &[Record], field: &str, output_field: &str) -> Vec<Record> {
    records
        .iter()
        .zip(running_total(records, field))
        .map(|(record, total)| {
            let mut annotated = record.clone();
            annotated.set(output_field, Some(total));
            annotated
        })
        .collect()
}
