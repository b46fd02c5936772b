use crate::domain::model::{CategoryCounts, CleanedRecord, Record, TallySpec, SERIAL_KEY};

/// Drops fully-empty records and numbers the survivors 1..N in input order.
///
/// An input `Serial` column is removed before the blank check, since the
/// generated serial replaces it.
pub fn clean_records(records: Vec<Record>) -> Vec<CleanedRecord> {
    let total = records.len();
    let cleaned: Vec<CleanedRecord> = records
        .into_iter()
        .map(|record| record.without(SERIAL_KEY))
        .filter(|record| !record.is_blank())
        .enumerate()
        .map(|(index, record)| CleanedRecord::new(index + 1, record))
        .collect();

    if cleaned.len() < total {
        tracing::debug!("Dropped {} blank records", total - cleaned.len());
    }
    cleaned
}

/// Counts records whose tally column equals either tracked literal.
pub fn tally(records: &[CleanedRecord], spec: &TallySpec) -> CategoryCounts {
    records
        .iter()
        .filter_map(|record| record.get(&spec.column))
        .fold(CategoryCounts::default(), |mut counts, value| {
            if value == spec.value_a {
                counts.a += 1;
            } else if value == spec.value_b {
                counts.b += 1;
            }
            counts
        })
}
