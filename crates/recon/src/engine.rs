use std::collections::HashSet;

use tracing::debug;

use crate::model::{CanonicalRecord, DedupeKey, Reconciled, SourceBatch, SourceTally};

/// Merge per-source record lists into one deduplicated, date-ordered list.
///
/// Batches are visited in source priority order (ties keep caller order).
/// The first record seen for a [`DedupeKey`] is kept; later ones are
/// dropped. Survivors are then stable-sorted by `date`. Empty dates sort
/// before every dated record.
pub fn reconcile(mut batches: Vec<SourceBatch>) -> Reconciled {
    batches.sort_by_key(|b| b.source.priority());

    let mut seen: HashSet<DedupeKey> = HashSet::new();
    let mut records: Vec<CanonicalRecord> = Vec::new();
    let mut tallies: Vec<SourceTally> = Vec::new();

    for batch in batches {
        let mut kept = 0;
        let mut dropped = 0;
        for record in batch.records {
            if seen.insert(record.dedupe_key()) {
                records.push(record);
                kept += 1;
            } else {
                debug!(
                    source = %batch.source,
                    title = %record.title,
                    date = %record.date,
                    "dropping duplicate"
                );
                dropped += 1;
            }
        }

        match tallies.iter_mut().find(|t| t.source == batch.source) {
            Some(tally) => {
                tally.kept += kept;
                tally.dropped += dropped;
            }
            None => tallies.push(SourceTally {
                source: batch.source,
                kept,
                dropped,
            }),
        }
    }

    sort_by_date(&mut records);

    Reconciled { records, tallies }
}

/// Stable ascending sort on the ISO date string. The format is fixed-width
/// so string order is chronological; `""` is the smallest string.
pub fn sort_by_date(records: &mut [CanonicalRecord]) {
    records.sort_by(|a, b| a.date.cmp(&b.date));
}
