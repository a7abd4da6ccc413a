// src/pipeline/upsert.rs

//! Resilient bulk persistence of canonical records.

use std::collections::HashMap;

use log::{error, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::models::CanonicalRecord;
use crate::store::{UpdateStore, UpsertOp};

/// Length of the title preview logged when a record is dropped.
const TITLE_PREVIEW_GRAPHEMES: usize = 80;

/// Write a batch of records to the store, returning the number written.
///
/// Records without a URL are dropped with a warning and never retried.
/// Within the batch, duplicate URLs collapse to the last occurrence. The
/// batch goes down as one unordered bulk operation; if that fails outright
/// every constituent operation is replayed individually, so a bulk
/// transport hiccup degrades throughput instead of dropping the batch.
pub async fn upsert_all(store: &dyn UpdateStore, records: Vec<CanonicalRecord>) -> Result<usize> {
    let ops = build_ops(records);
    if ops.is_empty() {
        return Ok(0);
    }

    match store.bulk_upsert(&ops).await {
        Ok(outcome) => Ok(outcome.total()),
        Err(e) => {
            warn!(
                "Bulk upsert of {} operation(s) failed ({}); replaying individually",
                ops.len(),
                e
            );
            let mut written = 0;
            for op in &ops {
                match store.upsert_one(op).await {
                    Ok(()) => written += 1,
                    Err(e) => error!("Individual upsert failed for {}: {}", op.url, e),
                }
            }
            Ok(written)
        }
    }
}

/// Filter out URL-less records and collapse in-batch duplicates,
/// keeping one op per URL with the last submitted record winning.
fn build_ops(records: Vec<CanonicalRecord>) -> Vec<UpsertOp> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, CanonicalRecord> = HashMap::new();

    for record in records {
        let Some(url) = record.url.clone().filter(|u| !u.trim().is_empty()) else {
            warn!(
                "Skipping record without URL (title preview): {}",
                title_preview(&record.title)
            );
            continue;
        };
        if latest.insert(url.clone(), record).is_none() {
            order.push(url);
        }
    }

    order
        .into_iter()
        .filter_map(|url| latest.remove(&url).map(|record| UpsertOp { url, record }))
        .collect()
}

/// First ~80 graphemes of a title, for drop diagnostics.
fn title_preview(title: &str) -> String {
    title.graphemes(true).take(TITLE_PREVIEW_GRAPHEMES).collect()
}
