//! Per-status counts derived from a snapshot.

use shared::domain::{Record, StatusVocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    buckets: Vec<StatusCount>,
    unassigned: usize,
    default_status: &'static str,
}

impl StatusSummary {
    pub fn buckets(&self) -> &[StatusCount] {
        &self.buckets
    }

    pub fn count(&self, status: &str) -> usize {
        self.buckets
            .iter()
            .find(|bucket| bucket.status.eq_ignore_ascii_case(status))
            .map(|bucket| bucket.count)
            .unwrap_or(0)
    }

    /// Records whose status is missing or outside the vocabulary. They render
    /// as the kind default but are counted here, not in the default's bucket.
    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    pub fn default_status(&self) -> &'static str {
        self.default_status
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum::<usize>() + self.unassigned
    }
}

pub fn project(records: &[Record], statuses: StatusVocabulary) -> StatusSummary {
    let mut buckets: Vec<StatusCount> = statuses
        .values()
        .iter()
        .map(|&status| StatusCount { status, count: 0 })
        .collect();
    let mut unassigned = 0;

    for record in records {
        match record
            .raw_status()
            .and_then(|raw| statuses.recognize(raw))
            .and_then(|status| buckets.iter_mut().find(|bucket| bucket.status == status))
        {
            Some(bucket) => bucket.count += 1,
            None => unassigned += 1,
        }
    }

    StatusSummary {
        buckets,
        unassigned,
        default_status: statuses.default_status(),
    }
}

#[cfg(test)]
#[path = "tests/summary_tests.rs"]
mod tests;
