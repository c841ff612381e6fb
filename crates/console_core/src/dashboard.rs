//! Landing-page counts across every record kind.

use futures::future::join_all;
use shared::domain::RecordKind;
use tracing::warn;

use crate::{
    store,
    summary::{self, StatusSummary},
    view_config::ViewConfig,
    RemoteService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: RecordKind,
    pub summary: StatusSummary,
    pub total: usize,
    /// False when the fetch failed and the summary is the empty default.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub kinds: Vec<KindSummary>,
}

impl Dashboard {
    pub fn get(&self, kind: RecordKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|entry| entry.kind == kind)
    }
}

/// Fetches every collection concurrently. A failing kind degrades to zero
/// counts instead of failing the whole dashboard.
pub async fn load(remote: &dyn RemoteService) -> Dashboard {
    let fetches = RecordKind::ALL.into_iter().map(|kind| async move {
        let view = ViewConfig::for_kind(kind);
        let result = remote.fetch_collection(&view).await;
        (view, result)
    });

    let kinds = join_all(fetches)
        .await
        .into_iter()
        .map(|(view, result)| {
            let (records, available) = match result {
                Ok(response) => (store::normalize(response), true),
                Err(err) => {
                    warn!(kind = %view.kind, error = %err, "dashboard fetch failed");
                    (Vec::new(), false)
                }
            };
            KindSummary {
                kind: view.kind,
                summary: summary::project(&records, view.statuses),
                total: records.len(),
                available,
            }
        })
        .collect();

    Dashboard { kinds }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
