use super::*;
use async_trait::async_trait;
use serde_json::json;
use shared::{
    domain::RecordId,
    error::ConsoleError,
    protocol::{CollectionResponse, DetailResponse},
};

use crate::property_form::PropertySubmission;

/// Serves two visit requests and fails the move-request collection.
struct PartialOutage;

#[async_trait]
impl RemoteService for PartialOutage {
    async fn fetch_collection(&self, view: &ViewConfig) -> Result<CollectionResponse, ConsoleError> {
        match view.kind {
            RecordKind::VisitRequest => Ok(CollectionResponse::Bare(vec![
                json!({"_id": "v1", "status": "pending"}),
                json!({"_id": "v2", "status": "Completed"}),
                json!({"_id": "v3"}),
            ])),
            RecordKind::MoveRequest => Err(ConsoleError::server(503, "Service Unavailable")),
            _ => Ok(CollectionResponse::Wrapped { data: None }),
        }
    }

    async fn fetch_detail(&self, _view: &ViewConfig, _key: &str) -> Result<DetailResponse, ConsoleError> {
        Err(ConsoleError::server(404, "Not Found"))
    }

    async fn update_status(
        &self,
        _view: &ViewConfig,
        _id: &RecordId,
        _status: &str,
    ) -> Result<(), ConsoleError> {
        Ok(())
    }

    async fn create_property(&self, _submission: PropertySubmission) -> Result<(), ConsoleError> {
        Ok(())
    }
}

#[tokio::test]
async fn dashboard_counts_every_kind_and_survives_one_failure() {
    let dashboard = load(&PartialOutage).await;
    assert_eq!(dashboard.kinds.len(), RecordKind::ALL.len());

    let visits = dashboard.get(RecordKind::VisitRequest).expect("visits");
    assert!(visits.available);
    assert_eq!(visits.total, 3);
    assert_eq!(visits.summary.count("pending"), 1);
    assert_eq!(visits.summary.count("completed"), 1);
    assert_eq!(visits.summary.unassigned(), 1);

    let moves = dashboard.get(RecordKind::MoveRequest).expect("moves");
    assert!(!moves.available);
    assert_eq!(moves.total, 0);
    assert_eq!(moves.summary.count("pending"), 0);

    let listings = dashboard.get(RecordKind::PropertyListing).expect("listings");
    assert!(listings.available);
    assert_eq!(listings.summary.count("Open"), 0);
}
