//! One list view: snapshot, derived summary/search/paging, inline edits and
//! the detail overlay, parameterized by a [`ViewConfig`].
//!
//! Remote calls run as spawned tasks and report back as [`ViewEvent`]s. All
//! state changes happen in [`TableController::handle_event`] on the caller's
//! context. Dropping the controller closes the event channel, so completions
//! that arrive after teardown are discarded without touching anything.

use std::sync::Arc;

use shared::{
    domain::{Record, RecordId},
    error::ConsoleError,
    protocol::{CollectionResponse, DetailResponse},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    detail::{DetailFetcher, DetailResolution, DetailTicket},
    editor::{ActiveEdit, InlineEditor, RowMode, SaveResolution, SaveTicket},
    filter,
    paginator::{PageInfo, Paginator},
    store::{self, FetchGeneration, RecordStore},
    summary::{self, StatusSummary},
    view_config::{DetailSource, ViewConfig},
    RemoteService,
};

fn task_aborted() -> ConsoleError {
    ConsoleError::Network("request task ended unexpectedly".to_string())
}

#[derive(Debug)]
pub enum ViewEvent {
    SnapshotFetched {
        generation: FetchGeneration,
        result: Result<CollectionResponse, ConsoleError>,
    },
    StatusSaved {
        ticket: SaveTicket,
        result: Result<(), ConsoleError>,
    },
    DetailFetched {
        ticket: DetailTicket,
        result: Result<DetailResponse, ConsoleError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    SaveFailed,
    DetailFailed,
    InvalidStatus,
}

/// A user-visible alert raised by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug)]
pub struct RowView<'a> {
    pub record: &'a Record,
    pub status: &'static str,
    pub mode: RowMode,
}

#[derive(Debug)]
pub struct TableView<'a> {
    pub config: &'a ViewConfig,
    pub query: &'a str,
    pub loading: bool,
    pub summary: StatusSummary,
    pub matches: usize,
    pub page: PageInfo,
    pub rows: Vec<RowView<'a>>,
    pub detail: Option<&'a Record>,
}

pub struct TableController {
    config: ViewConfig,
    remote: Arc<dyn RemoteService>,
    store: RecordStore,
    editor: InlineEditor,
    paginator: Paginator,
    detail: DetailFetcher,
    query: String,
    notices: Vec<Notice>,
    fetches_in_flight: usize,
    in_flight: usize,
    last_fetch_error: Option<ConsoleError>,
    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
}

impl TableController {
    pub fn new(config: ViewConfig, remote: Arc<dyn RemoteService>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            remote,
            store: RecordStore::new(),
            editor: InlineEditor::new(),
            paginator: Paginator::default(),
            detail: DetailFetcher::new(),
            query: String::new(),
            notices: Vec::new(),
            fetches_in_flight: 0,
            in_flight: 0,
            last_fetch_error: None,
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &[Record] {
        self.store.snapshot()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_edit(&self) -> &ActiveEdit {
        self.editor.active()
    }

    pub fn row_mode(&self, id: &RecordId) -> RowMode {
        self.editor.row_mode(id)
    }

    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn detail(&self) -> Option<&Record> {
        self.detail.overlay()
    }

    pub fn last_fetch_error(&self) -> Option<&ConsoleError> {
        self.last_fetch_error.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Issues a collection fetch. Earlier fetches still in flight are not
    /// cancelled; their results are ignored if this one lands first.
    pub fn activate(&mut self) -> FetchGeneration {
        let generation = self.store.issue_generation();
        let remote = Arc::clone(&self.remote);
        let config = self.config;
        self.spawn(
            async move {
                let result = remote.fetch_collection(&config).await;
                ViewEvent::SnapshotFetched { generation, result }
            },
            ViewEvent::SnapshotFetched {
                generation,
                result: Err(task_aborted()),
            },
        );
        self.fetches_in_flight += 1;
        debug!(kind = %self.config.kind, generation, "queued collection fetch");
        generation
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.paginator.reset();
    }

    pub fn next_page(&mut self) -> bool {
        let matches = self.filtered().len();
        self.paginator.next(matches)
    }

    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev()
    }

    pub fn start_edit(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.store.get(id) else {
            warn!(kind = %self.config.kind, %id, "cannot edit a record outside the snapshot");
            return false;
        };
        if let Some(displaced) = self.editor.start_edit(record, self.config.statuses) {
            debug!(%displaced, %id, "discarding uncommitted edit");
        }
        true
    }

    pub fn set_pending_status(&mut self, value: &str) -> bool {
        match self.editor.set_pending(value, self.config.statuses) {
            Ok(()) => true,
            Err(err) => {
                self.notices.push(Notice {
                    kind: NoticeKind::InvalidStatus,
                    message: err.to_string(),
                });
                false
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Sends the active edit's pending status. The snapshot only changes once
    /// the remote call succeeds.
    pub fn save(&mut self) -> Option<SaveTicket> {
        let ticket = match self.editor.begin_save() {
            Ok(ticket) => ticket,
            Err(err) => {
                debug!(error = %err, "save requested without an active edit");
                return None;
            }
        };
        let remote = Arc::clone(&self.remote);
        let config = self.config;
        let issued = ticket.clone();
        self.spawn(
            async move {
                let result = remote
                    .update_status(&config, &issued.record_id, issued.status)
                    .await;
                ViewEvent::StatusSaved {
                    ticket: issued,
                    result,
                }
            },
            ViewEvent::StatusSaved {
                ticket: ticket.clone(),
                result: Err(task_aborted()),
            },
        );
        debug!(id = %ticket.record_id, status = ticket.status, "queued status update");
        Some(ticket)
    }

    pub fn open_detail(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.store.get(id) else {
            warn!(kind = %self.config.kind, %id, "cannot show details for a record outside the snapshot");
            return false;
        };
        match self.config.detail {
            DetailSource::None => false,
            DetailSource::Snapshot => {
                let record = record.clone();
                self.detail.show(record);
                true
            }
            DetailSource::Remote { .. } => {
                let ticket = self.detail.begin(self.config.detail_key(record));
                let remote = Arc::clone(&self.remote);
                let config = self.config;
                let issued = ticket.clone();
                self.spawn(
                    async move {
                        let result = remote.fetch_detail(&config, &issued.key).await;
                        ViewEvent::DetailFetched {
                            ticket: issued,
                            result,
                        }
                    },
                    ViewEvent::DetailFetched {
                        ticket,
                        result: Err(task_aborted()),
                    },
                );
                true
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn handle_event(&mut self, event: ViewEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            ViewEvent::SnapshotFetched { generation, result } => {
                self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                self.apply_snapshot(generation, result);
            }
            ViewEvent::StatusSaved { ticket, result } => self.apply_save(ticket, result),
            ViewEvent::DetailFetched { ticket, result } => self.apply_detail(ticket, result),
        }
    }

    /// Applies every completion that is already queued, without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Waits for and applies the next completion. Returns false when nothing is in flight.
    pub async fn process_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Waits until every issued request has resolved.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    pub fn view(&self) -> TableView<'_> {
        let filtered = self.filtered();
        let rows = self
            .paginator
            .page(&filtered)
            .iter()
            .map(|&record| RowView {
                record,
                status: self.config.status_of(record),
                mode: self.editor.row_mode(&record.id),
            })
            .collect();
        TableView {
            config: &self.config,
            query: &self.query,
            loading: self.is_loading(),
            summary: summary::project(self.store.snapshot(), self.config.statuses),
            matches: filtered.len(),
            page: self.paginator.info(filtered.len()),
            rows,
            detail: self.detail.overlay(),
        }
    }

    fn filtered(&self) -> Vec<&Record> {
        filter::filter(self.store.snapshot(), self.config.search_fields, &self.query)
    }

    /// Runs `task` and reports its event. If the task dies without producing
    /// one, `aborted` is reported instead so every request still resolves.
    fn spawn<F>(&mut self, task: F, aborted: ViewEvent)
    where
        F: std::future::Future<Output = ViewEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let event = match tokio::spawn(task).await {
                Ok(event) => event,
                Err(err) => {
                    error!(error = %err, "request task ended without a result");
                    aborted
                }
            };
            if tx.send(event).is_err() {
                debug!("view torn down before completion; dropping result");
            }
        });
    }

    fn apply_snapshot(
        &mut self,
        generation: FetchGeneration,
        result: Result<CollectionResponse, ConsoleError>,
    ) {
        match result {
            Ok(response) => {
                let records = store::normalize(response);
                let count = records.len();
                if !self.store.replace(generation, records) {
                    debug!(kind = %self.config.kind, generation, "discarding stale snapshot");
                    return;
                }
                self.last_fetch_error = None;
                let store = &self.store;
                if let Some(dropped) = self.editor.retain_if(|id| store.get(id).is_some()) {
                    debug!(%dropped, "edited record vanished from refreshed snapshot");
                }
                let matches = self.filtered().len();
                self.paginator.clamp(matches);
                info!(kind = %self.config.kind, generation, count, "snapshot replaced");
            }
            Err(err) => {
                if generation < self.store.latest_issued() {
                    debug!(kind = %self.config.kind, generation, error = %err, "stale fetch failed");
                    return;
                }
                warn!(kind = %self.config.kind, generation, error = %err, "collection fetch failed; keeping previous snapshot");
                self.last_fetch_error = Some(err);
            }
        }
    }

    fn apply_save(&mut self, ticket: SaveTicket, result: Result<(), ConsoleError>) {
        match self.editor.finish_save(&ticket, result.is_ok()) {
            SaveResolution::Superseded => {
                debug!(id = %ticket.record_id, sequence = ticket.sequence, "ignoring superseded save");
            }
            SaveResolution::Committed {
                record_id,
                status,
                left_edit_mode,
            } => {
                if !self.store.apply_status(&record_id, status) {
                    warn!(id = %record_id, "saved record is no longer in the snapshot");
                }
                info!(kind = %self.config.kind, id = %record_id, status, left_edit_mode, "status committed");
            }
            SaveResolution::Failed { record_id } => {
                let err = result.err().unwrap_or_else(|| {
                    ConsoleError::Network("status update failed".to_string())
                });
                error!(kind = %self.config.kind, id = %record_id, error = %err, "status update failed");
                self.notices.push(Notice {
                    kind: NoticeKind::SaveFailed,
                    message: format!("Failed to update status: {}", err.user_message()),
                });
            }
        }
    }

    fn apply_detail(&mut self, ticket: DetailTicket, result: Result<DetailResponse, ConsoleError>) {
        match self.detail.finish(&ticket, result) {
            DetailResolution::Opened => debug!(key = %ticket.key, "detail overlay opened"),
            DetailResolution::Discarded => {
                debug!(key = %ticket.key, "discarding detail for a closed overlay")
            }
            DetailResolution::Failed(err) => {
                warn!(kind = %self.config.kind, key = %ticket.key, error = %err, "detail fetch failed");
                self.notices.push(Notice {
                    kind: NoticeKind::DetailFailed,
                    message: format!("Failed to fetch details: {}", err.user_message()),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
