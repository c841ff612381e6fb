//! Transient detail overlay. Nothing is cached between opens.

use shared::{
    domain::Record,
    error::ConsoleError,
    protocol::DetailResponse,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub key: String,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailResolution {
    Opened,
    Failed(ConsoleError),
    /// The overlay was closed or another lookup was issued meanwhile.
    Discarded,
}

#[derive(Debug, Default)]
pub struct DetailFetcher {
    overlay: Option<Record>,
    pending: Option<DetailTicket>,
    next_sequence: u64,
}

impl DetailFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&Record> {
        self.overlay.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a remote lookup. The open overlay and any outstanding lookup are
    /// discarded.
    pub fn begin(&mut self, key: impl Into<String>) -> DetailTicket {
        self.overlay = None;
        self.next_sequence += 1;
        let ticket = DetailTicket {
            key: key.into(),
            sequence: self.next_sequence,
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Opens the overlay on data the view already holds.
    pub fn show(&mut self, record: Record) {
        self.pending = None;
        self.overlay = Some(record);
    }

    pub fn finish(
        &mut self,
        ticket: &DetailTicket,
        result: Result<DetailResponse, ConsoleError>,
    ) -> DetailResolution {
        if self.pending.as_ref() != Some(ticket) {
            return DetailResolution::Discarded;
        }
        self.pending = None;

        let record = result.and_then(|response| {
            Record::from_value(response.into_item())
                .map_err(|err| ConsoleError::Decode(err.to_string()))
        });
        match record {
            Ok(record) => {
                self.overlay = Some(record);
                DetailResolution::Opened
            }
            Err(err) => DetailResolution::Failed(err),
        }
    }

    pub fn close(&mut self) {
        self.overlay = None;
        self.pending = None;
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
