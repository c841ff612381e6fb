//! Inline status editing: at most one row per view is in edit mode.

use std::collections::HashMap;

use shared::domain::{Record, RecordId, StatusVocabulary};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveEdit {
    #[default]
    NoActiveEdit,
    Editing {
        record_id: RecordId,
        pending_status: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing { pending_status: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no row is being edited")]
    NoActiveEdit,
    #[error("'{value}' is not a valid status (expected one of: {expected})")]
    InvalidStatus { value: String, expected: String },
}

/// Identifies one issued status update. Only the newest ticket per record may
/// end the edit or report a failure; any confirmed ticket may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub record_id: RecordId,
    pub status: &'static str,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResolution {
    /// Commit `status` to the snapshot. `left_edit_mode` is false when a newer
    /// save is still outstanding or the row's edit now holds another value.
    Committed {
        record_id: RecordId,
        status: &'static str,
        left_edit_mode: bool,
    },
    /// Row stays in edit mode with its pending value.
    Failed { record_id: RecordId },
    /// An older save that failed while a newer one is outstanding, or a success
    /// already shadowed by a newer commit.
    Superseded,
}

#[derive(Debug, Default)]
pub struct InlineEditor {
    active: ActiveEdit,
    latest_save: HashMap<RecordId, u64>,
    committed: HashMap<RecordId, u64>,
    next_sequence: u64,
}

impl InlineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveEdit {
        &self.active
    }

    pub fn row_mode(&self, id: &RecordId) -> RowMode {
        match &self.active {
            ActiveEdit::Editing {
                record_id,
                pending_status,
            } if record_id == id => RowMode::Editing {
                pending_status: *pending_status,
            },
            _ => RowMode::Viewing,
        }
    }

    pub fn is_saving(&self, id: &RecordId) -> bool {
        self.latest_save.contains_key(id)
    }

    /// Puts `record` in edit mode seeded with its current status (or the kind
    /// default). Returns the row that was displaced, whose uncommitted value is
    /// discarded.
    pub fn start_edit(&mut self, record: &Record, statuses: StatusVocabulary) -> Option<RecordId> {
        let next = ActiveEdit::Editing {
            record_id: record.id.clone(),
            pending_status: statuses.resolve(record.raw_status()),
        };
        match std::mem::replace(&mut self.active, next) {
            ActiveEdit::Editing { record_id, .. } if record_id != record.id => Some(record_id),
            _ => None,
        }
    }

    pub fn set_pending(&mut self, value: &str, statuses: StatusVocabulary) -> Result<(), EditError> {
        let ActiveEdit::Editing { pending_status, .. } = &mut self.active else {
            return Err(EditError::NoActiveEdit);
        };
        let recognized = statuses
            .recognize(value)
            .ok_or_else(|| EditError::InvalidStatus {
                value: value.to_string(),
                expected: statuses.values().join(", "),
            })?;
        *pending_status = recognized;
        Ok(())
    }

    pub fn cancel(&mut self) -> ActiveEdit {
        std::mem::take(&mut self.active)
    }

    /// Drops the active edit if its row no longer exists.
    pub fn retain_if(&mut self, exists: impl Fn(&RecordId) -> bool) -> Option<RecordId> {
        match &self.active {
            ActiveEdit::Editing { record_id, .. } if !exists(record_id) => {
                let dropped = record_id.clone();
                self.active = ActiveEdit::NoActiveEdit;
                Some(dropped)
            }
            _ => None,
        }
    }

    pub fn begin_save(&mut self) -> Result<SaveTicket, EditError> {
        let ActiveEdit::Editing {
            record_id,
            pending_status,
        } = &self.active
        else {
            return Err(EditError::NoActiveEdit);
        };
        self.next_sequence += 1;
        self.latest_save
            .insert(record_id.clone(), self.next_sequence);
        Ok(SaveTicket {
            record_id: record_id.clone(),
            status: *pending_status,
            sequence: self.next_sequence,
        })
    }

    pub fn finish_save(&mut self, ticket: &SaveTicket, succeeded: bool) -> SaveResolution {
        let latest = self.latest_save.get(&ticket.record_id) == Some(&ticket.sequence);
        if latest {
            self.latest_save.remove(&ticket.record_id);
        }

        if !succeeded {
            return if latest {
                SaveResolution::Failed {
                    record_id: ticket.record_id.clone(),
                }
            } else {
                SaveResolution::Superseded
            };
        }

        // The server accepted this value; only a newer commit may shadow it.
        if self
            .committed
            .get(&ticket.record_id)
            .is_some_and(|committed| *committed > ticket.sequence)
        {
            return SaveResolution::Superseded;
        }
        self.committed
            .insert(ticket.record_id.clone(), ticket.sequence);

        let leaves_edit = latest
            && matches!(
                &self.active,
                ActiveEdit::Editing { record_id, pending_status }
                    if record_id == &ticket.record_id && *pending_status == ticket.status
            );
        if leaves_edit {
            self.active = ActiveEdit::NoActiveEdit;
        }
        SaveResolution::Committed {
            record_id: ticket.record_id.clone(),
            status: ticket.status,
            left_edit_mode: leaves_edit,
        }
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
