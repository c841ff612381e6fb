use super::*;
use serde_json::json;
use shared::domain::RecordKind;

fn request(id: &str, status: Option<&str>) -> Record {
    let mut value = json!({"_id": id});
    if let Some(status) = status {
        value["status"] = json!(status);
    }
    Record::from_value(value).expect("record")
}

fn statuses() -> StatusVocabulary {
    RecordKind::VisitRequest.statuses()
}

#[test]
fn start_edit_seeds_current_status_or_default() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("completed")), statuses());
    assert_eq!(
        editor.row_mode(&RecordId::new("a")),
        RowMode::Editing {
            pending_status: "completed"
        }
    );

    editor.start_edit(&request("b", None), statuses());
    assert_eq!(
        editor.row_mode(&RecordId::new("b")),
        RowMode::Editing {
            pending_status: "pending"
        }
    );
}

#[test]
fn editing_another_row_discards_the_previous_one() {
    let mut editor = InlineEditor::new();
    let a = request("a", Some("pending"));
    let b = request("b", Some("pending"));

    editor.start_edit(&a, statuses());
    editor.set_pending("cancelled", statuses()).expect("valid");
    let displaced = editor.start_edit(&b, statuses());

    assert_eq!(displaced, Some(a.id.clone()));
    assert_eq!(editor.row_mode(&a.id), RowMode::Viewing);
    assert_eq!(
        editor.row_mode(&b.id),
        RowMode::Editing {
            pending_status: "pending"
        }
    );
}

#[test]
fn restarting_the_same_row_reports_no_displacement() {
    let mut editor = InlineEditor::new();
    let a = request("a", Some("pending"));
    editor.start_edit(&a, statuses());
    assert_eq!(editor.start_edit(&a, statuses()), None);
}

#[test]
fn pending_value_must_belong_to_the_vocabulary() {
    let mut editor = InlineEditor::new();
    assert_eq!(
        editor.set_pending("completed", statuses()),
        Err(EditError::NoActiveEdit)
    );

    editor.start_edit(&request("a", None), statuses());
    assert!(matches!(
        editor.set_pending("Approved", statuses()),
        Err(EditError::InvalidStatus { .. })
    ));
    editor.set_pending("Completed", statuses()).expect("canonicalized");
    assert_eq!(
        editor.row_mode(&RecordId::new("a")),
        RowMode::Editing {
            pending_status: "completed"
        }
    );
}

#[test]
fn successful_save_returns_row_to_viewing() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    editor.set_pending("completed", statuses()).expect("valid");
    let ticket = editor.begin_save().expect("ticket");
    assert!(editor.is_saving(&ticket.record_id));

    let resolution = editor.finish_save(&ticket, true);
    assert_eq!(
        resolution,
        SaveResolution::Committed {
            record_id: RecordId::new("a"),
            status: "completed",
            left_edit_mode: true,
        }
    );
    assert_eq!(editor.active(), &ActiveEdit::NoActiveEdit);
    assert!(!editor.is_saving(&ticket.record_id));
}

#[test]
fn failed_save_keeps_the_pending_value() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    editor.set_pending("cancelled", statuses()).expect("valid");
    let ticket = editor.begin_save().expect("ticket");

    assert_eq!(
        editor.finish_save(&ticket, false),
        SaveResolution::Failed {
            record_id: RecordId::new("a")
        }
    );
    assert_eq!(
        editor.row_mode(&RecordId::new("a")),
        RowMode::Editing {
            pending_status: "cancelled"
        }
    );
}

#[test]
fn success_after_moving_on_commits_without_touching_the_new_edit() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    let ticket = editor.begin_save().expect("ticket");
    editor.start_edit(&request("b", Some("pending")), statuses());

    let resolution = editor.finish_save(&ticket, true);
    assert!(matches!(
        resolution,
        SaveResolution::Committed {
            left_edit_mode: false,
            ..
        }
    ));
    assert_eq!(
        editor.row_mode(&RecordId::new("b")),
        RowMode::Editing {
            pending_status: "pending"
        }
    );
}

#[test]
fn confirmed_older_save_commits_but_keeps_the_row_editing() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    editor.set_pending("completed", statuses()).expect("valid");
    let first = editor.begin_save().expect("first");
    editor.set_pending("cancelled", statuses()).expect("valid");
    let second = editor.begin_save().expect("second");

    assert_eq!(
        editor.finish_save(&first, true),
        SaveResolution::Committed {
            record_id: RecordId::new("a"),
            status: "completed",
            left_edit_mode: false,
        }
    );
    assert!(editor.is_saving(&RecordId::new("a")));
    assert_eq!(
        editor.finish_save(&second, true),
        SaveResolution::Committed {
            record_id: RecordId::new("a"),
            status: "cancelled",
            left_edit_mode: true,
        }
    );
}

#[test]
fn older_success_after_newer_commit_is_shadowed() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    editor.set_pending("completed", statuses()).expect("valid");
    let first = editor.begin_save().expect("first");
    editor.set_pending("cancelled", statuses()).expect("valid");
    let second = editor.begin_save().expect("second");

    assert!(matches!(
        editor.finish_save(&second, true),
        SaveResolution::Committed { status: "cancelled", .. }
    ));
    assert_eq!(editor.finish_save(&first, true), SaveResolution::Superseded);
}

#[test]
fn older_failure_is_silent_while_newer_save_is_outstanding() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("a", Some("pending")), statuses());
    editor.set_pending("completed", statuses()).expect("valid");
    let first = editor.begin_save().expect("first");
    editor.set_pending("cancelled", statuses()).expect("valid");
    editor.begin_save().expect("second");

    assert_eq!(editor.finish_save(&first, false), SaveResolution::Superseded);
    assert_eq!(
        editor.row_mode(&RecordId::new("a")),
        RowMode::Editing {
            pending_status: "cancelled"
        }
    );
}

#[test]
fn success_keeps_a_restarted_edit_with_a_different_value() {
    let mut editor = InlineEditor::new();
    let a = request("a", Some("pending"));
    editor.start_edit(&a, statuses());
    editor.set_pending("completed", statuses()).expect("valid");
    let ticket = editor.begin_save().expect("ticket");

    editor.cancel();
    editor.start_edit(&a, statuses());
    editor.set_pending("cancelled", statuses()).expect("valid");

    assert!(matches!(
        editor.finish_save(&ticket, true),
        SaveResolution::Committed {
            status: "completed",
            left_edit_mode: false,
            ..
        }
    ));
    assert_eq!(
        editor.row_mode(&a.id),
        RowMode::Editing {
            pending_status: "cancelled"
        }
    );
}

#[test]
fn retain_if_drops_edits_for_vanished_rows() {
    let mut editor = InlineEditor::new();
    editor.start_edit(&request("gone", None), statuses());
    assert_eq!(editor.retain_if(|_| true), None);
    assert_eq!(editor.retain_if(|_| false), Some(RecordId::new("gone")));
    assert_eq!(editor.active(), &ActiveEdit::NoActiveEdit);
}

#[test]
fn save_without_edit_is_rejected() {
    let mut editor = InlineEditor::new();
    assert_eq!(editor.begin_save(), Err(EditError::NoActiveEdit));
}
