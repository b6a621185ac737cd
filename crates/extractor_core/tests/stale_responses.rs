use std::sync::Arc;

use extractor_core::{
    update, AttemptState, Document, Effect, ExtractionError, ExtractionResult, Msg, Phase,
};

fn init_logging() {
    extractor_logging::initialize_for_tests();
}

fn submit(state: AttemptState, name: &str) -> (AttemptState, u64) {
    let document = Document::new(name, "application/pdf", b"%PDF".to_vec());
    let (state, _) = update(state, Msg::DocumentSelected(document));
    let (state, effects) = update(state, Msg::SubmitRequested);
    let attempt_id = match effects.as_slice() {
        [Effect::SubmitDocument { attempt_id, .. }] => *attempt_id,
        other => panic!("unexpected effects: {other:?}"),
    };
    (state, attempt_id)
}

fn named(name: &str) -> Arc<ExtractionResult> {
    Arc::new(ExtractionResult {
        product_name: Some(name.to_string()),
        ..ExtractionResult::default()
    })
}

#[test]
fn response_after_reselection_is_discarded() {
    init_logging();
    let (state, stale_id) = submit(AttemptState::new(), "old.pdf");

    let replacement = Document::new("new.pdf", "application/pdf", b"%PDF".to_vec());
    let (state, _) = update(state, Msg::DocumentSelected(replacement));
    assert_eq!(state.phase(), Phase::Ready);

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::ExtractionSucceeded {
            attempt_id: stale_id,
            result: named("Old"),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.selected_document().unwrap().file_name, "new.pdf");
}

#[test]
fn late_failure_does_not_overwrite_newer_success() {
    init_logging();
    let (state, first) = submit(AttemptState::new(), "a.pdf");
    let (state, second) = submit(state, "b.pdf");
    assert_ne!(first, second);

    let (state, _) = update(
        state,
        Msg::ExtractionSucceeded {
            attempt_id: second,
            result: named("B"),
        },
    );
    let (state, _) = update(
        state,
        Msg::ExtractionFailed {
            attempt_id: first,
            error: ExtractionError::transport("timed out"),
        },
    );

    assert_eq!(state.phase(), Phase::Succeeded);
    assert_eq!(
        state.result().unwrap().product_name.as_deref(),
        Some("B")
    );
}

#[test]
fn response_after_reset_is_discarded() {
    init_logging();
    let (state, attempt_id) = submit(AttemptState::new(), "a.pdf");
    let (state, _) = update(state, Msg::ResetRequested);

    let (state, _) = update(
        state,
        Msg::ExtractionSucceeded {
            attempt_id,
            result: named("A"),
        },
    );

    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.result().is_none());
}

#[test]
fn duplicate_response_for_settled_attempt_is_ignored() {
    init_logging();
    let (state, attempt_id) = submit(AttemptState::new(), "a.pdf");
    let (state, _) = update(
        state,
        Msg::ExtractionSucceeded {
            attempt_id,
            result: named("A"),
        },
    );
    let (state, _) = update(
        state,
        Msg::ExtractionFailed {
            attempt_id,
            error: ExtractionError::service("late"),
        },
    );

    assert_eq!(state.phase(), Phase::Succeeded);
    assert!(state.failure().is_none());
}
