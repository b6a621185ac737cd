use crate::{AttemptState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AttemptState, msg: Msg) -> (AttemptState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSelected(document) => {
            state.select_document(document);
            Vec::new()
        }
        Msg::SubmitRequested => match state.begin_submit() {
            Some((attempt_id, document)) => vec![Effect::SubmitDocument {
                attempt_id,
                document,
            }],
            None => Vec::new(),
        },
        Msg::ExtractionSucceeded { attempt_id, result } => {
            state.apply_success(attempt_id, result);
            Vec::new()
        }
        Msg::ExtractionFailed { attempt_id, error } => {
            state.apply_failure(attempt_id, error);
            Vec::new()
        }
        Msg::ResultTabSelected(tab) => {
            state.select_tab(tab);
            Vec::new()
        }
        Msg::ResetRequested => {
            state.reset();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
