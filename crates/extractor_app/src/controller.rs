use extractor_core::{update, AttemptState, AttemptViewModel, ExtractionError, Msg, Phase};
use extractor_engine::UploadSettings;
use extractor_logging::{extractor_debug, extractor_error};

use crate::effects::EffectRunner;

/// Owns the attempt state and feeds effects to the engine.
pub struct Controller {
    state: AttemptState,
    runner: EffectRunner,
}

impl Controller {
    pub fn new(settings: UploadSettings) -> Self {
        Self {
            state: AttemptState::new(),
            runner: EffectRunner::new(settings),
        }
    }

    /// Applies `msg`, runs the resulting effects and reports whether the
    /// view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        changed
    }

    /// Pumps engine completions until the current attempt is no longer in
    /// flight. Completions for older attempts pass through `update`, which
    /// drops them.
    pub fn wait_until_settled(&mut self) {
        while self.state.phase() == Phase::InFlight {
            match self.runner.next_msg() {
                Some(msg) => {
                    if !self.dispatch(msg) {
                        extractor_debug!(
                            "Completion left attempt {} unchanged",
                            self.state.attempt_id()
                        );
                    }
                }
                None => {
                    extractor_error!("Extraction engine stopped while attempt was in flight");
                    let attempt_id = self.state.attempt_id();
                    self.dispatch(Msg::ExtractionFailed {
                        attempt_id,
                        error: ExtractionError::transport("extraction engine stopped unexpectedly"),
                    });
                }
            }
        }
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn view(&self) -> AttemptViewModel {
        self.state.view()
    }
}

#[cfg(test)]
mod tests {
    use extractor_core::{
        parse_extraction_result, Document, ErrorKind, Msg, Phase, ResultTab,
    };
    use extractor_engine::UploadSettings;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::Controller;

    const PAYLOAD: &str = r#"{
        "product_name": "Hazelnut Wafer",
        "brand": "Acme",
        "net_quantity": {"amount": 45, "unit": "g"},
        "allergens": [
            {"name": "Gluten", "present": true, "contains_or_may_contain": "contains", "source": "wheat flour"},
            {"name": "Peanuts", "present": true, "contains_or_may_contain": "may_contain"}
        ],
        "nutrition": {"basis": "per_100g", "energy_kcal": 530, "sugars_g": "31.5"},
        "warnings": ["Low OCR confidence"]
    }"#;

    fn serve(runtime: &tokio::runtime::Runtime, response: ResponseTemplate) -> MockServer {
        runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/extract"))
                .respond_with(response)
                .mount(&server)
                .await;
            server
        })
    }

    fn controller_for(server: &MockServer) -> Controller {
        Controller::new(UploadSettings {
            base_url: server.uri(),
            ..UploadSettings::default()
        })
    }

    fn pdf() -> Document {
        Document::new("wafer.pdf", "application/pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn successful_extraction_exposes_parsed_payload() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = serve(
            &runtime,
            ResponseTemplate::new(200).set_body_raw(PAYLOAD, "application/json"),
        );
        let mut controller = controller_for(&server);

        assert!(controller.dispatch(Msg::DocumentSelected(pdf())));
        assert!(controller.dispatch(Msg::SubmitRequested));
        assert_eq!(controller.state().phase(), Phase::InFlight);

        controller.wait_until_settled();

        let expected = parse_extraction_result(PAYLOAD.as_bytes()).unwrap();
        let view = controller.view();
        assert_eq!(view.phase, Phase::Succeeded);
        assert_eq!(view.error_message, None);
        assert_eq!(view.result.as_deref(), Some(&expected));

        assert!(controller.dispatch(Msg::ResultTabSelected(ResultTab::Nutrition)));
        assert_eq!(controller.view().result_tab, ResultTab::Nutrition);
    }

    #[test]
    fn accepted_content_type_is_sent_in_bare_form() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/extract"))
                .and(body_string_contains("Content-Type: application/pdf\r\n"))
                .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
                .expect(1)
                .mount(&server)
                .await;
            server
        });
        let mut controller = controller_for(&server);

        let document = Document::new(
            "wafer.pdf",
            "Application/PDF; name=wafer.pdf",
            b"%PDF-1.4".to_vec(),
        );
        controller.dispatch(Msg::DocumentSelected(document));
        controller.dispatch(Msg::SubmitRequested);
        controller.wait_until_settled();

        assert_eq!(controller.state().phase(), Phase::Succeeded);
        let requests = runtime.block_on(server.received_requests()).unwrap_or_default();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(!body.contains("Application/PDF"));
    }

    #[test]
    fn server_error_settles_as_failure() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = serve(
            &runtime,
            ResponseTemplate::new(500).set_body_raw(
                r#"{"detail":"Failed to process PDF: corrupt xref"}"#,
                "application/json",
            ),
        );
        let mut controller = controller_for(&server);

        controller.dispatch(Msg::DocumentSelected(pdf()));
        controller.dispatch(Msg::SubmitRequested);
        controller.wait_until_settled();

        let state = controller.state();
        assert_eq!(state.phase(), Phase::Failed);
        assert!(state.result().is_none());
        let failure = state.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::ServiceFailure);
        assert!(failure.message.contains("corrupt xref"));
    }

    #[test]
    fn wrong_file_type_is_rejected_without_request() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = serve(&runtime, ResponseTemplate::new(200).set_body_string("{}"));
        let mut controller = controller_for(&server);

        let png = Document::new("photo.png", "image/png", vec![0x89, 0x50]);
        assert!(controller.dispatch(Msg::DocumentSelected(png)));
        assert!(!controller.dispatch(Msg::SubmitRequested));

        let view = controller.view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.rejected);
        assert!(view.error_message.unwrap().contains("image/png"));

        controller.wait_until_settled();
        let received = runtime.block_on(server.received_requests()).unwrap_or_default();
        assert!(received.is_empty());
    }
}
