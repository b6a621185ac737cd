use std::sync::{mpsc, Arc};
use std::thread;

use extractor_logging::{extractor_error, extractor_info};

use crate::upload::{ProgressSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, RequestId, UploadRequest};

enum EngineCommand {
    Submit {
        request_id: RequestId,
        request: UploadRequest,
    },
}

/// Runs uploads on a background thread and hands their outcomes back over a
/// channel, so the caller never blocks on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> Self {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    // Dropping `event_tx` disconnects the receiver side.
                    extractor_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let uploader = uploader.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(uploader.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, request_id: RequestId, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            request,
        });
    }

    /// Blocks until the next event; `None` once the engine thread has exited.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            request_id,
            request,
        } => {
            let sink = ChannelProgressSink {
                tx: event_tx.clone(),
            };
            let result = uploader.upload(request_id, &request, &sink).await;
            extractor_info!(
                "Upload request_id={} finished ok={}",
                request_id,
                result.is_ok()
            );
            let _ = event_tx.send(EngineEvent::UploadCompleted { request_id, result });
        }
    }
}
