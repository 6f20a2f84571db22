use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use super::{DecisionClient, DecisionReply, DecisionRequest, decide_or_fallback};
use crate::error::DecisionError;

/// Background thread that owns a single-threaded tokio runtime and answers
/// decision requests one at a time, so the frame loop never blocks on I/O.
///
/// Dropping the worker joins the thread. A request already in flight runs to
/// completion first, so shutdown can wait up to the backend's
/// `decision.timeout_ms`.
pub struct DecisionWorker {
    requests: Option<Sender<DecisionRequest>>,
    replies: Receiver<DecisionReply>,
    handle: Option<JoinHandle<()>>,
}

impl DecisionWorker {
    pub fn spawn(client: Arc<dyn DecisionClient>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (request_tx, request_rx) = mpsc::channel::<DecisionRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<DecisionReply>();

        let handle = thread::Builder::new()
            .name("decision-worker".to_string())
            .spawn(move || {
                tracing::debug!(backend = client.name(), "decision worker started");
                while let Ok(request) = request_rx.recv() {
                    let reply = runtime.block_on(decide_or_fallback(client.as_ref(), &request));
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                tracing::debug!("decision worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, request: DecisionRequest) -> Result<(), DecisionError> {
        let sender = self.requests.as_ref().ok_or(DecisionError::WorkerStopped)?;
        sender.send(request).map_err(|_| DecisionError::WorkerStopped)
    }

    /// Non-blocking; `Ok(None)` when nothing has arrived yet.
    pub fn try_reply(&self) -> Result<Option<DecisionReply>, DecisionError> {
        match self.replies.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(DecisionError::WorkerStopped),
        }
    }

    pub fn wait_reply(&self) -> Result<DecisionReply, DecisionError> {
        self.replies.recv().map_err(|_| DecisionError::WorkerStopped)
    }
}

impl Drop for DecisionWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("decision worker panicked");
            }
        }
    }
}
