use std::sync::{mpsc, Arc};
use std::thread;

use tokio_util::sync::CancellationToken;
use translator_logging::{tl_debug, tl_error, tl_warn};

use crate::service::TranslationService;
use crate::{TranslateReply, TranslateRequest};

/// Fire-and-forget submission of translation requests. Must never block.
pub trait Dispatcher {
    fn submit(&self, request: TranslateRequest);
}

pub trait ReplySink: Send + Sync {
    fn deliver(&self, reply: TranslateReply);
}

pub struct ChannelReplySink {
    tx: mpsc::Sender<TranslateReply>,
}

impl ChannelReplySink {
    pub fn new(tx: mpsc::Sender<TranslateReply>) -> Self {
        Self { tx }
    }
}

impl ReplySink for ChannelReplySink {
    fn deliver(&self, reply: TranslateReply) {
        let _ = self.tx.send(reply);
    }
}

enum EngineCommand {
    Translate(TranslateRequest),
}

/// Owns the worker thread that runs provider calls on a tokio runtime.
///
/// Each request becomes its own task, so completion order across jobs is
/// whatever the providers make it. Dropping the handle cancels in-flight jobs;
/// their replies are never delivered.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn spawn(service: TranslationService, sink: Arc<dyn ReplySink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let service = Arc::new(service);
        let worker_cancel = cancel.clone();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tl_error!("translation engine could not start its runtime: {err}");
                    return;
                }
            };

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Translate(request) => {
                        let service = service.clone();
                        let sink = sink.clone();
                        let cancel = worker_cancel.clone();
                        runtime.spawn(async move {
                            let job_id = request.job_id.clone();
                            match cancel.run_until_cancelled(service.handle(request)).await {
                                Some(reply) => sink.deliver(reply),
                                None => tl_debug!("job {job_id} dropped at shutdown"),
                            }
                        });
                    }
                }
            }

            worker_cancel.cancel();
        });

        Self {
            cmd_tx: Some(cmd_tx),
            cancel,
            worker: Some(worker),
        }
    }

    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tl_error!("translation engine thread panicked");
            }
        }
    }
}

impl Dispatcher for EngineHandle {
    fn submit(&self, request: TranslateRequest) {
        let Some(cmd_tx) = self.cmd_tx.as_ref() else {
            tl_warn!("engine is shut down; job {} not sent", request.job_id);
            return;
        };
        if let Err(mpsc::SendError(EngineCommand::Translate(request))) =
            cmd_tx.send(EngineCommand::Translate(request))
        {
            tl_warn!("engine is gone; job {} not sent", request.job_id);
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
