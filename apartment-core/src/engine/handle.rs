//! Running an [`Engine`] on its own thread.
//!
//! Each handle owns one OS thread with a current-thread tokio runtime that
//! ticks the engine independently of the console. The console talks to it
//! through an unbounded request channel (fire-and-forget) and hears back
//! only through the [`EventSink`] given at spawn time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::scene::Emitter;
use crate::engine::{Engine, EngineRequest};
use crate::error::EngineError;
use crate::event::EventSink;

/// Owned handle to one running engine instance.
///
/// Dropping the handle shuts the engine down.
pub struct EngineHandle {
    id: Uuid,
    requests: mpsc::UnboundedSender<EngineRequest>,
    /// Set while the active scene has a command receiver installed.
    ready: Arc<AtomicBool>,
    /// Cleared at shutdown; the engine checks it before every emission.
    live: Arc<AtomicBool>,
    stop: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Start an engine delivering its events to `sink`.
    pub fn spawn(config: EngineConfig, sink: EventSink) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(EngineError::Runtime)?;

        let id = Uuid::new_v4();
        let ready = Arc::new(AtomicBool::new(false));
        let live = Arc::new(AtomicBool::new(true));
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let emitter = Emitter::new(sink, live.clone(), config.chatter_interval);
        let engine = Engine::new(config, emitter, ready.clone());

        let thread = std::thread::Builder::new()
            .name(format!("scene-engine-{}", id.simple()))
            .spawn(move || runtime.block_on(engine_loop(engine, request_rx, stop_rx)))
            .map_err(EngineError::Thread)?;

        tracing::info!(%id, "engine spawned");
        Ok(Self {
            id,
            requests: request_tx,
            ready,
            live,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the engine is live and a command receiver is installed.
    pub fn is_ready(&self) -> bool {
        self.live.load(Ordering::Acquire) && self.ready.load(Ordering::Acquire)
    }

    /// Forward a command to the active scene's receiver.
    ///
    /// Returns `false` without queueing anything when no receiver is
    /// installed yet (or any more).
    pub fn send_command(&self, raw: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.requests
            .send(EngineRequest::Command(raw.to_string()))
            .is_ok()
    }

    /// Forward a pointer press in engine coordinates.
    pub fn send_pointer(&self, x: f32, y: f32) -> bool {
        if !self.live.load(Ordering::Acquire) {
            return false;
        }
        self.requests.send(EngineRequest::Pointer { x, y }).is_ok()
    }

    /// Stop the engine and wait for it to release its resources.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        // Liveness goes false before the stop signal.
        self.live.store(false, Ordering::Release);
        self.ready.store(false, Ordering::Release);

        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!(id = %self.id, "engine thread panicked");
            } else {
                tracing::info!(id = %self.id, "engine stopped");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("id", &self.id)
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// The engine thread's main loop.
async fn engine_loop(
    mut engine: Engine,
    mut requests: mpsc::UnboundedReceiver<EngineRequest>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(engine.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    engine.boot();

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            request = requests.recv() => match request {
                Some(request) => engine.handle(request),
                None => break,
            },
            _ = ticker.tick() => {
                let now = Instant::now();
                engine.advance(now - last);
                last = now;
            }
        }
    }

    engine.teardown();
}
