//! Scene trait, shared scene context and the emitter scenes talk through.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::engine::audio::AudioBus;
use crate::engine::clock::Timeline;
use crate::engine::graph::{NodeId, SceneGraph};
use crate::engine::input::InputRouter;
use crate::engine::loader::{AssetCache, AssetLoader};
use crate::event::{EventEnvelope, EventSink};

/// Identifies a scene the engine knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Preload,
    Apartment,
}

impl SceneKey {
    pub fn name(&self) -> &'static str {
        match self {
            SceneKey::Preload => "PreloadScene",
            SceneKey::Apartment => "ApartmentScene",
        }
    }

    /// Instantiate a fresh scene for this key.
    pub fn build(&self) -> Box<dyn Scene> {
        match self {
            SceneKey::Preload => Box::new(crate::engine::preload::PreloadScene::new()),
            SceneKey::Apartment => Box::new(crate::engine::apartment::ApartmentScene::new()),
        }
    }
}

/// Pushes envelopes to the console while the engine is live.
///
/// Every emission checks the shared liveness flag first, so deferred work
/// that fires after shutdown has begun is dropped instead of delivered.
#[derive(Debug)]
pub struct Emitter {
    sink: EventSink,
    live: Arc<AtomicBool>,
    chatter_interval: Duration,
    last_chatter: Option<Duration>,
}

impl Emitter {
    pub fn new(sink: EventSink, live: Arc<AtomicBool>, chatter_interval: Duration) -> Self {
        Self {
            sink,
            live,
            chatter_interval,
            last_chatter: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Deliver an envelope. Returns `false` if it was dropped.
    pub fn emit(&mut self, envelope: EventEnvelope) -> bool {
        if !self.is_live() {
            tracing::debug!(kind = %envelope.kind(), "engine not live, dropping event");
            return false;
        }
        tracing::debug!(kind = %envelope.kind(), "emitting event");
        self.sink.deliver(envelope)
    }

    /// Deliver spontaneous `command-output`, coalescing bursts.
    ///
    /// At most one spontaneous output is delivered per chatter interval of
    /// engine time; the rest are dropped.
    pub fn emit_spontaneous(&mut self, now: Duration, text: String) -> bool {
        if let Some(last) = self.last_chatter {
            if now.saturating_sub(last) < self.chatter_interval {
                tracing::debug!("coalescing spontaneous output");
                return false;
            }
        }
        self.last_chatter = Some(now);
        self.emit(EventEnvelope::CommandOutput(text))
    }

    /// Stop delivering. Anything emitted afterwards is dropped.
    pub fn close(&mut self) {
        self.live.store(false, Ordering::Release);
    }
}

/// Engine subsystems a scene works with.
#[derive(Debug)]
pub struct SceneContext {
    pub config: EngineConfig,
    pub graph: SceneGraph,
    pub input: InputRouter,
    pub audio: AudioBus,
    pub timeline: Timeline,
    pub assets: AssetCache,
    pub emitter: Emitter,
}

impl SceneContext {
    pub fn new(config: EngineConfig, emitter: Emitter) -> Self {
        Self {
            config,
            graph: SceneGraph::new(),
            input: InputRouter::new(),
            audio: AudioBus::new(),
            timeline: Timeline::new(),
            assets: AssetCache::default(),
            emitter,
        }
    }

    /// Current engine time.
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }
}

/// Accepts console commands inside the active scene.
pub trait CommandReceiver {
    /// Handle one command. Unrecognised text is ignored, never an error.
    fn receive(&mut self, ctx: &mut SceneContext, raw: &str);
}

/// A scene in the engine's lifecycle.
///
/// The engine calls `preload` first. If it returns `true` the engine runs
/// the asset loader, reporting through `load_progress` and `load_complete`,
/// and calls `create` once loading finishes; otherwise `create` runs
/// immediately.
pub trait Scene: Send {
    fn key(&self) -> SceneKey;

    /// Queue assets. Return whether this scene has a loading phase.
    fn preload(&mut self, _ctx: &mut SceneContext, _loader: &mut AssetLoader) -> bool {
        false
    }

    fn load_progress(&mut self, _ctx: &mut SceneContext, _percent: u8) {}

    fn load_complete(&mut self, _ctx: &mut SceneContext) {}

    /// Build the scene's nodes and listeners.
    fn create(&mut self, ctx: &mut SceneContext);

    /// A registered node was pressed.
    fn pointer_down(&mut self, _ctx: &mut SceneContext, _node: NodeId) {}

    /// The scene's command receiver, if it installs one.
    fn receiver(&mut self) -> Option<&mut dyn CommandReceiver> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_channel;

    #[test]
    fn test_closed_emitter_drops_events() {
        let (sink, mut stream) = event_channel();
        let mut emitter = Emitter::new(sink, Arc::new(AtomicBool::new(true)), Duration::ZERO);

        assert!(emitter.emit(EventEnvelope::LoadingComplete));
        emitter.close();
        assert!(!emitter.emit(EventEnvelope::CommandResponse("late".into())));

        assert_eq!(stream.try_next(), Some(EventEnvelope::LoadingComplete));
        assert_eq!(stream.try_next(), None);
    }

    #[test]
    fn test_spontaneous_output_is_rate_limited() {
        let (sink, mut stream) = event_channel();
        let mut emitter = Emitter::new(
            sink,
            Arc::new(AtomicBool::new(true)),
            Duration::from_millis(250),
        );

        assert!(emitter.emit_spontaneous(Duration::from_millis(0), "a".into()));
        assert!(!emitter.emit_spontaneous(Duration::from_millis(100), "b".into()));
        assert!(emitter.emit_spontaneous(Duration::from_millis(250), "c".into()));

        let texts: Vec<String> = std::iter::from_fn(|| stream.try_next())
            .filter_map(|e| e.text().map(String::from))
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn test_scene_keys_build_matching_scenes() {
        for key in [SceneKey::Preload, SceneKey::Apartment] {
            assert_eq!(key.build().key(), key);
        }
    }
}
