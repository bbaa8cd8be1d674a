//! The real-time scene engine.
//!
//! An [`Engine`] owns its scene graph, timeline, audio bus, input router and
//! asset cache. It is a plain state machine driven by [`Engine::advance`]
//! (time) and [`Engine::handle`] (requests from the console); the
//! [`handle`] module runs it on a dedicated thread with its own clock.
//!
//! Lifecycle: the engine boots into the preload scene (`Loading`). When the
//! asset loader finishes it emits `loading-complete`; the preload scene then
//! schedules the apartment scene, and once that scene installs its command
//! receiver the engine is `Active`. There is no way back to `Loading`.

pub mod apartment;
pub mod audio;
pub mod clock;
pub mod graph;
pub mod handle;
pub mod input;
pub mod loader;
pub mod preload;
pub mod scene;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EngineConfig, MIN_LOAD_RATE, MIN_TICK};
use clock::DeferredAction;
use loader::AssetLoader;
use scene::{Emitter, Scene, SceneContext, SceneKey};

pub use handle::EngineHandle;

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Assets not ready, no receiver installed.
    Loading,
    /// A scene with a command receiver is running.
    Active,
    /// Torn down; nothing runs any more.
    Stopped,
}

/// A request from the console side.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineRequest {
    /// A passthrough console command.
    Command(String),
    /// A pointer press in engine coordinates.
    Pointer { x: f32, y: f32 },
}

/// What teardown released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeardownReport {
    pub sounds_stopped: usize,
    pub actions_cancelled: usize,
    pub listeners_detached: usize,
    pub nodes_destroyed: usize,
}

pub struct Engine {
    ctx: SceneContext,
    scene: Option<Box<dyn Scene>>,
    loader: Option<AssetLoader>,
    phase: EnginePhase,
    /// Shared with the handle: set while a receiver is installed.
    ready: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(config: EngineConfig, emitter: Emitter, ready: Arc<AtomicBool>) -> Self {
        Self {
            ctx: SceneContext::new(config, emitter),
            scene: None,
            loader: None,
            phase: EnginePhase::Loading,
            ready,
        }
    }

    /// Start the first scene.
    pub fn boot(&mut self) {
        tracing::info!("engine booting");
        self.start_scene(SceneKey::Preload);
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn active_scene(&self) -> Option<SceneKey> {
        self.scene.as_ref().map(|s| s.key())
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    pub fn tick_interval(&self) -> Duration {
        self.ctx.config.tick.max(MIN_TICK)
    }

    /// Advance engine time by `dt`: run the loader, then fire due actions.
    pub fn advance(&mut self, dt: Duration) {
        if self.phase == EnginePhase::Stopped {
            return;
        }

        // Move the clock first so anything scheduled below is relative to
        // the new time.
        let due = self.ctx.timeline.advance(dt);

        if let (Some(loader), Some(scene)) = (self.loader.as_mut(), self.scene.as_mut()) {
            let step = loader.advance(dt, &mut self.ctx.assets);
            if let Some(percent) = step.progress {
                scene.load_progress(&mut self.ctx, percent);
            }
            if step.completed {
                self.loader = None;
                scene.load_complete(&mut self.ctx);
                scene.create(&mut self.ctx);
                self.refresh_receiver();
            }
        }

        for action in due {
            match action {
                DeferredAction::StartScene(key) => self.start_scene(key),
                DeferredAction::Emit(envelope) => {
                    self.ctx.emitter.emit(envelope);
                }
            }
        }
    }

    /// Handle a console request.
    pub fn handle(&mut self, request: EngineRequest) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        match request {
            EngineRequest::Command(raw) => match scene.receiver() {
                Some(receiver) => receiver.receive(&mut self.ctx, &raw),
                None => tracing::debug!(command = %raw, "no receiver installed, dropping command"),
            },
            EngineRequest::Pointer { x, y } => {
                if let Some(node) = self.ctx.input.press(&self.ctx.graph, x, y) {
                    scene.pointer_down(&mut self.ctx, node);
                }
            }
        }
    }

    /// Release everything the engine holds. Idempotent.
    ///
    /// Order: stop audio, cancel delayed actions, detach listeners, destroy
    /// the scene graph.
    pub fn teardown(&mut self) -> TeardownReport {
        if self.phase == EnginePhase::Stopped {
            return TeardownReport::default();
        }
        self.ready.store(false, Ordering::Release);
        self.ctx.emitter.close();

        let report = TeardownReport {
            sounds_stopped: self.ctx.audio.stop_all(),
            actions_cancelled: self.ctx.timeline.cancel_all(),
            listeners_detached: self.ctx.input.detach_all(),
            nodes_destroyed: self.ctx.graph.destroy(),
        };
        self.scene = None;
        self.loader = None;
        self.phase = EnginePhase::Stopped;
        tracing::info!(?report, "engine torn down");
        report
    }

    fn start_scene(&mut self, key: SceneKey) {
        if let Some(old) = self.scene.take() {
            let detached = self.ctx.input.detach_all();
            let destroyed = self.ctx.graph.destroy();
            tracing::debug!(
                from = old.key().name(),
                detached,
                destroyed,
                "scene shut down"
            );
        }
        self.ready.store(false, Ordering::Release);

        tracing::info!(scene = key.name(), "starting scene");
        let mut scene = key.build();
        let mut loader = AssetLoader::new(self.ctx.config.load_rate.max(MIN_LOAD_RATE));
        if scene.preload(&mut self.ctx, &mut loader) {
            loader.start();
            self.loader = Some(loader);
        } else {
            scene.create(&mut self.ctx);
        }
        self.scene = Some(scene);
        self.refresh_receiver();
    }

    fn refresh_receiver(&mut self) {
        if self.loader.is_some() {
            return;
        }
        let installed = self
            .scene
            .as_mut()
            .is_some_and(|scene| scene.receiver().is_some());
        if installed {
            self.phase = EnginePhase::Active;
            self.ready.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::NodeKind;
    use crate::event::{event_channel, EventEnvelope, EventStream};

    fn engine(config: EngineConfig) -> (Engine, EventStream, Arc<AtomicBool>) {
        let (sink, stream) = event_channel();
        let live = Arc::new(AtomicBool::new(true));
        let ready = Arc::new(AtomicBool::new(false));
        let emitter = Emitter::new(sink, live, config.chatter_interval);
        (Engine::new(config, emitter, ready.clone()), stream, ready)
    }

    fn drain(stream: &mut EventStream) -> Vec<EventEnvelope> {
        std::iter::from_fn(|| stream.try_next()).collect()
    }

    fn responses(events: &[EventEnvelope]) -> Vec<&str> {
        events
            .iter()
            .filter(|e| matches!(e, EventEnvelope::CommandResponse(_)))
            .filter_map(|e| e.text())
            .collect()
    }

    /// 1000 bytes/s over assets of 100 + 350 + 550 bytes.
    fn staged_config() -> EngineConfig {
        use crate::engine::loader::{AssetKind, AssetSpec};
        EngineConfig::default()
            .with_load_rate(1000)
            .with_assets(vec![
                AssetSpec::new("logo", AssetKind::Image, "logo.png", 100),
                AssetSpec::new("extra", AssetKind::Image, "extra.png", 350),
                AssetSpec::new("startup", AssetKind::Audio, "startup.wav", 550),
            ])
            .with_transition_delay(Duration::from_millis(2000))
    }

    fn activate(engine: &mut Engine) {
        engine.boot();
        engine.advance(Duration::from_secs(10));
        engine.advance(engine.context().config.transition_delay);
        assert_eq!(engine.phase(), EnginePhase::Active);
    }

    #[test]
    fn test_loading_progress_then_single_completion() {
        let (mut engine, mut stream, ready) = engine(staged_config());
        engine.boot();
        assert_eq!(engine.phase(), EnginePhase::Loading);
        assert_eq!(engine.active_scene(), Some(SceneKey::Preload));

        engine.advance(Duration::from_millis(100));
        engine.advance(Duration::from_millis(350));
        engine.advance(Duration::from_millis(550));
        engine.advance(Duration::from_millis(10));

        assert_eq!(
            drain(&mut stream),
            vec![
                EventEnvelope::LoadingProgress(10),
                EventEnvelope::LoadingProgress(45),
                EventEnvelope::LoadingProgress(100),
                EventEnvelope::LoadingComplete,
            ]
        );
        // Assets are in, but the receiver is not installed yet.
        assert_eq!(engine.phase(), EnginePhase::Loading);
        assert!(!ready.load(Ordering::Acquire));
    }

    #[test]
    fn test_zero_rate_and_tick_still_finish_loading() {
        let mut config = staged_config();
        config.load_rate = 0;
        config.tick = Duration::ZERO;
        let (mut engine, mut stream, _ready) = engine(config);
        assert_eq!(engine.tick_interval(), MIN_TICK);

        engine.boot();
        engine.advance(Duration::from_secs(2000));
        let events = drain(&mut stream);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == EventEnvelope::LoadingComplete)
                .count(),
            1,
            "{events:?}"
        );
    }

    #[test]
    fn test_preload_create_plays_startup_and_schedules_transition() {
        let (mut engine, _stream, _ready) = engine(staged_config());
        engine.boot();
        engine.advance(Duration::from_secs(5));

        let ctx = engine.context();
        assert!(ctx.audio.is_playing("startup"));
        assert_eq!(
            ctx.graph.texts(),
            vec![preload::TITLE, preload::READY_LABEL]
        );
        assert_eq!(ctx.timeline.pending(), 1);
    }

    #[test]
    fn test_transition_installs_receiver_after_delay() {
        let (mut engine, _stream, ready) = engine(staged_config());
        engine.boot();
        engine.advance(Duration::from_secs(5));

        engine.advance(Duration::from_millis(1999));
        assert_eq!(engine.active_scene(), Some(SceneKey::Preload));
        assert!(!ready.load(Ordering::Acquire));

        engine.advance(Duration::from_millis(1));
        assert_eq!(engine.active_scene(), Some(SceneKey::Apartment));
        assert_eq!(engine.phase(), EnginePhase::Active);
        assert!(ready.load(Ordering::Acquire));
        assert_eq!(engine.context().graph.texts(), vec![apartment::CAPTION]);
    }

    #[test]
    fn test_commands_during_loading_are_dropped() {
        let (mut engine, mut stream, _ready) = engine(staged_config());
        engine.boot();
        engine.handle(EngineRequest::Command("map".into()));
        engine.advance(Duration::from_secs(10));
        engine.advance(Duration::from_secs(10));

        let events = drain(&mut stream);
        assert!(responses(&events).is_empty(), "{events:?}");
    }

    #[test]
    fn test_receive_acknowledges_synchronously() {
        let (mut engine, mut stream, _ready) = engine(staged_config());
        activate(&mut engine);
        drain(&mut stream);

        engine.handle(EngineRequest::Command("dance".into()));
        assert_eq!(
            drain(&mut stream),
            vec![EventEnvelope::CommandResponse("游戏引擎收到命令: dance".into())]
        );
    }

    #[test]
    fn test_map_reply_arrives_after_delay_in_order() {
        let config = staged_config()
            .with_map_delay(Duration::from_millis(600))
            .with_floor_plan(vec!["客厅".into(), "厨房".into()]);
        let (mut engine, mut stream, _ready) = engine(config);
        activate(&mut engine);
        drain(&mut stream);

        engine.handle(EngineRequest::Command("map".into()));
        assert_eq!(responses(&drain(&mut stream)), vec!["游戏引擎收到命令: map"]);

        engine.advance(Duration::from_millis(599));
        assert!(drain(&mut stream).is_empty());

        engine.advance(Duration::from_millis(1));
        assert_eq!(
            responses(&drain(&mut stream)),
            vec!["公寓地图:", "- 客厅", "- 厨房"]
        );
    }

    #[test]
    fn test_tint_command_recolours_logo() {
        let (mut engine, mut stream, _ready) = engine(staged_config());
        activate(&mut engine);
        drain(&mut stream);

        engine.handle(EngineRequest::Command("tint #00ff00".into()));
        engine.handle(EngineRequest::Command("tint nonsense".into()));
        assert_eq!(
            responses(&drain(&mut stream)),
            vec![
                "游戏引擎收到命令: tint #00ff00",
                "Logo颜色已变更为: #00ff00",
                "游戏引擎收到命令: tint nonsense",
            ]
        );

        let tinted = engine.context().graph.nodes().iter().any(|n| {
            matches!(n.kind, NodeKind::Image { tint: Some(0x00ff00), .. })
        });
        assert!(tinted);
    }

    #[test]
    fn test_logo_click_emits_spontaneous_output() {
        let config = staged_config().with_chatter_interval(Duration::from_millis(250));
        let (mut engine, mut stream, _ready) = engine(config);
        activate(&mut engine);
        drain(&mut stream);

        // Centre of the 800x600 canvas is on the logo; a corner is not.
        engine.handle(EngineRequest::Pointer { x: 5.0, y: 5.0 });
        assert!(drain(&mut stream).is_empty());

        engine.handle(EngineRequest::Pointer { x: 400.0, y: 300.0 });
        engine.handle(EngineRequest::Pointer { x: 400.0, y: 300.0 });
        let events = drain(&mut stream);
        assert_eq!(events.len(), 1, "second click is coalesced: {events:?}");
        match &events[0] {
            EventEnvelope::CommandOutput(text) => {
                let color = text.strip_prefix("Logo颜色已变更为: ").unwrap();
                assert!(apartment::parse_color(color).is_some(), "{text}");
            }
            other => panic!("unexpected event {other:?}"),
        }

        engine.advance(Duration::from_millis(250));
        engine.handle(EngineRequest::Pointer { x: 400.0, y: 300.0 });
        assert_eq!(drain(&mut stream).len(), 1);
    }

    #[test]
    fn test_teardown_releases_everything_and_cancels_pending() {
        let (mut engine, mut stream, ready) = engine(staged_config());
        activate(&mut engine);
        drain(&mut stream);

        engine.handle(EngineRequest::Command("map".into()));
        drain(&mut stream);
        let report = engine.teardown();

        assert_eq!(report.sounds_stopped, 1);
        assert_eq!(report.actions_cancelled, engine_floor_plan_len() + 1);
        assert_eq!(report.listeners_detached, 1);
        assert_eq!(report.nodes_destroyed, 3);
        assert_eq!(engine.phase(), EnginePhase::Stopped);
        assert!(!ready.load(Ordering::Acquire));

        // Nothing fires after teardown, and a second teardown is a no-op.
        engine.advance(Duration::from_secs(10));
        engine.handle(EngineRequest::Command("map".into()));
        assert!(drain(&mut stream).is_empty());
        assert_eq!(engine.teardown(), TeardownReport::default());
    }

    fn engine_floor_plan_len() -> usize {
        EngineConfig::default().floor_plan.len()
    }

    #[test]
    fn test_empty_asset_list_still_completes_once() {
        let (mut engine, mut stream, _ready) =
            engine(EngineConfig::default().with_assets(Vec::new()));
        engine.boot();
        engine.advance(Duration::ZERO);
        engine.advance(Duration::ZERO);
        assert_eq!(
            drain(&mut stream),
            vec![
                EventEnvelope::LoadingProgress(100),
                EventEnvelope::LoadingComplete
            ]
        );
    }
}
