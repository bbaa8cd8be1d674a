//! Boot scene: loads assets behind a progress bar, then hands over to the
//! apartment scene.

use crate::engine::clock::DeferredAction;
use crate::engine::graph::{Bounds, NodeId, NodeKind};
use crate::engine::loader::AssetLoader;
use crate::engine::scene::{Scene, SceneContext, SceneKey};
use crate::event::EventEnvelope;

pub const TITLE: &str = "像素公寓生活模拟器 Alpha 0.1";
pub const LOADING_LABEL: &str = "加载中...";
pub const READY_LABEL: &str = "初始化完成!";

const BAR_COLOR: u32 = 0x4CAF50;
const BOX_COLOR: u32 = 0x222222;

#[derive(Debug, Default)]
pub struct PreloadScene {
    progress_box: Option<NodeId>,
    progress_bar: Option<NodeId>,
    label: Option<NodeId>,
}

impl PreloadScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bar geometry for a given percentage.
    fn bar_bounds(ctx: &SceneContext, percent: u8) -> Bounds {
        let (w, h) = (ctx.config.width, ctx.config.height);
        let full = w / 2.0 - 20.0;
        Bounds::new(
            w / 4.0 + 10.0,
            h / 2.0 - 20.0,
            full * f32::from(percent) / 100.0,
            30.0,
        )
    }
}

impl Scene for PreloadScene {
    fn key(&self) -> SceneKey {
        SceneKey::Preload
    }

    fn preload(&mut self, ctx: &mut SceneContext, loader: &mut AssetLoader) -> bool {
        let (w, h) = (ctx.config.width, ctx.config.height);

        self.progress_box = Some(ctx.graph.add(
            NodeKind::Rect {
                color: BOX_COLOR,
                alpha: 0.8,
            },
            Bounds::new(w / 4.0, h / 2.0 - 30.0, w / 2.0, 50.0),
        ));
        self.progress_bar = Some(ctx.graph.add(
            NodeKind::Rect {
                color: BAR_COLOR,
                alpha: 1.0,
            },
            Self::bar_bounds(ctx, 0),
        ));
        self.label = Some(ctx.graph.add(
            NodeKind::Text {
                content: LOADING_LABEL.to_string(),
            },
            Bounds::centered(w / 2.0, h / 2.0 - 50.0, 160.0, 16.0),
        ));

        for asset in ctx.config.assets.clone() {
            loader.enqueue(asset);
        }
        true
    }

    fn load_progress(&mut self, ctx: &mut SceneContext, percent: u8) {
        if let Some(bar) = self.progress_bar {
            let bounds = Self::bar_bounds(ctx, percent);
            ctx.graph.set_bounds(bar, bounds);
        }
        ctx.emitter.emit(EventEnvelope::LoadingProgress(percent));
    }

    fn load_complete(&mut self, ctx: &mut SceneContext) {
        for node in [
            self.progress_bar.take(),
            self.progress_box.take(),
            self.label.take(),
        ]
        .into_iter()
        .flatten()
        {
            ctx.graph.remove(node);
        }
        ctx.emitter.emit(EventEnvelope::LoadingComplete);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        ctx.audio.play("startup", &ctx.assets);

        let (w, h) = (ctx.config.width, ctx.config.height);
        ctx.graph.add(
            NodeKind::Text {
                content: TITLE.to_string(),
            },
            Bounds::new(10.0, 10.0, 400.0, 16.0),
        );
        ctx.graph.add(
            NodeKind::Text {
                content: READY_LABEL.to_string(),
            },
            Bounds::centered(w / 2.0, h / 2.0, 160.0, 16.0),
        );

        let delay = ctx.config.transition_delay;
        ctx.timeline
            .delayed_call(delay, DeferredAction::StartScene(SceneKey::Apartment));
    }
}
