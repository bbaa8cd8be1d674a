//! The playable apartment scene and its command receiver.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::clock::DeferredAction;
use crate::engine::graph::{Bounds, NodeId, NodeKind};
use crate::engine::loader::AssetKind;
use crate::engine::scene::{CommandReceiver, Scene, SceneContext, SceneKey};
use crate::event::EventEnvelope;

pub const CAPTION: &str = "公寓基础场景";

/// Logo texture edge length before scaling.
const LOGO_SIZE: f32 = 256.0;
const LOGO_SCALE: f32 = 0.5;
const BORDER_COLOR: u32 = 0x4a4a4a;

pub struct ApartmentScene {
    logo: Option<NodeId>,
    rng: StdRng,
}

impl ApartmentScene {
    pub fn new() -> Self {
        Self {
            logo: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn logo(&self) -> Option<NodeId> {
        self.logo
    }

    fn tint_logo(&mut self, ctx: &mut SceneContext, color: u32) -> bool {
        match self.logo {
            Some(logo) => ctx.graph.set_tint(logo, color),
            None => false,
        }
    }
}

impl Default for ApartmentScene {
    fn default() -> Self {
        Self::new()
    }
}

/// `#rrggbb` formatting for a 24-bit colour.
pub fn format_color(color: u32) -> String {
    format!("#{:06x}", color & 0xFF_FFFF)
}

/// Parse `#rrggbb` or `rrggbb`.
pub fn parse_color(text: &str) -> Option<u32> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn tint_message(color: u32) -> String {
    format!("Logo颜色已变更为: {}", format_color(color))
}

impl Scene for ApartmentScene {
    fn key(&self) -> SceneKey {
        SceneKey::Apartment
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        let (w, h) = (ctx.config.width, ctx.config.height);

        if !ctx.assets.contains("logo", AssetKind::Image) {
            tracing::warn!("logo texture not loaded, drawing placeholder");
        }
        let size = LOGO_SIZE * LOGO_SCALE;
        let logo = ctx.graph.add(
            NodeKind::Image {
                texture: "logo".to_string(),
                scale: LOGO_SCALE,
                tint: None,
            },
            Bounds::centered(w / 2.0, h / 2.0, size, size),
        );

        ctx.graph.add(
            NodeKind::Outline {
                color: BORDER_COLOR,
                line_width: 4.0,
            },
            Bounds::new(w / 4.0, h / 4.0, w / 2.0, h / 2.0),
        );
        ctx.graph.add(
            NodeKind::Text {
                content: CAPTION.to_string(),
            },
            Bounds::centered(w / 2.0, h - 50.0, 200.0, 16.0),
        );

        ctx.input.on_pointer_down(&mut ctx.graph, logo);
        self.logo = Some(logo);
    }

    fn pointer_down(&mut self, ctx: &mut SceneContext, node: NodeId) {
        if self.logo != Some(node) {
            return;
        }
        let color = self.rng.gen_range(0..=0xFF_FFFF);
        self.tint_logo(ctx, color);
        let now = ctx.now();
        ctx.emitter.emit_spontaneous(now, tint_message(color));
    }

    fn receiver(&mut self) -> Option<&mut dyn CommandReceiver> {
        Some(self)
    }
}

impl CommandReceiver for ApartmentScene {
    fn receive(&mut self, ctx: &mut SceneContext, raw: &str) {
        tracing::debug!(command = raw, "scene received command");
        ctx.emitter
            .emit(EventEnvelope::CommandResponse(format!("游戏引擎收到命令: {raw}")));

        let mut words = raw.split_whitespace();
        let directive = words.next().unwrap_or_default().to_ascii_lowercase();
        match directive.as_str() {
            "map" => {
                let delay = ctx.config.map_delay;
                let mut lines = vec!["公寓地图:".to_string()];
                lines.extend(ctx.config.floor_plan.iter().map(|room| format!("- {room}")));
                for line in lines {
                    ctx.timeline.delayed_call(
                        delay,
                        DeferredAction::Emit(EventEnvelope::CommandResponse(line)),
                    );
                }
            }
            "tint" => {
                let Some(color) = words.next().and_then(parse_color) else {
                    return;
                };
                if self.tint_logo(ctx, color) {
                    ctx.emitter
                        .emit(EventEnvelope::CommandResponse(tint_message(color)));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0000"), Some(0xff0000));
        assert_eq!(parse_color("00FF00"), Some(0x00ff00));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("#ff00001"), None);
    }

    #[test]
    fn test_format_color_pads() {
        assert_eq!(format_color(0xab), "#0000ab");
        assert_eq!(format_color(0xFFFFFF), "#ffffff");
    }
}
