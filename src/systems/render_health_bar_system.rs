// src/systems/render_health_bar_system.rs

use log::warn;

use crate::components::{HealthComponent, SpriteComponent, TransformComponent};
use crate::config::layout::{
    HEALTH_BAR_GAP, HEALTH_BAR_HEIGHT, HEALTH_BAR_WIDTH, HEALTH_GOOD_THRESHOLD, HEALTH_TEXT_FONT_ID,
    HEALTH_WARN_THRESHOLD,
};
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};
use crate::math::{Rect, Vec2};
use crate::render::{Camera, Color, DrawSurface, RenderError};

/// 体力バーと「NN%」の文字を、スプライトの右下に描くシステム。❤️‍🩹
pub struct RenderHealthBarSystem;

impl RenderHealthBarSystem {
    /// 体力に応じたバーの色 (緑 → 黄 → 赤)。
    pub fn bar_color(health_percentage: i32) -> Color {
        if health_percentage >= HEALTH_GOOD_THRESHOLD {
            Color::GREEN
        } else if health_percentage >= HEALTH_WARN_THRESHOLD {
            Color::YELLOW
        } else {
            Color::RED
        }
    }

    pub fn update(
        &mut self,
        registry: &mut Registry,
        entities: &[Entity],
        surface: &mut dyn DrawSurface,
        camera: &Camera,
    ) -> EcsResult<()> {
        for &entity in entities {
            let transform = registry.get_component::<TransformComponent>(entity)?;
            let sprite = registry.get_component::<SpriteComponent>(entity)?;
            let health = registry.get_component::<HealthComponent>(entity)?.health_percentage;

            let screen = camera.to_screen(transform.position, sprite.is_fixed);
            let anchor = Vec2::new(
                screen.x + f64::from(sprite.width) * transform.scale.x,
                screen.y + f64::from(sprite.height) * transform.scale.y + HEALTH_BAR_GAP,
            );
            if let Err(error) = Self::draw_bar(surface, anchor, health) {
                warn!("RenderHealthBarSystem: skipped {}: {}", entity, error);
            }
        }
        Ok(())
    }

    fn draw_bar(surface: &mut dyn DrawSurface, anchor: Vec2, health: i32) -> Result<(), RenderError> {
        let color = Self::bar_color(health);
        let filled = HEALTH_BAR_WIDTH * f64::from(health.clamp(0, 100)) / 100.0;
        surface.fill_rect(Rect::new(anchor.x, anchor.y, filled, HEALTH_BAR_HEIGHT), color)?;
        let label_position = Vec2::new(anchor.x, anchor.y + HEALTH_BAR_HEIGHT + HEALTH_BAR_GAP);
        surface.draw_text(&format!("{}%", health), HEALTH_TEXT_FONT_ID, label_position, color)
    }
}

impl System for RenderHealthBarSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<SpriteComponent>()?
            .with::<HealthComponent>()
    }
}
