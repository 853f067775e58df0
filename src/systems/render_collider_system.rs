// src/systems/render_collider_system.rs

use log::warn;

use crate::components::{BoxColliderComponent, TransformComponent};
use crate::config::layout::COLLIDER_COLOR;
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};
use crate::math::{Rect, Vec2};
use crate::render::{Camera, DrawSurface};

/// デバッグ用: 当たり判定の枠を赤い線で描く。🟥
pub struct RenderColliderSystem;

impl RenderColliderSystem {
    pub fn update(
        &mut self,
        registry: &mut Registry,
        entities: &[Entity],
        surface: &mut dyn DrawSurface,
        camera: &Camera,
    ) -> EcsResult<()> {
        for &entity in entities {
            let position = registry.get_component::<TransformComponent>(entity)?.position;
            let bounds = registry.get_component::<BoxColliderComponent>(entity)?.bounds(position);
            if !camera.sees(&bounds) {
                continue;
            }
            let screen = camera.to_screen(Vec2::new(bounds.x, bounds.y), false);
            let outline = Rect::new(screen.x, screen.y, bounds.width, bounds.height);
            if let Err(error) = surface.stroke_rect(outline, COLLIDER_COLOR) {
                warn!("RenderColliderSystem: {}: {}", entity, error);
            }
        }
        Ok(())
    }
}

impl System for RenderColliderSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<BoxColliderComponent>()
    }
}
