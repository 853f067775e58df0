// src/systems/render_system.rs

use itertools::Itertools;
use log::warn;

use crate::components::{SpriteComponent, TransformComponent};
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};
use crate::math::Rect;
use crate::render::{Camera, DrawSurface};

/// スプライトを描くシステム。🖼️
///
/// `z_index` の小さい順 (奥から手前へ) に並べて、カメラに映らないものは飛ばす。
/// テクスチャが見つからないスプライトは warn を出してスキップするだけで、フレームは止めないよ。
pub struct RenderSystem;

impl RenderSystem {
    pub fn update(
        &mut self,
        registry: &mut Registry,
        entities: &[Entity],
        surface: &mut dyn DrawSurface,
        camera: &Camera,
    ) -> EcsResult<()> {
        let mut renderables = Vec::with_capacity(entities.len());
        for &entity in entities {
            let transform = registry.get_component::<TransformComponent>(entity)?;
            let sprite = registry.get_component::<SpriteComponent>(entity)?;
            renderables.push((entity, transform, sprite));
        }

        for (entity, transform, sprite) in renderables
            .into_iter()
            .sorted_by_key(|(_, _, sprite)| sprite.z_index)
        {
            let world_bounds = Rect::new(
                transform.position.x,
                transform.position.y,
                f64::from(sprite.width) * transform.scale.x,
                f64::from(sprite.height) * transform.scale.y,
            );
            if !sprite.is_fixed && !camera.sees(&world_bounds) {
                continue;
            }
            let screen = camera.to_screen(transform.position, sprite.is_fixed);
            let dst = Rect::new(screen.x, screen.y, world_bounds.width, world_bounds.height);
            if let Err(error) =
                surface.draw_texture(&sprite.asset_id, sprite.src_rect, dst, transform.rotation, sprite.flip)
            {
                warn!("RenderSystem: skipped {}: {}", entity, error);
            }
        }
        Ok(())
    }
}

impl System for RenderSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<SpriteComponent>()
    }
}
