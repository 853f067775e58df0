// src/systems/render_text_system.rs

use log::warn;

use crate::components::TextLabelComponent;
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};
use crate::render::{Camera, DrawSurface};

/// TextLabel を描くシステム。📝 `is_fixed` じゃないラベルはカメラと一緒に動くよ。
pub struct RenderTextSystem;

impl RenderTextSystem {
    pub fn update(
        &mut self,
        registry: &mut Registry,
        entities: &[Entity],
        surface: &mut dyn DrawSurface,
        camera: &Camera,
    ) -> EcsResult<()> {
        for &entity in entities {
            let label = registry.get_component::<TextLabelComponent>(entity)?;
            let position = camera.to_screen(label.position, label.is_fixed);
            if let Err(error) = surface.draw_text(&label.text, &label.asset_id, position, label.color) {
                warn!("RenderTextSystem: skipped {}: {}", entity, error);
            }
        }
        Ok(())
    }
}

impl System for RenderTextSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty().with::<TextLabelComponent>()
    }
}
