// src/systems/camera_movement_system.rs

use crate::components::{CameraFollowComponent, TransformComponent};
use crate::config::MapConfig;
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};
use crate::render::Camera;

/// CameraFollow を持つエンティティを画面の真ん中に映すようにカメラを動かす。🎥
pub struct CameraMovementSystem {
    map_width: f64,
    map_height: f64,
}

impl CameraMovementSystem {
    pub fn new(map: &MapConfig) -> Self {
        Self {
            map_width: map.width(),
            map_height: map.height(),
        }
    }

    pub fn update(&mut self, registry: &mut Registry, entities: &[Entity], camera: &mut Camera) -> EcsResult<()> {
        for &entity in entities {
            let position = registry.get_component::<TransformComponent>(entity)?.position;
            camera.center_on(position, self.map_width, self.map_height);
        }
        Ok(())
    }
}

impl System for CameraMovementSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<CameraFollowComponent>()?
            .with::<TransformComponent>()
    }
}
