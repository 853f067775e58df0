// src/systems/movement_system.rs

use crate::components::{RigidBodyComponent, SpriteComponent, TransformComponent};
use crate::config::{MapConfig, ENEMIES_GROUP, PLAYER_TAG};
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};

/// 速度を位置に足し込むシステムだよ！🏃💨
///
/// - 敵 (グループ "enemies") はマップの外に出たら向きを反転して戻ってくる。
/// - プレイヤーはマップの外に出られない。
pub struct MovementSystem {
    map_width: f64,
    map_height: f64,
}

impl MovementSystem {
    pub fn new(map: &MapConfig) -> Self {
        Self {
            map_width: map.width(),
            map_height: map.height(),
        }
    }

    pub fn update(&mut self, registry: &mut Registry, entities: &[Entity], delta_seconds: f64) -> EcsResult<()> {
        for &entity in entities {
            let velocity = registry.get_component::<RigidBodyComponent>(entity)?.velocity;
            let is_enemy = registry.belongs_to_group(entity, ENEMIES_GROUP);
            let is_player = registry.has_tag(entity, PLAYER_TAG);
            let extent = match registry.get_component::<SpriteComponent>(entity) {
                Ok(sprite) => Some((f64::from(sprite.width), f64::from(sprite.height))),
                Err(_) => None,
            };

            let transform = registry.get_component_mut::<TransformComponent>(entity)?;
            transform.position += velocity * delta_seconds;
            let position = transform.position;

            if is_player {
                let (width, height) = extent
                    .map(|(w, h)| (w * transform.scale.x, h * transform.scale.y))
                    .unwrap_or((0.0, 0.0));
                transform.position.x = position.x.clamp(0.0, (self.map_width - width).max(0.0));
                transform.position.y = position.y.clamp(0.0, (self.map_height - height).max(0.0));
            } else if is_enemy && self.is_outside_map(position.x, position.y) {
                registry.get_component_mut::<RigidBodyComponent>(entity)?.velocity = -velocity;
            }
        }
        Ok(())
    }

    fn is_outside_map(&self, x: f64, y: f64) -> bool {
        x < 0.0 || x > self.map_width || y < 0.0 || y > self.map_height
    }
}

impl System for MovementSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<RigidBodyComponent>()
    }
}
