// src/systems/collision_system.rs

use log::trace;

use crate::components::{BoxColliderComponent, TransformComponent};
use crate::ecs::{EcsResult, Entity, EventBus, Registry, Signature, System};
use crate::events::CollisionEvent;

/// 当たり判定 (AABB) を総当たりでチェックして、重なっていたら CollisionEvent を発行するよ！💥
///
/// 先に全ペアを調べ終わってから発行するので、ハンドラがコンポーネントを書き換えても
/// 今フレームの判定結果は変わらない。
pub struct CollisionSystem;

impl CollisionSystem {
    pub fn update(&mut self, registry: &mut Registry, bus: &mut EventBus, entities: &[Entity]) -> EcsResult<()> {
        let mut bounds = Vec::with_capacity(entities.len());
        for &entity in entities {
            let position = registry.get_component::<TransformComponent>(entity)?.position;
            let collider = registry.get_component::<BoxColliderComponent>(entity)?;
            bounds.push((entity, collider.bounds(position)));
        }

        let mut collisions = Vec::new();
        for (i, (a, a_bounds)) in bounds.iter().enumerate() {
            for (b, b_bounds) in &bounds[i + 1..] {
                if a_bounds.intersects(b_bounds) {
                    collisions.push(CollisionEvent::new(*a, *b));
                }
            }
        }

        for event in collisions {
            trace!("CollisionSystem: {} collided with {}", event.a, event.b);
            bus.emit(registry, event)?;
        }
        Ok(())
    }
}

impl System for CollisionSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<BoxColliderComponent>()
    }
}
