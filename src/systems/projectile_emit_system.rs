// src/systems/projectile_emit_system.rs

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::components::{
    BoxColliderComponent, ProjectileComponent, ProjectileEmitterComponent, RigidBodyComponent,
    SpriteComponent, TransformComponent,
};
use crate::config::layout::{BULLET_SPRITE_SIZE, BULLET_TEXTURE_ID, ENTITY_Z_INDEX};
use crate::config::{PLAYER_TAG, PROJECTILES_GROUP};
use crate::ecs::{EcsResult, Entity, EventBus, Registry, Signature, System};
use crate::events::KeyPressedEvent;
use crate::input::Key;
use crate::math::Vec2;

/// 弾を撃つシステム！🔫
///
/// - プレイヤー以外の砲台は `repeat_frequency_ms` ごとに自動で撃つ。
/// - プレイヤーはスペースキーで、いま進んでいる方向に撃つ (止まっていたら撃たない)。
///
/// キーイベントはフレームの前半に届くので、ハンドラでは「撃ちたい」フラグを立てるだけにして、
/// 実際の発射は `update` で今フレームの時刻を使ってやるよ。
#[derive(Default)]
pub struct ProjectileEmitSystem {
    fire_requested: Rc<Cell<bool>>,
}

impl ProjectileEmitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, registry: &mut Registry, entities: &[Entity], now_ms: f64) -> EcsResult<()> {
        let fire_requested = self.fire_requested.replace(false);
        for &entity in entities {
            let emitter = registry.get_component::<ProjectileEmitterComponent>(entity)?.clone();
            let velocity = if registry.has_tag(entity, PLAYER_TAG) {
                if !fire_requested {
                    continue;
                }
                let facing = registry
                    .get_component::<RigidBodyComponent>(entity)
                    .map(|body| body.velocity)
                    .unwrap_or(Vec2::ZERO);
                let direction = Vec2::new(direction_of(facing.x), direction_of(facing.y));
                if direction.is_zero() {
                    continue;
                }
                Vec2::new(emitter.velocity.x * direction.x, emitter.velocity.y * direction.y)
            } else {
                if emitter.repeat_frequency_ms <= 0.0
                    || now_ms - emitter.last_emission_time_ms < emitter.repeat_frequency_ms
                {
                    continue;
                }
                emitter.velocity
            };

            let origin = Self::muzzle_position(registry, entity)?;
            let projectile = Self::spawn_projectile(registry, origin, velocity, &emitter, now_ms)?;
            debug!("ProjectileEmitSystem: {} fired {}", entity, projectile);
            registry
                .get_component_mut::<ProjectileEmitterComponent>(entity)?
                .last_emission_time_ms = now_ms;
        }
        Ok(())
    }

    /// 弾の出る位置。スプライトがあればその中心から。
    fn muzzle_position(registry: &Registry, entity: Entity) -> EcsResult<Vec2> {
        let transform = registry.get_component::<TransformComponent>(entity)?;
        let mut origin = transform.position;
        if let Ok(sprite) = registry.get_component::<SpriteComponent>(entity) {
            origin.x += f64::from(sprite.width) * transform.scale.x / 2.0;
            origin.y += f64::from(sprite.height) * transform.scale.y / 2.0;
        }
        Ok(origin)
    }

    fn spawn_projectile(
        registry: &mut Registry,
        origin: Vec2,
        velocity: Vec2,
        emitter: &ProjectileEmitterComponent,
        now_ms: f64,
    ) -> EcsResult<Entity> {
        let size = f64::from(BULLET_SPRITE_SIZE);
        let projectile = registry.create_entity();
        registry.add_component(projectile, TransformComponent::new(origin, Vec2::ONE, 0.0))?;
        registry.add_component(projectile, RigidBodyComponent::new(velocity))?;
        registry.add_component(
            projectile,
            SpriteComponent::new(BULLET_TEXTURE_ID, BULLET_SPRITE_SIZE, BULLET_SPRITE_SIZE, ENTITY_Z_INDEX),
        )?;
        registry.add_component(projectile, BoxColliderComponent::new(size, size, Vec2::ZERO))?;
        registry.add_component(
            projectile,
            ProjectileComponent::new(
                emitter.is_friendly,
                emitter.hit_percent_damage,
                emitter.duration_ms,
                now_ms,
            ),
        )?;
        registry.group(projectile, PROJECTILES_GROUP)?;
        Ok(projectile)
    }
}

/// 速度の成分から向き (-1, 0, 1) を取り出す。
fn direction_of(component: f64) -> f64 {
    if component > 0.0 {
        1.0
    } else if component < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl System for ProjectileEmitSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<ProjectileEmitterComponent>()?
            .with::<TransformComponent>()
    }

    fn subscribe_to_events(&self, bus: &mut EventBus) {
        let fire_requested = Rc::clone(&self.fire_requested);
        bus.subscribe::<KeyPressedEvent, _>(move |_, _, event| {
            if event.key == Key::Space {
                fire_requested.set(true);
            }
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(registry: &mut Registry, now_ms: f64) {
        registry
            .run_system::<ProjectileEmitSystem, _>(|system, registry, entities| {
                system.update(registry, entities, now_ms)
            })
            .unwrap();
        registry.update();
    }

    #[test]
    fn turret_fires_on_its_own_schedule() {
        let mut registry = Registry::new();
        registry.add_system(ProjectileEmitSystem::new()).unwrap();
        let tank = registry.create_entity();
        registry.add_component(tank, TransformComponent::at(100.0, 100.0)).unwrap();
        registry
            .add_component(
                tank,
                ProjectileEmitterComponent::new(Vec2::new(100.0, 0.0), 1000.0, 3000.0, 10, false),
            )
            .unwrap();
        registry.update();

        emit(&mut registry, 5000.0);
        emit(&mut registry, 5500.0);
        assert_eq!(registry.entities_in_group(PROJECTILES_GROUP).len(), 1, "まだ次の発射時刻じゃない");

        emit(&mut registry, 6000.0);
        let shots = registry.entities_in_group(PROJECTILES_GROUP);
        assert_eq!(shots.len(), 2);

        let bullet = registry.get_component::<ProjectileComponent>(shots[0]).unwrap();
        assert!(!bullet.is_friendly);
        assert_eq!(bullet.hit_percent_damage, 10);
        assert_eq!(
            registry.get_component::<RigidBodyComponent>(shots[0]).unwrap().velocity,
            Vec2::new(100.0, 0.0)
        );
    }

    #[test]
    fn player_fires_only_on_space_in_facing_direction() {
        let mut registry = Registry::new();
        let mut bus = EventBus::new();
        registry.add_system(ProjectileEmitSystem::new()).unwrap();
        let player = registry.create_entity();
        registry.add_component(player, TransformComponent::at(0.0, 0.0)).unwrap();
        registry.add_component(player, SpriteComponent::new("chopper", 32, 32, 2)).unwrap();
        registry.add_component(player, RigidBodyComponent::new(Vec2::new(0.0, -50.0))).unwrap();
        registry
            .add_component(
                player,
                ProjectileEmitterComponent::new(Vec2::new(300.0, 300.0), 0.0, 2000.0, 10, true),
            )
            .unwrap();
        registry.tag(player, PLAYER_TAG).unwrap();
        registry.update();
        registry.subscribe_systems_to_events(&mut bus);

        emit(&mut registry, 1000.0);
        assert!(registry.entities_in_group(PROJECTILES_GROUP).is_empty());

        bus.emit(&mut registry, KeyPressedEvent { key: Key::Space }).unwrap();
        emit(&mut registry, 1100.0);
        let shots = registry.entities_in_group(PROJECTILES_GROUP);
        assert_eq!(shots.len(), 1);
        assert_eq!(
            registry.get_component::<RigidBodyComponent>(shots[0]).unwrap().velocity,
            Vec2::new(0.0, -300.0)
        );
        assert_eq!(
            registry.get_component::<TransformComponent>(shots[0]).unwrap().position,
            Vec2::new(16.0, 16.0),
            "スプライトの中心から出る"
        );
        assert!(registry.get_component::<ProjectileComponent>(shots[0]).unwrap().is_friendly);

        emit(&mut registry, 1200.0);
        assert_eq!(registry.entities_in_group(PROJECTILES_GROUP).len(), 1, "フラグは1回で消える");
    }
}
