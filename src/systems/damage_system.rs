// src/systems/damage_system.rs

use log::{debug, info};

use crate::components::{BoxColliderComponent, HealthComponent, ProjectileComponent};
use crate::config::{ENEMIES_GROUP, PLAYER_TAG};
use crate::ecs::{EcsResult, Entity, EventBus, Registry, Signature, System};
use crate::events::CollisionEvent;

/// 弾が当たったらダメージを与えるシステム。🎯
///
/// 毎フレーム処理するものはなくて、CollisionEvent を購読して反応するだけ。
/// - 敵の弾 (`is_friendly == false`) はプレイヤーに、味方の弾は敵に効く。
/// - 当たった弾は消える。体力が 0 以下になった相手も消える。
pub struct DamageSystem;

impl DamageSystem {
    fn on_collision(registry: &mut Registry, event: &CollisionEvent) -> EcsResult<()> {
        for (projectile, target) in [(event.a, event.b), (event.b, event.a)] {
            if !registry.is_alive(projectile) || !registry.is_alive(target) {
                continue;
            }
            if registry.is_pending_destruction(projectile) || registry.is_pending_destruction(target) {
                continue;
            }
            if registry.has_component::<ProjectileComponent>(projectile)? {
                Self::apply_hit(registry, projectile, target)?;
            }
        }
        Ok(())
    }

    fn apply_hit(registry: &mut Registry, projectile: Entity, target: Entity) -> EcsResult<()> {
        let (is_friendly, damage) = {
            let bullet = registry.get_component::<ProjectileComponent>(projectile)?;
            (bullet.is_friendly, bullet.hit_percent_damage)
        };
        let hits_player = registry.has_tag(target, PLAYER_TAG) && !is_friendly;
        let hits_enemy = registry.belongs_to_group(target, ENEMIES_GROUP) && is_friendly;
        if !(hits_player || hits_enemy) || !registry.has_component::<HealthComponent>(target)? {
            return Ok(());
        }

        registry.destroy_entity(projectile)?;
        let health = registry.get_component_mut::<HealthComponent>(target)?;
        health.health_percentage -= damage;
        debug!(
            "DamageSystem: {} hit by {}, health now {}%",
            target, projectile, health.health_percentage
        );
        if health.is_depleted() {
            info!("DamageSystem: {} was destroyed", target);
            registry.destroy_entity(target)?;
        }
        Ok(())
    }
}

impl System for DamageSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty().with::<BoxColliderComponent>()
    }

    fn subscribe_to_events(&self, bus: &mut EventBus) {
        bus.subscribe::<CollisionEvent, _>(|registry, _, event| Self::on_collision(registry, event));
    }
}
