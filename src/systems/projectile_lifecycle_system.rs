// src/systems/projectile_lifecycle_system.rs

use log::trace;

use crate::components::ProjectileComponent;
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};

/// 寿命が尽きた弾を片付けるシステム。🧹
pub struct ProjectileLifecycleSystem;

impl ProjectileLifecycleSystem {
    pub fn update(&mut self, registry: &mut Registry, entities: &[Entity], now_ms: f64) -> EcsResult<()> {
        for &entity in entities {
            if registry.get_component::<ProjectileComponent>(entity)?.is_expired(now_ms) {
                trace!("ProjectileLifecycleSystem: {} expired", entity);
                registry.destroy_entity(entity)?;
            }
        }
        Ok(())
    }
}

impl System for ProjectileLifecycleSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty().with::<ProjectileComponent>()
    }
}
