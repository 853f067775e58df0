// src/components/projectile.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

/// 飛んでいる弾そのもの。寿命が来たら ProjectileLifecycleSystem が片付けるよ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileComponent {
    pub is_friendly: bool,
    pub hit_percent_damage: i32,
    pub duration_ms: f64,
    pub start_time_ms: f64,
}

impl ProjectileComponent {
    pub fn new(is_friendly: bool, hit_percent_damage: i32, duration_ms: f64, start_time_ms: f64) -> Self {
        Self {
            is_friendly,
            hit_percent_damage,
            duration_ms,
            start_time_ms,
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_time_ms > self.duration_ms
    }
}

impl Component for ProjectileComponent {}
