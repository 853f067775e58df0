// src/components/projectile_emitter.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Vec2;

/// 弾を撃つ砲台。📡💥
///
/// プレイヤー以外は `repeat_frequency_ms` ごとに自動で撃つ。
/// プレイヤーはスペースキーで、向いている方向に撃つよ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileEmitterComponent {
    pub velocity: Vec2,
    pub repeat_frequency_ms: f64,
    /// 撃った弾の寿命 (ms)。
    pub duration_ms: f64,
    pub hit_percent_damage: i32,
    pub is_friendly: bool,
    pub last_emission_time_ms: f64,
}

impl ProjectileEmitterComponent {
    pub fn new(
        velocity: Vec2,
        repeat_frequency_ms: f64,
        duration_ms: f64,
        hit_percent_damage: i32,
        is_friendly: bool,
    ) -> Self {
        Self {
            velocity,
            repeat_frequency_ms,
            duration_ms,
            hit_percent_damage,
            is_friendly,
            last_emission_time_ms: 0.0,
        }
    }
}

impl Component for ProjectileEmitterComponent {}
