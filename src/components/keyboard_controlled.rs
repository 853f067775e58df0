// src/components/keyboard_controlled.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Vec2;

/// 矢印キーで操作されるエンティティ。押された方向の速度をそのまま RigidBody に入れるよ。🎮
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardControlledComponent {
    pub up_velocity: Vec2,
    pub right_velocity: Vec2,
    pub down_velocity: Vec2,
    pub left_velocity: Vec2,
}

impl KeyboardControlledComponent {
    pub fn new(up_velocity: Vec2, right_velocity: Vec2, down_velocity: Vec2, left_velocity: Vec2) -> Self {
        Self {
            up_velocity,
            right_velocity,
            down_velocity,
            left_velocity,
        }
    }

    /// 上下左右どれも同じ速さで動く設定を作る。
    pub fn with_speed(speed: f64) -> Self {
        Self::new(
            Vec2::new(0.0, -speed),
            Vec2::new(speed, 0.0),
            Vec2::new(0.0, speed),
            Vec2::new(-speed, 0.0),
        )
    }
}

impl Component for KeyboardControlledComponent {}
