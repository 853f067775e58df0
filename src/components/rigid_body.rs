// src/components/rigid_body.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Vec2;

/// 速度 (ピクセル/秒) を持つコンポーネント。MovementSystem が位置に足し込むよ。🏃
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyComponent {
    pub velocity: Vec2,
}

impl RigidBodyComponent {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

impl Component for RigidBodyComponent {}
