// src/components/transform.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Vec2;

/// ワールド空間での位置・拡大率・回転 (度) を持つコンポーネントだよ！📍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    pub position: Vec2,
    pub scale: Vec2,
    /// 回転角 (度)。
    pub rotation: f64,
}

impl TransformComponent {
    pub fn new(position: Vec2, scale: Vec2, rotation: f64) -> Self {
        Self { position, scale, rotation }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ONE, 0.0)
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE, 0.0)
    }
}

impl Component for TransformComponent {}
