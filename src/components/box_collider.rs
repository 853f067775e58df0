// src/components/box_collider.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::{Rect, Vec2};

/// 当たり判定用の箱 (AABB)。Transform の位置 + offset が左上になるよ。📦
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxColliderComponent {
    pub width: f64,
    pub height: f64,
    pub offset: Vec2,
}

impl BoxColliderComponent {
    pub fn new(width: f64, height: f64, offset: Vec2) -> Self {
        Self { width, height, offset }
    }

    /// ワールド座標での当たり判定の矩形。
    pub fn bounds(&self, position: Vec2) -> Rect {
        Rect::new(
            position.x + self.offset.x,
            position.y + self.offset.y,
            self.width,
            self.height,
        )
    }
}

impl Component for BoxColliderComponent {}
