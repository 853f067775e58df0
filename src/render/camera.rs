// src/render/camera.rs

use crate::math::{Rect, Vec2};

/// カメラ。ワールドのどの範囲が画面に映っているかを表す矩形だよ。🎥
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view: Rect,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            view: Rect::new(0.0, 0.0, width, height),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.view.x, self.view.y)
    }

    /// `target` が画面の真ん中に来るように動かす。ただしマップの外は映さない。
    pub fn center_on(&mut self, target: Vec2, map_width: f64, map_height: f64) {
        let max_x = (map_width - self.view.width).max(0.0);
        let max_y = (map_height - self.view.height).max(0.0);
        self.view.x = (target.x - self.view.width / 2.0).clamp(0.0, max_x);
        self.view.y = (target.y - self.view.height / 2.0).clamp(0.0, max_y);
    }

    /// ワールド座標 → 画面座標。`is_fixed` なものはカメラを無視するよ。
    pub fn to_screen(&self, world: Vec2, is_fixed: bool) -> Vec2 {
        if is_fixed {
            world
        } else {
            world - self.position()
        }
    }

    /// ワールド上の矩形が画面に (少しでも) 入っているか。
    pub fn sees(&self, bounds: &Rect) -> bool {
        self.view.intersects(bounds)
    }
}
