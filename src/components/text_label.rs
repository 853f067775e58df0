// src/components/text_label.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Vec2;
use crate::render::Color;

/// 画面に文字を出すコンポーネント。📝 `asset_id` はフォントの名前だよ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabelComponent {
    pub position: Vec2,
    pub text: String,
    pub asset_id: String,
    pub color: Color,
    pub is_fixed: bool,
}

impl TextLabelComponent {
    pub fn new(position: Vec2, text: &str, asset_id: &str, color: Color, is_fixed: bool) -> Self {
        Self {
            position,
            text: text.to_string(),
            asset_id: asset_id.to_string(),
            color,
            is_fixed,
        }
    }
}

impl Component for TextLabelComponent {}
