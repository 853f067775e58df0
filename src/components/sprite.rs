// src/components/sprite.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::math::Rect;

/// スプライトの反転方向。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteFlip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// 画像 (テクスチャ) を描くためのコンポーネントだよ！🖼️
///
/// `asset_id` はアセット置き場に登録されたテクスチャの名前。
/// `src_rect` はテクスチャのどこを切り出すか (タイルマップやアニメーションのコマ選び)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteComponent {
    pub asset_id: String,
    pub width: u32,
    pub height: u32,
    /// 描画順。小さいほど奥 (先に描かれる)。
    pub z_index: i32,
    /// `true` ならカメラに追従せず画面に固定 (UI 的なもの)。
    pub is_fixed: bool,
    pub flip: SpriteFlip,
    pub src_rect: Rect,
}

impl SpriteComponent {
    pub fn new(asset_id: &str, width: u32, height: u32, z_index: i32) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            width,
            height,
            z_index,
            is_fixed: false,
            flip: SpriteFlip::None,
            src_rect: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
        }
    }

    /// テクスチャ内の切り出し位置 (ピクセル) を指定する。
    pub fn with_source(mut self, src_x: u32, src_y: u32) -> Self {
        self.src_rect.x = f64::from(src_x);
        self.src_rect.y = f64::from(src_y);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }
}

impl Component for SpriteComponent {}
