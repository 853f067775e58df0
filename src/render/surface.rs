// src/render/surface.rs

use thiserror::Error;

use crate::components::SpriteFlip;
use crate::math::{Rect, Vec2};
use crate::render::Color;

/// 描画中に起きるエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("texture '{0}' has not been loaded")]
    MissingTexture(String),
    #[error("font '{0}' has not been loaded")]
    MissingFont(String),
    #[error("drawing backend failed: {0}")]
    Backend(String),
}

/// 描画先 (キャンバス) の抽象。
///
/// 座標はすべて画面座標 (カメラ変換済み)。テクスチャやフォントは ID で指定して、
/// 実体の管理は実装側 (アセット置き場) に任せるよ。
pub trait DrawSurface {
    /// 画面全体を `color` で塗りつぶす。
    fn clear(&mut self, color: Color) -> Result<(), RenderError>;

    /// テクスチャ `asset_id` の `src` 部分を、画面の `dst` に貼る。`rotation` は度。
    fn draw_texture(
        &mut self,
        asset_id: &str,
        src: Rect,
        dst: Rect,
        rotation: f64,
        flip: SpriteFlip,
    ) -> Result<(), RenderError>;

    /// 枠線だけの矩形。
    fn stroke_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError>;

    fn draw_text(
        &mut self,
        text: &str,
        font_id: &str,
        position: Vec2,
        color: Color,
    ) -> Result<(), RenderError>;

    /// 1フレームぶん描き終わった合図。Canvas は即時描画なので何もしなくていい。
    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}
