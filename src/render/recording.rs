// src/render/recording.rs

use std::collections::HashSet;

use crate::components::SpriteFlip;
use crate::math::{Rect, Vec2};
use crate::render::{Color, DrawSurface, RenderError};

/// RecordingSurface に記録された描画命令1つぶん。
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Texture {
        asset_id: String,
        src: Rect,
        dst: Rect,
        rotation: f64,
        flip: SpriteFlip,
    },
    StrokeRect(Rect, Color),
    FillRect(Rect, Color),
    Text {
        text: String,
        font_id: String,
        position: Vec2,
        color: Color,
    },
    Present,
}

/// 描いたものを全部メモしておくだけの描画先。📝
/// ブラウザなしで描画システムをテストするときに使うよ。
#[derive(Debug, Default)]
pub struct RecordingSurface {
    textures: HashSet<String>,
    fonts: HashSet<String>,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 「読み込み済み」として扱うテクスチャを登録する。
    pub fn with_texture(mut self, asset_id: &str) -> Self {
        self.textures.insert(asset_id.to_string());
        self
    }

    pub fn with_font(mut self, font_id: &str) -> Self {
        self.fonts.insert(font_id.to_string());
        self
    }

    /// 描かれたテクスチャの ID を順番に。
    pub fn drawn_textures(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Texture { asset_id, .. } => Some(asset_id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn drawn_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Clear(color));
        Ok(())
    }

    fn draw_texture(
        &mut self,
        asset_id: &str,
        src: Rect,
        dst: Rect,
        rotation: f64,
        flip: SpriteFlip,
    ) -> Result<(), RenderError> {
        if !self.textures.contains(asset_id) {
            return Err(RenderError::MissingTexture(asset_id.to_string()));
        }
        self.commands.push(DrawCommand::Texture {
            asset_id: asset_id.to_string(),
            src,
            dst,
            rotation,
            flip,
        });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::StrokeRect(rect, color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::FillRect(rect, color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        font_id: &str,
        position: Vec2,
        color: Color,
    ) -> Result<(), RenderError> {
        if !self.fonts.contains(font_id) {
            return Err(RenderError::MissingFont(font_id.to_string()));
        }
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font_id: font_id.to_string(),
            position,
            color,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}
