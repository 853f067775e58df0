// src/app/canvas_surface.rs
//! `DrawSurface` の Canvas 2D 実装。🖌️

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::app::asset_store::AssetStore;
use crate::components::SpriteFlip;
use crate::math::{Rect, Vec2};
use crate::render::{Color, DrawSurface, RenderError};

fn backend(error: JsValue) -> RenderError {
    RenderError::Backend(format!("{:?}", error))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    assets: Rc<RefCell<AssetStore>>,
}

impl CanvasSurface {
    /// id で Canvas 要素を探して、2D コンテキストを取り出す。
    pub fn from_canvas_id(
        canvas_id: &str,
        width: u32,
        height: u32,
        assets: Rc<RefCell<AssetStore>>,
    ) -> Result<Self, JsValue> {
        let document = window()
            .and_then(|window| window.document())
            .ok_or("Failed to get document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{}' not found", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")?
            .ok_or("Canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        context.set_image_smoothing_enabled(false);
        context.set_text_baseline("top");

        Ok(Self {
            canvas,
            context,
            assets,
        })
    }

    fn blit(
        &self,
        image: &web_sys::HtmlImageElement,
        src: Rect,
        dst: Rect,
        rotation: f64,
        flip: SpriteFlip,
    ) -> Result<(), JsValue> {
        let context = &self.context;
        context.translate(dst.x + dst.width / 2.0, dst.y + dst.height / 2.0)?;
        context.rotate(rotation.to_radians())?;
        match flip {
            SpriteFlip::None => {}
            SpriteFlip::Horizontal => context.scale(-1.0, 1.0)?,
            SpriteFlip::Vertical => context.scale(1.0, -1.0)?,
        }
        context.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            image,
            src.x,
            src.y,
            src.width,
            src.height,
            -dst.width / 2.0,
            -dst.height / 2.0,
            dst.width,
            dst.height,
        )
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        let (width, height) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.context.clear_rect(0.0, 0.0, width, height);
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(0.0, 0.0, width, height);
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
        let assets = self.assets.borrow();
        let image = assets
            .texture(asset_id)
            .ok_or_else(|| RenderError::MissingTexture(asset_id.to_string()))?;

        // 途中で失敗しても変換行列は必ず元に戻す
        self.context.save();
        let result = self.blit(image, src, dst, rotation, flip);
        self.context.restore();
        result.map_err(backend)
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.stroke_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        font_id: &str,
        position: Vec2,
        color: Color,
    ) -> Result<(), RenderError> {
        let assets = self.assets.borrow();
        let font = assets
            .font(font_id)
            .ok_or_else(|| RenderError::MissingFont(font_id.to_string()))?;
        self.context.set_font(font);
        self.context.set_fill_style_str(&color.to_css());
        self.context
            .fill_text(text, position.x, position.y)
            .map_err(backend)
    }
}
