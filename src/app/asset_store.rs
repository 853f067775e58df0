// src/app/asset_store.rs
//! 画像とフォントの置き場。ID で引けるようにしておいて、CanvasSurface が描くときに使うよ。🗃️

use std::collections::HashMap;

use futures::future::try_join_all;
use js_sys::Promise;
use log::info;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::level::{FontAsset, LevelAssets, TextureAsset};

#[derive(Default)]
pub struct AssetStore {
    textures: HashMap<String, HtmlImageElement>,
    /// フォント ID → Canvas の `font` 指定。
    fonts: HashMap<String, String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, id: &str, image: HtmlImageElement) {
        self.textures.insert(id.to_string(), image);
    }

    pub fn texture(&self, id: &str) -> Option<&HtmlImageElement> {
        self.textures.get(id)
    }

    pub fn add_font(&mut self, font: &FontAsset) {
        self.fonts.insert(font.id.clone(), font.css_font());
    }

    pub fn font(&self, id: &str) -> Option<&str> {
        self.fonts.get(id).map(String::as_str)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

/// 画像を1枚読み込んで、読み終わるまで待つ。
async fn load_image(texture: TextureAsset) -> Result<(String, HtmlImageElement), JsValue> {
    let image = HtmlImageElement::new()?;
    let loaded = Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(&texture.path);

    let result = JsFuture::from(loaded).await;
    image.set_onload(None);
    image.set_onerror(None);
    result.map_err(|_| {
        JsValue::from_str(&format!(
            "failed to load texture '{}' from {}",
            texture.id, texture.path
        ))
    })?;
    Ok((texture.id, image))
}

/// レベルのアセットを全部 (画像は並行して) 読み込む。1枚でも失敗したらエラー。
pub async fn load_level_assets(assets: LevelAssets) -> Result<AssetStore, JsValue> {
    let images = try_join_all(assets.textures.into_iter().map(load_image)).await?;

    let mut store = AssetStore::new();
    for (id, image) in images {
        store.add_texture(&id, image);
    }
    for font in &assets.fonts {
        store.add_font(font);
    }
    info!(
        "AssetStore: {} textures, {} fonts ready",
        store.texture_count(),
        store.fonts.len()
    );
    Ok(store)
}
