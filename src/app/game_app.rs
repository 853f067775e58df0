// src/app/game_app.rs

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::Promise;
use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::window;

use crate::app::asset_store::{self, AssetStore};
use crate::app::canvas_surface::CanvasSurface;
use crate::app::frame_loop::FrameLoop;
use crate::app::keyboard_listener::{InputQueue, KeyboardListeners};
use crate::config::EngineConfig;
use crate::game::Game;
use crate::input::InputEvent;
use crate::level::LevelAssets;

/// JavaScript から操作するゲームアプリ本体だよ！🕹️
///
/// ```js
/// const app = new GameApp("game-canvas", configJson, tilemapText);
/// await app.load_assets();
/// app.start();
/// ```
#[wasm_bindgen]
pub struct GameApp {
    game: Rc<RefCell<Game>>,
    surface: Rc<RefCell<CanvasSurface>>,
    assets: Rc<RefCell<AssetStore>>,
    level_assets: LevelAssets,
    input: InputQueue,
    keyboard: Option<KeyboardListeners>,
    frame_loop: Option<FrameLoop>,
}

#[wasm_bindgen]
impl GameApp {
    /// 設定 JSON (省略可) とタイルマップの中身からゲームを組み立てる。
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>, tilemap_text: &str) -> Result<GameApp, JsValue> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EngineConfig::default(),
        };
        let assets = Rc::new(RefCell::new(AssetStore::new()));
        let surface = CanvasSurface::from_canvas_id(
            canvas_id,
            config.window_width,
            config.window_height,
            Rc::clone(&assets),
        )?;

        let mut game = Game::new(config);
        let level_assets = game
            .load_level(tilemap_text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        info!("GameApp: level ready, {} textures to load", level_assets.textures.len());

        Ok(GameApp {
            game: Rc::new(RefCell::new(game)),
            surface: Rc::new(RefCell::new(surface)),
            assets,
            level_assets,
            input: Rc::new(RefCell::new(VecDeque::new())),
            keyboard: None,
            frame_loop: None,
        })
    }

    /// レベルが使う画像を全部読み込む。終わったら読み込んだ枚数で resolve する Promise を返すよ。
    pub fn load_assets(&self) -> Promise {
        let level_assets = self.level_assets.clone();
        let assets = Rc::clone(&self.assets);
        let started_ms = now_ms();
        future_to_promise(async move {
            let store = asset_store::load_level_assets(level_assets).await?;
            let count = store.texture_count();
            *assets.borrow_mut() = store;
            info!("GameApp: assets loaded in {:.0} ms", now_ms() - started_ms);
            Ok(JsValue::from(count as u32))
        })
    }

    /// キーボードを繋いで、フレームループを回し始める。
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.frame_loop.is_some() {
            return Ok(());
        }
        self.keyboard = Some(KeyboardListeners::attach(&self.input)?);
        self.frame_loop = Some(FrameLoop::start(
            Rc::clone(&self.game),
            Rc::clone(&self.surface),
            Rc::clone(&self.input),
        )?);
        Ok(())
    }

    /// ゲームを止めて、リスナーとループを片付ける。
    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.input.borrow_mut().push_back(InputEvent::Quit);
        self.game.borrow_mut().stop();
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.cancel()?;
        }
        if let Some(keyboard) = self.keyboard.take() {
            keyboard.detach()?;
        }
        Ok(())
    }

    /// ループを回さずに1フレームだけ進める (ページ側からのデバッグ用)。
    pub fn step(&mut self, delta_seconds: f64, now_ms: f64) -> Result<(), JsValue> {
        let events: Vec<_> = self.input.borrow_mut().drain(..).collect();
        let mut game = self.game.borrow_mut();
        game.process_input(events);
        game.update(delta_seconds, now_ms)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.game.borrow().is_running()
    }

    /// デバッグ表示用: 生きているエンティティの数。
    pub fn entity_count(&self) -> usize {
        self.game.borrow().registry().entity_count()
    }

    /// デバッグ表示用: 登録されているシステム名の JSON 配列。
    pub fn system_names_json(&self) -> String {
        let game = self.game.borrow();
        serde_json::to_string(&game.registry().system_names()).unwrap_or_else(|e| {
            error!("Failed to serialize system names: {}", e);
            "[]".to_string()
        })
    }
}

fn now_ms() -> f64 {
    window()
        .and_then(|window| window.performance())
        .map_or(0.0, |performance| performance.now())
}
