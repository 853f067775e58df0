// src/app/mod.rs
//! ブラウザとの繋ぎ込み (Canvas、キーボード、アセット読み込み、フレームループ) を置くモジュールだよ！

pub mod asset_store;
pub mod canvas_surface;
pub mod console_logger;
pub mod frame_loop;
pub mod game_app;
pub mod keyboard_listener;

pub use game_app::GameApp;
