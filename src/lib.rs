// src/lib.rs

// WASM と JavaScript を繋ぐための基本！
use wasm_bindgen::prelude::*;

// 自分で作ったモジュールたち！ これでコードを整理してるんだ。
pub mod app;
pub mod components;
pub mod config;
pub mod ecs;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod math;
pub mod render;
pub mod systems;

// よく使う型はクレートのトップからも使えるようにしておくよ。
pub use app::GameApp;
pub use config::EngineConfig;
pub use ecs::{Component, EcsError, EcsResult, Entity, Event, EventBus, Registry, Signature, System};
pub use game::Game;

// main 関数の代わりに、Wasm がロードされた時に最初に実行される関数だよ。
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // 2回目の init は SetLoggerError になるだけ
    let _ = app::console_logger::init(log::LevelFilter::Info);
    log::info!("ecs_wasm_engine: panic hook and console logger ready");
}
