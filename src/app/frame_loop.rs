// src/app/frame_loop.rs
//! requestAnimationFrame で回るフレームループ。🔁
//!
//! 毎フレーム: 入力キューを Game に渡す → update → render → 次のフレームを予約。
//! 目標 fps より (揺れの範囲を超えて) 速く呼ばれたときは、そのフレームは何もせず次を待つよ。
//! ゲームが止まったらクロージャを手放してループを畳む。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;

use crate::app::canvas_surface::CanvasSurface;
use crate::app::keyboard_listener::InputQueue;
use crate::game::{FrameStep, Game};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()
        .ok_or("Failed to get window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

pub struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(
        game: Rc<RefCell<Game>>,
        surface: Rc<RefCell<CanvasSurface>>,
        input: InputQueue,
    ) -> Result<Self, JsValue> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next_frame = Rc::clone(&callback);
        let next_handle = Rc::clone(&handle);
        let mut previous_ms: Option<f64> = None;

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            let mut game = game.borrow_mut();
            match game.next_step(previous_ms, now_ms) {
                FrameStep::Finish => {
                    info!("Frame loop finished");
                    next_handle.set(None);
                    // 実行中のクロージャはこの中で drop できない。コールバックを抜けてから手放す
                    if let Some(finished) = next_frame.borrow_mut().take() {
                        spawn_local(async move { drop(finished) });
                    }
                    return;
                }
                FrameStep::Wait => {}
                FrameStep::Run { elapsed_ms } => {
                    previous_ms = Some(now_ms);
                    let events: Vec<_> = input.borrow_mut().drain(..).collect();
                    game.process_input(events);

                    if let Err(e) = game.update(elapsed_ms / 1000.0, now_ms) {
                        error!("Game update failed, stopping: {}", e);
                        game.stop();
                    }
                    if let Err(e) = game.render(&mut *surface.borrow_mut()) {
                        error!("Game render failed: {}", e);
                    }
                }
            }

            if let Some(next) = next_frame.borrow().as_ref() {
                match request_frame(next) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(first) = callback.borrow().as_ref() {
            handle.set(Some(request_frame(first)?));
        }
        info!("Frame loop started");
        Ok(Self { callback, handle })
    }

    /// ゲームが止まってループが自分でクロージャを手放したか。
    pub fn is_finished(&self) -> bool {
        self.callback.borrow().is_none()
    }

    /// 予約済みのフレームを取り消して、ループを止める。
    pub fn cancel(self) -> Result<(), JsValue> {
        if let Some(id) = self.handle.take() {
            window()
                .ok_or("Failed to get window")?
                .cancel_animation_frame(id)?;
        }
        // クロージャは自分自身への参照を持っているので、ここで明示的に手放す
        self.callback.borrow_mut().take();
        Ok(())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use js_sys::Promise;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    use crate::app::asset_store::AssetStore;
    use crate::config::EngineConfig;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sleep_ms(ms: i32) -> JsFuture {
        JsFuture::from(Promise::new(&mut |resolve, _| {
            if let Some(window) = window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
            }
        }))
    }

    #[wasm_bindgen_test]
    async fn stopped_game_releases_the_frame_callback() {
        let document = window().unwrap().document().unwrap();
        let canvas = document.create_element("canvas").unwrap();
        canvas.set_id("frame-loop-test-canvas");
        document.body().unwrap().append_child(&canvas).unwrap();

        let mut game = Game::new(EngineConfig::default());
        game.stop();
        let assets = Rc::new(RefCell::new(AssetStore::new()));
        let surface = CanvasSurface::from_canvas_id("frame-loop-test-canvas", 320, 240, assets).unwrap();
        let input: InputQueue = Rc::new(RefCell::new(VecDeque::new()));

        let frame_loop = FrameLoop::start(
            Rc::new(RefCell::new(game)),
            Rc::new(RefCell::new(surface)),
            input,
        )
        .unwrap();
        assert!(!frame_loop.is_finished());

        sleep_ms(100).await.unwrap();
        assert!(frame_loop.is_finished());
        frame_loop.cancel().unwrap();
    }
}
