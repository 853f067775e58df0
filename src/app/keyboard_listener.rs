// src/app/keyboard_listener.rs
//! window に keydown / keyup リスナーを付けたり外したりするよ。⌨️
//! 押されたキーは入力キューに積むだけで、処理はフレームループが Game に渡すときにやる。

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Event, KeyboardEvent};

use crate::input::{InputEvent, Key};

pub type InputQueue = Rc<RefCell<VecDeque<InputEvent>>>;

const KEY_EVENTS: [&str; 2] = ["keydown", "keyup"];

/// 付けたリスナーのクロージャ。持っている間だけリスナーが生きてるよ。
pub struct KeyboardListeners {
    closures: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl KeyboardListeners {
    /// window に keydown / keyup リスナーを付ける。
    pub fn attach(queue: &InputQueue) -> Result<Self, JsValue> {
        let window = window().ok_or("Failed to get window")?;
        let mut closures = Vec::with_capacity(KEY_EVENTS.len());

        for event_name in KEY_EVENTS {
            let queue = Rc::clone(queue);
            let is_down = event_name == "keydown";
            let closure = Closure::wrap(Box::new(move |event: Event| {
                let Ok(keyboard_event) = event.dyn_into::<KeyboardEvent>() else {
                    error!("Failed to cast event to KeyboardEvent");
                    return;
                };
                let Some(key) = Key::from_browser_key(&keyboard_event.key()) else {
                    return;
                };
                // 矢印やスペースでページがスクロールしないように
                if key.is_arrow() || key == Key::Space {
                    keyboard_event.prevent_default();
                }
                if is_down && keyboard_event.repeat() {
                    return;
                }
                let input = if is_down {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                queue.borrow_mut().push_back(input);
            }) as Box<dyn FnMut(Event)>);

            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closures.push((event_name, closure));
        }
        debug!("Attached keyboard listeners");
        Ok(Self { closures })
    }

    /// リスナーを外す。
    pub fn detach(self) -> Result<(), JsValue> {
        let window = window().ok_or("Failed to get window")?;
        for (event_name, closure) in &self.closures {
            window.remove_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
        }
        debug!("Detached keyboard listeners");
        Ok(())
    }
}
