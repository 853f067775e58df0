// src/events/mod.rs
//! イベントバスに流れるゲームイベントたち。📨

pub mod collision;
pub mod keyboard;

pub use collision::CollisionEvent;
pub use keyboard::{KeyPressedEvent, KeyReleasedEvent};
