// src/events/keyboard.rs

use crate::ecs::Event;
use crate::input::Key;

/// キーが押された。⌨️
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressedEvent {
    pub key: Key,
}

/// キーが離された。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReleasedEvent {
    pub key: Key,
}

impl Event for KeyPressedEvent {}
impl Event for KeyReleasedEvent {}
