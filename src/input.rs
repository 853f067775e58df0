// src/input.rs
//! キーボード入力まわり。ブラウザの `KeyboardEvent.key` の文字列を `Key` に変換するよ。🎹

use serde::{Deserialize, Serialize};

/// ゲームが気にするキーたち。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Right,
    Down,
    Left,
    Space,
    Escape,
    /// デバッグ表示 (当たり判定の枠) の切り替え。
    DebugToggle,
}

impl Key {
    /// `KeyboardEvent.key` の値から変換する。知らないキーは `None`。
    pub fn from_browser_key(name: &str) -> Option<Key> {
        match name {
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowRight" | "Right" => Some(Key::Right),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Escape),
            "d" | "D" => Some(Key::DebugToggle),
            _ => None,
        }
    }

    pub fn is_arrow(self) -> bool {
        matches!(self, Key::Up | Key::Right | Key::Down | Key::Left)
    }
}

/// フレームの頭で Game に渡す入力イベント。
/// ブラウザ側のリスナーがキューに積んで、GameApp が毎フレーム取り出すよ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// ページを閉じる等、ゲームを終わらせたいとき。
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_key_names_are_translated() {
        assert_eq!(Key::from_browser_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_browser_key(" "), Some(Key::Space));
        assert_eq!(Key::from_browser_key("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_browser_key("q"), None);
        assert!(Key::Up.is_arrow());
        assert!(!Key::Space.is_arrow());
    }
}
