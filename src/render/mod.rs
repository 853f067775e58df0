// src/render/mod.rs
//! 描画まわり。ゲーム側は `DrawSurface` トレイト越しにしか絵を描かないので、
//! ブラウザの Canvas でも、テスト用の記録係でも同じシステムがそのまま動くよ。🎨

pub mod camera;
pub mod color;
pub mod recording;
pub mod surface;

pub use camera::Camera;
pub use color::Color;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{DrawSurface, RenderError};
