// src/config/layout.rs
//! 画面の見た目に関する定数を定義するよ！
//! 背景色、スプライトの大きさ、体力バーの形、デバッグ表示の色など。

use crate::render::Color;

pub const BACKGROUND_COLOR: Color = Color::rgb(21, 21, 21); // 画面クリアの色

pub const TILE_TEXTURE_ID: &str = "jungle-tilemap"; // タイルマップ画像の ID
pub const TILE_Z_INDEX: i32 = 0; // タイルはいちばん奥

pub const VEHICLE_SPRITE_SIZE: u32 = 32; // 戦車・トラックの画像サイズ (px)
pub const CHOPPER_SPRITE_SIZE: u32 = 32; // ヘリの1コマのサイズ (px)
pub const RADAR_SPRITE_WIDTH: u32 = 64; // レーダーの1コマ
pub const RADAR_SPRITE_HEIGHT: u32 = 64;
pub const RADAR_MARGIN: f64 = 10.0; // 画面右上からの余白
pub const BULLET_SPRITE_SIZE: u32 = 4; // 弾の画像サイズ
pub const BULLET_TEXTURE_ID: &str = "bullet-image"; // 弾の画像 ID
pub const ENTITY_Z_INDEX: i32 = 1; // 乗り物や弾
pub const FLYING_Z_INDEX: i32 = 2; // ヘリ (乗り物より手前)
pub const HUD_Z_INDEX: i32 = 3; // 画面固定の UI

// --- 体力バー ---
pub const HEALTH_BAR_WIDTH: f64 = 15.0;
pub const HEALTH_BAR_HEIGHT: f64 = 5.0;
pub const HEALTH_BAR_GAP: f64 = 5.0; // スプライトの右下からのすき間
pub const HEALTH_TEXT_FONT_ID: &str = "pico8-font-5";
pub const HEALTH_GOOD_THRESHOLD: i32 = 70; // これ以上は緑
pub const HEALTH_WARN_THRESHOLD: i32 = 40; // これ以上は黄、未満は赤

// --- タイトル表示 ---
pub const TITLE_FONT_ID: &str = "charriot-font";
pub const TITLE_TEXT: &str = "CHOPPER ECS";

// --- デバッグ表示 ---
pub const COLLIDER_COLOR: Color = Color::rgb(255, 0, 0); // 当たり判定の枠
