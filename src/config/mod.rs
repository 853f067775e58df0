// src/config/mod.rs
//! エンジンの設定。JSON から読めて、書いてない項目はデフォルト値になるよ。⚙️

pub mod layout;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// プレイヤーのタグ。
pub const PLAYER_TAG: &str = "player";
/// グループ名たち。
pub const ENEMIES_GROUP: &str = "enemies";
pub const TILES_GROUP: &str = "tiles";
pub const PROJECTILES_GROUP: &str = "projectiles";

/// 設定の読み込みに失敗したとき。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(&'static str),
}

/// タイルマップの形。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// タイル画像1枚の一辺 (px)。
    pub tile_size: u32,
    /// タイルを何倍に拡大して並べるか。
    pub tile_scale: f64,
    pub cols: usize,
    pub rows: usize,
}

impl MapConfig {
    /// ワールド上でのタイル1枚の一辺。
    pub fn scaled_tile_size(&self) -> f64 {
        f64::from(self.tile_size) * self.tile_scale
    }

    pub fn width(&self) -> f64 {
        self.cols as f64 * self.scaled_tile_size()
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.scaled_tile_size()
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            tile_scale: 3.5,
            cols: 25,
            rows: 20,
        }
    }
}

/// エンジン全体の設定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub map: MapConfig,
    /// 当たり判定の枠を描くか。
    pub debug_colliders: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            target_fps: 60,
            map: MapConfig::default(),
            debug_colliders: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        if config.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be greater than zero"));
        }
        if config.map.cols == 0 || config.map.rows == 0 {
            return Err(ConfigError::Invalid("map must have at least one row and column"));
        }
        Ok(config)
    }

    /// 1フレームに使える時間 (ms)。
    pub fn ms_per_frame(&self) -> f64 {
        1000.0 / f64::from(self.target_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!((config.window_width, config.window_height), (1280, 720));
        assert_eq!(config.map.scaled_tile_size(), 112.0);
        assert_eq!(config.map.width(), 2800.0);
        assert_eq!(config.map.height(), 2240.0);
        assert!((config.ms_per_frame() - 16.666).abs() < 0.01);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = EngineConfig::from_json(r#"{ "target_fps": 30, "map": { "cols": 4 } }"#).unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.map.cols, 4);
        assert_eq!(config.map.rows, 20);
        assert!(!config.debug_colliders);
        assert_eq!(config.ms_per_frame(), 1000.0 / 30.0);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(EngineConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "target_fps": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
