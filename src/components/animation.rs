// src/components/animation.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

/// スプライトシートを横にパラパラめくるアニメーション情報。🎞️
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationComponent {
    pub num_frames: u32,
    pub current_frame: u32,
    /// 1秒あたりのコマ数。
    pub frame_speed_rate: u32,
    pub is_loop: bool,
    /// アニメーション開始時刻 (ms)。0 のままなら AnimationSystem が最初のフレームで埋める。
    pub start_time_ms: f64,
}

impl AnimationComponent {
    pub fn new(num_frames: u32, frame_speed_rate: u32, is_loop: bool) -> Self {
        Self {
            num_frames,
            current_frame: 0,
            frame_speed_rate,
            is_loop,
            start_time_ms: 0.0,
        }
    }
}

impl Component for AnimationComponent {}
