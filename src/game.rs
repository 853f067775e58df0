// src/game.rs
//! Game（ゲーム本体）だよ！🎮
//!
//! Registry、イベントバス、カメラ、設定をまとめて持っていて、1フレームの流れを決めてる。
//!
//! 1. `process_input` … 入力を受け取ってキーイベントを溜める (Esc で終了)
//! 2. `update`        … フラッシュ → バスのリセット → 購読 → キーイベント発行 → 各システム
//! 3. `render`        … 画面クリア → 描画システム → present

use log::{debug, info};
use thiserror::Error;

use crate::config::layout::BACKGROUND_COLOR;
use crate::config::EngineConfig;
use crate::ecs::{EcsError, EcsResult, EventBus, Registry};
use crate::events::{KeyPressedEvent, KeyReleasedEvent};
use crate::input::{InputEvent, Key};
use crate::level::{self, LevelAssets, LevelError};
use crate::render::{Camera, DrawSurface, RenderError};
use crate::systems::{
    AnimationSystem, CameraMovementSystem, CollisionSystem, MovementSystem, ProjectileEmitSystem,
    ProjectileLifecycleSystem, RenderColliderSystem, RenderHealthBarSystem, RenderSystem,
    RenderTextSystem,
};

/// rAF のタイミング揺れとして許す幅 (ms)。予算より少し早いだけのフレームは実行する。
const FRAME_JITTER_MS: f64 = 1.0;

/// フレームループが1回のコールバックで何をするか。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// ゲームが止まった。ループを畳む。
    Finish,
    /// まだ早い。何もせず次のコールバックを待つ。
    Wait,
    /// 前回から `elapsed_ms` 経ったので1フレーム進める。
    Run { elapsed_ms: f64 },
}

/// 描画フレームのエラー。
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub struct Game {
    registry: Registry,
    bus: EventBus,
    camera: Camera,
    config: EngineConfig,
    is_running: bool,
    /// 次の `update` で発行するキー入力 (届いた順)。
    queued_keys: Vec<InputEvent>,
}

impl Game {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "Game: created ({}x{} @ {} fps)",
            config.window_width, config.window_height, config.target_fps
        );
        Self {
            registry: Registry::new(),
            bus: EventBus::new(),
            camera: Camera::new(f64::from(config.window_width), f64::from(config.window_height)),
            config,
            is_running: true,
            queued_keys: Vec::new(),
        }
    }

    /// レベルを組み立てる。返ってくるアセット一覧はアプリ側で先読みしてね。
    pub fn load_level(&mut self, tilemap_text: &str) -> Result<LevelAssets, LevelError> {
        level::load_level(&mut self.registry, &self.config, tilemap_text)
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn stop(&mut self) {
        if self.is_running {
            info!("Game: stopping");
        }
        self.is_running = false;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// このフレームに届いた入力を処理する。
    pub fn process_input<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => self.stop(),
                InputEvent::KeyDown(Key::DebugToggle) => {
                    self.config.debug_colliders = !self.config.debug_colliders;
                    debug!("Game: debug colliders {}", self.config.debug_colliders);
                }
                InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => self.queued_keys.push(event),
            }
        }
    }

    /// 1フレームぶんゲームを進める。
    pub fn update(&mut self, delta_seconds: f64, now_ms: f64) -> EcsResult<()> {
        self.registry.update();
        self.bus.reset();
        self.registry.subscribe_systems_to_events(&mut self.bus);

        for event in std::mem::take(&mut self.queued_keys) {
            match event {
                InputEvent::KeyDown(key) => self.bus.emit(&mut self.registry, KeyPressedEvent { key })?,
                InputEvent::KeyUp(key) => self.bus.emit(&mut self.registry, KeyReleasedEvent { key })?,
                InputEvent::Quit => {}
            }
        }

        let bus = &mut self.bus;
        let camera = &mut self.camera;
        self.registry
            .run_system::<MovementSystem, _>(|system, registry, entities| {
                system.update(registry, entities, delta_seconds)
            })?;
        self.registry
            .run_system::<AnimationSystem, _>(|system, registry, entities| {
                system.update(registry, entities, now_ms)
            })?;
        self.registry
            .run_system::<CollisionSystem, _>(|system, registry, entities| {
                system.update(registry, bus, entities)
            })?;
        self.registry
            .run_system::<ProjectileEmitSystem, _>(|system, registry, entities| {
                system.update(registry, entities, now_ms)
            })?;
        self.registry
            .run_system::<CameraMovementSystem, _>(|system, registry, entities| {
                system.update(registry, entities, camera)
            })?;
        self.registry
            .run_system::<ProjectileLifecycleSystem, _>(|system, registry, entities| {
                system.update(registry, entities, now_ms)
            })?;
        Ok(())
    }

    /// 今の状態を `surface` に描く。
    pub fn render(&mut self, surface: &mut dyn DrawSurface) -> Result<(), FrameError> {
        surface.clear(BACKGROUND_COLOR)?;

        let camera = &self.camera;
        self.registry
            .run_system::<RenderSystem, _>(|system, registry, entities| {
                system.update(registry, entities, &mut *surface, camera)
            })?;
        if self.config.debug_colliders {
            self.registry
                .run_system::<RenderColliderSystem, _>(|system, registry, entities| {
                    system.update(registry, entities, &mut *surface, camera)
                })?;
        }
        self.registry
            .run_system::<RenderTextSystem, _>(|system, registry, entities| {
                system.update(registry, entities, &mut *surface, camera)
            })?;
        self.registry
            .run_system::<RenderHealthBarSystem, _>(|system, registry, entities| {
                system.update(registry, entities, &mut *surface, camera)
            })?;

        surface.present()?;
        Ok(())
    }

    /// 前のフレームから `elapsed_ms` 経っているとき、フレーム上限を守るために
    /// あと何 ms 待てばいいか。もう過ぎていれば 0。
    pub fn frame_delay_ms(&self, elapsed_ms: f64) -> f64 {
        (self.config.ms_per_frame() - elapsed_ms).max(0.0)
    }

    /// `elapsed_ms` 経った時点でフレームを進めてよいか。揺れの範囲なら進める。
    pub fn is_frame_due(&self, elapsed_ms: f64) -> bool {
        self.frame_delay_ms(elapsed_ms) < FRAME_JITTER_MS
    }

    /// 前回実行した時刻 `previous_ms` と今の時刻から、このコールバックでやることを決める。
    /// 最初のフレーム (`previous_ms` が無い) は1フレームぶん経ったものとして扱うよ。
    pub fn next_step(&self, previous_ms: Option<f64>, now_ms: f64) -> FrameStep {
        if !self.is_running {
            return FrameStep::Finish;
        }
        let elapsed_ms = previous_ms.map_or(self.config.ms_per_frame(), |previous| now_ms - previous);
        if self.is_frame_due(elapsed_ms) {
            FrameStep::Run { elapsed_ms }
        } else {
            FrameStep::Wait
        }
    }
}
