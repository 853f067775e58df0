// src/level/mod.rs
//! レベル (ステージ) の組み立て。
//! システムを登録して、タイルマップと登場人物をぜんぶエンティティとして作るよ。🏗️

pub mod tilemap;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{
    AnimationComponent, BoxColliderComponent, CameraFollowComponent, HealthComponent,
    KeyboardControlledComponent, ProjectileEmitterComponent, RigidBodyComponent, SpriteComponent,
    TextLabelComponent, TransformComponent,
};
use crate::config::layout::{
    BULLET_TEXTURE_ID, CHOPPER_SPRITE_SIZE, ENTITY_Z_INDEX, FLYING_Z_INDEX, HEALTH_TEXT_FONT_ID,
    HUD_Z_INDEX, RADAR_MARGIN, RADAR_SPRITE_HEIGHT, RADAR_SPRITE_WIDTH, TILE_TEXTURE_ID,
    TILE_Z_INDEX, TITLE_FONT_ID, TITLE_TEXT, VEHICLE_SPRITE_SIZE,
};
use crate::config::{EngineConfig, ENEMIES_GROUP, PLAYER_TAG, TILES_GROUP};
use crate::ecs::{EcsError, Entity, Registry};
use crate::math::Vec2;
use crate::render::Color;
use crate::systems::{
    AnimationSystem, CameraMovementSystem, CollisionSystem, DamageSystem, KeyboardControlSystem,
    MovementSystem, ProjectileEmitSystem, ProjectileLifecycleSystem, RenderColliderSystem,
    RenderHealthBarSystem, RenderSystem, RenderTextSystem,
};
use self::tilemap::{parse_tilemap, TilemapError};

/// レベルの組み立てに失敗したとき。
#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Tilemap(#[from] TilemapError),
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// 読み込むべき画像1枚。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureAsset {
    pub id: String,
    pub path: String,
}

/// 使うフォント1つ。Canvas の `font` 指定 (`"20px charriot"` みたいな) に変換して使うよ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontAsset {
    pub id: String,
    pub family: String,
    pub size_px: u32,
}

impl FontAsset {
    pub fn css_font(&self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }
}

/// レベルが必要とするアセットの一覧。アプリ側はこれを先読みしてから走り出す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAssets {
    pub textures: Vec<TextureAsset>,
    pub fonts: Vec<FontAsset>,
}

impl LevelAssets {
    fn texture(&mut self, id: &str, path: &str) {
        self.textures.push(TextureAsset {
            id: id.to_string(),
            path: path.to_string(),
        });
    }

    fn font(&mut self, id: &str, family: &str, size_px: u32) {
        self.fonts.push(FontAsset {
            id: id.to_string(),
            family: family.to_string(),
            size_px,
        });
    }
}

/// レベル1のアセット一覧。
pub fn level_assets() -> LevelAssets {
    let mut assets = LevelAssets::default();
    assets.texture("tank-image", "./assets/images/tank-panther-right.png");
    assets.texture("truck-image", "./assets/images/truck-ford-right.png");
    assets.texture("chopper-image", "./assets/images/chopper-spritesheet.png");
    assets.texture("radar-image", "./assets/images/radar.png");
    assets.texture(BULLET_TEXTURE_ID, "./assets/images/bullet.png");
    assets.texture(TILE_TEXTURE_ID, "./assets/tilemaps/jungle.png");
    assets.font(TITLE_FONT_ID, "charriot", 20);
    assets.font(HEALTH_TEXT_FONT_ID, "pico8", 5);
    assets
}

/// システムを全部登録して、レベル1のエンティティを作る。
///
/// 作ったエンティティが見えるようになるのは次の `registry.update()` からだよ。
pub fn load_level(registry: &mut Registry, config: &EngineConfig, tilemap_text: &str) -> Result<LevelAssets, LevelError> {
    register_systems(registry, config)?;

    let tile_count = spawn_tiles(registry, config, tilemap_text)?;
    let player = spawn_player(registry)?;
    spawn_radar(registry, config)?;
    spawn_enemies(registry)?;
    spawn_title(registry, config)?;

    info!(
        "Level: loaded {} tiles, player {}, {} entities pending",
        tile_count,
        player,
        registry.pending_creation_count()
    );
    Ok(level_assets())
}

fn register_systems(registry: &mut Registry, config: &EngineConfig) -> Result<(), EcsError> {
    registry.add_system(MovementSystem::new(&config.map))?;
    registry.add_system(AnimationSystem)?;
    registry.add_system(CollisionSystem)?;
    registry.add_system(DamageSystem)?;
    registry.add_system(KeyboardControlSystem)?;
    registry.add_system(CameraMovementSystem::new(&config.map))?;
    registry.add_system(ProjectileEmitSystem::new())?;
    registry.add_system(ProjectileLifecycleSystem)?;
    registry.add_system(RenderSystem)?;
    registry.add_system(RenderColliderSystem)?;
    registry.add_system(RenderTextSystem)?;
    registry.add_system(RenderHealthBarSystem)?;
    Ok(())
}

fn spawn_tiles(registry: &mut Registry, config: &EngineConfig, tilemap_text: &str) -> Result<usize, LevelError> {
    let map = &config.map;
    let tiles = parse_tilemap(tilemap_text, map.cols, map.rows)?;
    let step = map.scaled_tile_size();
    for tile in &tiles {
        let entity = registry.create_entity();
        registry.add_component(
            entity,
            TransformComponent::new(
                Vec2::new(tile.col as f64 * step, tile.row as f64 * step),
                Vec2::splat(map.tile_scale),
                0.0,
            ),
        )?;
        registry.add_component(
            entity,
            SpriteComponent::new(TILE_TEXTURE_ID, map.tile_size, map.tile_size, TILE_Z_INDEX)
                .with_source(tile.src_col * map.tile_size, tile.src_row * map.tile_size),
        )?;
        registry.group(entity, TILES_GROUP)?;
    }
    Ok(tiles.len())
}

fn spawn_player(registry: &mut Registry) -> Result<Entity, EcsError> {
    let size = f64::from(CHOPPER_SPRITE_SIZE);
    let chopper = registry.create_entity();
    registry.add_component(chopper, TransformComponent::at(240.0, 110.0))?;
    registry.add_component(chopper, RigidBodyComponent::default())?;
    registry.add_component(
        chopper,
        SpriteComponent::new("chopper-image", CHOPPER_SPRITE_SIZE, CHOPPER_SPRITE_SIZE, FLYING_Z_INDEX),
    )?;
    registry.add_component(chopper, AnimationComponent::new(2, 15, true))?;
    registry.add_component(chopper, BoxColliderComponent::new(size, size, Vec2::ZERO))?;
    registry.add_component(
        chopper,
        ProjectileEmitterComponent::new(Vec2::new(150.0, 150.0), 0.0, 10_000.0, 10, true),
    )?;
    registry.add_component(chopper, KeyboardControlledComponent::with_speed(80.0))?;
    registry.add_component(chopper, CameraFollowComponent)?;
    registry.add_component(chopper, HealthComponent::new(100))?;
    registry.tag(chopper, PLAYER_TAG)?;
    Ok(chopper)
}

fn spawn_radar(registry: &mut Registry, config: &EngineConfig) -> Result<Entity, EcsError> {
    let radar = registry.create_entity();
    let x = f64::from(config.window_width) - f64::from(RADAR_SPRITE_WIDTH) - RADAR_MARGIN;
    registry.add_component(radar, TransformComponent::at(x, RADAR_MARGIN))?;
    registry.add_component(
        radar,
        SpriteComponent::new("radar-image", RADAR_SPRITE_WIDTH, RADAR_SPRITE_HEIGHT, HUD_Z_INDEX).fixed(),
    )?;
    registry.add_component(radar, AnimationComponent::new(8, 5, true))?;
    Ok(radar)
}

/// 敵の乗り物。(画像, 位置, 速度, 弾の速度, 発射間隔ms, 弾の寿命ms)
const ENEMIES: [(&str, Vec2, Vec2, Vec2, f64, f64); 2] = [
    (
        "tank-image",
        Vec2::new(500.0, 495.0),
        Vec2::new(20.0, 0.0),
        Vec2::new(100.0, 0.0),
        5_000.0,
        3_000.0,
    ),
    (
        "truck-image",
        Vec2::new(115.0, 500.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 100.0),
        2_000.0,
        5_000.0,
    ),
];

fn spawn_enemies(registry: &mut Registry) -> Result<(), EcsError> {
    let size = f64::from(VEHICLE_SPRITE_SIZE);
    for (asset_id, position, velocity, shot_velocity, repeat_ms, duration_ms) in ENEMIES {
        let vehicle = registry.create_entity();
        registry.add_component(vehicle, TransformComponent::new(position, Vec2::ONE, 0.0))?;
        registry.add_component(vehicle, RigidBodyComponent::new(velocity))?;
        registry.add_component(
            vehicle,
            SpriteComponent::new(asset_id, VEHICLE_SPRITE_SIZE, VEHICLE_SPRITE_SIZE, ENTITY_Z_INDEX),
        )?;
        registry.add_component(vehicle, BoxColliderComponent::new(size, size, Vec2::ZERO))?;
        registry.add_component(
            vehicle,
            ProjectileEmitterComponent::new(shot_velocity, repeat_ms, duration_ms, 10, false),
        )?;
        registry.add_component(vehicle, HealthComponent::new(100))?;
        registry.group(vehicle, ENEMIES_GROUP)?;
    }
    Ok(())
}

fn spawn_title(registry: &mut Registry, config: &EngineConfig) -> Result<Entity, EcsError> {
    let label = registry.create_entity();
    registry.add_component(
        label,
        TextLabelComponent::new(
            Vec2::new(f64::from(config.window_width) / 2.0 - 60.0, 10.0),
            TITLE_TEXT,
            TITLE_FONT_ID,
            Color::GREEN,
            true,
        ),
    )?;
    Ok(label)
}
