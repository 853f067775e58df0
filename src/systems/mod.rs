// src/systems/mod.rs
//! システムたち。前半はゲームの状態を進めるもの、後半 (render_*) は描画するもの。

pub mod animation_system;
pub mod camera_movement_system;
pub mod collision_system;
pub mod damage_system;
pub mod keyboard_control_system;
pub mod movement_system;
pub mod projectile_emit_system;
pub mod projectile_lifecycle_system;
pub mod render_collider_system;
pub mod render_health_bar_system;
pub mod render_system;
pub mod render_text_system;

pub use animation_system::AnimationSystem;
pub use camera_movement_system::CameraMovementSystem;
pub use collision_system::CollisionSystem;
pub use damage_system::DamageSystem;
pub use keyboard_control_system::KeyboardControlSystem;
pub use movement_system::MovementSystem;
pub use projectile_emit_system::ProjectileEmitSystem;
pub use projectile_lifecycle_system::ProjectileLifecycleSystem;
pub use render_collider_system::RenderColliderSystem;
pub use render_health_bar_system::RenderHealthBarSystem;
pub use render_system::RenderSystem;
pub use render_text_system::RenderTextSystem;
