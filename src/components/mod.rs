// src/components/mod.rs
//! ゲームで使うコンポーネントたち。どれもただのデータで、振る舞いは systems 側にあるよ！

pub mod animation;
pub mod box_collider;
pub mod camera_follow;
pub mod health;
pub mod keyboard_controlled;
pub mod projectile;
pub mod projectile_emitter;
pub mod rigid_body;
pub mod sprite;
pub mod text_label;
pub mod transform;

pub use animation::AnimationComponent;
pub use box_collider::BoxColliderComponent;
pub use camera_follow::CameraFollowComponent;
pub use health::HealthComponent;
pub use keyboard_controlled::KeyboardControlledComponent;
pub use projectile::ProjectileComponent;
pub use projectile_emitter::ProjectileEmitterComponent;
pub use rigid_body::RigidBodyComponent;
pub use sprite::{SpriteComponent, SpriteFlip};
pub use text_label::TextLabelComponent;
pub use transform::TransformComponent;
