// src/ecs/mod.rs
//! ECS (Entity-Component-System) の心臓部だよ！
//! エンティティID、コンポーネントプール、シグネチャ、システムのマッチング、
//! 遅延フラッシュ、そしてフレーム内イベントバスをここにまとめてる。

pub mod component;
pub mod entity;
pub mod error;
pub mod event_bus;
pub mod pool;
pub mod registry;
pub mod signature;
pub mod system;

// `crate::ecs::X` で使えるように主要な型を再エクスポート
pub use component::{component_id, Component, ComponentId, ComponentTypeRegistry};
pub use entity::Entity;
pub use error::{EcsError, EcsResult};
pub use event_bus::{Event, EventBus};
pub use pool::{AnyPool, ComponentPool};
pub use registry::Registry;
pub use signature::{Signature, MAX_COMPONENTS};
pub use system::System;

// Registry の大きめのテストは別ファイルに分けてるよ
#[cfg(test)]
mod registry_tests;
