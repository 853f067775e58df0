// src/events/collision.rs

use crate::ecs::{Entity, Event};

/// 2つのエンティティの当たり判定が重なったよ！💥 (CollisionSystem が発行)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

impl CollisionEvent {
    pub fn new(a: Entity, b: Entity) -> Self {
        Self { a, b }
    }

    /// `entity` と衝突した相手。`entity` がこの衝突に関係なければ `None`。
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

impl Event for CollisionEvent {}
