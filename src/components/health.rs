// src/components/health.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

/// 体力 (パーセント)。0 以下になったら DamageSystem がエンティティを破棄するよ。❤️
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthComponent {
    pub health_percentage: i32,
}

impl HealthComponent {
    pub fn new(health_percentage: i32) -> Self {
        Self { health_percentage }
    }

    pub fn is_depleted(&self) -> bool {
        self.health_percentage <= 0
    }
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Component for HealthComponent {}
