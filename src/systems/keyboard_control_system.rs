// src/systems/keyboard_control_system.rs

use log::trace;

use crate::components::{KeyboardControlledComponent, RigidBodyComponent, SpriteComponent};
use crate::ecs::{EcsResult, EventBus, Registry, Signature, System};
use crate::events::{KeyPressedEvent, KeyReleasedEvent};
use crate::input::Key;
use crate::math::Vec2;

/// 矢印キーで操作するシステム。🎮
///
/// キーが押されたら、その方向の速度を RigidBody に入れて、スプライトシートの行を
/// 向きに合わせて切り替える (上=0行目, 右=1, 下=2, 左=3)。
/// いま進んでいる方向のキーが離されたら止まるよ。
pub struct KeyboardControlSystem;

impl KeyboardControlSystem {
    fn direction(control: &KeyboardControlledComponent, key: Key) -> Option<(Vec2, u32)> {
        match key {
            Key::Up => Some((control.up_velocity, 0)),
            Key::Right => Some((control.right_velocity, 1)),
            Key::Down => Some((control.down_velocity, 2)),
            Key::Left => Some((control.left_velocity, 3)),
            _ => None,
        }
    }

    fn on_key_pressed(registry: &mut Registry, event: &KeyPressedEvent) -> EcsResult<()> {
        let controlled = registry.system_entities::<Self>()?.to_vec();
        for entity in controlled {
            let control = registry.get_component::<KeyboardControlledComponent>(entity)?;
            let Some((velocity, row)) = Self::direction(control, event.key) else {
                continue;
            };
            registry.get_component_mut::<RigidBodyComponent>(entity)?.velocity = velocity;
            let sprite = registry.get_component_mut::<SpriteComponent>(entity)?;
            sprite.src_rect.y = f64::from(row * sprite.height);
            trace!("KeyboardControlSystem: {} heads {:?}", entity, event.key);
        }
        Ok(())
    }

    fn on_key_released(registry: &mut Registry, event: &KeyReleasedEvent) -> EcsResult<()> {
        let controlled = registry.system_entities::<Self>()?.to_vec();
        for entity in controlled {
            let control = registry.get_component::<KeyboardControlledComponent>(entity)?;
            let Some((velocity, _)) = Self::direction(control, event.key) else {
                continue;
            };
            let body = registry.get_component_mut::<RigidBodyComponent>(entity)?;
            if body.velocity == velocity {
                body.velocity = Vec2::ZERO;
            }
        }
        Ok(())
    }
}

impl System for KeyboardControlSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<KeyboardControlledComponent>()?
            .with::<SpriteComponent>()?
            .with::<RigidBodyComponent>()
    }

    fn subscribe_to_events(&self, bus: &mut EventBus) {
        bus.subscribe::<KeyPressedEvent, _>(|registry, _, event| Self::on_key_pressed(registry, event));
        bus.subscribe::<KeyReleasedEvent, _>(|registry, _, event| Self::on_key_released(registry, event));
    }
}
