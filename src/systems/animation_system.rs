// src/systems/animation_system.rs

use crate::components::{AnimationComponent, SpriteComponent};
use crate::ecs::{EcsResult, Entity, Registry, Signature, System};

/// スプライトシートのコマを時間に合わせて進めるシステム。🎞️
///
/// コマ番号 = (経過ms × 秒間コマ数 / 1000) を総コマ数で割った余り。
/// ループしないアニメーションは最後のコマで止まるよ。
pub struct AnimationSystem;

impl AnimationSystem {
    pub fn update(&mut self, registry: &mut Registry, entities: &[Entity], now_ms: f64) -> EcsResult<()> {
        for &entity in entities {
            let animation = registry.get_component_mut::<AnimationComponent>(entity)?;
            if animation.num_frames == 0 {
                continue;
            }
            if animation.start_time_ms <= 0.0 {
                animation.start_time_ms = now_ms;
            }
            let elapsed = (now_ms - animation.start_time_ms).max(0.0);
            let ticks = (elapsed * f64::from(animation.frame_speed_rate) / 1000.0) as u64;
            animation.current_frame = if animation.is_loop {
                (ticks % u64::from(animation.num_frames)) as u32
            } else {
                ticks.min(u64::from(animation.num_frames - 1)) as u32
            };
            let frame = animation.current_frame;

            let sprite = registry.get_component_mut::<SpriteComponent>(entity)?;
            sprite.src_rect.x = f64::from(frame * sprite.width);
        }
        Ok(())
    }
}

impl System for AnimationSystem {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<SpriteComponent>()?
            .with::<AnimationComponent>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animate(registry: &mut Registry, now_ms: f64) {
        registry
            .run_system::<AnimationSystem, _>(|system, registry, entities| system.update(registry, entities, now_ms))
            .unwrap();
    }

    #[test]
    fn looping_animation_wraps_around() {
        let mut registry = Registry::new();
        registry.add_system(AnimationSystem).unwrap();
        let chopper = registry.create_entity();
        registry.add_component(chopper, SpriteComponent::new("chopper", 32, 32, 2)).unwrap();
        registry.add_component(chopper, AnimationComponent::new(2, 10, true)).unwrap();
        registry.update();

        animate(&mut registry, 1000.0); // 開始時刻が入る
        animate(&mut registry, 1150.0); // 1.5 コマ → 1
        assert_eq!(registry.get_component::<AnimationComponent>(chopper).unwrap().current_frame, 1);
        assert_eq!(registry.get_component::<SpriteComponent>(chopper).unwrap().src_rect.x, 32.0);

        animate(&mut registry, 1200.0); // 2 コマ → 0 に戻る
        assert_eq!(registry.get_component::<AnimationComponent>(chopper).unwrap().current_frame, 0);
    }

    #[test]
    fn one_shot_animation_stops_on_last_frame() {
        let mut registry = Registry::new();
        registry.add_system(AnimationSystem).unwrap();
        let explosion = registry.create_entity();
        registry.add_component(explosion, SpriteComponent::new("boom", 16, 16, 2)).unwrap();
        registry.add_component(explosion, AnimationComponent::new(4, 4, false)).unwrap();
        registry.update();

        animate(&mut registry, 500.0);
        animate(&mut registry, 10_500.0);
        assert_eq!(registry.get_component::<AnimationComponent>(explosion).unwrap().current_frame, 3);
        assert_eq!(registry.get_component::<SpriteComponent>(explosion).unwrap().src_rect.x, 48.0);
    }
}
