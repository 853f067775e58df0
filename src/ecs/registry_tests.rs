// src/ecs/registry_tests.rs
// Registry のテスト！ 遅延フラッシュ、マッチング、タグ/グループ、世代付きIDの再利用まで。

use super::*;
use crate::components::{BoxColliderComponent, HealthComponent, RigidBodyComponent, TransformComponent};
use crate::config::MapConfig;
use crate::math::Vec2;
use crate::systems::{CollisionSystem, MovementSystem};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

// --- テスト用のシステム ---

/// Health だけを要求するシステム。
struct HealthWatcher;

impl System for HealthWatcher {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty().with::<HealthComponent>()
    }
}

/// Transform と Health の両方を要求するシステム。
#[derive(Default)]
struct HealthBarProbe {
    runs: usize,
}

impl System for HealthBarProbe {
    fn required_signature(&self) -> EcsResult<Signature> {
        Signature::empty()
            .with::<TransformComponent>()?
            .with::<HealthComponent>()
    }
}

fn collider() -> BoxColliderComponent {
    BoxColliderComponent::new(32.0, 32.0, Vec2::ZERO)
}

fn sorted(entities: &[Entity]) -> Vec<Entity> {
    let mut entities = entities.to_vec();
    entities.sort();
    entities
}

// --- シグネチャとプール ---

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn signature_tracks_pools() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    assert!(registry.signature(entity).unwrap().is_empty());

    registry.add_component(entity, TransformComponent::at(1.0, 2.0)).unwrap();
    registry.add_component(entity, HealthComponent::new(80)).unwrap();
    let signature = registry.signature(entity).unwrap();
    assert_eq!(signature.count(), 2);
    assert!(signature.test(component_id::<TransformComponent>().unwrap()));
    assert!(registry.has_component::<HealthComponent>(entity).unwrap());
    assert!(registry.pool::<HealthComponent>().unwrap().contains(entity));

    let removed = registry.remove_component::<HealthComponent>(entity).unwrap();
    assert_eq!(removed, Some(HealthComponent::new(80)));
    assert!(!registry.has_component::<HealthComponent>(entity).unwrap());
    assert!(!registry.pool::<HealthComponent>().unwrap().contains(entity));
    assert_eq!(registry.signature(entity).unwrap().count(), 1);
    println!("signature_tracks_pools: PASSED ✅");
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn adding_twice_overwrites_and_removing_absent_is_ok() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, HealthComponent::new(100)).unwrap();
    registry.add_component(entity, HealthComponent::new(40)).unwrap();
    assert_eq!(registry.get_component::<HealthComponent>(entity).unwrap().health_percentage, 40);
    assert_eq!(registry.pool::<HealthComponent>().unwrap().len(), 1);

    assert_eq!(registry.remove_component::<RigidBodyComponent>(entity).unwrap(), None);
    assert!(matches!(
        registry.get_component::<RigidBodyComponent>(entity),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn components_are_mutable_in_place() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, TransformComponent::at(0.0, 0.0)).unwrap();
    registry
        .get_component_mut::<TransformComponent>(entity)
        .unwrap()
        .position += Vec2::new(3.0, 4.0);
    assert_eq!(
        registry.get_component::<TransformComponent>(entity).unwrap().position,
        Vec2::new(3.0, 4.0)
    );
}

// --- 遅延作成とマッチング ---

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn collision_system_matches_only_entities_with_colliders() {
    let mut registry = Registry::new();
    let a = registry.create_entity();
    registry.add_component(a, TransformComponent::at(0.0, 0.0)).unwrap();
    registry.add_component(a, RigidBodyComponent::default()).unwrap();
    let b = registry.create_entity();
    registry.add_component(b, TransformComponent::at(0.0, 0.0)).unwrap();
    registry.add_component(b, RigidBodyComponent::default()).unwrap();
    registry.add_component(b, collider()).unwrap();
    registry.add_system(CollisionSystem).unwrap();
    registry.add_system(MovementSystem::new(&MapConfig::default())).unwrap();

    assert!(
        registry.system_entities::<CollisionSystem>().unwrap().is_empty(),
        "フラッシュ前は誰も見えないはず"
    );

    registry.update();
    assert_eq!(registry.system_entities::<CollisionSystem>().unwrap(), &[b]);
    assert_eq!(sorted(registry.system_entities::<MovementSystem>().unwrap()), vec![a, b]);
    println!("collision_system_matches_only_entities_with_colliders: PASSED ✅");
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn created_entity_is_usable_but_invisible_until_flush() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    registry.update();

    let entity = registry.create_entity();
    registry.add_component(entity, HealthComponent::new(100)).unwrap();
    assert!(registry.is_alive(entity));
    assert_eq!(registry.pending_creation_count(), 1);
    assert!(registry.system_entities::<HealthWatcher>().unwrap().is_empty());

    registry.update();
    assert_eq!(registry.pending_creation_count(), 0);
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap(), &[entity]);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn membership_updates_immediately_after_flush() {
    let mut registry = Registry::new();
    registry.add_system(HealthBarProbe::default()).unwrap();
    let entity = registry.create_entity();
    registry.add_component(entity, TransformComponent::default()).unwrap();
    registry.update();
    assert!(registry.system_entities::<HealthBarProbe>().unwrap().is_empty());

    registry.add_component(entity, HealthComponent::new(50)).unwrap();
    assert_eq!(
        registry.system_entities::<HealthBarProbe>().unwrap(),
        &[entity],
        "見えているエンティティは付けた瞬間にマッチする"
    );

    registry.remove_component::<TransformComponent>(entity).unwrap();
    assert!(registry.system_entities::<HealthBarProbe>().unwrap().is_empty());
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn leaving_a_system_keeps_the_rest_of_its_members() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    let members: Vec<Entity> = (0..5)
        .map(|_| {
            let entity = registry.create_entity();
            registry.add_component(entity, HealthComponent::new(10)).unwrap();
            entity
        })
        .collect();
    registry.update();

    // 真ん中、先頭、末尾の順に抜けても、残りの位置はずれない
    for (removed, leaving) in [members[2], members[0], members[4]].into_iter().enumerate() {
        registry.remove_component::<HealthComponent>(leaving).unwrap();
        assert_eq!(registry.system_entities::<HealthWatcher>().unwrap().len(), 4 - removed);
    }
    assert_eq!(
        sorted(registry.system_entities::<HealthWatcher>().unwrap()),
        vec![members[1], members[3]]
    );

    registry.destroy_entity(members[3]).unwrap();
    registry.update();
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap(), &[members[1]]);

    registry.add_component(members[0], HealthComponent::new(5)).unwrap();
    registry.remove_component::<HealthComponent>(members[1]).unwrap();
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap(), &[members[0]]);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn system_added_late_picks_up_visible_entities() {
    let mut registry = Registry::new();
    let visible = registry.create_entity();
    registry.add_component(visible, HealthComponent::new(10)).unwrap();
    registry.update();
    let pending = registry.create_entity();
    registry.add_component(pending, HealthComponent::new(20)).unwrap();

    registry.add_system(HealthWatcher).unwrap();
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap(), &[visible]);

    registry.update();
    assert_eq!(
        sorted(registry.system_entities::<HealthWatcher>().unwrap()),
        vec![visible, pending]
    );
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn entity_matching_no_system_is_fine() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    let entity = registry.create_entity();
    registry.add_component(entity, RigidBodyComponent::default()).unwrap();
    registry.update();
    assert!(registry.is_alive(entity));
    assert!(registry.system_entities::<HealthWatcher>().unwrap().is_empty());
}

// --- 遅延破棄 ---

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn destroyed_entity_lingers_until_flush() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    let entity = registry.create_entity();
    registry.add_component(entity, HealthComponent::new(100)).unwrap();
    registry.update();

    registry.destroy_entity(entity).unwrap();
    registry.destroy_entity(entity).unwrap(); // 二重に呼んでも OK
    assert_eq!(registry.pending_destruction_count(), 1);
    assert!(registry.is_pending_destruction(entity));
    assert!(registry.get_component::<HealthComponent>(entity).is_ok());
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap(), &[entity]);

    registry.update();
    assert!(!registry.is_alive(entity));
    assert!(registry.system_entities::<HealthWatcher>().unwrap().is_empty());
    assert!(registry.pool::<HealthComponent>().unwrap().is_empty());
    assert_eq!(registry.entity_count(), 0);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn stale_handles_are_rejected() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, HealthComponent::new(100)).unwrap();
    registry.destroy_entity(entity).unwrap();
    registry.update();

    let stale = Err(EcsError::StaleEntity(entity));
    assert_eq!(registry.add_component(entity, HealthComponent::new(1)), stale);
    assert_eq!(registry.destroy_entity(entity), stale);
    assert_eq!(registry.tag(entity, "ghost"), stale);
    assert_eq!(registry.group(entity, "ghosts"), stale);
    assert_eq!(
        registry.get_component::<HealthComponent>(entity).unwrap_err(),
        EcsError::StaleEntity(entity)
    );
    assert_eq!(
        registry.remove_component::<HealthComponent>(entity).unwrap_err(),
        EcsError::StaleEntity(entity)
    );
    assert!(registry.has_component::<HealthComponent>(entity).is_err());
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn created_and_destroyed_in_the_same_frame_is_never_seen() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    let flash = registry.create_entity();
    registry.add_component(flash, HealthComponent::new(1)).unwrap();
    registry.destroy_entity(flash).unwrap();

    registry.update();
    assert!(!registry.is_alive(flash));
    assert!(registry.system_entities::<HealthWatcher>().unwrap().is_empty());
    assert!(registry.pool::<HealthComponent>().unwrap().is_empty());
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn reused_index_starts_clean_with_a_new_generation() {
    let mut registry = Registry::new();
    let old = registry.create_entity();
    registry.add_component(old, HealthComponent::new(100)).unwrap();
    registry.tag(old, "player").unwrap();
    registry.update();
    registry.destroy_entity(old).unwrap();
    registry.update();

    let new = registry.create_entity();
    assert_eq!(new.index(), old.index(), "空き番号が再利用される♻️");
    assert_ne!(new, old);
    assert!(new.generation() > old.generation());
    assert!(registry.signature(new).unwrap().is_empty());
    assert!(!registry.has_component::<HealthComponent>(new).unwrap());
    assert_eq!(registry.tag_of(new), None);
    assert!(registry.is_alive(new));
    assert!(!registry.is_alive(old));
}

// --- タグ & グループ ---

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn tag_is_cleared_by_destruction() {
    let mut registry = Registry::new();
    let player = registry.create_entity();
    registry.tag(player, "player").unwrap();
    registry.update();
    assert!(registry.has_tag(player, "player"));
    assert_eq!(registry.entity_with_tag("player"), Some(player));

    registry.destroy_entity(player).unwrap();
    assert!(registry.has_tag(player, "player"), "フラッシュまではタグも残る");
    registry.update();

    assert!(!registry.has_tag(player, "player"));
    assert_eq!(registry.entity_with_tag("player"), None);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn tags_are_unique_and_move_to_the_newest_owner() {
    let mut registry = Registry::new();
    let first = registry.create_entity();
    let second = registry.create_entity();
    registry.tag(first, "player").unwrap();
    registry.tag(second, "player").unwrap();

    assert_eq!(registry.entity_with_tag("player"), Some(second));
    assert!(!registry.has_tag(first, "player"));
    assert_eq!(registry.tag_of(first), None);

    registry.tag(second, "boss").unwrap();
    assert_eq!(registry.entity_with_tag("player"), None, "タグの付け替えで古いタグは消える");
    assert_eq!(registry.tag_of(second), Some("boss"));

    registry.remove_tag(second).unwrap();
    assert_eq!(registry.entity_with_tag("boss"), None);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn groups_track_membership() {
    let mut registry = Registry::new();
    let tank = registry.create_entity();
    let truck = registry.create_entity();
    let chopper = registry.create_entity();
    registry.group(tank, "enemies").unwrap();
    registry.group(truck, "enemies").unwrap();
    registry.group(chopper, "allies").unwrap();
    registry.update();

    assert_eq!(registry.entities_in_group("enemies"), vec![tank, truck]);
    assert!(registry.belongs_to_group(chopper, "allies"));
    assert_eq!(registry.group_of(truck), Some("enemies"));
    assert!(registry.entities_in_group("nobody").is_empty());

    registry.group(truck, "allies").unwrap();
    assert_eq!(registry.entities_in_group("enemies"), vec![tank]);
    assert!(!registry.belongs_to_group(truck, "enemies"));

    registry.destroy_entity(tank).unwrap();
    registry.update();
    assert!(registry.entities_in_group("enemies").is_empty());
    assert!(!registry.belongs_to_group(tank, "enemies"));

    registry.remove_group(chopper).unwrap();
    assert_eq!(registry.entities_in_group("allies"), vec![truck]);
}

// --- システムの管理 ---

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn duplicate_system_is_rejected() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    assert!(matches!(
        registry.add_system(HealthWatcher),
        Err(EcsError::DuplicateSystem(_))
    ));
    assert!(registry.has_system::<HealthWatcher>());
    assert_eq!(registry.system_names().len(), 1);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn systems_can_be_fetched_and_removed() {
    let mut registry = Registry::new();
    registry.add_system(HealthBarProbe::default()).unwrap();
    registry.get_system_mut::<HealthBarProbe>().unwrap().runs = 3;
    assert_eq!(registry.get_system::<HealthBarProbe>().unwrap().runs, 3);

    let removed = registry.remove_system::<HealthBarProbe>().unwrap();
    assert_eq!(removed.runs, 3);
    assert!(!registry.has_system::<HealthBarProbe>());
    assert!(matches!(
        registry.get_system::<HealthBarProbe>(),
        Err(EcsError::SystemNotFound(_))
    ));
    assert!(matches!(
        registry.remove_system::<HealthBarProbe>(),
        Err(EcsError::SystemNotFound(_))
    ));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn with_system_iterates_a_stable_snapshot() {
    let mut registry = Registry::new();
    registry.add_system(HealthWatcher).unwrap();
    let a = registry.create_entity();
    let b = registry.create_entity();
    registry.add_component(a, HealthComponent::new(10)).unwrap();
    registry.add_component(b, HealthComponent::new(20)).unwrap();
    registry.update();

    let visited = registry
        .with_system::<HealthWatcher, _, _>(|_, registry, entities| {
            let mut visited = Vec::new();
            for &entity in entities {
                visited.push(entity);
                // 回している途中で構造を変えても、スナップショットは崩れない
                registry.remove_component::<HealthComponent>(b).unwrap();
                let spawned = registry.create_entity();
                registry.add_component(spawned, HealthComponent::new(30)).unwrap();
                registry.destroy_entity(a).unwrap();
            }
            visited
        })
        .unwrap();

    assert_eq!(sorted(&visited), vec![a, b]);
    assert_eq!(
        registry.system_entities::<HealthWatcher>().unwrap(),
        &[a],
        "b は即座に抜け、a は破棄待ち、新顔はまだ見えない"
    );
    registry.update();
    assert_eq!(registry.system_entities::<HealthWatcher>().unwrap().len(), 2);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn running_system_cannot_be_borrowed_again() {
    let mut registry = Registry::new();
    registry.add_system(HealthBarProbe::default()).unwrap();

    let inner = registry
        .with_system::<HealthBarProbe, _, _>(|system, registry, _| {
            system.runs += 1;
            registry.get_system_mut::<HealthBarProbe>().err()
        })
        .unwrap();

    assert!(matches!(inner, Some(EcsError::SystemBusy(_))));
    assert_eq!(registry.get_system::<HealthBarProbe>().unwrap().runs, 1, "実行後はちゃんと席に戻る");
    assert!(matches!(
        registry.with_system::<HealthWatcher, _, _>(|_, _, _| ()),
        Err(EcsError::SystemNotFound(_))
    ));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn systems_subscribe_through_the_registry() {
    use crate::systems::DamageSystem;

    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    registry.add_system(DamageSystem).unwrap();
    registry.add_system(HealthWatcher).unwrap();
    registry.subscribe_systems_to_events(&mut bus);

    assert_eq!(bus.subscriber_count::<crate::events::CollisionEvent>(), 1);
    bus.reset();
    assert_eq!(bus.subscribed_kinds(), 0);
}
