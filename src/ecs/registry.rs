// src/ecs/registry.rs

use std::any::{type_name, TypeId};
use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use crate::ecs::component::{component_id, Component, ComponentId};
use crate::ecs::entity::{Entity, EntityAllocator};
use crate::ecs::error::{EcsError, EcsResult};
use crate::ecs::event_bus::EventBus;
use crate::ecs::pool::{AnyPool, ComponentPool};
use crate::ecs::signature::{Signature, MAX_COMPONENTS};
use crate::ecs::system::System;

/// Registry に登録されたシステム1つぶんの席。
/// マッチ集合 (`entities`) は Registry 側が持っているので、システム本体を
/// `with_system` で借り出している間も、メンバーの出入りはちゃんと反映されるよ。
struct SystemSlot {
    type_id: TypeId,
    name: &'static str,
    signature: Signature,
    /// マッチしているエンティティ。抜けるときは末尾と入れ替えるので順番は保たれない。
    entities: Vec<Entity>,
    /// エンティティ → `entities` 内の位置。
    positions: HashMap<Entity, usize>,
    /// `with_system` 実行中は `None` (貸し出し中！)。
    system: Option<Box<dyn System>>,
}

impl SystemSlot {
    fn insert(&mut self, entity: Entity) {
        if !self.positions.contains_key(&entity) {
            self.positions.insert(entity, self.entities.len());
            self.entities.push(entity);
        }
    }

    /// O(1) で外す (ComponentPool と同じ swap-remove)。
    fn remove(&mut self, entity: Entity) {
        if let Some(position) = self.positions.remove(&entity) {
            self.entities.swap_remove(position);
            if let Some(moved) = self.entities.get(position) {
                self.positions.insert(*moved, position);
            }
        }
    }
}

/// Registry（レジストリ）は ECS の司令塔だよ！🫡
///
/// 全部のプール、全エンティティのシグネチャ、タグ/グループの索引、システムたちを一手に持っていて、
/// エンティティの作成・破棄、コンポーネントの追加・削除は全部ここを通る。
///
/// ポイントは「構造の変更は遅延、中身の変更は即時」っていうルール！
/// - `create_entity` / `destroy_entity` はキューに積むだけで、`update()` (フラッシュ) で反映。
/// - `add_component` / `remove_component` はその場でプールとシグネチャを書き換えて、
///   システムのマッチ集合もすぐ更新するよ。
pub struct Registry {
    allocator: EntityAllocator,
    /// エンティティ index ごとのシグネチャ。
    signatures: Vec<Signature>,
    /// フラッシュ済みでシステムのマッチ対象になっているか (index ごと)。
    visible: Vec<bool>,
    /// 破棄キューに入っているか (index ごと)。
    marked_for_destruction: Vec<bool>,
    /// コンポーネントID → プール。
    pools: Vec<Option<Box<dyn AnyPool>>>,
    systems: Vec<SystemSlot>,
    pending_creation: Vec<Entity>,
    pending_destruction: Vec<Entity>,
    tag_to_entity: HashMap<String, Entity>,
    entity_to_tag: HashMap<Entity, String>,
    group_to_entities: HashMap<String, HashSet<Entity>>,
    entity_to_group: HashMap<Entity, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            signatures: Vec::new(),
            visible: Vec::new(),
            marked_for_destruction: Vec::new(),
            pools: (0..MAX_COMPONENTS).map(|_| None).collect(),
            systems: Vec::new(),
            pending_creation: Vec::new(),
            pending_destruction: Vec::new(),
            tag_to_entity: HashMap::new(),
            entity_to_tag: HashMap::new(),
            group_to_entities: HashMap::new(),
            entity_to_group: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // エンティティ
    // ------------------------------------------------------------------

    /// 新しいエンティティを作る。
    /// すぐにハンドルが返ってくるからコンポーネントを付けられるけど、
    /// システムから見えるようになるのは次の `update()` から！
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let slot = entity.slot();
        if slot >= self.signatures.len() {
            self.signatures.resize(slot + 1, Signature::empty());
            self.visible.resize(slot + 1, false);
            self.marked_for_destruction.resize(slot + 1, false);
        }
        self.signatures[slot].reset();
        self.visible[slot] = false;
        self.marked_for_destruction[slot] = false;
        self.pending_creation.push(entity);
        debug!("Registry: created entity {:?}", entity);
        entity
    }

    /// エンティティを破棄キューに入れる。
    /// 次の `update()` までは今まで通り見えてるし、システムにもマッチしたままだよ。
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        let slot = entity.slot();
        if !self.marked_for_destruction[slot] {
            self.marked_for_destruction[slot] = true;
            self.pending_destruction.push(entity);
            debug!("Registry: entity {:?} marked for destruction", entity);
        }
        Ok(())
    }

    /// ハンドルが有効か (作られていて、まだフラッシュで破棄されていないか)。
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    pub fn is_pending_destruction(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.marked_for_destruction[entity.slot()]
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn pending_creation_count(&self) -> usize {
        self.pending_creation.len()
    }

    pub fn pending_destruction_count(&self) -> usize {
        self.pending_destruction.len()
    }

    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.ensure_alive(entity)?;
        Ok(self.signatures[entity.slot()])
    }

    fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity(entity))
        }
    }

    // ------------------------------------------------------------------
    // コンポーネント
    // ------------------------------------------------------------------

    /// コンポーネントを付ける (すでに持っていたら上書き)。
    /// プールとシグネチャは即更新、システムのマッチ集合も即再評価するよ。
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        let id = component_id::<T>()?;
        self.pool_entry::<T>(id).insert(entity, component);
        self.signatures[entity.slot()].set(id);
        trace!("Registry: added {} to {:?}", type_name::<T>(), entity);
        self.refresh_membership(entity);
        Ok(())
    }

    /// コンポーネントを外す。持っていなければ `Ok(None)`。
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<Option<T>> {
        self.ensure_alive(entity)?;
        let id = component_id::<T>()?;
        let removed = self.typed_pool_mut::<T>(id).and_then(|pool| pool.remove(entity));
        self.signatures[entity.slot()].clear(id);
        trace!("Registry: removed {} from {:?}", type_name::<T>(), entity);
        self.refresh_membership(entity);
        Ok(removed)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> EcsResult<bool> {
        self.ensure_alive(entity)?;
        let id = component_id::<T>()?;
        Ok(self.signatures[entity.slot()].test(id))
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.ensure_alive(entity)?;
        let id = component_id::<T>()?;
        self.typed_pool::<T>(id)
            .and_then(|pool| pool.get(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.ensure_alive(entity)?;
        let id = component_id::<T>()?;
        self.typed_pool_mut::<T>(id)
            .and_then(|pool| pool.get_mut(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })
    }

    /// 種別 `T` のプールを直接見る。1種類だけを全件スキャンしたいとき用。
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        let id = component_id::<T>().ok()?;
        self.typed_pool::<T>(id)
    }

    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        let id = component_id::<T>().ok()?;
        self.typed_pool_mut::<T>(id)
    }

    fn typed_pool<T: Component>(&self, id: ComponentId) -> Option<&ComponentPool<T>> {
        self.pools[id.bit()]
            .as_ref()
            .and_then(|pool| pool.as_any().downcast_ref::<ComponentPool<T>>())
    }

    fn typed_pool_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut ComponentPool<T>> {
        self.pools[id.bit()]
            .as_mut()
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<T>>())
    }

    /// プールがまだなければ作ってから返す。
    fn pool_entry<T: Component>(&mut self, id: ComponentId) -> &mut ComponentPool<T> {
        self.pools[id.bit()]
            .get_or_insert_with(|| Box::new(ComponentPool::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .expect("pool table is indexed by the component's own id")
    }

    // ------------------------------------------------------------------
    // タグ & グループ
    // ------------------------------------------------------------------

    /// エンティティにタグを付ける。タグは1つのエンティティだけのもの！
    /// 他の子が同じタグを持っていたら、その子からは外れて新しい子に移るよ。
    pub fn tag(&mut self, entity: Entity, name: &str) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.clear_tag(entity);
        if let Some(previous) = self.tag_to_entity.insert(name.to_string(), entity) {
            self.entity_to_tag.remove(&previous);
            debug!("Registry: tag '{}' moved from {:?} to {:?}", name, previous, entity);
        }
        self.entity_to_tag.insert(entity, name.to_string());
        Ok(())
    }

    pub fn remove_tag(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.clear_tag(entity);
        Ok(())
    }

    fn clear_tag(&mut self, entity: Entity) {
        if let Some(name) = self.entity_to_tag.remove(&entity) {
            self.tag_to_entity.remove(&name);
        }
    }

    /// タグからエンティティを引く。いなければ `None` (よくあることなのでエラーにはしない)。
    pub fn entity_with_tag(&self, name: &str) -> Option<Entity> {
        self.tag_to_entity.get(name).copied()
    }

    pub fn has_tag(&self, entity: Entity, name: &str) -> bool {
        self.entity_to_tag.get(&entity).is_some_and(|tag| tag == name)
    }

    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.entity_to_tag.get(&entity).map(String::as_str)
    }

    /// エンティティをグループに入れる。所属できるグループは1つだけなので、前のグループからは抜けるよ。
    pub fn group(&mut self, entity: Entity, name: &str) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.clear_group(entity);
        self.group_to_entities
            .entry(name.to_string())
            .or_default()
            .insert(entity);
        self.entity_to_group.insert(entity, name.to_string());
        Ok(())
    }

    pub fn remove_group(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.clear_group(entity);
        Ok(())
    }

    fn clear_group(&mut self, entity: Entity) {
        if let Some(name) = self.entity_to_group.remove(&entity) {
            if let Some(members) = self.group_to_entities.get_mut(&name) {
                members.remove(&entity);
                if members.is_empty() {
                    self.group_to_entities.remove(&name);
                }
            }
        }
    }

    /// グループのメンバー一覧 (index 順)。グループがなければ空っぽ。
    pub fn entities_in_group(&self, name: &str) -> Vec<Entity> {
        let mut members: Vec<Entity> = self
            .group_to_entities
            .get(name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    pub fn belongs_to_group(&self, entity: Entity, name: &str) -> bool {
        self.entity_to_group.get(&entity).is_some_and(|group| group == name)
    }

    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.entity_to_group.get(&entity).map(String::as_str)
    }

    // ------------------------------------------------------------------
    // システム
    // ------------------------------------------------------------------

    /// システムを登録する。同じ種類の二重登録は `DuplicateSystem` エラー！
    /// 登録した時点ですでに見えているエンティティは、その場でマッチ判定するよ。
    pub fn add_system<S: System>(&mut self, system: S) -> EcsResult<()> {
        let type_id = TypeId::of::<S>();
        let name = type_name::<S>();
        if self.slot_index(type_id).is_some() {
            return Err(EcsError::DuplicateSystem(name));
        }
        let signature = system.required_signature()?;

        let mut slot = SystemSlot {
            type_id,
            name,
            signature,
            entities: Vec::new(),
            positions: HashMap::new(),
            system: Some(Box::new(system)),
        };
        for index in 0..self.visible.len() {
            if self.visible[index] && self.signatures[index].contains(&signature) {
                if let Some(entity) = self.allocator.handle_at(index) {
                    slot.insert(entity);
                }
            }
        }
        debug!(
            "Registry: added system {} ({:?}, {} initial match(es))",
            name,
            signature,
            slot.entities.len()
        );
        self.systems.push(slot);
        Ok(())
    }

    /// システムの登録を解除して、本体を返す。
    pub fn remove_system<S: System>(&mut self) -> EcsResult<S> {
        let name = type_name::<S>();
        let index = self
            .slot_index(TypeId::of::<S>())
            .ok_or(EcsError::SystemNotFound(name))?;
        if self.systems[index].system.is_none() {
            return Err(EcsError::SystemBusy(name));
        }
        let slot = self.systems.remove(index);
        let boxed = slot.system.ok_or(EcsError::SystemBusy(name))?;
        boxed
            .into_any()
            .downcast::<S>()
            .map(|system| *system)
            .map_err(|_| EcsError::SystemNotFound(name))
    }

    pub fn has_system<S: System>(&self) -> bool {
        self.slot_index(TypeId::of::<S>()).is_some()
    }

    pub fn get_system<S: System>(&self) -> EcsResult<&S> {
        let slot = self.slot::<S>()?;
        let system = slot.system.as_deref().ok_or(EcsError::SystemBusy(slot.name))?;
        system
            .as_any()
            .downcast_ref::<S>()
            .ok_or(EcsError::SystemNotFound(slot.name))
    }

    pub fn get_system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        let name = type_name::<S>();
        let index = self
            .slot_index(TypeId::of::<S>())
            .ok_or(EcsError::SystemNotFound(name))?;
        let system = self.systems[index]
            .system
            .as_deref_mut()
            .ok_or(EcsError::SystemBusy(name))?;
        system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(EcsError::SystemNotFound(name))
    }

    /// システム `S` にいまマッチしているエンティティ。
    pub fn system_entities<S: System>(&self) -> EcsResult<&[Entity]> {
        Ok(&self.slot::<S>()?.entities)
    }

    /// システム `S` を借り出して `f` を実行する。
    ///
    /// `f` にはシステム本体、Registry、そしてマッチ集合のスナップショットが渡されるよ。
    /// スナップショットは呼び出し時点のコピーなので、`f` の中でエンティティを作ったり壊したり、
    /// コンポーネントを付け外ししても、いま回しているリストは崩れない！🛡️
    pub fn with_system<S, R, F>(&mut self, f: F) -> EcsResult<R>
    where
        S: System,
        F: FnOnce(&mut S, &mut Registry, &[Entity]) -> R,
    {
        let type_id = TypeId::of::<S>();
        let name = type_name::<S>();
        let index = self.slot_index(type_id).ok_or(EcsError::SystemNotFound(name))?;
        let mut boxed = self.systems[index]
            .system
            .take()
            .ok_or(EcsError::SystemBusy(name))?;
        let snapshot = self.systems[index].entities.clone();

        let result = {
            let system: &mut dyn System = &mut *boxed;
            system
                .as_any_mut()
                .downcast_mut::<S>()
                .map(|concrete| f(concrete, self, &snapshot))
        };

        // 実行中に remove_system されているかもしれないので、型で席を探し直す
        match self.slot_index(type_id) {
            Some(index) => self.systems[index].system = Some(boxed),
            None => warn!("Registry: system {} was removed while it was running", name),
        }
        result.ok_or(EcsError::SystemNotFound(name))
    }

    /// `with_system` の、本体の処理も `EcsResult` を返す版。エラーは1段にまとめて返すよ。
    pub fn run_system<S, F>(&mut self, f: F) -> EcsResult<()>
    where
        S: System,
        F: FnOnce(&mut S, &mut Registry, &[Entity]) -> EcsResult<()>,
    {
        self.with_system::<S, _, _>(f)?
    }

    /// 登録済みの全システムに、今フレームのイベント購読をしてもらう。
    pub fn subscribe_systems_to_events(&self, bus: &mut EventBus) {
        for slot in &self.systems {
            if let Some(system) = slot.system.as_deref() {
                system.subscribe_to_events(bus);
            }
        }
    }

    /// 登録順のシステム名一覧 (デバッグ表示用)。
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|slot| slot.name).collect()
    }

    fn slot_index(&self, type_id: TypeId) -> Option<usize> {
        self.systems.iter().position(|slot| slot.type_id == type_id)
    }

    fn slot<S: System>(&self) -> EcsResult<&SystemSlot> {
        self.slot_index(TypeId::of::<S>())
            .map(|index| &self.systems[index])
            .ok_or(EcsError::SystemNotFound(type_name::<S>()))
    }

    /// コンポーネントが変わったエンティティを、全システムに対してマッチし直す。
    /// まだフラッシュされていない (作成待ちの) エンティティはどのシステムにも入れないよ。
    fn refresh_membership(&mut self, entity: Entity) {
        let slot = entity.slot();
        if !self.visible[slot] {
            return;
        }
        let signature = self.signatures[slot];
        for system in &mut self.systems {
            if signature.contains(&system.signature) {
                system.insert(entity);
            } else {
                system.remove(entity);
            }
        }
    }

    // ------------------------------------------------------------------
    // フラッシュ
    // ------------------------------------------------------------------

    /// 溜まっている作成・破棄をまとめて反映する (フレームごとのフラッシュ地点)。
    ///
    /// 1. 作成待ちのエンティティを見える状態にして、マッチする全システムに加える。
    /// 2. 破棄待ちのエンティティを全プール・タグ・グループ・システムから外し、
    ///    シグネチャを空にして、ID を解放する (以後そのハンドルは `StaleEntity`)。
    pub fn update(&mut self) {
        let created = std::mem::take(&mut self.pending_creation);
        for entity in &created {
            if !self.is_alive(*entity) {
                continue;
            }
            let slot = entity.slot();
            self.visible[slot] = true;
            let signature = self.signatures[slot];
            for system in &mut self.systems {
                if signature.contains(&system.signature) {
                    system.insert(*entity);
                }
            }
        }

        let destroyed = std::mem::take(&mut self.pending_destruction);
        for entity in &destroyed {
            if !self.is_alive(*entity) {
                continue;
            }
            for system in &mut self.systems {
                system.remove(*entity);
            }
            for pool in self.pools.iter_mut().flatten() {
                pool.remove_entity(*entity);
            }
            self.clear_tag(*entity);
            self.clear_group(*entity);

            let slot = entity.slot();
            self.signatures[slot].reset();
            self.visible[slot] = false;
            self.marked_for_destruction[slot] = false;
            self.allocator.free(*entity);
        }

        if !created.is_empty() || !destroyed.is_empty() {
            debug!(
                "Registry: flushed {} creation(s), {} destruction(s); {} alive",
                created.len(),
                destroyed.len(),
                self.entity_count()
            );
        }
    }
}
