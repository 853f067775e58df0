// src/ecs/pool.rs

use std::any::{type_name, Any};

use crate::ecs::component::Component;
use crate::ecs::entity::Entity;

/// 型を知らなくても Registry がプールを操作できるようにするための小さなインターフェース。
///
/// エンティティ破棄のときは「全部のプールからこの子を消して！」ってお願いするだけなので、
/// 具体的な型 `T` は要らないんだ。型が必要な操作は `as_any` → downcast で1回だけ戻すよ。
pub trait AnyPool: Any {
    fn remove_entity(&mut self, entity: Entity);
    fn has(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// ComponentPool（コンポーネントプール）だよ！📦
///
/// 1種類のコンポーネントを隙間なく並べて持つ「疎集合 (sparse set)」。
/// - `dense`: コンポーネント本体。穴は絶対に空けない！
/// - `owners`: dense の各スロットの持ち主 (スロット → エンティティ)
/// - `sparse`: エンティティ index → スロット番号
///
/// 挿入・削除・参照ぜんぶ O(1) で、全件スキャンもキャッシュに優しい。✨
#[derive(Debug)]
pub struct ComponentPool<T: Component> {
    dense: Vec<T>,
    owners: Vec<Entity>,
    sparse: Vec<Option<usize>>,
}

impl<T: Component> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentPool<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: Vec::new(),
        }
    }

    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.slot())?)?;
        // index が同じでも世代が違えば別人！
        (self.owners[slot] == entity).then_some(slot)
    }

    /// コンポーネントを入れる。すでに持っていたら上書きして、古い値を返すよ。
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(slot) = self.slot_of(entity) {
            return Some(std::mem::replace(&mut self.dense[slot], component));
        }
        let index = entity.slot();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        self.sparse[index] = Some(self.dense.len());
        self.dense.push(component);
        self.owners.push(entity);
        None
    }

    /// コンポーネントを取り除く。
    /// 消した穴には末尾の要素を持ってきて埋める (swap-remove)。持ってなければ何もしない。
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_of(entity)?;
        self.sparse[entity.slot()] = None;

        let removed = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);
        // 末尾から引っ越してきた子がいたら、その子の住所を書き換える
        if let Some(moved) = self.owners.get(slot) {
            self.sparse[moved.slot()] = Some(slot);
        }
        Some(removed)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot_of(entity).map(move |slot| &mut self.dense[slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// 中身をそのまま見る (詰まった配列なので全件処理に便利)。
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T: Component> AnyPool for ComponentPool<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn has(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker(u32);
    impl Component for Marker {}

    fn e(index: u32) -> Entity {
        Entity::new(index, 0)
    }

    /// 全員の住所が正しいか (穴がないか) チェックするヘルパー。
    fn assert_dense(pool: &ComponentPool<Marker>) {
        assert_eq!(pool.dense.len(), pool.owners.len());
        for (slot, owner) in pool.owners.iter().enumerate() {
            assert_eq!(pool.sparse[owner.slot()], Some(slot), "{:?} の住所がずれてる！", owner);
        }
    }

    #[test]
    fn insert_get_and_overwrite() {
        let mut pool = ComponentPool::new();
        assert_eq!(pool.insert(e(3), Marker(1)), None);
        assert_eq!(pool.get(e(3)), Some(&Marker(1)));

        assert_eq!(pool.insert(e(3), Marker(2)), Some(Marker(1)), "上書きしたら古い値が返る");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(e(3)), Some(&Marker(2)));
    }

    #[test]
    fn swap_remove_keeps_pool_dense() {
        let mut pool = ComponentPool::new();
        for i in 0..5 {
            pool.insert(e(i), Marker(i * 10));
        }

        assert_eq!(pool.remove(e(1)), Some(Marker(10)));
        assert_dense(&pool);
        assert_eq!(pool.len(), 4);
        // 末尾にいた e(4) が slot 1 に引っ越してるはず
        assert_eq!(pool.entities()[1], e(4));
        assert_eq!(pool.get(e(4)), Some(&Marker(40)));

        assert_eq!(pool.remove(e(4)), Some(Marker(40)));
        assert_eq!(pool.remove(e(0)), Some(Marker(0)));
        assert_dense(&pool);
        assert_eq!(pool.as_slice().len(), 2);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut pool = ComponentPool::new();
        pool.insert(e(0), Marker(0));
        assert_eq!(pool.remove(e(8)), None);
        assert_eq!(pool.remove(e(0)), Some(Marker(0)));
        assert_eq!(pool.remove(e(0)), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn stale_generation_does_not_match() {
        let mut pool = ComponentPool::new();
        pool.insert(Entity::new(2, 0), Marker(5));
        let reborn = Entity::new(2, 1);

        assert!(!pool.contains(reborn));
        assert_eq!(pool.get(reborn), None);
        assert_eq!(pool.remove(reborn), None, "別世代のハンドルでは消せない");
        assert!(pool.contains(Entity::new(2, 0)));
    }

    #[test]
    fn type_erased_access_round_trips() {
        let mut pool: Box<dyn AnyPool> = Box::new(ComponentPool::<Marker>::new());
        pool.as_any_mut()
            .downcast_mut::<ComponentPool<Marker>>()
            .unwrap()
            .insert(e(1), Marker(7));

        assert!(pool.has(e(1)));
        assert!(pool.component_name().ends_with("Marker"));
        pool.remove_entity(e(1));
        assert!(AnyPool::is_empty(pool.as_ref()));
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut pool = ComponentPool::new();
        pool.insert(e(0), Marker(1));
        pool.insert(e(1), Marker(2));
        for (_, marker) in pool.iter_mut() {
            marker.0 += 100;
        }
        let values: Vec<u32> = pool.iter().map(|(_, m)| m.0).collect();
        assert_eq!(values, vec![101, 102]);
    }
}
