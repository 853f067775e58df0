// src/ecs/component.rs

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use log::debug;

use crate::ecs::error::{EcsError, EcsResult};
use crate::ecs::signature::MAX_COMPONENTS;

/// Component（コンポーネント）トレイトだよ！
///
/// 構造体がゲームのコンポーネントとして使われる資格があることを示すマーカー。
/// 中身はただのデータ (位置、速度、スプライト…) で、振る舞いはシステム側に書くよ。
pub trait Component: std::fmt::Debug + Send + Sync + 'static {}

/// コンポーネント種別ごとに割り当てられる小さな整数ID。
/// シグネチャのビット番号 & Registry のプール表のインデックスとして使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u8);

impl ComponentId {
    pub(crate) fn from_bit(bit: usize) -> Self {
        debug_assert!(bit < MAX_COMPONENTS);
        Self(bit as u8)
    }

    pub fn bit(self) -> usize {
        self.0 as usize
    }
}

/// ComponentTypeRegistry（コンポーネント型台帳）だよ！📒
///
/// 初めて見た型には次の番号を払い出して、それ以降は毎回同じ番号を返す。
/// 番号は決して回収しないし、上限 (`limit`) を超えたら設定ミスとしてエラーにする。
#[derive(Debug)]
pub struct ComponentTypeRegistry {
    ids: HashMap<TypeId, ComponentId>,
    names: Vec<&'static str>,
    limit: usize,
}

impl Default for ComponentTypeRegistry {
    fn default() -> Self {
        Self::with_limit(MAX_COMPONENTS)
    }
}

impl ComponentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 払い出せるIDの上限を指定して作る (上限は `MAX_COMPONENTS` で頭打ち)。
    pub fn with_limit(limit: usize) -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
            limit: limit.min(MAX_COMPONENTS),
        }
    }

    pub fn id_for<T: 'static>(&mut self) -> EcsResult<ComponentId> {
        self.id_for_type(TypeId::of::<T>(), type_name::<T>())
    }

    pub fn id_for_type(&mut self, type_id: TypeId, name: &'static str) -> EcsResult<ComponentId> {
        if let Some(id) = self.ids.get(&type_id) {
            return Ok(*id);
        }
        let next = self.names.len();
        if next >= self.limit {
            return Err(EcsError::ComponentCapacity {
                max: self.limit,
                component: name,
            });
        }
        let id = ComponentId::from_bit(next);
        self.ids.insert(type_id, id);
        self.names.push(name);
        debug!("ComponentTypeRegistry: {} -> id {}", name, next);
        Ok(id)
    }

    pub fn name_of(&self, id: ComponentId) -> Option<&'static str> {
        self.names.get(id.bit()).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.names.clear();
    }
}

// プロセス全体で共有する台帳。最初に触ったときに作られて、解放はしない。
static COMPONENT_TYPES: OnceLock<Mutex<ComponentTypeRegistry>> = OnceLock::new();

fn with_global<R>(f: impl FnOnce(&mut ComponentTypeRegistry) -> R) -> R {
    let registry = COMPONENT_TYPES.get_or_init(|| Mutex::new(ComponentTypeRegistry::new()));
    // poison されていても台帳の中身はそのまま使える
    let mut guard = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// 型 `T` のプロセス共通コンポーネントIDを返す。初回呼び出しで番号が決まるよ。
pub fn component_id<T: Component>() -> EcsResult<ComponentId> {
    with_global(|registry| registry.id_for::<T>())
}

/// IDから型名を引く (ログ用)。
pub fn component_name(id: ComponentId) -> &'static str {
    with_global(|registry| registry.name_of(id)).unwrap_or("<unregistered>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Alpha;
    #[derive(Debug)]
    struct Beta;
    #[derive(Debug)]
    struct Gamma;

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut registry = ComponentTypeRegistry::new();
        let alpha = registry.id_for::<Alpha>().unwrap();
        let beta = registry.id_for::<Beta>().unwrap();

        assert_eq!(alpha.bit(), 0);
        assert_eq!(beta.bit(), 1);
        assert_eq!(registry.id_for::<Alpha>().unwrap(), alpha, "2回目も同じIDのはず");
        assert_eq!(registry.len(), 2);
        assert!(registry.name_of(beta).unwrap().ends_with("Beta"));
    }

    #[test]
    fn exceeding_the_limit_is_an_error() {
        let mut registry = ComponentTypeRegistry::with_limit(2);
        registry.id_for::<Alpha>().unwrap();
        registry.id_for::<Beta>().unwrap();

        let err = registry.id_for::<Gamma>().unwrap_err();
        assert!(matches!(err, EcsError::ComponentCapacity { max: 2, .. }));
        // すでに登録済みの型は上限に達していても引ける
        assert!(registry.id_for::<Alpha>().is_ok());
    }

    #[test]
    fn clear_restarts_numbering() {
        let mut registry = ComponentTypeRegistry::new();
        registry.id_for::<Alpha>().unwrap();
        registry.id_for::<Beta>().unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.id_for::<Beta>().unwrap().bit(), 0);
    }

    #[test]
    fn global_ids_agree_across_calls() {
        #[derive(Debug)]
        struct GlobalProbe;
        impl Component for GlobalProbe {}

        let first = component_id::<GlobalProbe>().unwrap();
        let second = component_id::<GlobalProbe>().unwrap();
        assert_eq!(first, second);
        assert!(component_name(first).ends_with("GlobalProbe"));
    }
}
