// src/ecs/signature.rs

use std::fmt;

use crate::ecs::component::{component_id, Component, ComponentId};
use crate::ecs::error::EcsResult;

/// シグネチャで表現できるコンポーネントの種類の最大数。
pub const MAX_COMPONENTS: usize = 64;

/// Signature（シグネチャ）は「どのコンポーネントを持っているか」のビットセットだよ！
///
/// ビット k が立っている ⇔ コンポーネント種別 k を持っている。
/// システムも「これとこれが必要！」っていう要求シグネチャを持っていて、
/// `(entity & required) == required` ならそのシステムの担当になる。🎯
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// 種別 `T` のビットを立てたシグネチャを返す (ビルダー風)。
    ///
    /// ```rust,ignore
    /// let required = Signature::empty()
    ///     .with::<TransformComponent>()?
    ///     .with::<RigidBodyComponent>()?;
    /// ```
    pub fn with<T: Component>(mut self) -> EcsResult<Self> {
        self.set(component_id::<T>()?);
        Ok(self)
    }

    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1u64 << id.bit();
    }

    pub fn clear(&mut self, id: ComponentId) {
        self.0 &= !(1u64 << id.bit());
    }

    pub fn test(&self, id: ComponentId) -> bool {
        self.0 & (1u64 << id.bit()) != 0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `required` のビットを全部持っているか (上位集合か) をチェック。
    pub fn contains(&self, required: &Signature) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// 立っているビットの番号を小さい順に返すイテレータ。
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        (0..MAX_COMPONENTS).filter_map(move |bit| {
            let id = ComponentId::from_bit(bit);
            self.test(id).then_some(id)
        })
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#b})", self.0)
    }
}
