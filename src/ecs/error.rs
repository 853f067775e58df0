// src/ecs/error.rs
//! ECS のエラー型だよ。ぜんぶ「プログラムのバグ」を知らせるためのもの！

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::ecs::entity::Entity;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// すでに破棄 (フラッシュ済み) か、そもそも作られていないエンティティを触った。
    #[error("stale entity handle {0}: the entity was never created or has already been destroyed")]
    StaleEntity(Entity),

    /// エンティティが持っていないコンポーネントを取りに行った。
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// シグネチャのビット幅を超える種類のコンポーネントを使おうとした。
    #[error("cannot register component {component}: signature holds at most {max} component kinds")]
    ComponentCapacity {
        max: usize,
        component: &'static str,
    },

    /// 同じ種類のシステムを二重に登録しようとした。
    #[error("system {0} is already registered")]
    DuplicateSystem(&'static str),

    /// 登録されていないシステムを取りに行った。
    #[error("system {0} is not registered")]
    SystemNotFound(&'static str),

    /// `with_system` の実行中に、同じシステムをもう一度借りようとした。
    #[error("system {0} is currently running and cannot be borrowed again")]
    SystemBusy(&'static str),
}

pub type EcsResult<T> = Result<T, EcsError>;

// wasm-bindgen の関数から `?` でそのまま JS に投げられるように
impl From<EcsError> for JsValue {
    fn from(error: EcsError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
