// src/ecs/system.rs

use std::any::{type_name, Any};

use crate::ecs::error::EcsResult;
use crate::ecs::event_bus::EventBus;
use crate::ecs::signature::Signature;

/// `Box<dyn System>` から具体的な型に戻すためのヘルパートレイト。
/// 全ての `'static` な型に自動で実装されるから、システム側は何も書かなくていいよ。
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// System（システム）トレイトだよ！⚙️
///
/// システムは「このコンポーネントたちを持ってる子を全員ちょうだい！」っていう
/// 要求シグネチャを宣言して、Registry からマッチしたエンティティの一覧をもらうんだ。
/// 一覧 (マッチ集合) の管理は Registry がやってくれるので、システムはロジックだけに集中できる！
///
/// 毎フレームの処理 (`update`) は引数がシステムごとに違う (経過時間、描画先、カメラ…) ので、
/// トレイトには入れずに各システムの固有メソッドとして書いて、`Registry::with_system` 経由で呼ぶよ。
pub trait System: AsAny {
    /// このシステムが必要とするコンポーネントの組。登録時に1回だけ読まれる。
    fn required_signature(&self) -> EcsResult<Signature>;

    /// フレームの頭 (バスの reset 直後) に呼ばれる。イベントを購読したいシステムはここで登録してね。
    fn subscribe_to_events(&self, _bus: &mut EventBus) {}

    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}
