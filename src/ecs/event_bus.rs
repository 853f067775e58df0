// src/ecs/event_bus.rs

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use log::trace;

use crate::ecs::error::EcsResult;
use crate::ecs::registry::Registry;

/// Event（イベント）トレイト。バスに流せる型の目印だよ。📨
pub trait Event: Debug + 'static {}

/// 状態を持ちたいハンドラは `Rc<Cell<_>>` などを掴んでおいてね。
type Handler<E> = Rc<dyn Fn(&mut Registry, &mut EventBus, &E) -> EcsResult<()>>;

/// EventBus（イベントバス）だよ！
///
/// システム同士が直接お互いを知らなくても会話できるようにする、同じスレッド内の掲示板。
/// - `reset()` でフレームごとに購読を全部リセット (前フレームの購読が紛れ込まない！)
/// - `subscribe::<E>()` で購読を登録 (次の `reset()` まで有効)
/// - `emit::<E>()` でその場で、登録順に、全ハンドラを同期的に呼ぶ (キューには溜めない)
///
/// ハンドラの中でさらに `emit` しても OK。そのまま同期的に入れ子で呼ばれるよ。
/// 実行中のハンドラ自身にも、入れ子の発行はちゃんと届く。
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<TypeId, Box<dyn Any>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全ての購読を捨てる。毎フレーム、システムが動き出す前に呼ぶよ。
    pub fn reset(&mut self) {
        self.subscribers.clear();
    }

    /// イベント `E` のハンドラを登録する。
    pub fn subscribe<E, F>(&mut self, handler: F)
    where
        E: Event,
        F: Fn(&mut Registry, &mut EventBus, &E) -> EcsResult<()> + 'static,
    {
        let handler: Handler<E> = Rc::new(handler);
        self.subscribers
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<Handler<E>>::new()))
            .downcast_mut::<Vec<Handler<E>>>()
            .expect("subscriber list is keyed by its event TypeId")
            .push(handler);
    }

    /// イベント `E` を発行して、購読中のハンドラを登録順に呼ぶ。
    ///
    /// 呼ぶ前にハンドラ一覧をスナップショットするので、処理中に増えた購読は
    /// 今回の発行では呼ばれない。
    pub fn emit<E: Event>(&mut self, registry: &mut Registry, event: E) -> EcsResult<()> {
        let handlers: Vec<Handler<E>> = match self
            .subscribers
            .get(&TypeId::of::<E>())
            .and_then(|list| list.downcast_ref::<Vec<Handler<E>>>())
        {
            Some(list) => list.clone(),
            None => return Ok(()),
        };
        trace!("EventBus: {:?} -> {} handler(s)", event, handlers.len());

        for handler in handlers {
            handler(registry, self, &event)?;
        }
        Ok(())
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .get(&TypeId::of::<E>())
            .and_then(|list| list.downcast_ref::<Vec<Handler<E>>>())
            .map_or(0, Vec::len)
    }

    /// 購読されているイベントの種類数。`reset()` 直後は 0。
    pub fn subscribed_kinds(&self) -> usize {
        self.subscribers.len()
    }
}
