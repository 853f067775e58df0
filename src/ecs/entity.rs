// src/ecs/entity.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity（エンティティ）は、ゲームに登場する「モノ」を表すただの識別子だよ！
/// 戦車、トラック、マップのタイル1枚1枚、弾丸…ぜんぶエンティティ。
///
/// 中身は `index` と `generation` の2つの数字。
/// - `index`: Registry の中の各テーブル (シグネチャ、プールの疎配列) を引くための番号。
/// - `generation`: 同じ `index` が再利用されるたびに 1 増える世代カウンター。
///
/// 破棄されたエンティティの `index` は次の誰かに使い回されるけど、世代が違うので
/// 古いハンドルを持ち続けているコードは「もう死んでるよ！」ってちゃんと検出できるんだ。🧟‍♂️🚫
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// テーブル参照用の番号。
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }

    pub(crate) const fn slot(self) -> usize {
        self.index as usize
    }
}

// ログに出したときに読みやすいように `Entity(3v1)` みたいな形にするよ。
impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// EntityAllocator（エンティティ発行係）だよ！
///
/// 新しいIDをちょうだい！って言われたら、まず `free_list` (空き番号リスト) を見て、
/// 空きがあればそれを世代を上げて再利用、なければ新しい番号を払い出すよ。♻️
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// index ごとの現在の世代。
    generations: Vec<u32>,
    /// index ごとの生存フラグ。
    alive: Vec<bool>,
    /// 解放済みで再利用待ちの index たち。
    free_list: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいエンティティを発行する。
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            Entity::new(index, self.generations[slot])
        } else {
            let index = u32::try_from(self.generations.len())
                .unwrap_or_else(|_| panic!("entity index space exhausted"));
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// エンティティを解放して、その index を空き番号リストに戻すよ。
    /// 世代を 1 進めるから、解放前に配られたハンドルはここから先ずっと無効になる！
    ///
    /// 戻り値: 実際に解放できたら `true`。すでに無効なハンドルなら `false`。
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.slot();
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free_list.push(entity.index);
        true
    }

    /// ハンドルが今も有効か (index が生きていて、世代も一致してるか) をチェック。
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.slot();
        slot < self.alive.len() && self.alive[slot] && self.generations[slot] == entity.generation
    }

    /// index に今住んでいるエンティティのハンドル。空き家なら `None`。
    pub fn handle_at(&self, index: usize) -> Option<Entity> {
        let alive = *self.alive.get(index)?;
        let index_u32 = u32::try_from(index).ok()?;
        alive.then(|| Entity::new(index_u32, self.generations[index]))
    }

    /// これまでに払い出した index の総数 (= テーブルが必要とする長さ)。
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }
}
