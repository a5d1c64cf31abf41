//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! 接続 ID をキーにした HashMap を使用します。
//! 保持するのはブロードキャストコーディネーターだけなので、ロックは使いません。

use std::{collections::HashMap, sync::Arc};

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, Member, Timestamp};

/// インメモリ Connection Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    /// 登録中のメンバー
    members: HashMap<ConnectionId, Member>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn add(&mut self, connection: Arc<dyn Connection>, registered_at: Timestamp) {
        let id = connection.id().clone();
        self.members
            .entry(id)
            .and_modify(|member| member.connection = Arc::clone(&connection))
            .or_insert_with(|| Member::new(connection, registered_at));
    }

    fn remove(&mut self, id: &ConnectionId) -> Option<Member> {
        self.members.remove(id)
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Member),
    {
        let snapshot: Vec<Member> = self.members.values().cloned().collect();
        for member in &snapshot {
            f(member);
        }
    }

    fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains_key(id)
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}
