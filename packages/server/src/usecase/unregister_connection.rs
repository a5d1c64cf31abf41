//! UseCase: 接続の登録解除処理
//!
//! 読み込みポンプ終了時の Unregister イベントを処理する。すでに削除済み
//! （ファンアウト中の書き込み失敗で削除された等）の接続に対しては何もしない。

use crate::domain::{ConnectionId, ConnectionRegistry, Member};

/// 接続登録解除のユースケース
pub struct UnregisterConnectionUseCase<'a, R: ConnectionRegistry> {
    registry: &'a mut R,
}

impl<'a, R: ConnectionRegistry> UnregisterConnectionUseCase<'a, R> {
    pub fn new(registry: &'a mut R) -> Self {
        Self { registry }
    }

    /// 登録解除を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 解除する接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Some(Member)` - 削除したメンバー
    /// * `None` - すでに登録されていなかった（重複した Unregister）
    pub fn execute(&mut self, id: &ConnectionId) -> Option<Member> {
        self.registry.remove(id)
    }

    /// 残りのメンバー数
    pub fn count_remaining(&self) -> usize {
        self.registry.len()
    }
}
