//! UseCase: 接続の登録処理

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRegistry, Timestamp};

/// 接続登録のユースケース
pub struct RegisterConnectionUseCase<'a, R: ConnectionRegistry> {
    registry: &'a mut R,
}

impl<'a, R: ConnectionRegistry> RegisterConnectionUseCase<'a, R> {
    pub fn new(registry: &'a mut R) -> Self {
        Self { registry }
    }

    /// 接続登録を実行
    ///
    /// 同じ ID がすでに登録されている場合は接続ハンドルだけを差し替え、
    /// 登録時刻は最初のものを保持する。
    ///
    /// # Arguments
    ///
    /// * `connection` - 登録する接続
    ///
    /// # Returns
    ///
    /// 登録後のメンバー数
    pub fn execute(&mut self, connection: Arc<dyn Connection>) -> usize {
        self.registry.add(connection, Timestamp::now());
        self.registry.len()
    }
}
