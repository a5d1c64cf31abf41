//! UseCase: メッセージのファンアウト処理
//!
//! 登録中の全接続へ 1 件ずつ順番に書き込む。書き込みに失敗した（または
//! タイムアウトした）接続はその場で登録解除して close し、残りの接続への
//! 配信を続ける。失敗を送信者や他の受信者へ伝播させることはない。
//!
//! ## テスト観点
//!
//! - 正常系：送信者を含む全メンバーへちょうど一度ずつ届く
//! - echo 無効時：送信元だけがスキップされる
//! - 異常系：書き込み失敗・タイムアウトしたメンバーだけが削除される
//! - エッジケース：close 自体が詰まっても close 用の上限で打ち切られる

use std::time::Duration;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, Payload, TransportError};

/// 削除した接続の close を待つ上限（デフォルト）
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// 1 回のファンアウトの結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 書き込みに成功したメンバー数
    pub delivered: usize,
    /// 書き込み失敗・タイムアウトにより削除したメンバー
    pub evicted: Vec<ConnectionId>,
}

/// メッセージファンアウトのユースケース
pub struct BroadcastMessageUseCase<'a, R: ConnectionRegistry> {
    /// コーディネーターが所有するレジストリ
    registry: &'a mut R,
    write_timeout: Option<Duration>,
    close_timeout: Duration,
    echo_to_sender: bool,
}

impl<'a, R: ConnectionRegistry> BroadcastMessageUseCase<'a, R> {
    /// 新しい BroadcastMessageUseCase を作成
    ///
    /// # Arguments
    ///
    /// * `registry` - 配信対象のレジストリ
    /// * `write_timeout` - 1 メンバーあたりの書き込み上限（`None` は無制限）
    /// * `echo_to_sender` - 送信元にも配信するか
    pub fn new(registry: &'a mut R, write_timeout: Option<Duration>, echo_to_sender: bool) -> Self {
        Self {
            registry,
            write_timeout,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            echo_to_sender,
        }
    }

    /// 削除した接続の close を待つ上限を変更する
    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }

    /// ファンアウトを実行
    ///
    /// # Arguments
    ///
    /// * `origin` - メッセージを読み込んだ接続（内部発行なら `None`）
    /// * `payload` - 配信するメッセージ
    ///
    /// # Returns
    ///
    /// 配信できた数と削除した接続の一覧
    pub async fn execute(
        &mut self,
        origin: Option<&ConnectionId>,
        payload: &Payload,
    ) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for member in self.registry.snapshot() {
            let connection = &member.connection;
            if !self.echo_to_sender && origin == Some(connection.id()) {
                continue;
            }

            match bounded_send(connection.as_ref(), payload, self.write_timeout).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(conn_id = %connection.id(), "error broadcasting message: {}", e);
                    // 削除してから close する（以降のファンアウト対象から外す）
                    self.registry.remove(connection.id());
                    close_connection(connection.as_ref(), self.close_timeout).await;
                    report.evicted.push(connection.id().clone());
                }
            }
        }

        report
    }
}

async fn bounded_send(
    connection: &dyn Connection,
    payload: &Payload,
    limit: Option<Duration>,
) -> Result<(), TransportError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, connection.send(payload))
            .await
            .map_err(|_| TransportError::Timeout)?,
        None => connection.send(payload).await,
    }
}

/// 接続を close する。`limit` を超えたら待たずに打ち切る
pub(crate) async fn close_connection(connection: &dyn Connection, limit: Duration) {
    if tokio::time::timeout(limit, connection.close()).await.is_err() {
        tracing::debug!(conn_id = %connection.id(), "close timed out");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::{MockConnection, Timestamp},
        infrastructure::repository::InMemoryConnectionRegistry,
        test_support::RecordingConnection,
    };

    fn registry_with(connections: &[Arc<RecordingConnection>]) -> InMemoryConnectionRegistry {
        let mut registry = InMemoryConnectionRegistry::new();
        for connection in connections {
            registry.add(connection.clone(), Timestamp::new(0));
        }
        registry
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member() {
        // テスト項目: 全メンバー（送信者を含む）にちょうど一度ずつ届く
        // given (前提条件):
        let alice = RecordingConnection::new("alice");
        let bob = RecordingConnection::new("bob");
        let carol = RecordingConnection::new("carol");
        let outsider = RecordingConnection::new("outsider");
        let mut registry = registry_with(&[alice.clone(), bob.clone(), carol.clone()]);

        // when (操作):
        let report = BroadcastMessageUseCase::new(&mut registry, None, true)
            .execute(Some(&alice.cid()), &Payload::from("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(report.delivered, 3);
        assert!(report.evicted.is_empty());
        for member in [&alice, &bob, &carol] {
            assert_eq!(member.received(), vec!["hello"]);
        }
        assert!(outsider.received().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_without_echo_skips_origin() {
        // テスト項目: echo 無効時は送信元に返さない
        // given (前提条件):
        let alice = RecordingConnection::new("alice");
        let bob = RecordingConnection::new("bob");
        let mut registry = registry_with(&[alice.clone(), bob.clone()]);

        // when (操作):
        let report = BroadcastMessageUseCase::new(&mut registry, None, false)
            .execute(Some(&alice.cid()), &Payload::from("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert!(alice.received().is_empty());
        assert_eq!(bob.received(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_write_failure_evicts_only_failed_member() {
        // テスト項目: 書き込みに失敗したメンバーだけが削除・クローズされ、他には届く
        // given (前提条件):
        let alice = RecordingConnection::new("alice");
        let broken = RecordingConnection::failing("broken");
        let carol = RecordingConnection::new("carol");
        let mut registry = registry_with(&[alice.clone(), broken.clone(), carol.clone()]);

        // when (操作):
        let report = BroadcastMessageUseCase::new(&mut registry, None, true)
            .execute(None, &Payload::from("x"))
            .await;

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(report.evicted, vec![broken.cid()]);
        assert_eq!(alice.received(), vec!["x"]);
        assert_eq!(carol.received(), vec!["x"]);
        assert_eq!(broken.close_calls(), 1);
        assert!(!registry.contains(&broken.cid()));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_evicted_member_gets_no_later_broadcasts() {
        // テスト項目: 削除されたメンバーには以降のブロードキャストが書き込まれない
        // given (前提条件):
        let broken = RecordingConnection::failing("broken");
        let mut registry = registry_with(&[broken.clone()]);

        // when (操作):
        let first = BroadcastMessageUseCase::new(&mut registry, None, true)
            .execute(None, &Payload::from("x"))
            .await;
        let second = BroadcastMessageUseCase::new(&mut registry, None, true)
            .execute(None, &Payload::from("y"))
            .await;

        // then (期待する結果):
        assert_eq!(first.evicted.len(), 1);
        assert_eq!(registry.len(), 0);
        assert_eq!(second, BroadcastReport::default());
        assert_eq!(broken.send_calls(), 1);
    }

    #[tokio::test]
    async fn test_stalled_write_is_bounded_by_timeout() {
        // テスト項目: 書き込みが詰まったメンバーはタイムアウトで削除される
        // given (前提条件):
        let stalled = RecordingConnection::stalling("stalled");
        let bob = RecordingConnection::new("bob");
        let mut registry = registry_with(&[stalled.clone(), bob.clone()]);

        // when (操作):
        let report =
            BroadcastMessageUseCase::new(&mut registry, Some(Duration::from_millis(50)), true)
                .execute(None, &Payload::from("hello"))
                .await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.evicted, vec![stalled.cid()]);
        assert_eq!(bob.received(), vec!["hello"]);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_close_is_bounded_separately() {
        // テスト項目: close が詰まっても書き込み上限ではなく close 用の短い上限で打ち切られる
        // given (前提条件): 書き込みも close も完了しないメンバー
        let frozen = RecordingConnection::frozen("frozen");
        let bob = RecordingConnection::new("bob");
        let mut registry = registry_with(&[frozen.clone(), bob.clone()]);
        let started = std::time::Instant::now();

        // when (操作):
        let report =
            BroadcastMessageUseCase::new(&mut registry, Some(Duration::from_millis(300)), true)
                .with_close_timeout(Duration::from_millis(10))
                .execute(None, &Payload::from("hello"))
                .await;

        // then (期待する結果): 書き込み 300ms + close 10ms 程度で終わる（600ms にはならない）
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(report.evicted, vec![frozen.cid()]);
        assert_eq!(frozen.close_calls(), 1);
        assert_eq!(bob.received(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_failed_write_closes_connection_once() {
        // テスト項目: mock を使って失敗時に close が一度だけ呼ばれることを確認する
        // given (前提条件):
        let id = ConnectionId::new("mocked".to_string()).unwrap();
        let mut mock = MockConnection::new();
        mock.expect_id().return_const(id.clone());
        mock.expect_send()
            .times(1)
            .returning(|_| Err(TransportError::Closed));
        mock.expect_close().times(1).return_const(());
        let mut registry = InMemoryConnectionRegistry::new();
        registry.add(Arc::new(mock), Timestamp::new(0));

        // when (操作):
        let report = BroadcastMessageUseCase::new(&mut registry, None, true)
            .execute(None, &Payload::from("x"))
            .await;

        // then (期待する結果):
        assert_eq!(report.evicted, vec![id]);
        assert!(registry.is_empty());
    }
}
