//! ブロードキャストコーディネーター
//!
//! 接続ごとの読み込みポンプが [`HubHandle`] 経由で [`HubEvent`] を発行し、
//! ただ 1 つの [`BroadcastCoordinator`] が到着順に処理する。
//! レジストリへの書き込みとファンアウトの書き込みはコーディネーターだけが
//! 行うため、メンバー管理にロックは不要。
//!
//! ## テスト観点
//!
//! - 登録 → ブロードキャスト → 登録解除の一連のシナリオ
//! - 書き込み失敗による削除と、重複した Unregister の無視
//! - イベントの処理順序、キャンセル・ハンドル破棄による停止

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRegistry, HubError, HubEvent, HubSnapshot, Payload,
    },
    infrastructure::repository::InMemoryConnectionRegistry,
};

use super::{
    BroadcastMessageUseCase, RegisterConnectionUseCase, UnregisterConnectionUseCase,
    broadcast_message::{BroadcastReport, DEFAULT_CLOSE_TIMEOUT, close_connection},
};

/// ファンアウト 1 件あたりの書き込み上限（デフォルト）
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// コーディネーターの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// 1 メンバーあたりの書き込み上限。`None` だと遅い受信者 1 人がループ全体を止める
    pub write_timeout: Option<Duration>,
    /// 削除したメンバー・停止時に残ったメンバーを close する際の上限
    pub close_timeout: Duration,
    /// 送信元にも自分のメッセージを返すか
    pub echo_to_sender: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            echo_to_sender: true,
        }
    }
}

/// イベントストリームの送信側（読み込みポンプが保持する）
#[derive(Clone)]
pub struct HubHandle {
    events: mpsc::UnboundedSender<HubEvent>,
    stats: watch::Receiver<HubSnapshot>,
}

impl HubHandle {
    pub fn register(&self, connection: Arc<dyn Connection>) -> Result<(), HubError> {
        self.send(HubEvent::Register(connection))
    }

    pub fn unregister(&self, id: ConnectionId) -> Result<(), HubError> {
        self.send(HubEvent::Unregister(id))
    }

    pub fn broadcast(
        &self,
        origin: Option<ConnectionId>,
        payload: Payload,
    ) -> Result<(), HubError> {
        self.send(HubEvent::Broadcast { origin, payload })
    }

    /// 最後に公開されたメンバー一覧
    pub fn stats(&self) -> HubSnapshot {
        self.stats.borrow().clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<HubSnapshot> {
        self.stats.clone()
    }

    fn send(&self, event: HubEvent) -> Result<(), HubError> {
        self.events.send(event).map_err(|_| HubError::Closed)
    }
}

pub struct BroadcastCoordinator<R = InMemoryConnectionRegistry> {
    registry: R,
    config: HubConfig,
    events: mpsc::UnboundedReceiver<HubEvent>,
    stats: watch::Sender<HubSnapshot>,
    shutdown: CancellationToken,
}

impl BroadcastCoordinator<InMemoryConnectionRegistry> {
    pub fn new(config: HubConfig, shutdown: CancellationToken) -> (Self, HubHandle) {
        Self::with_registry(InMemoryConnectionRegistry::new(), config, shutdown)
    }
}

impl<R> BroadcastCoordinator<R>
where
    R: ConnectionRegistry + 'static,
{
    pub fn with_registry(
        registry: R,
        config: HubConfig,
        shutdown: CancellationToken,
    ) -> (Self, HubHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (stats_tx, stats_rx) = watch::channel(HubSnapshot::default());

        let coordinator = Self {
            registry,
            config,
            events: events_rx,
            stats: stats_tx,
            shutdown,
        };
        let handle = HubHandle {
            events: events_tx,
            stats: stats_rx,
        };
        (coordinator, handle)
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// キャンセルされるか全ハンドルが破棄されるまでイベントを処理する
    ///
    /// 終了時に残っているメンバーはすべて close する。
    #[tracing::instrument(name = "broadcast_coordinator", skip_all)]
    pub async fn run(mut self) {
        tracing::debug!("broadcast coordinator started");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    tracing::info!("broadcast coordinator shutting down");
                    break;
                }
                event = self.events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => {
                        tracing::debug!("all hub handles dropped");
                        break;
                    }
                },
            }
        }
        self.close_all().await;
    }

    pub(crate) async fn handle(&mut self, event: HubEvent) {
        match event {
            HubEvent::Register(connection) => {
                let id = connection.id().clone();
                let total = RegisterConnectionUseCase::new(&mut self.registry).execute(connection);
                tracing::info!(conn_id = %id, "Client connected. Total clients: {}", total);
                self.publish_snapshot();
            }
            HubEvent::Unregister(id) => {
                let mut usecase = UnregisterConnectionUseCase::new(&mut self.registry);
                let removed = usecase.execute(&id);
                let total = usecase.count_remaining();
                if removed.is_some() {
                    tracing::info!(conn_id = %id, "Client disconnected. Total clients: {}", total);
                } else {
                    tracing::debug!(conn_id = %id, "unregister for absent connection ignored");
                }
                self.publish_snapshot();
            }
            HubEvent::Broadcast { origin, payload } => {
                let report = self.broadcast(origin.as_ref(), &payload).await;
                tracing::debug!(
                    delivered = report.delivered,
                    evicted = report.evicted.len(),
                    "broadcast message"
                );
                if !report.evicted.is_empty() {
                    self.publish_snapshot();
                }
            }
        }
    }

    async fn broadcast(&mut self, origin: Option<&ConnectionId>, payload: &Payload) -> BroadcastReport {
        BroadcastMessageUseCase::new(
            &mut self.registry,
            self.config.write_timeout,
            self.config.echo_to_sender,
        )
        .with_close_timeout(self.config.close_timeout)
        .execute(origin, payload)
        .await
    }

    fn publish_snapshot(&self) {
        let mut members = Vec::with_capacity(self.registry.len());
        self.registry.for_each(|member| members.push(member.summary()));
        self.stats.send_replace(HubSnapshot::from_members(members));
    }

    async fn close_all(&mut self) {
        let members = self.registry.snapshot();
        for member in &members {
            self.registry.remove(member.id());
            close_connection(member.connection.as_ref(), self.config.close_timeout).await;
        }
        if !members.is_empty() {
            tracing::info!("closed {} remaining connections", members.len());
            self.publish_snapshot();
        }
    }
}


#[cfg(test)]
impl<R> BroadcastCoordinator<R> {
    /// キューに溜まったイベントを処理せずに取り出す（テスト用）
    pub(crate) fn drain_events(&mut self) -> Vec<HubEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
