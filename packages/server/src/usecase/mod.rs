//! UseCase 層
//!
//! ブロードキャストコーディネーターと、コーディネーターがイベントごとに
//! 実行するユースケース（登録・登録解除・ファンアウト）。

pub mod broadcast_message;
pub mod coordinator;
pub mod register_connection;
pub mod unregister_connection;

pub use broadcast_message::{BroadcastMessageUseCase, BroadcastReport, DEFAULT_CLOSE_TIMEOUT};
pub use coordinator::{BroadcastCoordinator, DEFAULT_WRITE_TIMEOUT, HubConfig, HubHandle};
pub use register_connection::RegisterConnectionUseCase;
pub use unregister_connection::UnregisterConnectionUseCase;
