//! UseCase layer
//!
//! 参加者の接続・切断、メッセージ送信、履歴取得を、ドメイン層のポート経由で組み立てます。

mod connect_participant;
mod disconnect_participant;
pub mod error;
mod get_message_history;
mod get_room_clients;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::{DisconnectParticipantUseCase, SessionEnd};
pub use error::{ConnectError, DisconnectError, GetMessageHistoryError, SendMessageError};
pub use get_message_history::{
    DEFAULT_HISTORY_LIMIT, GetMessageHistoryUseCase, MAX_HISTORY_LIMIT,
};
pub use get_room_clients::GetRoomClientsUseCase;
pub use send_message::SendMessageUseCase;
