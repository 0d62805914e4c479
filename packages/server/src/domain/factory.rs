//! ID 採番の trait 定義

use super::{ClientId, IdFactoryError, MessageId};

#[cfg_attr(test, mockall::automock)]
pub trait ClientIdFactory: Send + Sync {
    fn new_client_id(&self) -> Result<ClientId, IdFactoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MessageIdFactory: Send + Sync {
    fn new_message_id(&self) -> Result<MessageId, IdFactoryError>;
}
