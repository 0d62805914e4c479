//! UUID v4 による ID 採番

use uuid::Uuid;

use crate::domain::{ClientId, ClientIdFactory, IdFactoryError, MessageId, MessageIdFactory};

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdFactory;

impl UuidIdFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ClientIdFactory for UuidIdFactory {
    fn new_client_id(&self) -> Result<ClientId, IdFactoryError> {
        ClientId::new(Uuid::new_v4().to_string()).map_err(|e| IdFactoryError::Generation {
            kind: "client_id",
            reason: e.to_string(),
        })
    }
}

impl MessageIdFactory for UuidIdFactory {
    fn new_message_id(&self) -> Result<MessageId, IdFactoryError> {
        MessageId::new(Uuid::new_v4().to_string()).map_err(|e| IdFactoryError::Generation {
            kind: "message_id",
            reason: e.to_string(),
        })
    }
}
