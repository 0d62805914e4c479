pub mod client;
pub mod message;
pub mod user;

pub use client::InMemoryClientRepository;
pub use message::InMemoryMessageRepository;
pub use user::InMemoryUserRepository;
