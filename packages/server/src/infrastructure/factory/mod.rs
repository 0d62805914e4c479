//! ID 採番の実装

pub mod uuid_v4;

pub use uuid_v4::UuidIdFactory;
