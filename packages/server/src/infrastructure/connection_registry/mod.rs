//! ConnectionRegistry の実装
//!
//! - `inmemory`: 単一プロセス内の HashMap 実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
