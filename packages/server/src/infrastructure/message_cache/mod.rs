//! MessageCache の実装
//!
//! - `inmemory`: プロセス内のルーム別固定長バッファ

pub mod inmemory;

pub use inmemory::InMemoryMessageCache;
