//! Tsudoi server: real-time room chat delivery over WebSocket.
//!
//! - `domain`: value objects, entities and ports
//! - `infrastructure`: in-memory and WebSocket adapters
//! - `usecase`: connect / send / disconnect orchestration and history reads
//! - `ui`: Axum router and handlers

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
