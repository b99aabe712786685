//! WebSocket surface.

pub mod connection;
