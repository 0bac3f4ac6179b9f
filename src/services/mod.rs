//! 服务模块

pub mod generation;
pub mod keepalive;

pub use generation::{ResponseGenerator, create_response_generator};
pub use keepalive::KeepaliveService;
