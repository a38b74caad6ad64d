//! Web 路由处理器

pub mod api;
pub mod health;

pub use api::*;
pub use health::*;
