//! # translink
//!
//! 多提供方翻译服务：按顺序尝试生成式模型和免费 REST 翻译接口，
//! 缓存结果，全部失败时返回占位译文。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `translation` - 提供方、回退编排器、缓存与统计
//! - `web` - HTTP 服务（可选，`web` 特性）

pub mod env;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;
