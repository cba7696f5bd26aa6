//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：缓存列表与索引报告

mod cache_queries;
mod index_queries;

pub mod handlers;

pub use cache_queries::*;
pub use index_queries::*;
