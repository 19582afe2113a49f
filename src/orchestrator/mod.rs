//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和续跑调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量域名处理器
//! - 按续跑计数跳过或补写
//! - 在测量前落盘访问记录
//! - 为每个输入域名写入恰好一条结果
//! - 根据故障类型决定是否重启浏览器
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理排名序列)
//!     ↓
//! workflow::DomainFlow (处理单个域名)
//!     ↓
//! resolver / services (能力层：探测 / 测量)
//!     ↓
//! infrastructure (基础设施：BrowserSession)
//! ```

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{BatchProcessor, BatchStats};
