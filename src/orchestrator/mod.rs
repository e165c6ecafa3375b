//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责命令分发和资源管理，是整个系统的"指挥中心"。
//!
//! ### `app` - 应用主结构
//! - 打开并持有题库连接
//! - 把 CLI 子命令交给对应的流程或服务
//! - 负责终端输出（题目、成绩、错题解析）
//!
//! ## 层次关系
//!
//! ```text
//! cli (解析参数)
//!     ↓
//! orchestrator::App (命令分发)
//!     ↓
//! workflow::LoadFlow / services::QuizService
//!     ↓
//! parser (纯函数) + infrastructure (文件、SQLite)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有数据库连接
//! 2. **向下依赖**：编排层 → workflow / services → parser / infrastructure
//! 3. **无业务逻辑**：只做调度和输出，不做具体业务判断

pub mod app;

pub use app::App;
