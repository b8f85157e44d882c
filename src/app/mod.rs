// ==========================================
// 咖啡售货亭配置器 - 应用层
// ==========================================
// 职责: 装配共享连接、仓储与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
