// ==========================================
// 地铁车队投运排程系统 - 投运排程引擎
// ==========================================
// 职责: 将名册划分为 投运 / 备用 / 检修扣车 三组并给出原因
// 输入: 名册快照 + 期望投运数量
// 输出: InductionPlan
// 红线: 纯函数,不修改输入,不持有状态
// ==========================================

mod optimizer;


pub use optimizer::{InductionError, InductionOptimizer};
