// ==========================================
// 地铁车队投运排程系统 - 列车名册仓储
// ==========================================
// 对齐: train 表
// 红线: Repository 不含业务逻辑
// 红线: 名册顺序由 seq_no 决定,排程稳定性依赖该顺序
// ==========================================

mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use store::TrainRepository;
