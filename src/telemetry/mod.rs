// ==========================================
// 连铸机仿真系统 - 遥测层
// ==========================================
// 职责: 指标发布与落点扇出 (落点无关)
// 红线: 遥测任何故障不得反向影响仿真
// ==========================================

pub mod providers;
pub mod publisher;
pub mod sink;

pub use providers::{register_overview_metrics, AREA_OVERVIEW};
pub use publisher::{MetricProvider, MetricsPublisher};
pub use sink::{InMemorySink, LogSink, MetricGroup, MetricValue, MetricsSink};
