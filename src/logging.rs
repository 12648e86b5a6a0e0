// ==========================================
// 连铸机仿真系统 - 日志约定
// ==========================================
// 职责: 统一仿真日志的目标过滤约定
// 说明: 遥测落点按仿真秒输出指标行 (1 Hz), 不加过滤会刷掉
//       引擎的状态迁移日志; 缺省把 telemetry 目标压到 warn,
//       需要逐秒指标时用 RUST_LOG 显式放开
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 遥测层日志目标 (LogSink 的 1 Hz 指标行)
pub const TELEMETRY_LOG_TARGET: &str = "ccm_caster_sim::telemetry";

/// 缺省过滤器: 引擎 info, 遥测指标行 warn
fn default_filter() -> EnvFilter {
    EnvFilter::new(format!("info,{}=warn", TELEMETRY_LOG_TARGET))
}

/// 初始化仿真日志
///
/// # 环境变量
/// - RUST_LOG: 覆盖缺省过滤器
///   例如: RUST_LOG=ccm_caster_sim::engine=debug 跟踪引擎内部,
///   RUST_LOG=info 放开 1 Hz 指标行
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    fmt().with_env_filter(filter).with_target(true).init();
}

/// 初始化测试日志: 引擎全开, 指标行仍压到 info
pub fn init_test() {
    let filter = EnvFilter::new(format!("debug,{}=info", TELEMETRY_LOG_TARGET));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
