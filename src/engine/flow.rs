// ==========================================
// 连铸机仿真系统 - 液位流量控制器
// ==========================================
// 职责: 纯函数比例控制: 液位偏差 -> 新流量
// 说明: 增益带下限 0.5, 单步变化量受限幅, 输出夹紧到 [0, maxFlow]
// ==========================================

/// 由液位偏差计算新的给流量 (kg/s)
///
/// # 参数
/// - monitored_level_mm: 实测液位 (mm)
/// - current_flow: 当前流量 (kg/s)
/// - max_flow: 最大流量 (kg/s)
/// - target_level_mm: 目标液位 (mm)
/// - tolerance_percent: 容差 (目标液位的百分比)
///
/// # 返回
/// 调整后的流量, 落在 [0, max_flow]
pub fn compute_flow_rate(
    monitored_level_mm: f64,
    current_flow: f64,
    max_flow: f64,
    target_level_mm: f64,
    tolerance_percent: f64,
) -> f64 {
    let tolerance_mm = target_level_mm * tolerance_percent / 100.0;
    let error = monitored_level_mm - target_level_mm;

    // 偏差越大增益越大, 但不低于 0.5
    let correction_factor = (error.abs() / tolerance_mm).max(0.5);
    let correction = -correction_factor * error;

    // 单步流量变化限幅
    let flow_rate_change_limit = (max_flow * tolerance_percent / 100.0).max(10.0);

    let target_flow = current_flow + correction;
    let adjusted = target_flow
        .max(current_flow - flow_rate_change_limit)
        .min(current_flow + flow_rate_change_limit);

    adjusted.clamp(0.0, max_flow)
}
