// ==========================================
// 连铸机仿真系统 - 遥测值与落点
// ==========================================
// 职责: 定义指标值类型与落点接口
// 红线: 落点失败按落点按拍隔离, 不得影响仿真与其他落点
// ==========================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use tracing::info;

// ==========================================
// MetricValue - 指标值
// ==========================================
// 说明: 只允许数值与白名单字符串
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Float(f64),
    Int(i64),
    Text(String),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Int(v as i64)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// 一次发布的指标组 (名称 -> 值, 名称有序)
pub type MetricGroup = BTreeMap<String, MetricValue>;

// ==========================================
// MetricsSink - 遥测落点
// ==========================================
pub trait MetricsSink {
    /// 落点名称 (日志定位)
    fn name(&self) -> &str;

    /// 接收一个区域的指标组
    fn publish(&mut self, area: &str, metrics: &MetricGroup) -> Result<(), Box<dyn Error>>;
}

// ==========================================
// LogSink - 日志落点
// ==========================================
// 说明: 把指标组写入 tracing 日志 (JSON 行)
#[derive(Debug, Default)]
pub struct LogSink;

impl MetricsSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn publish(&mut self, area: &str, metrics: &MetricGroup) -> Result<(), Box<dyn Error>> {
        let payload = serde_json::to_string(metrics)?;
        info!(area, metrics = %payload, "遥测发布");
        Ok(())
    }
}

// ==========================================
// InMemorySink - 内存落点
// ==========================================
// 用途: 测试与仪表盘自检
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Vec<(String, MetricGroup)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[(String, MetricGroup)] {
        &self.records
    }

    pub fn latest(&self, area: &str) -> Option<&MetricGroup> {
        self.records
            .iter()
            .rev()
            .find(|(a, _)| a == area)
            .map(|(_, m)| m)
    }
}

impl MetricsSink for InMemorySink {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn publish(&mut self, area: &str, metrics: &MetricGroup) -> Result<(), Box<dyn Error>> {
        self.records.push((area.to_string(), metrics.clone()));
        Ok(())
    }
}
