// ==========================================
// 连铸机仿真系统 - 遥测发布器
// ==========================================
// 职责: 登记指标提供者, 每仿真秒按区域分组求值并扇出到各落点
// 红线: 提供者求值失败视为缺席; 落点失败记日志后继续,
//       其余落点与仿真不受影响
// ==========================================

use super::sink::{MetricGroup, MetricValue, MetricsSink};
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

/// 指标提供者: 每次发布时求值; None 表示本拍缺席
pub type MetricProvider = Box<dyn Fn() -> Option<MetricValue>>;

struct ProviderEntry {
    token: Uuid,
    name: String,
    area: String,
    provider: MetricProvider,
}

// ==========================================
// MetricsPublisher - 遥测发布器
// ==========================================
pub struct MetricsPublisher {
    providers: Vec<ProviderEntry>,
    sinks: Vec<Box<dyn MetricsSink>>,
}

impl MetricsPublisher {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// 登记指标提供者
    ///
    /// # 返回
    /// 注销令牌
    pub fn register(
        &mut self,
        name: impl Into<String>,
        area: impl Into<String>,
        provider: MetricProvider,
    ) -> Uuid {
        let token = Uuid::new_v4();
        self.providers.push(ProviderEntry {
            token,
            name: name.into(),
            area: area.into(),
            provider,
        });
        token
    }

    /// 注销指标提供者
    pub fn unregister(&mut self, token: Uuid) {
        self.providers.retain(|p| p.token != token);
    }

    /// 挂接落点
    pub fn add_sink(&mut self, sink: Box<dyn MetricsSink>) {
        self.sinks.push(sink);
    }

    /// 发布一拍: 按区域分组求值并扇出
    pub fn publish_tick(&mut self) {
        // 按区域分组 (登记顺序内名称排序由 BTreeMap 保证)
        let mut areas: BTreeMap<&str, MetricGroup> = BTreeMap::new();
        for entry in &self.providers {
            if let Some(value) = (entry.provider)() {
                areas
                    .entry(entry.area.as_str())
                    .or_default()
                    .insert(entry.name.clone(), value);
            }
        }

        for (area, metrics) in &areas {
            for sink in &mut self.sinks {
                if let Err(e) = sink.publish(area, metrics) {
                    // 按落点按拍隔离
                    warn!(sink = sink.name(), area, error = %e, "遥测落点发布失败");
                }
            }
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for MetricsPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetricsPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsPublisher")
            .field("providers", &self.providers.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
