// ==========================================
// 连铸机仿真系统 - 浇次领域模型
// ==========================================
// 职责: 浇次实体 + 可观察的切割计划队列
// 红线: 炉次表在浇次建立后只增不删; 计划队列整体替换必须原子化
// ==========================================

use crate::domain::heat::Heat;
use crate::domain::product::Product;
use std::collections::BTreeMap;
use uuid::Uuid;

/// 队列变更回调 (参数: 变更后的队列快照与版本号)
pub type QueueObserver = Box<dyn Fn(&[Product], u64)>;

// ==========================================
// ObservableProductQueue - 可观察切割计划队列
// ==========================================
// 说明: FIFO + 版本计数; 每次变更提交后同步通知订阅者
pub struct ObservableProductQueue {
    items: Vec<Product>,
    version: u64,
    observers: Vec<(Uuid, QueueObserver)>,
}

impl ObservableProductQueue {
    pub fn new(items: Vec<Product>) -> Self {
        Self {
            items,
            version: 0,
            observers: Vec::new(),
        }
    }

    /// 订阅队列变更, 返回可用于退订的令牌
    pub fn subscribe(&mut self, observer: QueueObserver) -> Uuid {
        let token = Uuid::new_v4();
        self.observers.push((token, observer));
        token
    }

    /// 退订
    pub fn unsubscribe(&mut self, token: Uuid) {
        self.observers.retain(|(t, _)| *t != token);
    }

    /// 弹出队首产品
    pub fn dequeue(&mut self) -> Option<Product> {
        if self.items.is_empty() {
            return None;
        }
        let item = self.items.remove(0);
        self.commit();
        Some(item)
    }

    /// 原子替换整个队列 (优化器输出落地)
    pub fn replace(&mut self, items: Vec<Product>) {
        self.items = items;
        self.commit();
    }

    /// 队列快照 (按切割顺序)
    pub fn snapshot(&self) -> Vec<Product> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// 变更提交: 版本 +1, 同步通知全部订阅者
    fn commit(&mut self) {
        self.version += 1;
        for (_, observer) in &self.observers {
            observer(&self.items, self.version);
        }
    }
}

impl std::fmt::Debug for ObservableProductQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableProductQueue")
            .field("items", &self.items.len())
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}

// ==========================================
// Sequence - 浇次
// ==========================================
// 说明: 一次连续浇铸的全部炉次与切割计划; 启动时创建一次, 浇铸结束后只读
#[derive(Debug)]
pub struct Sequence {
    pub sequence_id: String,            // 浇次号 (yyMMddHHmm)
    pub width_m: f64,                   // 断面宽度 (m)
    pub thickness_m: f64,               // 断面厚度 (m)
    pub steel_density_kg_m3: f64,       // 钢水密度 (kg/m³)
    pub heats: BTreeMap<i64, Heat>,     // 炉次表 (炉次号升序)
    pub product_queue: ObservableProductQueue, // 待切割计划队列
    pub cut_products: Vec<Product>,     // 已切割产品 (切割顺序)
}

impl Sequence {
    pub fn new(
        sequence_id: String,
        width_m: f64,
        thickness_m: f64,
        steel_density_kg_m3: f64,
        heats: Vec<Heat>,
        products: Vec<Product>,
    ) -> Self {
        let heats = heats.into_iter().map(|h| (h.heat_id, h)).collect();
        Self {
            sequence_id,
            width_m,
            thickness_m,
            steel_density_kg_m3,
            heats,
            product_queue: ObservableProductQueue::new(products),
            cut_products: Vec::new(),
        }
    }

    /// 下一个状态为 NEW 的炉次号 (升序)
    pub fn next_new_heat_id(&self) -> Option<i64> {
        self.heats
            .values()
            .find(|h| h.status == crate::domain::types::HeatStatus::New)
            .map(|h| h.heat_id)
    }

    /// 全部炉次净重合计 (kg)
    pub fn total_heat_weight_kg(&self) -> f64 {
        self.heats.values().map(|h| h.net_weight_kg).sum()
    }
}
