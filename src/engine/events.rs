// ==========================================
// 连铸机仿真系统 - 引擎层事件定义
// ==========================================
// 职责: 组件间的类型化事件 + 订阅令牌
// 说明: 组件把事件写入自身缓冲, 编排器在同一仿真秒内按序
//       取出并路由 (串行事件循环, 单组件两次 tick 不交叠)
// ==========================================

use crate::domain::heat::HeatFragment;
use crate::domain::product::Product;
use uuid::Uuid;

// ==========================================
// 容器事件 (钢包/中间包/结晶器共用)
// ==========================================
#[derive(Debug, Clone)]
pub enum ContainerEvent {
    /// 新钢水进入容器
    NewSteelAdded { heat_id: i64 },
    /// 液位阈值首次到达 (一次性闩锁)
    WeightThresholdReached,
    /// 某炉次开始流出 (每次浇注的首个片段)
    HeatOut { heat_id: i64 },
    /// 钢水片段流出
    SteelPoured { fragment: HeatFragment },
    /// 容器排空
    ContainerEmptied { last_heat_id: i64 },
}

// ==========================================
// 编排器对外事件
// ==========================================
// 说明: Tracking 以此驱动炉次状态机与切割计划
#[derive(Debug, Clone)]
pub enum CasterEvent {
    /// 回转台旋转完成
    TurretRotated,
    /// 钢包开始流出某炉次
    LadleHeatOut { heat_id: i64 },
    /// 钢包浇空
    LadleEmptied { heat_id: i64 },
    /// 中间包液位阈值到达
    TundishThresholdReached,
    /// 中间包开始流出某炉次 (炉次进入铸流)
    TundishHeatOut { heat_id: i64 },
    /// 中间包排空
    TundishEmptied { heat_id: i64 },
    /// 结晶器排空 (尾坯开始)
    MoldEmptied { heat_id: i64 },
    /// 铸流推进一拍
    StrandAdvanced {
        increment_m: f64,
        cast_length_increment_m: f64,
        head_from_mold_m: f64,
        tail_from_mold_m: f64,
        total_cast_length_m: f64,
        cast_speed_m_min: f64,
    },
    /// 切割完成
    CutDone { product: Product },
    /// 浇铸结束 (尾坯过切割枪)
    CastingFinished,
}

// ==========================================
// SubscriberSet - 订阅者集合
// ==========================================
// 用途: 对外暴露的同步回调订阅 (带退订令牌), 变更提交后逐个调用
pub struct SubscriberSet<E> {
    subscribers: Vec<(Uuid, Box<dyn Fn(&E)>)>,
}

impl<E> SubscriberSet<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// 订阅, 返回退订令牌
    pub fn subscribe(&mut self, callback: Box<dyn Fn(&E)>) -> Uuid {
        let token = Uuid::new_v4();
        self.subscribers.push((token, callback));
        token
    }

    /// 退订; 令牌未命中时为空操作
    pub fn unsubscribe(&mut self, token: Uuid) {
        self.subscribers.retain(|(t, _)| *t != token);
    }

    /// 逆注册序全部退订 (编排器销毁路径)
    pub fn clear(&mut self) {
        while self.subscribers.pop().is_some() {}
    }

    /// 同步通知全部订阅者
    pub fn notify(&self, event: &E) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> Default for SubscriberSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for SubscriberSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberSet")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
