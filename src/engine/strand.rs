// ==========================================
// 连铸机仿真系统 - 铸流
// ==========================================
// 职责: 头/尾位置与铸坯总长记账, 持有拉速爬升
// 红线: 头部位置在所有模式下推进; 铸坯总长仅在 CASTING 累积;
//       尾部位置仅在 TAILOUT 推进 — 消费方不得混用
// ==========================================

use crate::domain::types::StrandMode;
use crate::engine::speed::SpeedController;
use tracing::info;

// ==========================================
// StrandAdvance - 单拍推进量
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct StrandAdvance {
    pub increment_m: f64,             // 本拍推进长度
    pub cast_length_increment_m: f64, // 本拍计入铸坯总长的长度 (仅 CASTING 非零)
    pub head_from_mold_m: f64,        // 头部距结晶器距离
    pub tail_from_mold_m: f64,        // 尾部距结晶器距离
    pub total_cast_length_m: f64,     // 铸坯总长
    pub cast_speed_m_min: f64,        // 当前拉速
}

// ==========================================
// Strand - 铸流
// ==========================================
#[derive(Debug)]
pub struct Strand {
    mode: StrandMode,
    speed_controller: Option<SpeedController>,
    cast_speed_m_min: f64,
    head_from_mold_m: f64,
    tail_from_mold_m: f64,
    total_cast_length_m: f64,
}

impl Strand {
    pub fn new() -> Self {
        Self {
            mode: StrandMode::Idle,
            speed_controller: None,
            cast_speed_m_min: 0.0,
            head_from_mold_m: 0.0,
            tail_from_mold_m: 0.0,
            total_cast_length_m: 0.0,
        }
    }

    /// 启动拉坯: 进入 CASTING 并挂载拉速爬升
    pub fn start(&mut self, speed_controller: SpeedController) {
        info!(
            target_speed = speed_controller.target_speed_m_min(),
            "铸流启动"
        );
        self.mode = StrandMode::Casting;
        self.speed_controller = Some(speed_controller);
    }

    /// 停机: 卸下爬升, 拉速归零, 回到 IDLE
    pub fn stop(&mut self) {
        info!(total_cast_length_m = self.total_cast_length_m, "铸流停机");
        self.speed_controller = None;
        self.cast_speed_m_min = 0.0;
        self.mode = StrandMode::Idle;
    }

    pub fn set_mode(&mut self, mode: StrandMode) {
        if mode != self.mode {
            info!(from = %self.mode, to = %mode, "铸流模式切换");
            self.mode = mode;
        }
    }

    /// 推进一拍 (1 s); 未启动时无推进
    pub fn tick(&mut self) -> Option<StrandAdvance> {
        let controller = self.speed_controller.as_mut()?;
        self.cast_speed_m_min = controller.next();
        let increment = self.cast_speed_m_min / 60.0;

        self.head_from_mold_m += increment;
        let cast_length_increment = match self.mode {
            StrandMode::Casting => {
                self.total_cast_length_m += increment;
                increment
            }
            StrandMode::Tailout => {
                self.tail_from_mold_m += increment;
                0.0
            }
            _ => 0.0,
        };

        Some(StrandAdvance {
            increment_m: increment,
            cast_length_increment_m: cast_length_increment,
            head_from_mold_m: self.head_from_mold_m,
            tail_from_mold_m: self.tail_from_mold_m,
            total_cast_length_m: self.total_cast_length_m,
            cast_speed_m_min: self.cast_speed_m_min,
        })
    }

    /// 切割完成后头部回落到切割枪位置
    pub fn reset_head_to(&mut self, position_m: f64) {
        self.head_from_mold_m = position_m;
    }

    pub fn mode(&self) -> StrandMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.speed_controller.is_some()
    }

    pub fn cast_speed_m_min(&self) -> f64 {
        self.cast_speed_m_min
    }

    pub fn head_from_mold_m(&self) -> f64 {
        self.head_from_mold_m
    }

    pub fn tail_from_mold_m(&self) -> f64 {
        self.tail_from_mold_m
    }

    pub fn total_cast_length_m(&self) -> f64 {
        self.total_cast_length_m
    }
}

impl Default for Strand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_strand() -> Strand {
        let mut strand = Strand::new();
        strand.start(SpeedController::new(0.0, 3.0, 0.0).unwrap());
        strand
    }

    #[test]
    fn test_idle_strand_does_not_advance() {
        let mut strand = Strand::new();
        assert!(strand.tick().is_none());
        assert_eq!(strand.head_from_mold_m(), 0.0);
    }

    #[test]
    fn test_casting_advances_head_and_total() {
        let mut strand = started_strand();
        let advance = strand.tick().unwrap();
        // 3 m/min -> 0.05 m/s
        assert!((advance.increment_m - 0.05).abs() < 1e-9);
        assert!((advance.head_from_mold_m - 0.05).abs() < 1e-9);
        assert!((advance.total_cast_length_m - 0.05).abs() < 1e-9);
        assert_eq!(advance.tail_from_mold_m, 0.0);
        assert!((advance.cast_length_increment_m - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_tailout_advances_tail_not_total() {
        let mut strand = started_strand();
        strand.tick();
        strand.set_mode(StrandMode::Tailout);
        let advance = strand.tick().unwrap();
        assert!((advance.tail_from_mold_m - 0.05).abs() < 1e-9);
        // 铸坯总长在尾坯段不再增长
        assert!((advance.total_cast_length_m - 0.05).abs() < 1e-9);
        assert_eq!(advance.cast_length_increment_m, 0.0);
        // 头部仍在推进
        assert!((advance.head_from_mold_m - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_other_modes_only_move_head() {
        let mut strand = started_strand();
        strand.set_mode(StrandMode::ReadyToCast);
        let advance = strand.tick().unwrap();
        assert!(advance.head_from_mold_m > 0.0);
        assert_eq!(advance.total_cast_length_m, 0.0);
        assert_eq!(advance.tail_from_mold_m, 0.0);
    }

    #[test]
    fn test_stop_zeroes_speed_and_idles() {
        let mut strand = started_strand();
        strand.tick();
        strand.stop();
        assert_eq!(strand.mode(), StrandMode::Idle);
        assert_eq!(strand.cast_speed_m_min(), 0.0);
        assert!(strand.tick().is_none());
    }

    #[test]
    fn test_reset_head_after_cut() {
        let mut strand = started_strand();
        for _ in 0..100 {
            strand.tick();
        }
        strand.reset_head_to(10.0);
        assert_eq!(strand.head_from_mold_m(), 10.0);
        // 总长不受头部回落影响
        assert!(strand.total_cast_length_m() > 4.9);
    }
}
