// ==========================================
// 连铸机仿真系统 - 主入口
// ==========================================
// 职责: 装配配置/目录/浇次/遥测, 以 1 Hz 驱动仿真到浇铸结束
// 环境变量:
// - CCM_CONFIG / CCM_COOLING_CONFIG / CCM_CATALOG: JSON 配置路径 (缺省用内置值)
// - CCM_FAST: 置 1 时不按墙钟睡眠 (快速回放)
// - CCM_SEED: 随机扰动种子 (缺省取熵)
// ==========================================

use ccm_caster_sim::api::{ScheduleApi, ScheduleStore};
use ccm_caster_sim::catalog::SteelGradeCatalog;
use ccm_caster_sim::config::{self, CasterConfig, CoolingConfig};
use ccm_caster_sim::engine::{Caster, Tracking};
use ccm_caster_sim::logging;
use ccm_caster_sim::schedule::ScheduleBuilder;
use ccm_caster_sim::telemetry::{register_overview_metrics, LogSink, MetricsPublisher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 浇次断面宽度 (m)
const SECTION_WIDTH_M: f64 = 1.56;
/// 浇次断面厚度 (m)
const SECTION_THICKNESS_M: f64 = 0.103;
/// 回转台旋转时长 (s)
const ROTATION_DURATION_SEC: u64 = 20;
/// 接口存储同步间隔 (仿真秒)
const API_SYNC_INTERVAL_SEC: u64 = 5;
/// 仿真拍数安全上限
const MAX_SIM_TICKS: u64 = 24 * 3600;

fn main() {
    logging::init();

    info!("==================================================");
    info!("{}", ccm_caster_sim::APP_NAME);
    info!("系统版本: {}", ccm_caster_sim::VERSION);
    info!("==================================================");

    // 配置加载失败属致命错误, 直接退出
    let caster_config = Arc::new(match std::env::var("CCM_CONFIG") {
        Ok(path) => config::load_caster_config(Path::new(&path))
            .expect("连铸机配置加载失败"),
        Err(_) => CasterConfig::default(),
    });
    let cooling_config = match std::env::var("CCM_COOLING_CONFIG") {
        Ok(path) => config::load_cooling_config(Path::new(&path))
            .expect("二冷段配置加载失败"),
        Err(_) => CoolingConfig::default(),
    };
    let catalog = Arc::new(match std::env::var("CCM_CATALOG") {
        Ok(path) => SteelGradeCatalog::load_from_file(Path::new(&path))
            .expect("钢种目录加载失败"),
        Err(_) => SteelGradeCatalog::builtin(),
    });

    let seed = std::env::var("CCM_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "随机扰动种子");

    // 浇次计划
    let mut builder = ScheduleBuilder::new(
        catalog.clone(),
        caster_config.clone(),
        StdRng::seed_from_u64(seed ^ 0x7363_6865),
    );
    let sequence = builder
        .build_sequence(
            SECTION_WIDTH_M,
            SECTION_THICKNESS_M,
            caster_config.steel_density,
        )
        .expect("浇次计划生成失败");
    info!(
        sequence_id = %sequence.sequence_id,
        heats = sequence.heats.len(),
        products = sequence.product_queue.len(),
        "浇次就绪"
    );

    // 编排器与跟踪驱动
    let caster = Caster::new(
        caster_config.clone(),
        &cooling_config,
        SECTION_WIDTH_M,
        SECTION_THICKNESS_M,
        caster_config.steel_density,
        ROTATION_DURATION_SEC,
        seed,
    )
    .expect("连铸机编排器构造失败");
    let snapshot_handle = caster.snapshot_handle();
    let mut tracking = Tracking::new(caster, sequence, catalog, seed);

    // 遥测发布
    let mut publisher = MetricsPublisher::new();
    let section_ids: Vec<u32> = cooling_config.sections.iter().map(|s| s.id).collect();
    register_overview_metrics(&mut publisher, &snapshot_handle, &section_ids);
    publisher.add_sink(Box::new(LogSink));

    // 接口存储
    let schedule_api = ScheduleApi::new(Arc::new(ScheduleStore::new()));
    if let Err(e) = schedule_api.sync_from_sequence(tracking.sequence()) {
        warn!(error = %e, "接口存储初始同步失败");
    }

    let realtime = std::env::var("CCM_FAST").map(|v| v != "1").unwrap_or(true);

    // ==========================================
    // 主循环: 一圈 = 一仿真秒
    // ==========================================
    let mut ticks: u64 = 0;
    while !tracking.is_finished() && ticks < MAX_SIM_TICKS {
        if let Err(e) = tracking.step() {
            tracing::error!(error = %e, "仿真推进失败");
            break;
        }
        ticks += 1;

        publisher.publish_tick();

        // 接口写失败只记日志, 不中断仿真
        if ticks % API_SYNC_INTERVAL_SEC == 0 {
            if let Err(e) = schedule_api.sync_from_sequence(tracking.sequence()) {
                warn!(error = %e, "接口存储同步失败");
            }
        }

        if realtime {
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
    }

    if let Err(e) = schedule_api.sync_from_sequence(tracking.sequence()) {
        warn!(error = %e, "接口存储收尾同步失败");
    }
    tracking.dispose();

    let sequence = tracking.sequence();
    info!(
        sim_seconds = ticks,
        cut_products = sequence.cut_products.len(),
        total_cut_length_m = sequence
            .cut_products
            .iter()
            .filter_map(|p| p.cut_length_m)
            .sum::<f64>(),
        "仿真结束"
    );
}
