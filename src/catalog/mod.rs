// ==========================================
// 连铸机仿真系统 - 钢种目录
// ==========================================
// 职责: 只读钢种目录 (启动时加载一次, 按钢种号索引)
// 红线: 目录加载后不可变, 各层以共享句柄访问
// ==========================================

use crate::config::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// ChemistryElement - 化学成分
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChemistryElement {
    pub element_name: String, // 元素符号
    pub percentage: f64,      // 含量 (%)
}

// ==========================================
// SteelGrade - 钢种目录项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SteelGrade {
    pub steel_grade_id: String,        // 钢种号
    pub steel_grade_group: String,     // 钢种组
    pub liquidus_temperature_c: f64,   // 液相线温度 (℃)
    pub description: String,           // 描述
    pub target_superheat_c: f64,       // 目标过热度 (℃)
    #[serde(default)]
    pub chemistry: Vec<ChemistryElement>, // 化学成分
}

// ==========================================
// SteelGradeCatalog - 钢种目录
// ==========================================
#[derive(Debug, Clone)]
pub struct SteelGradeCatalog {
    grades: HashMap<String, SteelGrade>,
    ordered_ids: Vec<String>,
}

impl SteelGradeCatalog {
    /// 由钢种列表构建目录
    ///
    /// # 失败
    /// - 空列表或重复钢种号返回 Invalid
    pub fn new(grades: Vec<SteelGrade>) -> ConfigResult<Self> {
        if grades.is_empty() {
            return Err(ConfigError::Invalid("钢种目录为空".to_string()));
        }
        let mut map = HashMap::new();
        let mut ordered_ids = Vec::new();
        for grade in grades {
            let id = grade.steel_grade_id.clone();
            if map.insert(id.clone(), grade).is_some() {
                return Err(ConfigError::Invalid(format!("钢种号重复: {}", id)));
            }
            ordered_ids.push(id);
        }
        Ok(Self {
            grades: map,
            ordered_ids,
        })
    }

    /// 从 JSON 文件加载目录 (启动期一次)
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// 从 JSON 字符串解析目录
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let grades: Vec<SteelGrade> =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        Self::new(grades)
    }

    /// 按钢种号查询
    pub fn get(&self, steel_grade_id: &str) -> Option<&SteelGrade> {
        self.grades.get(steel_grade_id)
    }

    /// 钢种号列表 (目录顺序)
    pub fn grade_ids(&self) -> &[String] {
        &self.ordered_ids
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// 内置演示目录 (无目录文件时的缺省数据)
    pub fn builtin() -> Self {
        let grades = vec![
            SteelGrade {
                steel_grade_id: "304".to_string(),
                steel_grade_group: "不锈钢".to_string(),
                liquidus_temperature_c: 1454.0,
                description: "奥氏体不锈钢 18Cr-8Ni".to_string(),
                target_superheat_c: 30.0,
                chemistry: vec![
                    ChemistryElement {
                        element_name: "C".to_string(),
                        percentage: 0.07,
                    },
                    ChemistryElement {
                        element_name: "Cr".to_string(),
                        percentage: 18.0,
                    },
                    ChemistryElement {
                        element_name: "Ni".to_string(),
                        percentage: 8.0,
                    },
                ],
            },
            SteelGrade {
                steel_grade_id: "S235JR".to_string(),
                steel_grade_group: "碳素结构钢".to_string(),
                liquidus_temperature_c: 1520.0,
                description: "普通碳素结构钢".to_string(),
                target_superheat_c: 25.0,
                chemistry: vec![
                    ChemistryElement {
                        element_name: "C".to_string(),
                        percentage: 0.17,
                    },
                    ChemistryElement {
                        element_name: "Mn".to_string(),
                        percentage: 1.4,
                    },
                ],
            },
            SteelGrade {
                steel_grade_id: "X70".to_string(),
                steel_grade_group: "管线钢".to_string(),
                liquidus_temperature_c: 1515.0,
                description: "高强度管线钢".to_string(),
                target_superheat_c: 20.0,
                chemistry: vec![
                    ChemistryElement {
                        element_name: "C".to_string(),
                        percentage: 0.08,
                    },
                    ChemistryElement {
                        element_name: "Nb".to_string(),
                        percentage: 0.05,
                    },
                ],
            },
        ];
        Self::new(grades).expect("内置钢种目录必须合法")
    }
}
