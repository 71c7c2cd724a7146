use crate::error::{Result, StandardsError};
use crate::workbook::{OriginalLayout, UnifiedLayout};
use serde::{Deserialize, Serialize};
use standards_helper_common::DEFAULT_PAGE_SIZE;
use std::path::{Path, PathBuf};

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_PATH_ENV: &str = "STANDARDS_HELPER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 既存基準（照合表）ブック
    pub original_workbook: Option<PathBuf>,
    /// 統合基準ブック
    pub unified_workbook: Option<PathBuf>,
    /// 既存基準ブックのワークシート
    pub original_sheets: Vec<String>,
    /// 統合基準のワークシート
    pub unified_sheet: String,
    pub original_layout: OriginalLayout,
    pub unified_layout: UnifiedLayout,
    /// 一度に表示する候補数
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            original_workbook: None,
            unified_workbook: None,
            original_sheets: ["RCS", "GRS", "RWS", "RMS", "RAS", "RDS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unified_sheet: "Unified Standard".into(),
            original_layout: OriginalLayout::default(),
            unified_layout: UnifiedLayout::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| StandardsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("standards-helper").join("config.json"))
    }

    /// 既存基準ブックのパス（コマンドライン指定を優先）
    pub fn original_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.original_workbook.clone())
            .ok_or_else(|| {
                StandardsError::Config(
                    "既存基準ファイルが未設定です。`--original PATH` か `standards-helper config --set-original PATH` で指定してください".into(),
                )
            })
    }

    /// 統合基準ブックのパス（コマンドライン指定を優先）
    pub fn unified_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.unified_workbook.clone())
            .ok_or_else(|| {
                StandardsError::Config(
                    "統合基準ファイルが未設定です。`--unified PATH` か `standards-helper config --set-unified PATH` で指定してください".into(),
                )
            })
    }

    /// 対象ワークシート名を決める（未指定なら先頭）
    pub fn resolve_sheet(&self, requested: Option<&str>) -> Result<String> {
        match requested {
            Some(name) => {
                if self.original_sheets.iter().any(|s| s == name) {
                    Ok(name.to_string())
                } else {
                    Err(StandardsError::SheetNotFound {
                        name: name.to_string(),
                        available: self.original_sheets.join(", "),
                    })
                }
            }
            None => self
                .original_sheets
                .first()
                .cloned()
                .ok_or_else(|| StandardsError::Config("ワークシートが設定されていません".into())),
        }
    }

    /// 設定済みのワークシートのうちブックにないもの（設定順）
    pub fn missing_sheets(&self, available: &[String]) -> Vec<&str> {
        self.original_sheets
            .iter()
            .filter(|s| !available.contains(s))
            .map(|s| s.as_str())
            .collect()
    }
}
