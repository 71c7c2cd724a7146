//! Excelブックとの入出力
//!
//! 照合エンジンからは `StandardsStore` だけが見える。

pub mod layout;
pub mod reader;
pub mod writer;

pub use layout::{Column, OriginalLayout, UnifiedLayout};
pub use reader::{is_standard_id, load_new_standards, load_original_standards, sheet_names};
pub use writer::{write_match, MatchSelection};

use crate::config::Config;
use crate::error::{Result, WriteBackError};
use standards_helper_common::Standard;
use std::path::PathBuf;

/// 基準リストの読み込みと照合結果の書き戻し
pub trait StandardsStore {
    /// 既存基準（指定シート）を読み込む
    fn load_original(&self, sheet: &str) -> Result<Vec<Standard>>;

    /// 統合基準を読み込む
    fn load_unified(&self) -> Result<Vec<Standard>>;

    /// 照合結果を既存基準シートに書き戻す
    fn write_match(&self, sheet: &str, selection: &MatchSelection) -> std::result::Result<(), WriteBackError>;
}

/// Excelファイル上の基準リスト
#[derive(Debug, Clone)]
pub struct ExcelStore {
    pub original_path: PathBuf,
    pub unified_path: PathBuf,
    pub unified_sheet: String,
    pub original_layout: OriginalLayout,
    pub unified_layout: UnifiedLayout,
}

impl ExcelStore {
    pub fn new(original_path: PathBuf, unified_path: PathBuf, config: &Config) -> Self {
        Self {
            original_path,
            unified_path,
            unified_sheet: config.unified_sheet.clone(),
            original_layout: config.original_layout.clone(),
            unified_layout: config.unified_layout.clone(),
        }
    }
}

impl StandardsStore for ExcelStore {
    fn load_original(&self, sheet: &str) -> Result<Vec<Standard>> {
        load_original_standards(&self.original_path, sheet, &self.original_layout)
    }

    fn load_unified(&self) -> Result<Vec<Standard>> {
        load_new_standards(&self.unified_path, &self.unified_sheet, &self.unified_layout)
    }

    fn write_match(&self, sheet: &str, selection: &MatchSelection) -> std::result::Result<(), WriteBackError> {
        write_match(&self.original_path, sheet, &self.original_layout, selection)
    }
}
