//! エラー型定義

use thiserror::Error;

/// 照合エンジンのエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 参照基準または候補プールが未設定
    #[error("No comparison context: {0}")]
    NoComparisonContext(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
