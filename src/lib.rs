//! standards-helper
//!
//! 既存基準リスト（照合表）の各基準に対応する統合基準を、類似度の順に提示して
//! 照合結果をExcelに書き戻す。類似度計算は `standards-helper-common` にある。

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod report;
pub mod review;
pub mod workbook;

pub use error::{Result, StandardsError, WriteBackError};
