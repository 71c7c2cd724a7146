use thiserror::Error;

#[derive(Error, Debug)]
pub enum StandardsError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ワークシートが見つかりません: {name}（有効なシート: {available}）")]
    SheetNotFound { name: String, available: String },

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelWrite(String),

    #[error(transparent)]
    WriteBack(#[from] WriteBackError),

    #[error("基準が見つかりません: {0}")]
    StandardNotFound(String),

    #[error(transparent)]
    Match(#[from] standards_helper_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

/// 照合結果の書き戻しエラー
///
/// ファイルがロックされている場合はユーザーにそのまま伝える必要があるので区別する。
#[derive(Error, Debug)]
pub enum WriteBackError {
    #[error("ファイルに書き込めません: {0}（Excelで開いている場合は閉じてから再実行してください）")]
    Locked(String),

    #[error("書き戻し先の基準が見つかりません: {0}")]
    StandardNotFound(String),

    #[error("書き戻し先のワークシートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("書き戻しに失敗: {0}")]
    Failed(String),
}

impl WriteBackError {
    pub fn is_locked(&self) -> bool {
        matches!(self, WriteBackError::Locked(_))
    }
}

impl From<calamine::XlsxError> for StandardsError {
    fn from(err: calamine::XlsxError) -> Self {
        StandardsError::ExcelRead(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for StandardsError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        StandardsError::ExcelWrite(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
