//! 照合結果の書き戻し
//!
//! 対象行はcalamineで探し、umya-spreadsheetでブックを読み込んで照合結果列
//! （新ID・新本文・新レベル）のセルだけを書き換えて保存する。
//! 数式・書式・列幅・結合セルなど他の内容はそのまま残る。

use super::layout::{Column, OriginalLayout};
use super::reader::{self, cell_text};
use crate::error::WriteBackError;
use calamine::{Data, Range, Reader};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use umya_spreadsheet::XlsxError;

/// 書き戻す照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSelection {
    /// 既存基準のID
    pub original_id: String,
    pub new_id: String,
    pub new_text: String,
    pub new_level: Option<String>,
}

/// ロック・権限エラーか
///
/// Windowsで他のプロセスが開いている場合は共有違反（32）/ロック違反（33）になる。
fn is_lock_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33)))
}

fn io_error(path: &Path, err: io::Error) -> WriteBackError {
    if is_lock_error(&err) {
        WriteBackError::Locked(path.display().to_string())
    } else {
        WriteBackError::Failed(format!("{}: {}", path.display(), err))
    }
}

/// 書き込み可能か事前に確認（開いているだけで中身は変えない）
fn ensure_writable(path: &Path) -> Result<(), WriteBackError> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| io_error(path, e))
}

fn xlsx_error(path: &Path, err: XlsxError) -> WriteBackError {
    match err {
        XlsxError::Io(e) => io_error(path, e),
        other => WriteBackError::Failed(format!("{}: {}", path.display(), other)),
    }
}

/// 照合結果を既存基準シートに書き戻す
pub fn write_match(
    path: &Path,
    sheet: &str,
    layout: &OriginalLayout,
    selection: &MatchSelection,
) -> Result<(), WriteBackError> {
    if !path.exists() {
        return Err(WriteBackError::Failed(format!(
            "ファイルが見つかりません: {}",
            path.display()
        )));
    }
    ensure_writable(path)?;

    let range = read_sheet(path, sheet)?;
    let row = find_standard_row(&range, layout, &selection.original_id)
        .ok_or_else(|| WriteBackError::StandardNotFound(selection.original_id.clone()))?;
    debug!(sheet, row = row + 1, id = %selection.original_id, "write-back target row");

    let mut book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| xlsx_error(path, e))?;
    let worksheet = book
        .get_sheet_by_name_mut(sheet)
        .ok_or_else(|| WriteBackError::SheetNotFound(sheet.to_string()))?;

    let level = selection.new_level.as_deref().unwrap_or("");
    set_cell(worksheet, layout.matched_id_column, row, &selection.new_id);
    set_cell(worksheet, layout.matched_text_column, row, &selection.new_text);
    set_cell(worksheet, layout.matched_level_column, row, level);

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| xlsx_error(path, e))?;
    info!(
        path = %path.display(),
        original = %selection.original_id,
        new = %selection.new_id,
        "match written"
    );
    Ok(())
}

/// 対象シートのセル範囲（シートがなければ SheetNotFound）
fn read_sheet(path: &Path, sheet: &str) -> Result<Range<Data>, WriteBackError> {
    let mut workbook = reader::open(path).map_err(|e| WriteBackError::Failed(e.to_string()))?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(WriteBackError::SheetNotFound(sheet.to_string()));
    }
    workbook
        .worksheet_range(sheet)
        .map_err(|e| WriteBackError::Failed(e.to_string()))
}

/// ID列が一致する最初の行（0始まり、絶対位置）
fn find_standard_row(range: &Range<Data>, layout: &OriginalLayout, id: &str) -> Option<u32> {
    let (last, _) = range.end()?;
    let id = id.trim();
    (layout.first_row_index()..=last).find(|&row| {
        cell_text(range.get_value((row, layout.id_column.index()))).as_deref() == Some(id)
    })
}

/// セルの値だけを書き換える（umya-spreadsheetの座標は (列, 行) で1始まり）
fn set_cell(worksheet: &mut umya_spreadsheet::Worksheet, column: Column, row: u32, value: &str) {
    worksheet
        .get_cell_mut((column.index() + 1, row + 1))
        .set_value(value.to_string());
}
