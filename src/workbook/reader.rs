//! Excelから基準リストを読み込む

use super::layout::{Column, OriginalLayout, UnifiedLayout};
use crate::error::{Result, StandardsError};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use regex::Regex;
use standards_helper_common::Standard;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub(crate) type XlsxWorkbook = Xlsx<BufReader<File>>;

/// 既存基準のIDとして受け付ける形式か（例: "A1", "RC2.1.3a", "GR1.2.a"）
///
/// 見出しの "No." もこの形式に合うので、見出し判定は別に行う。
pub fn is_standard_id(id: &str) -> bool {
    lazy_static::lazy_static! {
        static ref ID_RE: Regex = Regex::new(r"^[A-Za-z]+[0-9]*(\.[0-9]+)*[a-z]*\.?[a-z]*$").unwrap();
    }
    ID_RE.is_match(id.trim())
}

pub(crate) fn open(path: &Path) -> Result<XlsxWorkbook> {
    if !path.exists() {
        return Err(StandardsError::FileNotFound(path.display().to_string()));
    }
    let workbook: XlsxWorkbook = open_workbook(path)?;
    Ok(workbook)
}

/// ワークシートのセル範囲を取得
pub(crate) fn sheet_range(workbook: &mut XlsxWorkbook, name: &str) -> Result<Range<Data>> {
    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == name) {
        return Err(StandardsError::SheetNotFound {
            name: name.to_string(),
            available: names.join(", "),
        });
    }
    Ok(workbook.worksheet_range(name)?)
}

/// ワークブック内のシート名一覧
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    Ok(open(path)?.sheet_names())
}

/// セルの値を文字列に（空・エラーは None）
pub(crate) fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 整数値の数値セルは小数点なしで表示
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn cell_at(range: &Range<Data>, row: u32, column: Column) -> Option<String> {
    cell_text(range.get_value((row, column.index())))
}

/// 最終行（0始まり、絶対位置）
fn last_row(range: &Range<Data>) -> Option<u32> {
    range.end().map(|(row, _)| row)
}

/// 既存基準を読み込む
///
/// ID・本文がある行のうち、見出し行と既存基準のID形式に合わない行を除く。
/// 照合結果列（新ID・新本文・新レベル）がすべて埋まっていれば照合済み。
pub fn load_original_standards(
    path: &Path,
    sheet: &str,
    layout: &OriginalLayout,
) -> Result<Vec<Standard>> {
    let mut workbook = open(path)?;
    let range = sheet_range(&mut workbook, sheet)?;
    Ok(parse_original_standards(&range, layout))
}

pub(crate) fn parse_original_standards(range: &Range<Data>, layout: &OriginalLayout) -> Vec<Standard> {
    let Some(last) = last_row(range) else {
        return Vec::new();
    };

    let mut standards = Vec::new();
    for row in layout.first_row_index()..=last {
        let (Some(id), Some(text)) = (
            cell_at(range, row, layout.id_column),
            cell_at(range, row, layout.text_column),
        ) else {
            continue;
        };

        if id == layout.header_marker || !is_standard_id(&id) {
            debug!(row = row + 1, id = %id, "skip row: not a standard id");
            continue;
        }

        let completed = layout
            .matched_columns()
            .iter()
            .all(|&column| cell_at(range, row, column).is_some());

        standards.push(Standard {
            id,
            text,
            level: cell_at(range, row, layout.level_column),
            completed,
        });
    }

    standards
}

/// 統合基準を読み込む
pub fn load_new_standards(path: &Path, sheet: &str, layout: &UnifiedLayout) -> Result<Vec<Standard>> {
    let mut workbook = open(path)?;
    let range = sheet_range(&mut workbook, sheet)?;
    Ok(parse_new_standards(&range, layout))
}

pub(crate) fn parse_new_standards(range: &Range<Data>, layout: &UnifiedLayout) -> Vec<Standard> {
    let Some(last) = last_row(range) else {
        return Vec::new();
    };

    let mut standards = Vec::new();
    for row in layout.first_row_index()..=last {
        let (Some(id), Some(text)) = (
            cell_at(range, row, layout.id_column),
            cell_at(range, row, layout.text_column),
        ) else {
            continue;
        };

        if id == layout.header_marker {
            continue;
        }

        standards.push(Standard {
            id,
            text,
            level: cell_at(range, row, layout.level_column),
            completed: false,
        });
    }

    standards
}
