//! 一括候補提示とレポート出力
//!
//! 未照合の基準それぞれに最も近い統合基準を求め、Excelに書き出す。

use crate::error::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use standards_helper_common::{compare, rank, MatchResult, Standard};
use std::path::Path;
use tracing::info;

/// 参照基準1件に対する最有力候補
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub reference: Standard,
    /// 候補がない場合は None
    pub best: Option<(Standard, MatchResult)>,
}

impl Suggestion {
    pub fn score(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, r)| r.weighted_similarity)
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

/// 各基準の最有力候補を求める（入力の順序を保つ）
pub fn suggest_matches(
    references: &[Standard],
    pool: &[Standard],
    keywords: &[String],
    show_progress: bool,
) -> Result<Vec<Suggestion>> {
    let pb = progress_bar(references.len(), show_progress);
    pb.set_message("照合中");

    let suggestions = references
        .par_iter()
        .map(|reference| -> Result<Suggestion> {
            let table = compare(Some(reference), pool, keywords)?;
            let ranking = rank(&table);
            let best = ranking.top_n(1).first().and_then(|id| {
                let candidate = pool.iter().find(|s| &s.id == id)?;
                let result = table.get(id)?;
                Some((candidate.clone(), *result))
            });
            pb.inc(1);
            Ok(Suggestion {
                reference: reference.clone(),
                best,
            })
        })
        .collect::<Result<Vec<Suggestion>>>();

    pb.finish_and_clear();
    suggestions
}

const HEADERS: [&str; 7] = ["既存ID", "既存本文", "候補ID", "候補本文", "候補レベル", "類似度(%)", "コサイン / 編集"];

/// 見出し行（0始まり）
pub const REPORT_HEADER_ROW: u32 = 2;

/// 候補レポートをExcelに書き出す
pub fn write_report(path: &Path, sheet: &str, suggestions: &[Suggestion]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold().set_background_color("#D9E1F2");
    let text_format = Format::new().set_text_wrap();
    let score_format = Format::new().set_num_format("0.00");

    worksheet.write_string_with_format(0, 0, format!("照合候補レポート（{}）", sheet), &title_format)?;
    worksheet.write_string(1, 0, format!("作成: {}", Local::now().format("%Y-%m-%d %H:%M")))?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(REPORT_HEADER_ROW, col as u16, *header, &header_format)?;
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        let row = REPORT_HEADER_ROW + 1 + i as u32;
        worksheet.write_string(row, 0, suggestion.reference.id.as_str())?;
        worksheet.write_string_with_format(row, 1, suggestion.reference.text.as_str(), &text_format)?;

        match &suggestion.best {
            Some((candidate, result)) => {
                worksheet.write_string(row, 2, candidate.id.as_str())?;
                worksheet.write_string_with_format(row, 3, candidate.text.as_str(), &text_format)?;
                worksheet.write_string(row, 4, candidate.level_or_empty())?;
                worksheet.write_number_with_format(row, 5, result.weighted_similarity, &score_format)?;
                worksheet.write_string(row, 6, format!("{:.2} / {:.2}", result.cosine, result.edit))?;
            }
            None => {
                worksheet.write_string(row, 2, "（候補なし）")?;
            }
        }
    }

    worksheet.set_column_width(0, 12)?;
    worksheet.set_column_width(1, 60)?;
    worksheet.set_column_width(2, 12)?;
    worksheet.set_column_width(3, 60)?;
    worksheet.set_column_width(4, 12)?;
    worksheet.set_column_width(5, 12)?;
    worksheet.set_column_width(6, 16)?;
    worksheet.set_freeze_panes(REPORT_HEADER_ROW + 1, 0)?;

    workbook.save(path)?;
    info!(path = %path.display(), rows = suggestions.len(), "report written");
    Ok(())
}
