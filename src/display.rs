//! 照合結果の表示

use serde::Serialize;
use standards_helper_common::{MatchTable, Standard};
use std::collections::HashMap;

/// 一覧表示で本文を切り詰める文字数
pub const TEXT_PREVIEW_CHARS: usize = 60;

/// 順位付けされた候補1行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    /// 順位（1始まり）
    pub rank: usize,
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub weighted_similarity: f64,
    pub cosine: f64,
    pub edit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_proportion: Option<f64>,
}

/// 順位列の一部（offset件目から）を表示行にする
///
/// 候補プールにないIDは飛ばす。
pub fn ranked_rows(ids: &[String], offset: usize, table: &MatchTable, pool: &[Standard]) -> Vec<RankedRow> {
    let mut by_id: HashMap<&str, &Standard> = HashMap::new();
    for standard in pool {
        by_id.entry(standard.id.as_str()).or_insert(standard);
    }

    ids.iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let standard = by_id.get(id.as_str())?;
            let result = table.get(id)?;
            Some(RankedRow {
                rank: offset + i + 1,
                id: id.clone(),
                text: standard.text.clone(),
                level: standard.level.clone(),
                weighted_similarity: result.weighted_similarity,
                cosine: result.cosine,
                edit: result.edit,
                keyword_proportion: result.keyword_proportion,
            })
        })
        .collect()
}

/// 1行目だけを最大max_chars文字に（切り詰めたら "…" を付ける）
pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let more_lines = text.trim().lines().count() > 1;

    let mut out: String = first_line.chars().take(max_chars).collect();
    if first_line.chars().count() > max_chars || more_lines {
        out.push('…');
    }
    out
}

pub fn print_reference(standard: &Standard) {
    println!("📋 {} {}", standard.id, standard.level_or_empty());
    for line in standard.text.lines() {
        println!("   {}", line);
    }
    println!();
}

pub fn print_rows(rows: &[RankedRow]) {
    for row in rows {
        let keyword = row
            .keyword_proportion
            .map(|k| format!(" kw {:.2}", k))
            .unwrap_or_default();
        println!(
            "{:>3}. {:>6.2}%  {:<10} {:<8} {}  (cos {:.2} / edit {:.2}{})",
            row.rank,
            row.weighted_similarity,
            row.id,
            row.level.as_deref().unwrap_or(""),
            preview(&row.text, TEXT_PREVIEW_CHARS),
            row.cosine,
            row.edit,
            keyword,
        );
    }
}

pub fn print_standard_line(standard: &Standard) {
    let mark = if standard.completed { "✔" } else { " " };
    println!(
        "{} {:<10} {:<8} {}",
        mark,
        standard.id,
        standard.level_or_empty(),
        preview(&standard.text, TEXT_PREVIEW_CHARS)
    );
}
