//! 対話式照合モジュール
//!
//! 既存基準を1件ずつ取り出し、統合基準の候補を類似度順に見せて選ばせる。
//! 選んだ候補は既存基準シートに書き戻す。

use crate::display::{self, RankedRow};
use crate::filter::filter_standards;
use crate::error::{Result, StandardsError};
use crate::workbook::{MatchSelection, StandardsStore};
use dialoguer::Input;
use standards_helper_common::{compare, parse_keywords, rank, Disclosure, MatchTable, Ranking, Standard};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// 表示中の候補を選ぶ（順位、1始まり）
    Pick(usize),
    /// さらに表示
    More,
    /// 全件表示
    All,
    /// 次の基準へ
    Skip,
    /// キーワードを変更
    Keywords,
    /// 候補をID・本文で絞り込む
    Filter,
    /// 終了
    Quit,
}

/// 入力をアクションに変換（不正な入力は None）
///
/// 番号は表示済みの範囲だけ受け付ける。
pub fn parse_action(input: &str, revealed: usize) -> Option<ReviewAction> {
    match input.trim() {
        "m" | "M" => Some(ReviewAction::More),
        "a" | "A" => Some(ReviewAction::All),
        "s" | "S" => Some(ReviewAction::Skip),
        "k" | "K" => Some(ReviewAction::Keywords),
        "f" | "F" => Some(ReviewAction::Filter),
        "q" | "Q" => Some(ReviewAction::Quit),
        other => match other.parse::<usize>() {
            Ok(n) if (1..=revealed).contains(&n) => Some(ReviewAction::Pick(n)),
            _ => None,
        },
    }
}

/// 参照基準1件の照合状態
///
/// 表示は `view`（絞り込み後の順位列）に対して行う。絞り込みなしなら順位列と同じ。
pub struct Comparison {
    reference: Standard,
    table: MatchTable,
    ranking: Ranking,
    view: Ranking,
    query: Option<String>,
    disclosure: Disclosure,
}

impl Comparison {
    pub fn new(reference: Standard, pool: &[Standard], keywords: &[String], page_size: usize) -> Result<Self> {
        let table = compare(Some(&reference), pool, keywords)?;
        let ranking = rank(&table);
        Ok(Self {
            reference,
            table,
            view: ranking.clone(),
            ranking,
            query: None,
            disclosure: Disclosure::new(page_size),
        })
    }

    /// キーワードを変えて再計算（表示は先頭に戻る）
    pub fn rescore(&mut self, pool: &[Standard], keywords: &[String]) -> Result<()> {
        self.table = compare(Some(&self.reference), pool, keywords)?;
        self.ranking = rank(&self.table);
        let query = self.query.take();
        self.set_filter(query.as_deref().unwrap_or(""), pool);
        Ok(())
    }

    /// 候補をID・本文で絞り込む（空なら解除、表示は先頭に戻る）
    ///
    /// 順位とスコアは絞り込み前のまま。
    pub fn set_filter(&mut self, query: &str, pool: &[Standard]) {
        let query = query.trim();
        if query.is_empty() {
            self.view = self.ranking.clone();
            self.query = None;
        } else {
            let matched: HashSet<&str> = filter_standards(pool, query)
                .into_iter()
                .map(|s| s.id.as_str())
                .collect();
            self.view = self.ranking.retain(|id| matched.contains(id));
            self.query = Some(query.to_string());
        }
        self.disclosure = Disclosure::new(self.disclosure.page_size());
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn reference(&self) -> &Standard {
        &self.reference
    }

    pub fn table(&self) -> &MatchTable {
        &self.table
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// 表示対象の順位列（絞り込み後）
    pub fn view(&self) -> &Ranking {
        &self.view
    }

    pub fn first_page(&mut self, pool: &[Standard]) -> Vec<RankedRow> {
        let ids = self.disclosure.first_page(&self.view);
        display::ranked_rows(ids, 0, &self.table, pool)
    }

    pub fn show_more(&mut self, pool: &[Standard]) -> Vec<RankedRow> {
        let offset = self.disclosure.shown();
        let ids = self.disclosure.show_more(&self.view);
        display::ranked_rows(ids, offset, &self.table, pool)
    }

    pub fn show_all(&mut self, pool: &[Standard]) -> Vec<RankedRow> {
        let offset = self.disclosure.shown();
        let ids = self.disclosure.show_all(&self.view);
        display::ranked_rows(ids, offset, &self.table, pool)
    }

    pub fn has_more(&self) -> bool {
        self.disclosure.has_more(&self.view)
    }

    /// 表示済みの件数
    pub fn revealed(&self) -> usize {
        self.disclosure.shown()
    }

    /// 順位で候補を選び、書き戻す内容を作る
    pub fn selection(&self, rank: usize, pool: &[Standard]) -> Option<MatchSelection> {
        let revealed = self.disclosure.revealed(&self.view);
        let id = revealed.get(rank.checked_sub(1)?)?;
        let candidate = pool.iter().find(|s| &s.id == id)?;
        Some(MatchSelection {
            original_id: self.reference.id.clone(),
            new_id: candidate.id.clone(),
            new_text: candidate.text.clone(),
            new_level: candidate.level.clone(),
        })
    }
}

/// 対話の設定
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// 書き戻し先のワークシート
    pub sheet: String,
    pub keywords: Vec<String>,
    pub page_size: usize,
}

/// 対話の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub written: usize,
    pub skipped: usize,
}

/// 選んだ候補を書き戻す（失敗は表示して false）
pub fn record_selection(store: &dyn StandardsStore, sheet: &str, selection: &MatchSelection) -> bool {
    match store.write_match(sheet, selection) {
        Ok(()) => {
            println!("  ✔ {} → {} を書き込みました\n", selection.original_id, selection.new_id);
            true
        }
        Err(e) => {
            warn!(locked = e.is_locked(), "write-back failed: {}", e);
            println!("  ⚠ {}\n", e);
            false
        }
    }
}

/// 対話式で照合（dialoguerで入力）
pub fn run_review(
    store: &dyn StandardsStore,
    originals: Vec<Standard>,
    pool: &[Standard],
    options: ReviewOptions,
) -> Result<ReviewSummary> {
    run_review_with(store, originals, pool, options, |prompt| {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| StandardsError::CliExecution(e.to_string()))
    })
}

const ACTION_PROMPT: &str = "番号:選択 m:さらに表示 a:全件 f:絞り込み s:次へ k:キーワード q:終了";
const KEYWORD_PROMPT: &str = "キーワード（カンマ区切り、空で解除）";
const FILTER_PROMPT: &str = "候補の絞り込み（ID・本文、空で解除）";

/// 入力関数を差し替えられる対話ループ
pub fn run_review_with<F>(
    store: &dyn StandardsStore,
    originals: Vec<Standard>,
    pool: &[Standard],
    options: ReviewOptions,
    mut prompt: F,
) -> Result<ReviewSummary>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut summary = ReviewSummary::default();
    let mut queue: VecDeque<Standard> = originals.into();
    let mut keywords = options.keywords;

    if queue.is_empty() {
        println!("✓ 照合対象の基準はありません");
        return Ok(summary);
    }

    let total = queue.len();
    println!("📍 照合対象の基準: {}件", total);
    if !keywords.is_empty() {
        println!("  キーワード: {}", keywords.join(", "));
    }
    println!("---");
    println!("操作: [番号]選択 [m]さらに表示 [a]全件 [f]絞り込み [s]次へ [k]キーワード [q]終了");
    println!("---\n");

    while let Some(reference) = queue.pop_front() {
        println!("[{}/{}]", total - queue.len(), total);
        display::print_reference(&reference);

        let mut comparison = Comparison::new(reference, pool, &keywords, options.page_size)?;
        debug!(
            reference = %comparison.reference().id,
            candidates = comparison.table().len(),
            "comparison ready"
        );
        show_first_page(&mut comparison, pool);

        loop {
            let input = prompt(ACTION_PROMPT)?;
            let Some(action) = parse_action(&input, comparison.revealed()) else {
                println!("  ⚠ 入力が不正です: {}", input.trim());
                continue;
            };

            match action {
                ReviewAction::Pick(n) => {
                    let Some(selection) = comparison.selection(n, pool) else {
                        println!("  ⚠ 候補が見つかりません: {}", n);
                        continue;
                    };
                    if record_selection(store, &options.sheet, &selection) {
                        summary.written += 1;
                        break;
                    }
                }
                ReviewAction::More => {
                    let rows = comparison.show_more(pool);
                    if rows.is_empty() {
                        println!("  これ以上の候補はありません");
                    } else {
                        display::print_rows(&rows);
                        print_more_hint(&comparison);
                    }
                }
                ReviewAction::All => {
                    let rows = comparison.show_all(pool);
                    if rows.is_empty() {
                        println!("  これ以上の候補はありません");
                    } else {
                        display::print_rows(&rows);
                    }
                }
                ReviewAction::Skip => {
                    println!("  → スキップ\n");
                    summary.skipped += 1;
                    break;
                }
                ReviewAction::Keywords => {
                    let input = prompt(KEYWORD_PROMPT)?;
                    keywords = parse_keywords(&input);
                    if keywords.is_empty() {
                        println!("  キーワードを解除しました");
                    } else {
                        println!("  キーワード: {}", keywords.join(", "));
                    }
                    comparison.rescore(pool, &keywords)?;
                    show_first_page(&mut comparison, pool);
                }
                ReviewAction::Filter => {
                    let input = prompt(FILTER_PROMPT)?;
                    comparison.set_filter(&input, pool);
                    match comparison.query() {
                        Some(query) => println!(
                            "  絞り込み: {}（{}/{}件）",
                            query,
                            comparison.view().len(),
                            comparison.ranking().len()
                        ),
                        None => println!("  絞り込みを解除しました"),
                    }
                    show_first_page(&mut comparison, pool);
                }
                ReviewAction::Quit => {
                    println!("終了します...");
                    return Ok(summary);
                }
            }
        }
    }

    println!("✓ すべての基準を処理しました");
    Ok(summary)
}

fn show_first_page(comparison: &mut Comparison, pool: &[Standard]) {
    let rows = comparison.first_page(pool);
    if rows.is_empty() {
        println!("  一致する候補がありません");
        return;
    }
    display::print_rows(&rows);
    print_more_hint(comparison);
}

fn print_more_hint(comparison: &Comparison) {
    if comparison.has_more() {
        println!(
            "  （{}/{}件表示中、m:さらに表示 a:全件）",
            comparison.revealed(),
            comparison.view().len()
        );
    }
}
