//! 順位付けと段階表示
//!
//! 照合表を重み付き類似度の降順に並べ、「上位N件」「さらにK件」「全件」の
//! 表示単位で取り出す。どの表示も同じ順位列のビューで、再計算はしない。

use crate::types::MatchTable;
use serde::Serialize;

/// 最初に表示する件数（「+10件表示」と同じ単位）
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 照合表から作った順位列（候補IDの並び）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    ids: Vec<String>,
}

impl Ranking {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 上位n件
    pub fn top_n(&self, n: usize) -> &[String] {
        &self.ids[..n.min(self.ids.len())]
    }

    /// 表示済み件数の次から最大window件
    pub fn next_window(&self, already_shown: usize, window: usize) -> &[String] {
        let start = already_shown.min(self.ids.len());
        let end = start.saturating_add(window).min(self.ids.len());
        &self.ids[start..end]
    }

    /// 全件
    pub fn all(&self) -> &[String] {
        &self.ids
    }

    /// 条件に合う候補だけの順位列（順序は保つ、スコアは再計算しない）
    pub fn retain<F>(&self, mut keep: F) -> Ranking
    where
        F: FnMut(&str) -> bool,
    {
        Ranking {
            ids: self.ids.iter().filter(|id| keep(id.as_str())).cloned().collect(),
        }
    }
}

/// 照合表を重み付き類似度の降順に並べる
///
/// 同点はプールの順序を保つ（安定ソート）。
pub fn rank(table: &MatchTable) -> Ranking {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|a, b| {
        b.result
            .weighted_similarity
            .total_cmp(&a.result.weighted_similarity)
    });

    Ranking {
        ids: entries.into_iter().map(|e| e.candidate_id.clone()).collect(),
    }
}

/// 上位n件
pub fn top_n(ranking: &Ranking, n: usize) -> &[String] {
    ranking.top_n(n)
}

/// 表示済み件数の次のwindow件
pub fn next_window(ranking: &Ranking, already_shown: usize, window: usize) -> &[String] {
    ranking.next_window(already_shown, window)
}

/// 全件
pub fn all(ranking: &Ranking) -> &[String] {
    ranking.all()
}

/// 段階表示の状態（何件まで表示したか）
///
/// 順位列そのものは持たず、表示済み件数だけを管理する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    shown: usize,
    page_size: usize,
}

impl Default for Disclosure {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Disclosure {
    pub fn new(page_size: usize) -> Self {
        Self {
            shown: 0,
            page_size: page_size.max(1),
        }
    }

    /// 最初のページを表示
    pub fn first_page<'a>(&mut self, ranking: &'a Ranking) -> &'a [String] {
        self.shown = 0;
        self.show_more(ranking)
    }

    /// 次のページを表示（新たに表示された分を返す）
    pub fn show_more<'a>(&mut self, ranking: &'a Ranking) -> &'a [String] {
        let window = ranking.next_window(self.shown, self.page_size);
        self.shown += window.len();
        window
    }

    /// 残りをすべて表示（新たに表示された分を返す）
    pub fn show_all<'a>(&mut self, ranking: &'a Ranking) -> &'a [String] {
        let rest = ranking.next_window(self.shown, ranking.len());
        self.shown += rest.len();
        rest
    }

    /// 表示済みの全候補
    pub fn revealed<'a>(&self, ranking: &'a Ranking) -> &'a [String] {
        ranking.top_n(self.shown)
    }

    pub fn has_more(&self, ranking: &Ranking) -> bool {
        self.shown < ranking.len()
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchResult, ScoredCandidate};

    fn table(scores: &[(&str, f64)]) -> MatchTable {
        let entries = scores
            .iter()
            .map(|(id, score)| ScoredCandidate {
                candidate_id: id.to_string(),
                result: MatchResult {
                    weighted: score / 100.0,
                    weighted_similarity: *score,
                    ..Default::default()
                },
            })
            .collect();
        MatchTable::new("A1", entries)
    }

    fn numbered(count: usize) -> Ranking {
        let scores: Vec<(String, f64)> = (0..count)
            .map(|i| (format!("U{}", i), 100.0 - i as f64))
            .collect();
        let borrowed: Vec<(&str, f64)> = scores.iter().map(|(id, s)| (id.as_str(), *s)).collect();
        rank(&table(&borrowed))
    }

    #[test]
    fn test_rank_descending() {
        let ranking = rank(&table(&[("U1", 10.0), ("U2", 90.0), ("U3", 50.0)]));
        assert_eq!(ranking.ids(), &["U2", "U3", "U1"]);
    }

    #[test]
    fn test_rank_ties_keep_pool_order() {
        let ranking = rank(&table(&[("U1", 50.0), ("U2", 70.0), ("U3", 50.0), ("U4", 50.0)]));
        assert_eq!(ranking.ids(), &["U2", "U1", "U3", "U4"]);
    }

    #[test]
    fn test_rank_is_permutation_of_table() {
        let t = table(&[("U1", 3.0), ("U2", 1.0), ("U3", 2.0)]);
        let ranking = rank(&t);
        let mut ids: Vec<&str> = ranking.ids().iter().map(|s| s.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["U1", "U2", "U3"]);
        assert_eq!(ranking.len(), t.len());
    }

    #[test]
    fn test_retain_keeps_rank_order() {
        let ranking = rank(&table(&[("U1", 10.0), ("U2", 90.0), ("U3", 50.0), ("X4", 70.0)]));
        let narrowed = ranking.retain(|id| id.starts_with('U'));
        assert_eq!(narrowed.ids(), &["U2", "U3", "U1"]);
        assert_eq!(ranking.len(), 4);
        assert!(ranking.retain(|_| false).is_empty());
    }

    #[test]
    fn test_rank_empty_table() {
        let ranking = rank(&MatchTable::empty("A1"));
        assert!(ranking.is_empty());
        assert!(ranking.top_n(10).is_empty());
    }

    #[test]
    fn test_top_n_bounds() {
        let ranking = numbered(5);
        assert_eq!(top_n(&ranking, 3).len(), 3);
        assert_eq!(top_n(&ranking, 50).len(), 5);
        assert!(top_n(&ranking, 0).is_empty());
        assert_eq!(all(&ranking).len(), 5);
    }

    #[test]
    fn test_next_window_bounds() {
        let ranking = numbered(25);
        assert_eq!(next_window(&ranking, 20, 10), &ranking.ids()[20..25]);
        assert!(next_window(&ranking, 25, 10).is_empty());
        assert!(next_window(&ranking, 100, 10).is_empty());
        assert_eq!(next_window(&ranking, 3, usize::MAX).len(), 22);
    }

    #[test]
    fn test_paging_consistency() {
        let ranking = numbered(37);
        for first in 0..=40 {
            for window in 0..=15 {
                let mut combined = top_n(&ranking, first).to_vec();
                combined.extend_from_slice(next_window(&ranking, first, window));
                assert_eq!(combined.as_slice(), top_n(&ranking, first + window));
            }
        }
    }

    #[test]
    fn test_disclosure_pages() {
        let ranking = numbered(23);
        let mut disclosure = Disclosure::default();

        assert_eq!(disclosure.first_page(&ranking), &ranking.ids()[..10]);
        assert!(disclosure.has_more(&ranking));
        assert_eq!(disclosure.show_more(&ranking), &ranking.ids()[10..20]);
        assert_eq!(disclosure.show_more(&ranking), &ranking.ids()[20..23]);
        assert!(!disclosure.has_more(&ranking));
        assert!(disclosure.show_more(&ranking).is_empty());
        assert_eq!(disclosure.revealed(&ranking), ranking.all());
    }

    #[test]
    fn test_disclosure_show_all() {
        let ranking = numbered(23);
        let mut disclosure = Disclosure::new(10);
        disclosure.first_page(&ranking);

        assert_eq!(disclosure.show_all(&ranking), &ranking.ids()[10..]);
        assert_eq!(disclosure.shown(), 23);
        assert!(disclosure.show_all(&ranking).is_empty());
    }

    #[test]
    fn test_disclosure_zero_page_size_is_one() {
        assert_eq!(Disclosure::new(0).page_size(), 1);
    }
}
