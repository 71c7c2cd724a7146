//! 基準データと照合結果の型定義
//!
//! CLIと照合エンジンで共有される型:
//! - Standard: 基準（既存リスト・統合リストの1行）
//! - MatchResult: 参照基準と候補1件の照合スコア
//! - MatchTable: 参照基準1件に対する照合結果一式

use serde::{Deserialize, Serialize};

/// 基準（criterion）1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    /// 識別子（例: "A1.2"）
    pub id: String,

    /// 基準本文（セル内改行で複数の細目を含むことがある）
    pub text: String,

    /// レベル（任意）
    #[serde(default)]
    pub level: Option<String>,

    /// 照合済みか（既存リストのみ意味を持つ）
    #[serde(default)]
    pub completed: bool,
}

impl Standard {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// 照合対象となる本文を持つか（空白のみは本文なしとみなす）
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// 表示用のレベル（未設定は空文字）
    pub fn level_or_empty(&self) -> &str {
        self.level.as_deref().unwrap_or("")
    }
}

/// 参照基準と候補1件の照合結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// TF-IDFコサイン類似度 [0,1]
    pub cosine: f64,

    /// 正規化編集距離類似度 [0,1]
    pub edit: f64,

    /// キーワード含有率 [0,1]（キーワード指定時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_proportion: Option<f64>,

    /// 重み付き類似度 [0,1]（丸め前）
    pub weighted: f64,

    /// 表示・順位付けに使う重み付き類似度（百分率、小数2桁に丸め）
    pub weighted_similarity: f64,
}

/// 照合表の1エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub candidate_id: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// 参照基準1件に対する照合表
///
/// エントリは候補プールの順序を保つ（本文なしの候補は含まない）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTable {
    reference_id: String,
    entries: Vec<ScoredCandidate>,
}

impl MatchTable {
    pub fn new(reference_id: impl Into<String>, entries: Vec<ScoredCandidate>) -> Self {
        Self {
            reference_id: reference_id.into(),
            entries,
        }
    }

    /// 照合の空結果（「一致なし」）
    pub fn empty(reference_id: impl Into<String>) -> Self {
        Self::new(reference_id, Vec::new())
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    /// 候補IDで照合結果を取得（IDが重複する場合は先頭）
    pub fn get(&self, candidate_id: &str) -> Option<&MatchResult> {
        self.entries
            .iter()
            .find(|e| e.candidate_id == candidate_id)
            .map(|e| &e.result)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCandidate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MatchTable {
    type Item = &'a ScoredCandidate;
    type IntoIter = std::slice::Iter<'a, ScoredCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
