//! 照合エンジン
//!
//! 参照基準1件と候補プールを照合し、候補ごとの重み付き類似度を求める。
//!
//! ## スコアの求め方
//! 1. 候補本文が1行ならそのままコサイン類似度・編集距離類似度を計算
//! 2. 複数行なら行ごとに計算し、コサインの最大値と編集距離の最大値を別々に採用
//!    （2つの最大値が別の行から来ることもある）
//! 3. キーワードなし: 0.5·cosine + 0.5·edit
//!    キーワードあり: 0.3·cosine + 0.3·edit + 0.4·keyword_proportion
//! 4. 百分率にして小数2桁に丸めた値を表示・順位付けに使う

use crate::error::{Error, Result};
use crate::keywords::keyword_proportion;
use crate::similarity::{edit_similarity, lexical_similarity};
use crate::types::{MatchResult, MatchTable, ScoredCandidate, Standard};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 各スコアの重み
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub cosine: f64,
    pub edit: f64,
    pub keyword: f64,
}

/// キーワード未指定時の重み
pub const TEXT_WEIGHTS: Weights = Weights {
    cosine: 0.5,
    edit: 0.5,
    keyword: 0.0,
};

/// キーワード指定時の重み
pub const KEYWORD_WEIGHTS: Weights = Weights {
    cosine: 0.3,
    edit: 0.3,
    keyword: 0.4,
};

/// 参照テキストと候補テキストの2つの類似度
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextScores {
    pub cosine: f64,
    pub edit: f64,
}

/// 候補テキストの類似度を求める（複数行は行ごとの最大値）
pub fn text_scores(reference: &str, candidate: &str) -> TextScores {
    if !candidate.contains('\n') {
        return TextScores {
            cosine: lexical_similarity(reference, candidate),
            edit: edit_similarity(reference, candidate),
        };
    }

    // コサインと編集距離は独立に最大値を取る
    candidate
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .fold(TextScores::default(), |best, line| TextScores {
            cosine: best.cosine.max(lexical_similarity(reference, line)),
            edit: best.edit.max(edit_similarity(reference, line)),
        })
}

/// 重み付き類似度 [0,1]
pub fn weighted_score(scores: TextScores, keyword_proportion: Option<f64>) -> f64 {
    let weighted = match keyword_proportion {
        Some(proportion) => {
            let w = KEYWORD_WEIGHTS;
            scores.cosine * w.cosine + scores.edit * w.edit + proportion * w.keyword
        }
        None => {
            let w = TEXT_WEIGHTS;
            scores.cosine * w.cosine + scores.edit * w.edit
        }
    };
    weighted.clamp(0.0, 1.0)
}

/// [0,1] の値を百分率にして小数2桁に丸める
pub fn to_percent(value: f64) -> f64 {
    (value * 100.0 * 100.0).round() / 100.0
}

/// 候補1件を照合
pub fn score_candidate(reference_text: &str, candidate_text: &str, keywords: &[String]) -> MatchResult {
    let scores = text_scores(reference_text, candidate_text);
    let proportion = keyword_proportion(candidate_text, keywords);
    let weighted = weighted_score(scores, proportion);

    MatchResult {
        cosine: scores.cosine,
        edit: scores.edit,
        keyword_proportion: proportion,
        weighted,
        weighted_similarity: to_percent(weighted),
    }
}

/// 候補プール全体を照合
///
/// 参照基準に本文がない、またはプールが空の場合は空の照合表を返す。
/// 本文のない候補は照合表に含めない（スコア0とは区別する）。
/// エントリはプールの順序のまま並ぶ。
pub fn score_all(reference: &Standard, pool: &[Standard], keywords: &[String]) -> MatchTable {
    if !reference.has_text() || pool.is_empty() {
        return MatchTable::empty(&reference.id);
    }

    let score = |candidate: &Standard| -> Option<ScoredCandidate> {
        if !candidate.has_text() {
            return None;
        }
        Some(ScoredCandidate {
            candidate_id: candidate.id.clone(),
            result: score_candidate(&reference.text, &candidate.text, keywords),
        })
    };

    #[cfg(feature = "parallel")]
    let entries: Vec<ScoredCandidate> = pool.par_iter().filter_map(score).collect();
    #[cfg(not(feature = "parallel"))]
    let entries: Vec<ScoredCandidate> = pool.iter().filter_map(score).collect();

    MatchTable::new(reference.id.clone(), entries)
}

/// 照合コンテキストを検証してから照合する
///
/// 参照基準が未選択、または候補プールが空なら `Error::NoComparisonContext`。
/// 参照基準の本文が空の場合はエラーではなく空の照合表になる。
pub fn compare(
    reference: Option<&Standard>,
    pool: &[Standard],
    keywords: &[String],
) -> Result<MatchTable> {
    let reference = reference
        .ok_or_else(|| Error::NoComparisonContext("no reference standard selected".into()))?;

    if pool.is_empty() {
        return Err(Error::NoComparisonContext("candidate pool is empty".into()));
    }

    Ok(score_all(reference, pool, keywords))
}
