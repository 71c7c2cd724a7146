//! テキスト類似度モジュール
//!
//! 1行テキスト同士の独立した2つの類似度を計算する。
//! - TF-IDFベクトルのコサイン類似度（2文書コーパス）
//! - レーベンシュタイン距離を最大長で正規化した類似度
//!
//! どちらも [0,1] の範囲で、入力の順序に対して対称。

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// コーパスの文書数（比較する2テキスト）
const CORPUS_SIZE: f64 = 2.0;

/// テキストをトークンに分割
///
/// 小文字化した上で、2文字以上の単語文字の並びをトークンとする。
pub fn tokenize(text: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    }

    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// トークンの出現回数
fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// 平滑化IDF: ln((1 + n) / (1 + df)) + 1
fn smoothed_idf(doc_count: usize) -> f64 {
    ((1.0 + CORPUS_SIZE) / (1.0 + doc_count as f64)).ln() + 1.0
}

/// TF-IDFコサイン類似度
///
/// `{a, b}` を2文書のコーパスとしてTF-IDFベクトルを作り、そのコサインを返す。
/// どちらかがトークンを持たない場合は 0。
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    let a_counts = term_counts(a);
    let b_counts = term_counts(b);

    if a_counts.is_empty() || b_counts.is_empty() {
        return 0.0;
    }

    let vocabulary: BTreeSet<&str> = a_counts
        .keys()
        .chain(b_counts.keys())
        .map(|t| t.as_str())
        .collect();

    let mut dot = 0.0;
    let mut a_norm = 0.0;
    let mut b_norm = 0.0;

    for term in vocabulary {
        let a_tf = a_counts.get(term).copied().unwrap_or(0);
        let b_tf = b_counts.get(term).copied().unwrap_or(0);
        let doc_count = usize::from(a_tf > 0) + usize::from(b_tf > 0);
        let idf = smoothed_idf(doc_count);

        let a_weight = a_tf as f64 * idf;
        let b_weight = b_tf as f64 * idf;

        dot += a_weight * b_weight;
        a_norm += a_weight * a_weight;
        b_norm += b_weight * b_weight;
    }

    let denom = a_norm.sqrt() * b_norm.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    (dot / denom).clamp(0.0, 1.0)
}

/// 編集距離類似度: 1 - 距離 / 長い方の文字数
///
/// 両方とも空文字列なら同一とみなして 1。
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// レーベンシュタイン距離を計算（文字単位）
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // 直前の行だけ保持する
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}
