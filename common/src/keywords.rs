//! キーワード処理
//!
//! ユーザーがカンマ区切りで入力したキーワードの解析と、候補本文での含有率計算。

/// カンマ区切りの入力をキーワード一覧に変換（前後の空白除去、空要素は除外）
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

/// 本文にそのまま含まれるキーワードの割合
///
/// 大文字小文字は区別する。キーワードが空なら `None`。
pub fn keyword_proportion(text: &str, keywords: &[String]) -> Option<f64> {
    if keywords.is_empty() {
        return None;
    }

    let found = keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
    Some(found as f64 / keywords.len() as f64)
}
