//! 既存基準の絞り込み

use standards_helper_common::Standard;

/// ID・本文で絞り込む（大文字小文字を区別しない、順序は保つ）
///
/// IDか本文のどちらかに部分一致すれば残す。
pub fn filter_standards<'a>(standards: &'a [Standard], query: &str) -> Vec<&'a Standard> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return standards.iter().collect();
    }

    standards
        .iter()
        .filter(|s| s.id.to_lowercase().contains(&query) || s.text.to_lowercase().contains(&query))
        .collect()
}

/// 未照合の基準だけ残す
pub fn pending_only<'a, I>(standards: I) -> Vec<&'a Standard>
where
    I: IntoIterator<Item = &'a Standard>,
{
    standards.into_iter().filter(|s| !s.completed).collect()
}
