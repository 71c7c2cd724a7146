//! ワークシートのレイアウト定義
//!
//! 列は "B" のような列記号で設定ファイルに書く。行番号はExcel表記（1始まり）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 列（内部は0始まりの列番号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(u32);

impl Column {
    /// xlsxの列数の上限（A..XFD）
    pub const MAX_COLUMNS: u32 = 16_384;

    pub const fn from_index(index: u32) -> Self {
        Column(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// 列記号（"A", "AB"）から変換
    pub fn parse(letters: &str) -> Option<Self> {
        let letters = letters.trim();
        if letters.is_empty() || letters.len() > 3 {
            return None;
        }

        let mut index: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            index = index * 26 + digit;
        }
        if index > Self::MAX_COLUMNS {
            return None;
        }
        Some(Column(index - 1))
    }

    pub fn letters(self) -> String {
        let mut n = self.0 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl TryFrom<String> for Column {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Column::parse(&value).ok_or_else(|| format!("不正な列記号: {}", value))
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.letters()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

/// 既存基準（照合表）シートのレイアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OriginalLayout {
    /// データ開始行（1始まり）
    pub first_row: u32,
    pub id_column: Column,
    pub text_column: Column,
    pub level_column: Column,
    /// 照合結果の書き込み先
    pub matched_id_column: Column,
    pub matched_text_column: Column,
    pub matched_level_column: Column,
    /// 見出し行のID列の値（読み飛ばす）
    pub header_marker: String,
}

impl Default for OriginalLayout {
    fn default() -> Self {
        Self {
            first_row: 4,
            id_column: Column::from_index(1),           // B
            text_column: Column::from_index(2),         // C
            level_column: Column::from_index(3),        // D
            matched_id_column: Column::from_index(5),   // F
            matched_text_column: Column::from_index(6), // G
            matched_level_column: Column::from_index(7), // H
            header_marker: "No.".into(),
        }
    }
}

impl OriginalLayout {
    /// データ開始行（0始まり）
    pub fn first_row_index(&self) -> u32 {
        self.first_row.saturating_sub(1)
    }

    pub fn matched_columns(&self) -> [Column; 3] {
        [
            self.matched_id_column,
            self.matched_text_column,
            self.matched_level_column,
        ]
    }
}

/// 統合基準シートのレイアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnifiedLayout {
    pub first_row: u32,
    pub id_column: Column,
    pub text_column: Column,
    pub level_column: Column,
    pub header_marker: String,
}

impl Default for UnifiedLayout {
    fn default() -> Self {
        Self {
            first_row: 4,
            id_column: Column::from_index(0),    // A
            text_column: Column::from_index(1),  // B
            level_column: Column::from_index(2), // C
            header_marker: "Criterion #".into(),
        }
    }
}

impl UnifiedLayout {
    pub fn first_row_index(&self) -> u32 {
        self.first_row.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_parse() {
        assert_eq!(Column::parse("A"), Some(Column(0)));
        assert_eq!(Column::parse("h"), Some(Column(7)));
        assert_eq!(Column::parse("Z"), Some(Column(25)));
        assert_eq!(Column::parse("AA"), Some(Column(26)));
        assert_eq!(Column::parse("AB"), Some(Column(27)));
        assert_eq!(Column::parse(""), None);
        assert_eq!(Column::parse("B2"), None);
        assert_eq!(Column::parse("XFD"), Some(Column(Column::MAX_COLUMNS - 1)));
        assert_eq!(Column::parse("XFE"), None);
        assert_eq!(Column::parse("ZZZ"), None);
        assert_eq!(Column::parse("AAAA"), None);
    }

    #[test]
    fn test_column_letters() {
        for letters in ["A", "F", "Z", "AA", "AZ", "BA", "XFD"] {
            let column = Column::parse(letters).unwrap();
            assert_eq!(column.letters(), letters);
        }
    }

    #[test]
    fn test_default_layouts() {
        let original = OriginalLayout::default();
        assert_eq!(original.id_column.to_string(), "B");
        assert_eq!(original.matched_level_column.to_string(), "H");
        assert_eq!(original.first_row_index(), 3);

        let unified = UnifiedLayout::default();
        assert_eq!(unified.text_column.to_string(), "B");
        assert_eq!(unified.header_marker, "Criterion #");
    }

    #[test]
    fn test_layout_json_uses_letters() {
        let json = serde_json::to_string(&OriginalLayout::default()).unwrap();
        assert!(json.contains("\"idColumn\":\"B\""));

        let layout: OriginalLayout = serde_json::from_str(r#"{"idColumn":"C","firstRow":2}"#).unwrap();
        assert_eq!(layout.id_column, Column::from_index(2));
        assert_eq!(layout.first_row, 2);
        // 省略した項目はデフォルト
        assert_eq!(layout.text_column, Column::from_index(2));
    }

    #[test]
    fn test_layout_json_rejects_bad_column() {
        let result = serde_json::from_str::<OriginalLayout>(r#"{"idColumn":"1"}"#);
        assert!(result.is_err());

        // 範囲外の列
        let result = serde_json::from_str::<OriginalLayout>(r#"{"idColumn":"ZZZ"}"#);
        assert!(result.unwrap_err().to_string().contains("ZZZ"));
    }
}
