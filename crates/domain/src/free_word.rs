//! # フリーワード検索
//!
//! 一覧画面の検索ボックスに入力された文字列を分類する。
//!
//! - 空文字列（空白のみを含む）: 絞り込みなし
//! - 整数として解釈できる: ID の完全一致
//! - それ以外: 全文検索
//!
//! 分類結果はインフラ層で WHERE 句に変換され、値は必ずバインドパラメータとして渡される。

use serde::{Deserialize, Serialize};

/// 分類済みのフリーワード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreeWord {
    /// 絞り込みなし
    Empty,
    /// ID の完全一致
    Id(i64),
    /// 全文検索（前後の空白は除去済み）
    Text(String),
}

impl FreeWord {
    /// 入力文字列を分類する
    ///
    /// ```rust
    /// use recruitlink_domain::free_word::FreeWord;
    ///
    /// assert_eq!(FreeWord::parse("  "), FreeWord::Empty);
    /// assert_eq!(FreeWord::parse("123"), FreeWord::Id(123));
    /// assert_eq!(FreeWord::parse(" Acme "), FreeWord::Text("Acme".to_string()));
    /// ```
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", FreeWord::Empty)]
    #[case("   ", FreeWord::Empty)]
    #[case("\t\n", FreeWord::Empty)]
    fn test_空白のみはemptyになる(#[case] input: &str, #[case] expected: FreeWord) {
        assert_eq!(FreeWord::parse(input), expected);
    }

    #[rstest]
    #[case("123", 123)]
    #[case(" 42 ", 42)]
    #[case("+7", 7)]
    #[case("-1", -1)]
    #[case("0", 0)]
    fn test_整数はidとして扱う(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(FreeWord::parse(input), FreeWord::Id(expected));
    }

    #[rstest]
    #[case("Acme", "Acme")]
    #[case(" 株式会社テスト ", "株式会社テスト")]
    #[case("12a", "12a")]
    #[case("1.5", "1.5")]
    #[case("99999999999999999999", "99999999999999999999")]
    fn test_整数以外は全文検索として扱う(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(FreeWord::parse(input), FreeWord::Text(expected.to_string()));
    }
}
