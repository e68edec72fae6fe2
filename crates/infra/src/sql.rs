//! # SQL 断片ビルダー
//!
//! 複数のリポジトリで共通する動的 SQL の組み立てを提供する。
//! 値はすべて `push_bind` でバインドし、文字列として埋め込むのはテーブル名・カラム名
//! などコード上の定数だけに限る。

use chrono::{DateTime, Utc};
use recruitlink_domain::free_word::FreeWord;
use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// パッチ型から `UPDATE ... SET ... WHERE id = $n` を組み立てるビルダー
///
/// `updated_at` は常に更新する。`set` に `None` を渡したカラムは SET 句に含めない。
///
/// ```ignore
/// let mut update = PatchUpdate::new("agents", Utc::now());
/// update
///     .set("agent_name", patch.agent_name.clone())
///     .set("usage_status", patch.usage_status);
/// update.finish(id.as_i64()).build().execute(&pool).await?;
/// ```
pub(crate) struct PatchUpdate<'args> {
    builder: QueryBuilder<'args, Postgres>,
    columns: usize,
}

impl<'args> PatchUpdate<'args> {
    pub(crate) fn new(table: &str, now: DateTime<Utc>) -> Self {
        let mut builder = QueryBuilder::new(format!("UPDATE {table} SET updated_at = "));
        builder.push_bind(now);
        Self {
            builder,
            columns: 0,
        }
    }

    /// 値が `Some` のときだけ `column = $n` を追加する
    pub(crate) fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.builder.push(", ").push(column).push(" = ").push_bind(value);
            self.columns += 1;
        }
        self
    }

    /// `updated_at` 以外に更新するカラム数
    pub(crate) fn changed_columns(&self) -> usize {
        self.columns
    }

    /// WHERE 句を付けてビルダーを返す
    pub(crate) fn finish(mut self, id: i64) -> QueryBuilder<'args, Postgres> {
        self.builder.push(" WHERE id = ").push_bind(id);
        self.builder
    }
}

/// フリーワード条件を WHERE 句に追加する
///
/// - 空: 条件を追加しない
/// - 数値: `id_column = $n`
/// - それ以外: `document` の全文検索（`plainto_tsquery` に文字列をバインド）
///
/// 既に WHERE 句があることを前提に `AND` から書き始める。
pub(crate) fn push_free_word(
    builder: &mut QueryBuilder<'_, Postgres>,
    word: &FreeWord,
    id_column: &str,
    document: &str,
) {
    match word {
        FreeWord::Empty => {}
        FreeWord::Id(id) => {
            builder.push(" AND ").push(id_column).push(" = ").push_bind(*id);
        }
        FreeWord::Text(text) => {
            builder
                .push(" AND to_tsvector('simple', ")
                .push(document)
                .push(") @@ plainto_tsquery('simple', ")
                .push_bind(text.clone())
                .push(")");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_値のあるカラムだけがset句に含まれる() {
        let mut update = PatchUpdate::new("agents", fixed_now());
        update
            .set("agent_name", Some("株式会社サンプル".to_string()))
            .set::<String>("office_location", None)
            .set("usage_status", Some(1_i16));

        assert_eq!(update.changed_columns(), 2);
        let builder = update.finish(10);
        assert_eq!(
            builder.sql(),
            "UPDATE agents SET updated_at = $1, agent_name = $2, usage_status = $3 WHERE id = $4"
        );
    }

    #[test]
    fn test_全フィールド未指定でもupdated_atは更新する() {
        let update = PatchUpdate::new("job_seekers", fixed_now());
        assert_eq!(update.changed_columns(), 0);
        assert_eq!(
            update.finish(1).sql(),
            "UPDATE job_seekers SET updated_at = $1 WHERE id = $2"
        );
    }

    #[test]
    fn test_nullへの更新はsome_noneで表現する() {
        let mut update = PatchUpdate::new("job_informations", fixed_now());
        update.set("age_under", Some(None::<i16>));

        assert_eq!(update.changed_columns(), 1);
        assert_eq!(
            update.finish(3).sql(),
            "UPDATE job_informations SET updated_at = $1, age_under = $2 WHERE id = $3"
        );
    }

    #[rstest]
    #[case("", "SELECT * FROM t WHERE agent_id = $1")]
    #[case("   ", "SELECT * FROM t WHERE agent_id = $1")]
    #[case("123", "SELECT * FROM t WHERE agent_id = $1 AND t.id = $2")]
    #[case(
        "Acme",
        "SELECT * FROM t WHERE agent_id = $1 AND to_tsvector('simple', t.name) @@ plainto_tsquery('simple', $2)"
    )]
    fn test_フリーワードの種類で条件が切り替わる(#[case] input: &str, #[case] expected: &str) {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM t WHERE agent_id = ");
        builder.push_bind(1_i64);

        push_free_word(&mut builder, &FreeWord::parse(input), "t.id", "t.name");

        assert_eq!(builder.sql(), expected);
    }

    #[test]
    fn test_フリーワードの文字列はsqlに埋め込まれない() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM t WHERE TRUE");

        push_free_word(
            &mut builder,
            &FreeWord::parse("'; DROP TABLE agents; --"),
            "t.id",
            "t.name",
        );

        assert!(!builder.sql().contains("DROP TABLE"));
    }
}
