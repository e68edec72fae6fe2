/// 自動採番される数値主キーの ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i64` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: 既存の値から作成
/// - `as_i64()`: 内部の値を取得
/// - `is_assigned()`: DB による採番済みかどうか
/// - `Default` は 0（未採番）
///
/// # 使用例
///
/// ```rust
/// use recruitlink_domain::agent::AgentId;
///
/// let id = AgentId::new(42);
/// assert_eq!(id.as_i64(), 42);
/// assert!(id.is_assigned());
/// assert!(!AgentId::default().is_assigned());
/// ```
macro_rules! define_serial_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(i64);

        impl $Name {
            /// 既存の値から ID を作成する
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// 内部の値を取得する
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// DB によって採番済みかどうか
            pub const fn is_assigned(&self) -> bool {
                self.0 > 0
            }
        }

        impl From<i64> for $Name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

/// ID 型のスライスを `i64` の Vec に変換する
///
/// `= ANY($1)` や `UNNEST($1::bigint[])` にバインドする配列を作るために使う。
macro_rules! impl_id_list {
    ($($Name:ident),* $(,)?) => {
        $(
            impl $Name {
                /// ID のスライスを `i64` の Vec に変換する
                pub fn to_i64_vec(ids: &[Self]) -> Vec<i64> {
                    ids.iter().map(Self::as_i64).collect()
                }
            }
        )*
    };
}
