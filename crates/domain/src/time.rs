//! # 時刻・日付ユーティリティ
//!
//! タイムスタンプは UTC（`TIMESTAMPTZ`）で保存し、利用開始日などの
//! 業務日付は JST のカレンダー日付（`DATE`）として扱う。
//! JST の壁時計時刻をタイムスタンプとして保存することはしない。
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use recruitlink_domain::time::{age_at, today_in_jst};
//!
//! // UTC 2024-03-31 15:00 は JST 2024-04-01 00:00
//! let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 0, 0).unwrap();
//! assert_eq!(today_in_jst(now), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
//!
//! let birthday = NaiveDate::from_ymd_opt(1990, 4, 2).unwrap();
//! assert_eq!(age_at(birthday, today_in_jst(now)), 33);
//! ```

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 日本標準時の UTC からのオフセット（夏時間なし）
const JST_OFFSET: TimeDelta = TimeDelta::hours(9);

/// 指定時刻における JST の日付を返す
pub fn today_in_jst(now: DateTime<Utc>) -> NaiveDate {
    (now.naive_utc() + JST_OFFSET).date()
}

/// JST の日付の 0 時を UTC の時刻に変換する
pub fn jst_midnight_in_utc(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) - JST_OFFSET).and_utc()
}

/// 誕生日と基準日から満年齢を計算する
///
/// 基準日がその年の誕生日より前であれば 1 歳少なく数える。
/// 2/29 生まれは平年では 3/1 に加齢する。
pub fn age_at(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age
}

/// 月単位の期間（開始月〜終了月、両端を含む）
///
/// KPI や売上の集計で使う。`start` は開始月の 1 日、`end_exclusive` は
/// 終了月の翌月 1 日を保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    start:         NaiveDate,
    end_exclusive: NaiveDate,
}

impl MonthRange {
    /// 開始年月と終了年月から期間を作成する
    ///
    /// # エラー
    ///
    /// - 存在しない年月を指定した場合
    /// - 終了月が開始月より前の場合
    pub fn new(
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    ) -> Result<Self, DomainError> {
        let start = first_day_of_month(start_year, start_month)?;
        let end = first_day_of_month(end_year, end_month)?;
        if end < start {
            return Err(DomainError::Validation(format!(
                "終了月 {end_year}-{end_month:02} が開始月 {start_year}-{start_month:02} より前です"
            )));
        }
        let end_exclusive = end
            .checked_add_months(Months::new(1))
            .ok_or_else(|| DomainError::Validation("終了月が範囲外です".to_string()))?;
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    /// 単月の期間を作成する
    pub fn single(year: i32, month: u32) -> Result<Self, DomainError> {
        Self::new(year, month, year, month)
    }

    /// 開始月の 1 日
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// 終了月の翌月 1 日
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end_exclusive
    }

    /// JST の月境界を UTC の半開区間 `[start, end)` に変換する
    pub fn to_utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            jst_midnight_in_utc(self.start),
            jst_midnight_in_utc(self.end_exclusive),
        )
    }
}

fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::Validation(format!("存在しない年月です: {year}-{month:02}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::誕生日前日(date(1990, 5, 10), date(2024, 5, 9), 33)]
    #[case::誕生日当日(date(1990, 5, 10), date(2024, 5, 10), 34)]
    #[case::誕生日翌日(date(1990, 5, 10), date(2024, 5, 11), 34)]
    #[case::閏日生まれの平年(date(2000, 2, 29), date(2023, 2, 28), 22)]
    #[case::閏日生まれの平年翌日(date(2000, 2, 29), date(2023, 3, 1), 23)]
    #[case::閏日生まれの閏年(date(2000, 2, 29), date(2024, 2, 29), 24)]
    fn test_age_atは満年齢を返す(
        #[case] birthday: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: i32,
    ) {
        assert_eq!(age_at(birthday, today), expected);
    }

    #[test]
    fn test_today_in_jstはutcの15時以降を翌日とみなす() {
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 14, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap();

        assert_eq!(today_in_jst(before), date(2024, 1, 1));
        assert_eq!(today_in_jst(after), date(2024, 1, 2));
    }

    #[test]
    fn test_jst_midnight_in_utcは前日15時を返す() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 31, 15, 0, 0).unwrap();
        assert_eq!(jst_midnight_in_utc(date(2024, 4, 1)), expected);
    }

    #[test]
    fn test_month_rangeは終了月の翌月1日を保持する() {
        let range = MonthRange::new(2024, 11, 2025, 1).unwrap();

        assert_eq!(range.start(), date(2024, 11, 1));
        assert_eq!(range.end_exclusive(), date(2025, 2, 1));
    }

    #[test]
    fn test_month_range_singleは1か月分の期間を作る() {
        let range = MonthRange::single(2024, 12).unwrap();

        assert_eq!(range.start(), date(2024, 12, 1));
        assert_eq!(range.end_exclusive(), date(2025, 1, 1));
    }

    #[test]
    fn test_month_rangeは逆転した期間を拒否する() {
        assert!(MonthRange::new(2024, 5, 2024, 4).is_err());
    }

    #[test]
    fn test_month_rangeは存在しない月を拒否する() {
        assert!(MonthRange::new(2024, 13, 2025, 1).is_err());
        assert!(MonthRange::new(2024, 1, 2024, 0).is_err());
    }

    #[test]
    fn test_to_utc_boundsはjstの月境界を返す() {
        let range = MonthRange::single(2024, 4).unwrap();
        let (start, end) = range.to_utc_bounds();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 31, 15, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 4, 30, 15, 0, 0).unwrap());
    }
}
