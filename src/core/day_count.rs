//! Actual/365 Fixed day counting on `YYYYMMDD` dates
//!
//! All dates crossing the pricing boundary are 8-digit strings. Day counts use
//! the literal calendar (weekends and holidays included).

use chrono::NaiveDate;

use super::error::{PricingError, PricingResult};

/// Days per year for the Actual/365 Fixed convention
pub const DAYS_PER_YEAR: f64 = 365.0;

const DATE_FORMAT: &str = "%Y%m%d";

/// Parse an 8-digit `YYYYMMDD` string into a calendar date.
pub fn parse_date(value: &str) -> PricingResult<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PricingError::date_format(value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| PricingError::date_format(value))
}

/// Format a date back into its 8-digit wire form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole calendar days from `eval` to `exp`; fails unless `exp` is strictly later.
pub fn days_between(eval: NaiveDate, exp: NaiveDate) -> PricingResult<i64> {
    if exp <= eval {
        return Err(PricingError::DateOrder {
            eval: format_date(eval),
            exp: format_date(exp),
        });
    }
    Ok((exp - eval).num_days())
}

/// Whole calendar days between two `YYYYMMDD` strings.
pub fn day_count(eval_date: &str, exp_date: &str) -> PricingResult<i64> {
    let eval = parse_date(eval_date)?;
    let exp = parse_date(exp_date)?;
    days_between(eval, exp)
}

/// Act/365 year fraction between two `YYYYMMDD` strings.
pub fn year_fraction(eval_date: &str, exp_date: &str) -> PricingResult<f64> {
    Ok(day_count(eval_date, exp_date)? as f64 / DAYS_PER_YEAR)
}

/// Serde adapter for `NaiveDate` fields carried as `YYYYMMDD` strings
pub mod yyyymmdd {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("20200517").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 5, 17).unwrap());
        assert_eq!(format_date(date), "20200517");
    }

    #[test]
    fn test_rejects_malformed_dates() {
        for bad in ["2020-05-17", "2020051", "202005170", "20201340", "20210229", "abcdefgh", ""] {
            match parse_date(bad) {
                Err(PricingError::DateFormat(v)) => assert_eq!(v, bad),
                other => panic!("expected DateFormat for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_day_count() {
        assert_eq!(day_count("20200517", "20201217").unwrap(), 214);
        // 2020 is a leap year but the window starts after Feb 29
        assert_eq!(day_count("20200510", "20210510").unwrap(), 365);
        assert_eq!(day_count("20200101", "20210101").unwrap(), 366);
        assert_eq!(day_count("20201231", "20210101").unwrap(), 1);
    }

    #[test]
    fn test_year_fraction() {
        let yf = year_fraction("20200510", "20210510").unwrap();
        assert_eq!(yf, 1.0);

        let yf = year_fraction("20200517", "20201217").unwrap();
        assert!((yf - 214.0 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_date_order() {
        assert!(matches!(
            day_count("20200517", "20200517"),
            Err(PricingError::DateOrder { .. })
        ));
        assert!(matches!(
            year_fraction("20201217", "20200517"),
            Err(PricingError::DateOrder { .. })
        ));
    }

    #[test]
    fn test_format_checked_before_order() {
        assert!(matches!(
            day_count("2020-05-17", "20200517"),
            Err(PricingError::DateFormat(_))
        ));
    }
}
