use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// chrono 會略過前導空白並接受 +/- 年份，先用正規表示式檢查外形
static DATE_SHAPE: OnceLock<Option<Regex>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
#[error("'{value}' is not a YYYY-MM-DD calendar date")]
pub struct InvalidDateError {
    pub value: String,
}

fn has_date_shape(value: &str) -> bool {
    DATE_SHAPE
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn parse(value: &str) -> Option<NaiveDate> {
    if !has_date_shape(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()
}

/// 是否為有效的 `YYYY-MM-DD` 日期 (含月份天數與閏年檢查)
pub fn is_valid_date(value: &str) -> bool {
    parse(value).is_some()
}

/// 驗證並重新輸出為標準格式，例如 `2024-1-5` -> `2024-01-05`
pub fn normalize_date(value: &str) -> Result<String, InvalidDateError> {
    parse(value)
        .map(|date| date.format(ISO_DATE_FORMAT).to_string())
        .ok_or_else(|| InvalidDateError {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        for value in ["2024-01-01", "2024-02-29", "1999-12-31", "2030-06-15"] {
            assert!(is_valid_date(value), "{} should be valid", value);
        }
    }

    #[test]
    fn test_invalid_dates() {
        for value in [
            "",
            "2024-13-01",
            "2024-00-10",
            "2024-02-30",
            "2023-02-29",
            "2024-04-31",
            "2024/01/01",
            "01-01-2024",
            "2024-01-01T00:00:00",
            "tomorrow",
            " 2024-01-01",
            "+2024-01-01",
            "2024- 1-05",
            "2024-01-01 ",
            "2024-001-01",
            "١٢٣٤-01-01",
        ] {
            assert!(!is_valid_date(value), "{} should be invalid", value);
        }
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2024-06-01").unwrap(), "2024-06-01");
        assert_eq!(normalize_date("2024-1-5").unwrap(), "2024-01-05");

        let err = normalize_date("2024-02-30").unwrap_err();
        assert_eq!(err.value, "2024-02-30");
    }
}
