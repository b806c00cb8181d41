use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{Result, TaskError};

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        TaskError::validation(format!(
            "Invalid due date '{}': use the YYYY-MM-DD format",
            input.trim()
        ))
    })
}

/// Parses a due date, accepting ISO dates and a few shorthands relative to `today`:
/// `today`, `tomorrow`, `eow`, `eom`, `+Nd`/`+Nw`/`+Nm` and weekday names (`fri`, `2:fri`).
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::validation("Due date must not be empty"));
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return add_days(today, 1),
        "eow" => {
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday()) % 7;
            return add_days(today, u64::from(days_to_sunday));
        }
        "eom" => return end_of_month(today),
        _ => {}
    }

    if let Some(relative) = input.strip_prefix('+') {
        return parse_relative(relative, today);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Some(target) = parse_weekday_str(day_str) {
            if count < 1 {
                return Err(TaskError::validation(format!(
                    "Invalid weekday count in '{}'",
                    input
                )));
            }
            let mut days_needed = i64::from(target.num_days_from_sunday())
                - i64::from(today.weekday().num_days_from_sunday());
            if days_needed <= 0 {
                days_needed += 7;
            }
            let days_needed = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| days_needed.checked_add(weeks))
                .ok_or_else(out_of_range)?;
            return add_days(today, days_needed.unsigned_abs());
        }
    }

    parse_iso_date(input)
}

fn parse_relative(body: &str, today: NaiveDate) -> Result<NaiveDate> {
    let invalid = || {
        TaskError::validation(format!(
            "Invalid relative date '+{}': expected +Nd, +Nw or +Nm",
            body
        ))
    };
    let (split, _) = body.char_indices().last().ok_or_else(invalid)?;
    let (num_str, unit) = body.split_at(split);
    let count: u32 = num_str.parse().map_err(|_| invalid())?;

    match unit.to_lowercase().as_str() {
        "d" => add_days(today, u64::from(count)),
        "w" => add_days(today, u64::from(count) * 7),
        // Month arithmetic clamps to the last valid day (Jan 31 + 1m -> Feb 28).
        "m" => today.checked_add_months(Months::new(count)).ok_or_else(out_of_range),
        _ => Err(invalid()),
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(out_of_range)
}

fn end_of_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or_else(out_of_range)
}

fn out_of_range() -> TaskError {
    TaskError::validation("Due date is out of range")
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|count| (count, day)),
        // Just "fri" means 1:fri
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-11 is a Wednesday.
    fn today() -> NaiveDate {
        date(2025, 6, 11)
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("10:mon"), Some((10, "mon")));
        assert_eq!(parse_weekday_token("x:mon"), None);
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_due_date("2025-06-30", today()).unwrap(), date(2025, 6, 30));
        assert_eq!(parse_iso_date(" 2024-02-29 ").unwrap(), date(2024, 2, 29));
        assert!(parse_iso_date("2025-02-29").is_err());
        assert!(parse_iso_date("2024/12/01").is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_due_date("today", today()).unwrap(), today());
        assert_eq!(parse_due_date("Tomorrow", today()).unwrap(), date(2025, 6, 12));
        assert_eq!(parse_due_date("eow", today()).unwrap(), date(2025, 6, 15));
        assert_eq!(parse_due_date("eow", date(2025, 6, 15)).unwrap(), date(2025, 6, 15));
        assert_eq!(parse_due_date("eom", today()).unwrap(), date(2025, 6, 30));
        assert_eq!(parse_due_date("eom", date(2024, 12, 5)).unwrap(), date(2024, 12, 31));
    }

    #[test]
    fn test_relative() {
        assert_eq!(parse_due_date("+3d", today()).unwrap(), date(2025, 6, 14));
        assert_eq!(parse_due_date("+2w", today()).unwrap(), date(2025, 6, 25));
        assert_eq!(parse_due_date("+1m", today()).unwrap(), date(2025, 7, 11));
        assert_eq!(parse_due_date("+1m", date(2025, 1, 31)).unwrap(), date(2025, 2, 28));
        assert!(parse_due_date("+d", today()).is_err());
        assert!(parse_due_date("+", today()).is_err());
        assert!(parse_due_date("+3y", today()).is_err());
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(parse_due_date("fri", today()).unwrap(), date(2025, 6, 13));
        assert_eq!(parse_due_date("2:fri", today()).unwrap(), date(2025, 6, 20));
        // Same weekday means next week, never today.
        assert_eq!(parse_due_date("wednesday", today()).unwrap(), date(2025, 6, 18));
        assert!(parse_due_date("0:fri", today()).is_err());
    }

    #[test]
    fn test_huge_weekday_count_is_rejected() {
        let err = parse_due_date("9223372036854775807:fri", today()).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        let err = parse_due_date("100000000:fri", today()).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "soon", "2025-13-01", "31-12-2025"] {
            let err = parse_due_date(input, today()).unwrap_err();
            assert!(matches!(err, TaskError::Validation(_)), "{input}");
        }
    }
}
