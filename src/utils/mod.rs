//! 通用工具

use chrono::NaiveDate;

/// 宽松日期解析支持的格式，按顺序尝试
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y"];

/// 宽松解析日期文本，无法解析时返回None（调用方将其排除在聚合之外）
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // 带时间部分的日期（如 2024-01-05 13:00:00 / RFC3339）只保留日期
    if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    None
}

/// 月份桶标签（如 "2024-01"）
pub fn month_bucket(date: &NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 文件名转为标题风格（下划线/连字符转空格并首字母大写）
pub fn title_case(stem: &str) -> String {
    stem.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date_formats() {
        assert_eq!(
            parse_flexible_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_flexible_date("01/05/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_flexible_date("2024-01-05 13:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_parse_flexible_date_rejects_garbage() {
        assert_eq!(parse_flexible_date("not a date"), None);
        assert_eq!(parse_flexible_date(""), None);
    }

    #[test]
    fn test_month_bucket() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(month_bucket(&date), "2024-03");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("monthly_trend"), "Monthly Trend");
        assert_eq!(title_case("top-items-revenue"), "Top Items Revenue");
    }
}
