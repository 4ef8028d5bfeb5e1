/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(n, '.')
}

/// Count with comma thousands separators: `1,234`
pub fn format_count(n: usize) -> String {
    group_digits(n, ',')
}

fn group_digits(n: usize, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Compact money label used on KPI cards and bar labels: `$1.25M`, `$350K`
pub fn format_money(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else {
        format!("${:.0}K", value / 1_000.0)
    }
}

/// Whole dollars with separators: `$1,235`, `-$40`
pub fn format_dollars(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, format_count(rounded.abs() as usize))
}

/// Cut long labels to `max` characters and mark the cut with `...`
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        let head: String = label.chars().take(max).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}
