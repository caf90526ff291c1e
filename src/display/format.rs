const MISSING: &str = "—";

fn group_thousands(int_part: u64) -> String {
    let digits = int_part.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1.23T`, `$4.56B`, `$7.89M`, `$1.20K`, or plain dollars below a thousand.
pub fn format_usd_compact(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let body = match abs {
        v if v >= 1e12 => format!("{:.2}T", v / 1e12),
        v if v >= 1e9 => format!("{:.2}B", v / 1e9),
        v if v >= 1e6 => format!("{:.2}M", v / 1e6),
        v if v >= 1e3 => format!("{:.2}K", v / 1e3),
        v => format!("{:.2}", v),
    };
    format!("{sign}${body}")
}

/// Price with precision that grows as the price shrinks.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() || price < 0.0 {
        return MISSING.to_string();
    }
    if price >= 1.0 {
        let cents = (price * 100.0).round() as u64;
        format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
    } else if price >= 0.01 || price == 0.0 {
        format!("${:.4}", price)
    } else {
        format!("${:.6}", price)
    }
}

pub fn format_percent(change: Option<f64>) -> String {
    match change {
        Some(c) if c.is_finite() => format!("{:+.2}%", c),
        _ => MISSING.to_string(),
    }
}
