use chrono::{Datelike, FixedOffset, NaiveDate, Utc};
use md5::{Digest, Md5};
use tokio::signal;

/// x.xxx.xxx
pub fn fmt_n(n: i64) -> String {
    let digits = n
        .unsigned_abs()
        .to_string()
        .chars()
        .rev()
        .enumerate()
        .fold(String::new(), |mut acc, (i, ch)| {
            if i != 0 && i % 3 == 0 {
                acc.push('.');
            }
            acc.push(ch);
            acc
        })
        .chars()
        .rev()
        .collect::<String>();

    if n < 0 { format!("-{digits}") } else { digits }
}

/// R$ x.xxx,xx
pub fn fmt_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();

    format!(
        "{sign}R$ {},{:02}",
        fmt_n((abs / 100) as i64),
        abs % 100
    )
}

/// Parses user-typed money ("1.234,56", "1234.56", "R$ 10") into cents.
pub fn parse_cents(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }

    // the last separator followed by one or two digits is the decimal mark
    let (int_part, frac_part) = match cleaned.rfind([',', '.']) {
        Some(idx) if cleaned.len() - idx - 1 <= 2 => (&cleaned[..idx], &cleaned[idx + 1..]),
        _ => (cleaned.as_str(), ""),
    };

    let int_digits: String = int_part.chars().filter(|c| *c != '.' && *c != ',').collect();
    if !int_digits.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let reais: i64 = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().ok()?
    };
    let cents: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().ok()? * 10,
        _ => frac_part.parse().ok()?,
    };

    reais.checked_mul(100)?.checked_add(cents)
}

pub fn local_today(utc_offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// First day of the month after the one `day` falls in.
pub fn next_month_start(day: NaiveDate) -> NaiveDate {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(day)
}

/// `YYYY-MM` → first day of that month.
pub fn parse_reference_month(month: &str) -> Option<NaiveDate> {
    let (year, month) = month.trim().split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

pub fn reference_month(day: NaiveDate) -> String {
    format!("{:04}-{:02}", day.year(), day.month())
}

pub fn fmt_date(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Only same-site paths are valid post-login destinations.
pub fn safe_callback(callback: Option<&str>) -> String {
    match callback {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        },
        _ => "/dashboard".to_string(),
    }
}

pub fn url_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Stored name for an uploaded receipt, or `None` for unsupported formats.
pub fn receipt_file_name(data: &[u8]) -> Option<String> {
    let ext = if data.starts_with(b"%PDF") {
        "pdf"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpeg"
    } else if data.starts_with(b"\x89PNG") {
        "png"
    } else {
        return None;
    };

    let mut hasher = Md5::new();
    hasher.update(data);

    let hash = format!("{:x}", hasher.finalize());

    Some(format!("{}.{}", &hash[..16], ext))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("received termination signal, shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands() {
        assert_eq!(fmt_n(0), "0");
        assert_eq!(fmt_n(999), "999");
        assert_eq!(fmt_n(2450), "2.450");
        assert_eq!(fmt_n(1234567), "1.234.567");
        assert_eq!(fmt_n(-1200), "-1.200");
    }

    #[test]
    fn formats_reais() {
        assert_eq!(fmt_brl(245000), "R$ 2.450,00");
        assert_eq!(fmt_brl(5), "R$ 0,05");
        assert_eq!(fmt_brl(-120050), "-R$ 1.200,50");
    }

    #[test]
    fn parses_money() {
        assert_eq!(parse_cents("50"), Some(5000));
        assert_eq!(parse_cents("50,5"), Some(5050));
        assert_eq!(parse_cents("1.234,56"), Some(123456));
        assert_eq!(parse_cents("1234.56"), Some(123456));
        assert_eq!(parse_cents("R$ 2.450,00"), Some(245000));
        assert_eq!(parse_cents("1.000"), Some(100000));
        assert_eq!(parse_cents("-5"), None);
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents(""), None);
    }

    #[test]
    fn month_boundaries() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 17).unwrap();

        assert_eq!(month_start(day), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(next_month_start(day), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(reference_month(day), "2025-12");
        assert_eq!(parse_reference_month("2025-12"), Some(month_start(day)));
        assert_eq!(parse_reference_month("2025-13"), None);
        assert_eq!(parse_reference_month("25-1"), None);
    }

    #[test]
    fn callback_must_stay_local() {
        assert_eq!(safe_callback(Some("/admin")), "/admin");
        assert_eq!(safe_callback(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_callback(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_callback(None), "/dashboard");
    }

    #[test]
    fn receipt_names_follow_content() {
        let pdf = receipt_file_name(b"%PDF-1.7 ...").unwrap();
        assert!(pdf.ends_with(".pdf"));
        assert_eq!(pdf.len(), 16 + 4);
        assert_eq!(receipt_file_name(b"%PDF-1.7 ..."), Some(pdf));

        assert!(receipt_file_name(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap().ends_with(".jpeg"));
        assert!(receipt_file_name(b"\x89PNG\r\n").unwrap().ends_with(".png"));
        assert_eq!(receipt_file_name(b"GIF89a"), None);
    }
}
