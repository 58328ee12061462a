use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown in place of a panel's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Secondary text, such as the underlying error.
    pub detail: Option<String>,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Either renderable content or the reason there is none.
///
/// Empty selections are never errors; they arrive here as a `Notice`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum Panel<T> {
    Ready(T),
    Notice(Notice),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(content) => Some(content),
            Panel::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Panel::Ready(_) => None,
            Panel::Notice(notice) => Some(notice),
        }
    }
}

/// `$1,234` style rounding to whole units; negatives read `-$1,234`.
pub fn format_currency(value: f64) -> String {
    let sign = if value.round() < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(value.abs().round()))
}

/// `1,234` style rounding to whole units.
pub fn format_number(value: f64) -> String {
    let sign = if value.round() < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(value.abs().round()))
}

pub fn format_count(count: usize) -> String {
    group_thousands(count as f64)
}

/// `+4.2%`; `None` stays `None`.
pub fn format_delta(delta: Option<f64>) -> Option<String> {
    delta.map(|d| format!("{d:+.1}%"))
}

fn group_thousands(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
