//! Regex and keyword extraction of appointment fields from free text.
//!
//! Every extractor is pure: it looks at one utterance and either returns the
//! normalised value for its slot or `None`. Relative dates are resolved
//! against the `today` the caller passes in.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::models::{Slot, EMAIL_PATTERN};

/// Services a caller can ask to book, as (spoken phrase, display name).
pub const BOOKABLE_SERVICES: [(&str, &str); 7] = [
    ("ai workflow automation", "AI Workflow Automation"),
    ("ai voice assistant", "AI Voice Assistant"),
    ("ai image generation", "AI Image Generation"),
    ("ai video generation", "AI Video Generation"),
    ("ai chatbot", "AI Chatbot"),
    ("custom ai agent", "Custom AI Agent"),
    ("consultation", "Consultation"),
];

struct Patterns {
    introduced_name: Regex,
    bare_name: Regex,
    email: Regex,
    spoken_at: Regex,
    spoken_dot: Regex,
    iso_date: Regex,
    time: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    introduced_name: Regex::new(r"(?i)\b(?:my name is|i'm|i am|call me|this is)\s+(\p{L}[\p{L}\s'.-]*)")
        .expect("invalid name regex"),
    bare_name: Regex::new(r"(?i)^\s*(\p{L}[\p{L}\s'.-]*?)\s*[.!]?\s*$").expect("invalid name regex"),
    email: Regex::new(&format!("({EMAIL_PATTERN})")).expect("invalid email regex"),
    spoken_at: Regex::new(r"(?i)\s+at\s+").expect("invalid spoken email regex"),
    spoken_dot: Regex::new(r"(?i)\s+dot\s+").expect("invalid spoken email regex"),
    iso_date: Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("invalid date regex"),
    time: Regex::new(r"(?i)\b(\d{1,2})(?::([0-5]\d))?\s*(a\.?\s?m\.?|p\.?\s?m\.?)?(?:\s|$|[.,!?])")
        .expect("invalid time regex"),
});

/// Extract the value for `slot` from `utterance`, if present.
pub fn extract(slot: Slot, utterance: &str, today: NaiveDate) -> Option<String> {
    match slot {
        Slot::Name => extract_name(utterance),
        Slot::Email => extract_email(utterance),
        Slot::Service => extract_service(utterance),
        Slot::Date => extract_date(utterance, today),
        Slot::Time => extract_time(utterance),
    }
}

pub fn extract_name(utterance: &str) -> Option<String> {
    let caps = PATTERNS
        .introduced_name
        .captures(utterance)
        .or_else(|| PATTERNS.bare_name.captures(utterance))?;
    let name = caps[1]
        .trim()
        .trim_end_matches(['.', '!'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn extract_email(utterance: &str) -> Option<String> {
    if let Some(caps) = PATTERNS.email.captures(utterance) {
        return Some(caps[1].to_lowercase());
    }

    // Speech recognisers spell addresses out: "jane dot doe at example dot com".
    let spoken = PATTERNS.spoken_at.replace_all(utterance, "@");
    let spoken = PATTERNS.spoken_dot.replace_all(&spoken, ".");
    PATTERNS
        .email
        .captures(&spoken)
        .map(|caps| caps[1].to_lowercase())
}

pub fn extract_service(utterance: &str) -> Option<String> {
    let lower = utterance.to_lowercase();
    BOOKABLE_SERVICES
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, display)| display.to_string())
}

pub fn extract_date(utterance: &str, today: NaiveDate) -> Option<String> {
    let lower = utterance.to_lowercase();
    let date = if lower.contains("today") {
        Some(today)
    } else if lower.contains("tomorrow") {
        Some(today + Duration::days(1))
    } else {
        PATTERNS
            .iso_date
            .captures(utterance)
            .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
    };
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Times need minutes or a meridiem, so a bare number is never a time.
pub fn extract_time(utterance: &str) -> Option<String> {
    for caps in PATTERNS.time.captures_iter(utterance) {
        let Ok(mut hour) = caps[1].parse::<u32>() else {
            continue;
        };
        let minutes = caps.get(2).map(|m| m.as_str());
        let meridiem = caps
            .get(3)
            .map(|m| m.as_str().to_lowercase().starts_with('p'));

        if minutes.is_none() && meridiem.is_none() {
            continue;
        }

        match meridiem {
            Some(is_pm) => {
                if !(1..=12).contains(&hour) {
                    continue;
                }
                if is_pm && hour != 12 {
                    hour += 12;
                }
                if !is_pm && hour == 12 {
                    hour = 0;
                }
            }
            None if hour > 23 => continue,
            None => {}
        }

        return Some(format!("{hour:02}:{}", minutes.unwrap_or("00")));
    }
    None
}
