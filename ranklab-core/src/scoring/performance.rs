//! Raw performance parsing for the continuous scoring method.
//!
//! Raw results arrive as display strings. Load events (`"265 lb"`) are
//! higher-is-better; everything else is treated as time-like and
//! lower-is-better, with capped and DNF results mapped past any real time.

/// Synthetic value for a capped result: `CAP_BASE + reps short of the cap`.
pub const CAP_BASE: f64 = 1_000_000.0;

/// Reps-short used when a cap marker or DNF carries no usable count.
pub const CAP_UNKNOWN_REPS: f64 = 999.0;

/// Event-name fragments that identify a max-load event.
pub const LOAD_EVENT_KEYWORDS: [&str; 3] = ["Back Squat", "Snatch", "Clean"];

/// A raw performance turned into a comparable number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedPerformance {
    pub value: f64,
    pub lower_is_better: bool,
}

pub fn is_load_event(event: &str) -> bool {
    LOAD_EVENT_KEYWORDS.iter().any(|k| event.contains(k))
}

/// Parse `raw` for `event`. Returns `None` for blanks and anything that
/// does not look like a time, load, cap or number.
pub fn parse_performance(event: &str, raw: Option<&str>) -> Option<ParsedPerformance> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if is_load_event(event) {
        return leading_integer(raw).map(|value| ParsedPerformance {
            value,
            lower_is_better: false,
        });
    }

    let value = if let Some(reps) = raw.strip_prefix("CAP+") {
        CAP_BASE + reps.trim().parse::<u32>().map(f64::from).unwrap_or(CAP_UNKNOWN_REPS)
    } else if raw.eq_ignore_ascii_case("DNF") {
        CAP_BASE + CAP_UNKNOWN_REPS
    } else if raw.contains(':') {
        parse_clock(raw)?
    } else {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())?
    };

    Some(ParsedPerformance {
        value,
        lower_is_better: true,
    })
}

/// `m:ss(.xx)` or `h:mm:ss(.xx)` to seconds.
pub fn parse_clock(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.split(':').collect();
    let seconds = match parts.as_slice() {
        [m, s] => m.trim().parse::<f64>().ok()? * 60.0 + s.trim().parse::<f64>().ok()?,
        [h, m, s] => {
            h.trim().parse::<f64>().ok()? * 3600.0
                + m.trim().parse::<f64>().ok()? * 60.0
                + s.trim().parse::<f64>().ok()?
        }
        _ => return None,
    };
    seconds.is_finite().then_some(seconds)
}

fn leading_integer(raw: &str) -> Option<f64> {
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse::<u64>().ok().map(|v| v as f64)
}
