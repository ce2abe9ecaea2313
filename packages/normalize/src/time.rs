//! Free-form incident time standardization.
//!
//! Staff type times by hand: `2:15pm`, `08:30`, `9-10`, `lunch-break`. Each
//! value is classified into a [`TimeParse`] that either carries the parsed
//! time or the reason it fell back to `Unknown`. Callers that only need the
//! canonical text use [`standardize`].

use chrono::NaiveTime;
use incident_dashboard_incident_models::StandardizedTime;

/// 12-hour clock with meridiem, e.g. `2:30pm`.
const TWELVE_HOUR_FORMAT: &str = "%I:%M%p";

/// 24-hour clock, e.g. `14:05`. The second layout accepts already
/// standardized values so re-standardizing is a no-op.
const TWENTY_FOUR_HOUR_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Why a time value could not be standardized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFallback {
    /// The cell was empty or absent.
    Missing,
    /// The cell held only whitespace.
    Empty,
    /// A hyphenated value such as `9-10` with no meridiem marker.
    AmbiguousRange,
    /// Neither clock format matched, or hour/minute were out of range.
    Malformed,
}

/// Outcome of classifying a raw time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeParse {
    /// The value parsed to a concrete time.
    Parsed(NaiveTime),
    /// The value degrades to `Unknown` for the given reason.
    Fallback(TimeFallback),
}

impl From<TimeParse> for StandardizedTime {
    fn from(parse: TimeParse) -> Self {
        match parse {
            TimeParse::Parsed(time) => Self::Known(time),
            TimeParse::Fallback(_) => Self::Unknown,
        }
    }
}

/// Classifies a raw time value.
///
/// The value is trimmed and lower-cased; any whitespace left inside it makes
/// the value malformed. Anything containing `am` or `pm`
/// must match `H:MMam`/`H:MMpm` exactly; otherwise a hyphen marks an
/// ambiguous range; otherwise the value must match `H:MM` (or an already
/// canonical `HH:MM:SS`) on a 24-hour clock.
#[must_use]
pub fn classify_time(raw: Option<&str>) -> TimeParse {
    let Some(raw) = raw else {
        return TimeParse::Fallback(TimeFallback::Missing);
    };

    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return TimeParse::Fallback(TimeFallback::Empty);
    }

    // chrono skips whitespace before numeric fields; embedded blanks are
    // not a valid time here.
    if value.chars().any(char::is_whitespace) {
        return TimeParse::Fallback(TimeFallback::Malformed);
    }

    let formats: &[&str] = if value.contains("am") || value.contains("pm") {
        &[TWELVE_HOUR_FORMAT]
    } else if value.contains('-') {
        return TimeParse::Fallback(TimeFallback::AmbiguousRange);
    } else {
        TWENTY_FOUR_HOUR_FORMATS
    };

    formats
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&value, format).ok())
        .map_or(
            TimeParse::Fallback(TimeFallback::Malformed),
            TimeParse::Parsed,
        )
}

/// Standardizes a raw time value into its typed canonical form.
#[must_use]
pub fn standardize_time(raw: Option<&str>) -> StandardizedTime {
    let parse = classify_time(raw);
    if let TimeParse::Fallback(reason) = parse {
        log::trace!("Time {raw:?} standardized to Unknown: {reason:?}");
    }
    parse.into()
}

/// Standardizes a raw time value to `HH:MM:SS`, or `Unknown`.
///
/// Never fails: every unparseable input produces `Unknown`.
#[must_use]
pub fn standardize(raw: Option<&str>) -> String {
    standardize_time(raw).to_string()
}
