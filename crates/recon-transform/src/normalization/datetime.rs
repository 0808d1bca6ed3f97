//! Date/time normalization to `DD/MM/YYYY HH:MM:SS`.
//!
//! Numeric values are epoch timestamps: seconds, or milliseconds when the
//! magnitude exceeds 1e12. They are rendered in UTC.
//!
//! Text goes through a fixed list of ISO 8601 / RFC 3339 formats first, then
//! through a fuzzy token scan that ignores words it does not recognise. The
//! scan reads ambiguous numeric dates month-first and falls back to day-first
//! when that yields no valid date. Offsets are dropped; the wall-clock time
//! written in the text is kept.
//!
//! Defaults for missing parts are fixed so output never depends on the day the
//! pipeline runs: a missing time is midnight, a missing day is the 1st, and a
//! missing year makes the value unparseable. Only years 1 through 9999 are
//! rendered.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use recon_model::RawValue;

/// Output format for every normalized datetime.
pub const OUTPUT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Epoch values above this magnitude are milliseconds.
const MILLIS_THRESHOLD: f64 = 1e12;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Order tried for ambiguous all-numeric dates such as `03/04/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthFirst,
    DayFirst,
}

/// Normalize one raw value. Unparseable input yields an empty string.
pub fn normalize_datetime(value: &RawValue) -> String {
    let parsed = match value {
        RawValue::Number(n) => n.as_f64().and_then(from_epoch),
        RawValue::Text(s) => parse_datetime(s),
        RawValue::Null | RawValue::Bool(_) | RawValue::Nested(_) => None,
    };
    parsed
        .filter(|dt| (1..=9999).contains(&dt.year()))
        .map(format_datetime)
        .unwrap_or_default()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

/// Interpret an epoch timestamp (seconds or milliseconds) as UTC.
pub fn from_epoch(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let seconds = if value.abs() > MILLIS_THRESHOLD {
        value / 1000.0
    } else {
        value
    };
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = (((seconds - whole) * 1e9) as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Parse free-form date/time text.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_iso(trimmed)
        .or_else(|| parse_fuzzy(trimmed, DateOrder::MonthFirst))
        .or_else(|| parse_fuzzy(trimmed, DateOrder::DayFirst))
}

fn try_parse_iso(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Word(String),
    Sep(char),
}

fn tokenize(value: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = value.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            tokens.push(Token::Number(digits));
        } else if ch.is_alphabetic() {
            let mut word = String::new();
            while let Some(&c) = chars.peek().filter(|c| c.is_alphabetic()) {
                word.extend(c.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            chars.next();
            if !ch.is_whitespace() {
                tokens.push(Token::Sep(ch));
            }
        }
    }
    tokens
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    hour: u32,
    minute: u32,
    second: u32,
}

/// Date-relevant pieces pulled out of the token stream.
#[derive(Debug, Default)]
struct Fields {
    clock: Option<Clock>,
    month_name: Option<u32>,
    /// Numeric tokens of at most four digits, as `(value, digit count)`.
    numbers: Vec<(u32, usize)>,
    /// First run of 8 (`YYYYMMDD`) or 14 (`YYYYMMDDHHMMSS`) digits.
    compact: Option<String>,
}

fn number_at(tokens: &[Token], index: usize) -> Option<&str> {
    match tokens.get(index) {
        Some(Token::Number(digits)) => Some(digits.as_str()),
        _ => None,
    }
}

fn sep_at(tokens: &[Token], index: usize, expected: &[char]) -> bool {
    matches!(tokens.get(index), Some(Token::Sep(c)) if expected.contains(c))
}

fn meridiem_at(tokens: &[Token], index: usize) -> Option<bool> {
    match tokens.get(index) {
        Some(Token::Word(w)) if w == "am" => Some(false),
        Some(Token::Word(w)) if w == "pm" => Some(true),
        _ => None,
    }
}

fn apply_meridiem(hour: u32, pm: bool) -> Option<u32> {
    match (hour, pm) {
        (12, false) => Some(0),
        (1..=11, false) | (12, true) => Some(hour),
        (1..=11, true) => Some(hour + 12),
        _ => None,
    }
}

/// Reads `H:MM[:SS[.f]] [am|pm] [+HH[:MM]]` or `H am|pm` starting at `start`.
///
/// Returns the clock and the index of the first unconsumed token.
fn read_clock(tokens: &[Token], start: usize) -> Option<(Clock, usize)> {
    let hour_digits = number_at(tokens, start).filter(|d| d.len() <= 2)?;
    let mut hour: u32 = hour_digits.parse().ok()?;

    if !sep_at(tokens, start + 1, &[':']) {
        let pm = meridiem_at(tokens, start + 1)?;
        hour = apply_meridiem(hour, pm)?;
        let clock = Clock {
            hour,
            minute: 0,
            second: 0,
        };
        return Some((clock, start + 2));
    }

    let minute: u32 = number_at(tokens, start + 2)
        .filter(|d| d.len() == 2)?
        .parse()
        .ok()?;
    let mut next = start + 3;
    let mut second = 0;
    if sep_at(tokens, next, &[':']) {
        if let Some(digits) = number_at(tokens, next + 1).filter(|d| d.len() == 2) {
            second = digits.parse().ok()?;
            next += 2;
            if sep_at(tokens, next, &['.', ',']) && number_at(tokens, next + 1).is_some() {
                next += 2;
            }
        }
    }
    if let Some(pm) = meridiem_at(tokens, next) {
        hour = apply_meridiem(hour, pm)?;
        next += 1;
    }
    if sep_at(tokens, next, &['+', '-'])
        && number_at(tokens, next + 1).is_some_and(|d| d.len() == 2 || d.len() == 4)
    {
        next += 2;
        if sep_at(tokens, next, &[':']) && number_at(tokens, next + 1).is_some() {
            next += 2;
        }
    }
    Some((
        Clock {
            hour,
            minute,
            second,
        },
        next,
    ))
}

fn month_from_word(word: &str) -> Option<u32> {
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(word))
        .map(|index| index as u32 + 1)
}

fn extract_fields(tokens: &[Token]) -> Fields {
    let mut fields = Fields::default();
    let mut index = 0;
    while index < tokens.len() {
        match &tokens[index] {
            Token::Number(digits) => {
                if fields.clock.is_none() {
                    if let Some((clock, next)) = read_clock(tokens, index) {
                        fields.clock = Some(clock);
                        index = next;
                        continue;
                    }
                }
                match digits.len() {
                    1..=4 => {
                        if let Ok(value) = digits.parse() {
                            fields.numbers.push((value, digits.len()));
                        }
                    }
                    8 | 14 if fields.compact.is_none() => fields.compact = Some(digits.clone()),
                    _ => {}
                }
            }
            Token::Word(word) => {
                if fields.month_name.is_none() {
                    fields.month_name = month_from_word(word);
                }
            }
            Token::Sep(_) => {}
        }
        index += 1;
    }
    fields
}

fn is_year_like(value: u32, digits: usize) -> bool {
    digits >= 3 || value > 31
}

fn expand_year(value: u32, digits: usize) -> i32 {
    let year = value as i32;
    if digits <= 2 {
        if year < 69 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn resolve_date(fields: &Fields, order: DateOrder) -> Option<NaiveDate> {
    let nums = &fields.numbers;
    let year_at = nums.iter().position(|&(v, d)| is_year_like(v, d));

    if let Some(month) = fields.month_name {
        let (year, day) = match year_at {
            Some(y) => {
                let day = nums
                    .iter()
                    .enumerate()
                    .find(|&(i, &(v, _))| i != y && (1..=31).contains(&v))
                    .map_or(1, |(_, &(v, _))| v);
                (expand_year(nums[y].0, nums[y].1), day)
            }
            None if nums.len() >= 2 => (expand_year(nums[1].0, nums[1].1), nums[0].0),
            None => return None,
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let ordered = |a: u32, b: u32| match order {
        DateOrder::MonthFirst => (a, b),
        DateOrder::DayFirst => (b, a),
    };

    match (nums.len(), year_at) {
        (0, _) => None,
        (2, Some(0)) => NaiveDate::from_ymd_opt(expand_year(nums[0].0, nums[0].1), nums[1].0, 1),
        (2, Some(1)) => NaiveDate::from_ymd_opt(expand_year(nums[1].0, nums[1].1), nums[0].0, 1),
        (n, Some(y)) if n >= 3 && y >= 2 => {
            let (month, day) = ordered(nums[y - 2].0, nums[y - 1].0);
            NaiveDate::from_ymd_opt(expand_year(nums[y].0, nums[y].1), month, day)
        }
        (n, Some(y)) if y + 2 < n => NaiveDate::from_ymd_opt(
            expand_year(nums[y].0, nums[y].1),
            nums[y + 1].0,
            nums[y + 2].0,
        ),
        (n, None) if n >= 3 => {
            let (month, day) = ordered(nums[0].0, nums[1].0);
            NaiveDate::from_ymd_opt(expand_year(nums[2].0, nums[2].1), month, day)
        }
        _ => None,
    }
}

fn resolve_compact(digits: &str) -> Option<NaiveDateTime> {
    let field = |range: std::ops::Range<usize>| digits.get(range)?.parse::<u32>().ok();
    let date = NaiveDate::from_ymd_opt(field(0..4)? as i32, field(4..6)?, field(6..8)?)?;
    let time = if digits.len() == 14 {
        NaiveTime::from_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)?
    } else {
        NaiveTime::MIN
    };
    Some(date.and_time(time))
}

/// Scan free text for a date (and optional time of day).
pub fn parse_fuzzy(value: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let tokens = tokenize(value);
    let fields = extract_fields(&tokens);

    let date = match resolve_date(&fields, order) {
        Some(date) => date,
        None if fields.numbers.is_empty() && fields.month_name.is_none() => {
            let compact = resolve_compact(fields.compact.as_deref()?)?;
            return match fields.clock {
                Some(clock) => compact
                    .date()
                    .and_hms_opt(clock.hour, clock.minute, clock.second),
                None => Some(compact),
            };
        }
        None => return None,
    };

    let time = match fields.clock {
        Some(clock) => NaiveTime::from_hms_opt(clock.hour, clock.minute, clock.second)?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}
