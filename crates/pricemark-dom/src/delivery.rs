use chrono::{Datelike, Days, NaiveDate};

pub const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// `25 mars`, `1 août`: day of month without padding, then the lowercase French month name.
pub fn format_date_french(date: NaiveDate) -> String {
    let month = FRENCH_MONTHS[date.month0() as usize];
    format!("{} {month}", date.day())
}

/// Reads a `data-delivery-days` value the lenient way: leading whitespace, an optional `+`, then
/// as many digits as are present (`"5 jours"` -> 5). Anything else, or a negative count, is 0.
pub fn parse_delivery_days(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

pub fn delivery_date(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(u64::from(days)))
}
