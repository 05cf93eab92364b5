use chrono::NaiveDate;

/// Day-first layouts seen in MF Central exports. Month names match case-insensitively,
/// so `25-NOV-2025` and `25-Nov-2025` both parse.
const DAY_FIRST_FORMATS: [&str; 3] = ["%d-%b-%Y", "%d-%B-%Y", "%d/%m/%Y"];

/// Parses the heterogeneous date shapes of the three exports into a calendar date.
///
/// ISO timestamps keep only their date part (`2025-11-25T00:00:00` -> 2025-11-25).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Month abbreviations such as OCT also contain a 'T', so fall through on failure.
    if let Some(d) = s
        .split_once('T')
        .and_then(|(day, _time)| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    {
        return Some(d);
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }

    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
