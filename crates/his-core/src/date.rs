//! Calendar dates in the literal `YYYY-MM-DD` form used on the wire.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::{CoreError, Result};

/// The only accepted calendar date layout.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date without any time component.
///
/// The year is exactly four unsigned digits; `[year]` alone would also take a
/// leading `+` or `-`.
pub fn parse_calendar_date(input: &str) -> Result<Date> {
    if input.len() != 10 || !input.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CoreError::invalid_date(input, "expected YYYY-MM-DD"));
    }
    Date::parse(input, DATE_FORMAT).map_err(|e| CoreError::invalid_date(input, e.to_string()))
}
