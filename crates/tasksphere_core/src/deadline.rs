use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, time};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Chat input format: MM/DD/YYYY HH:MM AM|PM.
const INPUT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month]/[day]/[year] [hour repr:12]:[minute] [period]");

/// Reply format, e.g. "January 01, 2099, 09:00 AM".
const DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day], [year], [hour repr:12]:[minute] [period]");

pub const FORMAT_HINT: &str = "Invalid deadline format. Use MM/DD/YYYY HH:MM AM/PM.";
pub const PAST_DEADLINE: &str = "Deadline must be in the future.";

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Parse a free-text deadline against the current local time. An empty input
/// defaults to today at 23:59. The result is strictly in the future or this
/// fails with a validation error; nothing is persisted on failure.
pub fn parse_deadline(input: &str) -> Result<OffsetDateTime, AppError> {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    parse_deadline_at(input, now)
}

fn parse_deadline_at(input: &str, now: OffsetDateTime) -> Result<OffsetDateTime, AppError> {
    let deadline = if input.is_empty() {
        now.replace_time(time!(23:59))
    } else {
        PrimitiveDateTime::parse(input, INPUT_FORMAT)
            .map_err(|_| AppError::validation(FORMAT_HINT))?
            .assume_offset(now.offset())
    };

    if deadline <= now {
        return Err(AppError::validation(PAST_DEADLINE));
    }

    Ok(deadline)
}

pub fn to_stored(deadline: OffsetDateTime) -> Result<String, AppError> {
    deadline
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Render a stored RFC3339 deadline in the long reply format.
pub fn display(stored: &str) -> Result<String, AppError> {
    let parsed = OffsetDateTime::parse(stored, &Rfc3339)
        .map_err(|_| AppError::invalid_data("deadline must be RFC3339"))?;
    parsed
        .format(DISPLAY_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
