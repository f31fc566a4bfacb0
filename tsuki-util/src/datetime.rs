use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};

pub const NAIVE_DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Converts the datetime into UTC.
pub fn naive_datetime(datetime: OffsetDateTime) -> OffsetDateTime {
    datetime.to_offset(UtcOffset::UTC)
}
