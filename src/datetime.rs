use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::ParseError;

/// Renders `input` as `YYYY年MM月DD日` in the local time zone.
pub fn format_time(input: &str) -> Result<String, ParseError> {
    format_time_in(input, local_offset())
}

/// Renders `input` as `YYYY年MM月DD日` in `offset`.
pub fn format_time_in(input: &str, offset: UtcOffset) -> Result<String, ParseError> {
    let moment = parse_timestamp(input, offset)?
        .checked_to_offset(offset)
        .ok_or_else(|| ParseError {
            input: input.to_owned(),
        })?;
    Ok(format!(
        "{}年{:02}月{:02}日",
        moment.year(),
        u8::from(moment.month()),
        moment.day()
    ))
}

/// Accepts RFC 3339, RFC 2822, ISO date-times without an offset (read in
/// `offset`) and bare ISO dates (read as UTC midnight).
pub fn parse_timestamp(input: &str, offset: UtcOffset) -> Result<OffsetDateTime, ParseError> {
    let trimmed = input.trim();
    if let Ok(moment) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(moment);
    }
    if let Ok(moment) = OffsetDateTime::parse(trimmed, &Rfc2822) {
        return Ok(moment);
    }
    if let Some(naive) = parse_naive(trimmed) {
        return Ok(naive.assume_offset(offset));
    }
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(date.with_time(Time::MIDNIGHT).assume_utc());
    }
    Err(ParseError {
        input: input.to_owned(),
    })
}

fn parse_naive(input: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        input,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            input,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            input,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(input, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    })
    .ok()
}

fn local_offset() -> UtcOffset {
    match UtcOffset::current_local_offset() {
        Ok(offset) => offset,
        Err(err) => {
            tracing::debug!(?err, "local offset unavailable, formatting in UTC");
            UtcOffset::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::macros::offset;

    #[test]
    fn formats_rfc3339_with_zero_padding() {
        assert_eq!(
            format_time_in("2024-03-05T00:00:00Z", UtcOffset::UTC).expect("format"),
            "2024年03月05日"
        );
        assert_eq!(
            format_time_in("2023-11-28T09:15:42.123Z", UtcOffset::UTC).expect("format"),
            "2023年11月28日"
        );
    }

    #[test]
    fn converts_into_the_target_offset() {
        assert_eq!(
            format_time_in("2024-03-04T20:00:00Z", offset!(+8)).expect("format"),
            "2024年03月05日"
        );
        assert_eq!(
            format_time_in("2024-03-05", offset!(-5)).expect("format"),
            "2024年03月04日"
        );
    }

    #[test]
    fn naive_times_are_read_in_the_target_offset() {
        assert_eq!(
            format_time_in("2024-03-05T23:30:00", offset!(-5)).expect("format"),
            "2024年03月05日"
        );
        assert_eq!(
            format_time_in("2024-01-09 08:00:00", offset!(+9)).expect("format"),
            "2024年01月09日"
        );
    }

    #[test]
    fn accepts_rfc2822() {
        assert_eq!(
            format_time_in("Tue, 05 Mar 2024 10:00:00 +0000", UtcOffset::UTC).expect("format"),
            "2024年03月05日"
        );
    }

    #[test]
    fn unparsable_input_is_an_error() {
        assert_matches!(
            format_time_in("not a date", UtcOffset::UTC),
            Err(ParseError { input }) if input == "not a date"
        );
        assert!(format_time_in("", UtcOffset::UTC).is_err());
        assert!(format_time_in("2024-13-40", UtcOffset::UTC).is_err());
    }

    #[test]
    fn shifting_past_the_last_representable_year_is_an_error() {
        assert_matches!(
            format_time_in("9999-12-31T23:00:00-05:00", UtcOffset::UTC),
            Err(ParseError { input }) if input == "9999-12-31T23:00:00-05:00"
        );
        assert_eq!(
            format_time_in("9999-12-31T23:00:00-05:00", offset!(-5)).expect("format"),
            "9999年12月31日"
        );
    }

    #[test]
    fn local_formatting_uses_the_same_shape() {
        let out = format_time("2024-06-15T12:00:00Z").expect("format");
        assert!(out.starts_with("2024年06月"));
        assert!(out.ends_with('日'));
    }
}
