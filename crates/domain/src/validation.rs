// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime, Time};

/// Parses a hire date supplied in either of the two accepted forms.
///
/// Bulk uploads carry hire dates as epoch milliseconds or as ISO 8601
/// date strings. Epoch parsing takes precedence: a value that parses as
/// an integer is always interpreted as milliseconds since the Unix epoch,
/// and only non-integer values fall through to date-string parsing. Date
/// strings resolve to midnight UTC.
///
/// # Arguments
///
/// * `raw` - The raw field value
///
/// # Errors
///
/// Returns `DomainError::InvalidHireDate` if the value parses as neither
/// form.
pub fn parse_hire_date(raw: &str) -> Result<OffsetDateTime, DomainError> {
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidHireDate {
            value: raw.to_string(),
            reason: String::from("value is blank"),
        });
    }

    if let Ok(millis) = trimmed.parse::<i64>() {
        return OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map_err(|e| DomainError::InvalidHireDate {
                value: trimmed.to_string(),
                reason: e.to_string(),
            });
    }

    let date: Date =
        Date::parse(trimmed, &Iso8601::DEFAULT).map_err(|e| DomainError::InvalidHireDate {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })?;

    Ok(date.with_time(Time::MIDNIGHT).assume_utc())
}
