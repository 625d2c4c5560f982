// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DbError;

/// Fixed-width RFC 3339 so lexical order matches chronological order.
pub(crate) fn format(dt: &DateTime<Utc>) -> String {
	dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn format_is_fixed_width_and_sortable() {
		let early = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
		let late = early + chrono::Duration::microseconds(1);
		assert_eq!(format(&early).len(), format(&late).len());
		assert!(format(&early) < format(&late));
	}

	#[test]
	fn parse_roundtrips_format() {
		let dt = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
		assert_eq!(parse(&format(&dt), "created_at").unwrap(), dt);
	}

	#[test]
	fn parse_rejects_garbage() {
		assert!(matches!(parse("yesterday", "created_at"), Err(DbError::Internal(_))));
	}
}
