//! Localized date rendering for exports.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Day-first timestamp layout used in every export column.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Renders backend timestamps in the store's local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl DateFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Offset given in minutes east of UTC; `None` when out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(DATETIME_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_in_configured_offset() {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 3, 4, 5).unwrap();
        assert_eq!(DateFormatter::utc().format(&at), "02/03/2024 03:04:05");

        let lima = DateFormatter::from_offset_minutes(-300).unwrap();
        assert_eq!(lima.format(&at), "01/03/2024 22:04:05");
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(DateFormatter::from_offset_minutes(24 * 60).is_none());
        assert!(DateFormatter::from_offset_minutes(i32::MAX).is_none());
    }
}
