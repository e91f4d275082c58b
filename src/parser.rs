//! Turns csv rows into `TemperatureRow`s.
//!
//! Expected layout (zero-based): field 2 is the month, field 5 the average
//! temperature of the day. Anything else on the row is ignored.

use crate::error::RowError;
use crate::{Month, TemperatureRow};
use csv::StringRecord;

/// Rows with fewer fields than this are malformed.
pub const MIN_FIELDS: usize = 6;
pub const MONTH_FIELD: usize = 2;
pub const TEMPERATURE_FIELD: usize = 5;

pub fn parse_record(record: &StringRecord) -> Result<TemperatureRow, RowError> {
    if record.len() < MIN_FIELDS {
        return Err(RowError::TooFewFields {
            found: record.len(),
        });
    }

    let raw_month = record[MONTH_FIELD].trim();
    let month: i64 = raw_month
        .parse()
        .map_err(|_| RowError::InvalidMonth(raw_month.to_string()))?;
    let month = Month::new(month).ok_or(RowError::MonthOutOfRange(month))?;

    let raw_temperature = record[TEMPERATURE_FIELD].trim();
    let temperature_c: f64 = raw_temperature
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite())
        .ok_or_else(|| RowError::InvalidTemperature(raw_temperature.to_string()))?;

    Ok(TemperatureRow {
        month,
        temperature_c,
    })
}

/// Parses one raw line, splitting on commas without quote handling.
pub fn parse_line(line: &str) -> Result<TemperatureRow, RowError> {
    let record: StringRecord = line.split(',').collect();
    parse_record(&record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_and_temperature() {
        let row = parse_line("Europe,Portugal,3,14,1995,12.5").unwrap();
        assert_eq!(row.month, Month::new(3).unwrap());
        assert_eq!(row.temperature_c, 12.5);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let err = parse_line("Europe,Portugal,Lisbon,7,1,2001,26.1").unwrap_err();
        // month column now holds "Lisbon"
        assert_eq!(err, RowError::InvalidMonth("Lisbon".to_string()));

        let row = parse_line("a,b,12,d,e,-3.25,g,h").unwrap();
        assert_eq!(row.month.number(), 12);
        assert_eq!(row.temperature_c, -3.25);
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            parse_line("a,b,3,d"),
            Err(RowError::TooFewFields { found: 4 })
        );
        assert_eq!(parse_line(""), Err(RowError::TooFewFields { found: 1 }));
    }

    #[test]
    fn non_numeric_fields() {
        assert_eq!(
            parse_line("a,b,March,d,e,10.0"),
            Err(RowError::InvalidMonth("March".to_string()))
        );
        assert_eq!(
            parse_line("a,b,3,d,e,warm"),
            Err(RowError::InvalidTemperature("warm".to_string()))
        );
        assert_eq!(
            parse_line("a,b,3,d,e,NaN"),
            Err(RowError::InvalidTemperature("NaN".to_string()))
        );
    }

    #[test]
    fn month_must_be_in_range() {
        assert_eq!(
            parse_line("a,b,13,d,e,10.0"),
            Err(RowError::MonthOutOfRange(13))
        );
        assert_eq!(
            parse_line("a,b,0,d,e,10.0"),
            Err(RowError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        let row = parse_line("a,b, 5 ,d,e, 18.0 ").unwrap();
        assert_eq!(row.month.number(), 5);
        assert_eq!(row.temperature_c, 18.0);
    }
}
