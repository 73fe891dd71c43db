use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Timelike};
use csv_async::ByteRecord;

/// Column names recognized in the OurAirports `airports.csv` header.
/// Anything else in the header is ignored.
pub mod columns {
    pub const ID: &str = "id";
    pub const IDENT: &str = "ident";
    pub const TYPE: &str = "type";
    pub const NAME: &str = "name";
    pub const LATITUDE_DEG: &str = "latitude_deg";
    pub const LONGITUDE_DEG: &str = "longitude_deg";
    pub const ELEVATION_FT: &str = "elevation_ft";
    pub const CONTINENT: &str = "continent";
    pub const COUNTRY_NAME: &str = "country_name";
    pub const ISO_COUNTRY: &str = "iso_country";
    pub const REGION_NAME: &str = "region_name";
    pub const ISO_REGION: &str = "iso_region";
    pub const LOCAL_REGION: &str = "local_region";
    pub const MUNICIPALITY: &str = "municipality";
    pub const SCHEDULED_SERVICE: &str = "scheduled_service";
    pub const GPS_CODE: &str = "gps_code";
    pub const ICAO_CODE: &str = "icao_code";
    pub const IATA_CODE: &str = "iata_code";
    pub const LOCAL_CODE: &str = "local_code";
    pub const HOME_LINK: &str = "home_link";
    pub const WIKIPEDIA_LINK: &str = "wikipedia_link";
    pub const KEYWORDS: &str = "keywords";
    pub const SCORE: &str = "score";
    pub const LAST_UPDATED: &str = "last_updated";
}

/// Cell values (after trimming, ASCII case-insensitive) that mark an
/// airport as having scheduled service.
const SCHEDULED_TOKENS: [&str; 3] = ["1", "yes", "true"];

/// One airport row that made it into the index.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportRecord {
    pub id: i64,
    pub ident: String,
    pub airport_type: String,
    pub name: String,
    /// 0.0 when the cell is missing or not a number.
    pub latitude_deg: f64,
    /// 0.0 when the cell is missing or not a number.
    pub longitude_deg: f64,
    /// `None` when unknown; `Some(0)` is a real sea-level airport.
    pub elevation_ft: Option<i64>,
    pub continent: String,
    pub country_name: String,
    pub iso_country: String,
    pub region_name: String,
    pub iso_region: String,
    pub local_region: String,
    pub municipality: String,
    pub has_scheduled_service: bool,
    pub gps_code: String,
    pub icao_code: String,
    /// Uppercased; never empty for an indexed record.
    pub iata_code: String,
    pub local_code: String,
    pub home_link: String,
    pub wikipedia_link: String,
    pub keywords: String,
    pub score: Option<i64>,
    /// RFC 3339 timestamp of the source row, if present and well formed.
    pub last_updated: Option<DateTime<FixedOffset>>,
}

/// Column name to position, built once from the header row.
///
/// Lookups are by name so data rows may be shorter or longer than the
/// header. A column that is unknown, or whose position lies past the end
/// of a short row, reads as an empty string.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    /// Header names are trimmed. If a name repeats, the last position wins.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positions = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name.as_ref().trim().to_string(), idx))
            .collect();
        Self { positions }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Trimmed cell text for `column`, lossily decoded as UTF-8.
    pub fn get<'r>(&self, record: &'r ByteRecord, column: &str) -> Cow<'r, str> {
        let Some(raw) = self
            .positions
            .get(column)
            .and_then(|&idx| record.get(idx))
        else {
            return Cow::Borrowed("");
        };
        match String::from_utf8_lossy(raw) {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
            Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
        }
    }

    fn text(&self, record: &ByteRecord, column: &str) -> String {
        self.get(record, column).into_owned()
    }
}

impl AirportRecord {
    /// Coerce one data row into a record.
    ///
    /// Returns `None` when the row is skipped: `id` missing or not an
    /// integer, or `iata_code` empty. Unparsable optional cells never
    /// reject the row.
    pub fn from_row(map: &ColumnMap, record: &ByteRecord) -> Option<Self> {
        use self::columns::*;

        let id = map.get(record, ID).parse::<i64>().ok()?;

        let iata_code = map.get(record, IATA_CODE).to_uppercase();
        if iata_code.is_empty() {
            return None;
        }

        let scheduled = map.get(record, SCHEDULED_SERVICE);
        let has_scheduled_service = SCHEDULED_TOKENS
            .iter()
            .any(|token| scheduled.eq_ignore_ascii_case(token));

        Some(Self {
            id,
            ident: map.text(record, IDENT),
            airport_type: map.text(record, TYPE),
            name: map.text(record, NAME),
            latitude_deg: parse_or_zero(&map.get(record, LATITUDE_DEG)),
            longitude_deg: parse_or_zero(&map.get(record, LONGITUDE_DEG)),
            elevation_ft: parse_optional(&map.get(record, ELEVATION_FT)),
            continent: map.text(record, CONTINENT),
            country_name: map.text(record, COUNTRY_NAME),
            iso_country: map.text(record, ISO_COUNTRY),
            region_name: map.text(record, REGION_NAME),
            iso_region: map.text(record, ISO_REGION),
            local_region: map.text(record, LOCAL_REGION),
            municipality: map.text(record, MUNICIPALITY),
            has_scheduled_service,
            gps_code: map.text(record, GPS_CODE),
            icao_code: map.text(record, ICAO_CODE),
            iata_code,
            local_code: map.text(record, LOCAL_CODE),
            home_link: map.text(record, HOME_LINK),
            wikipedia_link: map.text(record, WIKIPEDIA_LINK),
            keywords: map.text(record, KEYWORDS),
            score: parse_optional(&map.get(record, SCORE)),
            last_updated: parse_timestamp(&map.get(record, LAST_UPDATED)),
        })
    }
}

fn parse_or_zero(cell: &str) -> f64 {
    cell.parse().unwrap_or(0.0)
}

fn parse_optional(cell: &str) -> Option<i64> {
    cell.parse().ok()
}

/// Internet date-time only: upper-case `T` and `Z`, no leap second.
fn parse_timestamp(cell: &str) -> Option<DateTime<FixedOffset>> {
    if cell.as_bytes().get(10) != Some(&b'T') || cell.contains('z') {
        return None;
    }
    let ts = DateTime::parse_from_rfc3339(cell).ok()?;
    // chrono folds second 60 into nanoseconds past 1e9
    if ts.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> ByteRecord {
        let mut record = ByteRecord::new();
        for field in fields {
            record.push_field(field.as_bytes());
        }
        record
    }

    fn parse(header: &[&str], fields: &[&str]) -> Option<AirportRecord> {
        AirportRecord::from_row(&ColumnMap::new(header.iter().copied()), &row(fields))
    }

    #[test]
    fn trims_and_uppercases_iata() {
        let rec = parse(&["id", "iata_code", "name"], &["1", " jfk ", "  John F Kennedy "]).unwrap();
        assert_eq!(rec.id, 1);
        assert_eq!(rec.iata_code, "JFK");
        assert_eq!(rec.name, "John F Kennedy");
    }

    #[test]
    fn skips_rows_without_numeric_id() {
        assert!(parse(&["id", "iata_code"], &["", "AAA"]).is_none());
        assert!(parse(&["id", "iata_code"], &["abc", "AAA"]).is_none());
        assert!(parse(&["iata_code"], &["AAA"]).is_none());
    }

    #[test]
    fn skips_rows_without_iata() {
        assert!(parse(&["id", "iata_code"], &["1", "   "]).is_none());
        assert!(parse(&["id", "name"], &["1", "Nowhere"]).is_none());
    }

    #[test]
    fn ragged_rows_read_missing_cells_as_empty() {
        let header = ["id", "iata_code", "name", "municipality", "elevation_ft"];
        let rec = parse(&header, &["7", "ABC"]).unwrap();
        assert_eq!(rec.name, "");
        assert_eq!(rec.municipality, "");
        assert_eq!(rec.elevation_ft, None);

        let rec = parse(&["id", "iata_code"], &["8", "DEF", "extra", "cells"]).unwrap();
        assert_eq!(rec.iata_code, "DEF");
    }

    #[test]
    fn elevation_absent_is_distinct_from_zero() {
        let header = ["id", "iata_code", "elevation_ft"];
        assert_eq!(parse(&header, &["1", "AAA", ""]).unwrap().elevation_ft, None);
        assert_eq!(parse(&header, &["1", "AAA", "0"]).unwrap().elevation_ft, Some(0));
        assert_eq!(parse(&header, &["1", "AAA", "12ft"]).unwrap().elevation_ft, None);
        assert_eq!(parse(&header, &["1", "AAA", "-54"]).unwrap().elevation_ft, Some(-54));
    }

    #[test]
    fn score_is_optional() {
        let header = ["id", "iata_code", "score"];
        assert_eq!(parse(&header, &["1", "AAA", "1275"]).unwrap().score, Some(1275));
        assert_eq!(parse(&header, &["1", "AAA", "n/a"]).unwrap().score, None);
    }

    #[test]
    fn bad_coordinates_fall_back_to_zero() {
        let header = ["id", "iata_code", "latitude_deg", "longitude_deg"];
        let rec = parse(&header, &["1", "AAA", "north", ""]).unwrap();
        assert_eq!(rec.latitude_deg, 0.0);
        assert_eq!(rec.longitude_deg, 0.0);

        let rec = parse(&header, &["1", "AAA", "40.639447", "-73.779317"]).unwrap();
        assert!((rec.latitude_deg - 40.639447).abs() < 1e-9);
        assert!((rec.longitude_deg + 73.779317).abs() < 1e-9);
    }

    #[test]
    fn scheduled_service_tokens() {
        let header = ["id", "iata_code", "scheduled_service"];
        for yes in ["1", "yes", "Yes", "TRUE", " true "] {
            assert!(parse(&header, &["1", "AAA", yes]).unwrap().has_scheduled_service, "{yes}");
        }
        for no in ["0", "no", "", "y", "on"] {
            assert!(!parse(&header, &["1", "AAA", no]).unwrap().has_scheduled_service, "{no}");
        }
    }

    #[test]
    fn last_updated_requires_rfc3339() {
        let header = ["id", "iata_code", "last_updated"];
        let rec = parse(&header, &["1", "AAA", "2023-06-01T00:00:00Z"]).unwrap();
        let ts = rec.last_updated.unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-06-01T00:00:00+00:00");

        assert!(parse(&header, &["1", "AAA", "2023-06-01"]).unwrap().last_updated.is_none());
        assert!(parse(&header, &["1", "AAA", "2023-06-01 00:00:00"]).unwrap().last_updated.is_none());
        assert!(parse(&header, &["1", "AAA", ""]).unwrap().last_updated.is_none());

        for loose in [
            "2023-06-01 00:00:00Z",
            "2023-06-01t00:00:00z",
            "2023-06-01T00:00:00z",
            "2023-06-01T00:00:60Z",
        ] {
            assert!(parse(&header, &["1", "AAA", loose]).unwrap().last_updated.is_none(), "{loose}");
        }
    }

    #[test]
    fn last_updated_keeps_offset_and_fraction() {
        let header = ["id", "iata_code", "last_updated"];
        let rec = parse(&header, &["1", "AAA", "2024-01-15T08:30:05.250-05:00"]).unwrap();
        let ts = rec.last_updated.unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn header_names_are_trimmed() {
        let columns = ColumnMap::new([" id ", "iata_code "]);
        assert!(columns.contains("id"));
        assert!(columns.contains("iata_code"));
        assert!(AirportRecord::from_row(&columns, &row(&["3", "xyz"])).is_some());
    }
}
