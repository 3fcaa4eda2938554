//! Download formats for the record history.
//!
//! Exports are plain serialization of the snapshot. An empty snapshot is
//! refused with [`ExportError::NoData`] so the caller never writes an empty
//! file.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, TimeZone};

use crate::error::ExportError;
use crate::record::TemperatureRecord;

/// Timestamp layout used in CSV and TXT exports.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CSV_HEADER: [&str; 3] = ["ID", "Temperatura (°C)", "Data"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Json, Self::Txt];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    /// Default file name for a download in this format.
    pub fn file_name(self) -> String {
        format!("temperatures.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(format!(
                "unknown export format '{other}' (expected csv, json or txt)"
            )),
        }
    }
}

/// Render `records` in `format`, with timestamps in local time.
pub fn export(records: &[TemperatureRecord], format: ExportFormat) -> Result<String, ExportError> {
    export_in(records, format, &Local)
}

/// Render `records` in `format`, with timestamps in `tz`.
pub fn export_in<Tz>(
    records: &[TemperatureRecord],
    format: ExportFormat,
    tz: &Tz,
) -> Result<String, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if records.is_empty() {
        return Err(ExportError::NoData);
    }
    match format {
        ExportFormat::Csv => to_csv(records, tz),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ExportFormat::Txt => Ok(to_txt(records, tz)),
    }
}

fn local_date<Tz>(record: &TemperatureRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    record
        .date
        .with_timezone(tz)
        .format(EXPORT_DATE_FORMAT)
        .to_string()
}

fn to_csv<Tz>(records: &[TemperatureRecord], tz: &Tz) -> Result<String, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.id.clone(),
            record.value.to_string(),
            local_date(record, tz),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn to_txt<Tz>(records: &[TemperatureRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    records
        .iter()
        .map(|r| {
            format!(
                "ID: {} | Temperatura: {}°C | Data: {}",
                r.id,
                r.value,
                local_date(r, tz)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn sample() -> Vec<TemperatureRecord> {
        let date = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .unwrap()
                .with_timezone(&Utc)
        };
        vec![
            TemperatureRecord {
                id: "a1".to_string(),
                value: 19.0,
                date: date("2026-10-18T12:00:00.000Z"),
            },
            TemperatureRecord {
                id: "b,2".to_string(),
                value: 20.5,
                date: date("2026-10-18T12:00:03.000Z"),
            },
        ]
    }

    #[test]
    fn empty_history_is_refused_in_every_format() {
        for format in ExportFormat::ALL {
            assert!(matches!(export(&[], format), Err(ExportError::NoData)));
        }
    }

    #[test]
    fn csv_has_header_and_quotes_when_needed() {
        let out = export_in(&sample(), ExportFormat::Csv, &Utc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID,Temperatura (°C),Data");
        assert_eq!(lines[1], "a1,19,2026-10-18 12:00:00");
        assert_eq!(lines[2], "\"b,2\",20.5,2026-10-18 12:00:03");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_is_the_records_verbatim() {
        let records = sample();
        let out = export_in(&records, ExportFormat::Json, &Utc).unwrap();
        assert!(out.contains('\n'));
        let parsed: Vec<TemperatureRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn txt_has_one_line_per_record() {
        let out = export_in(&sample(), ExportFormat::Txt, &Utc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "ID: a1 | Temperatura: 19°C | Data: 2026-10-18 12:00:00",
                "ID: b,2 | Temperatura: 20.5°C | Data: 2026-10-18 12:00:03",
            ]
        );
    }

    #[test]
    fn format_parsing_and_file_names() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("text".parse::<ExportFormat>(), Ok(ExportFormat::Txt));
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.file_name(), "temperatures.json");
    }
}
