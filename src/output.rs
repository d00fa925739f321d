use crate::report::{CertificateRecord, Report};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table, presets::ASCII_FULL};
use std::{fmt, io::Write, str::FromStr};

const HEADER: [&str; 7] = [
    "Host",
    "Common Name",
    "DNS Names",
    "Not Before",
    "Not After",
    "Public Key Algorithm",
    "Issuer",
];

/// How a [`Report`] is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(format!(
                "invalid output format: {s} (supported: table, json, yaml)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// Write `report` to `out`; with [`OutputFormat::Table`] failures go to `err`
///
/// JSON and YAML carry failures inline under `errors`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails
pub fn render<O: Write, E: Write>(
    report: &Report,
    format: OutputFormat,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("error marshaling JSON")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(report).context("error marshaling YAML")?;
            write!(out, "{yaml}")?;
        }
        OutputFormat::Table => {
            if report.has_failures() {
                writeln!(err, "\nErrors encountered:")?;
                for failure in &report.failures {
                    writeln!(err, "  {}: {}", failure.host, failure.message)?;
                }
                writeln!(err)?;
            }
            writeln!(out, "{}", table(&report.certificates))?;
        }
    }

    Ok(())
}

fn table(certificates: &[CertificateRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(HEADER);

    for cert in certificates {
        table.add_row(vec![
            cert.host.clone(),
            cert.common_name.clone(),
            cert.dns_names.join("\n"),
            timestamp(&cert.not_before),
            timestamp(&cert.not_after),
            cert.public_key_algorithm.clone(),
            cert.issuer.clone(),
        ]);
    }

    table
}

fn timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::report::FailureRecord;
    use chrono::TimeZone;

    fn report() -> Report {
        Report {
            certificates: vec![CertificateRecord {
                host: "example.com:443".to_string(),
                common_name: "example.com".to_string(),
                dns_names: vec!["example.com".to_string(), "www.example.com".to_string()],
                not_before: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                not_after: Utc.with_ymd_and_hms(2025, 4, 1, 12, 30, 0).unwrap(),
                public_key_algorithm: "RSA".to_string(),
                issuer: "Example CA".to_string(),
            }],
            failures: vec![FailureRecord::new("127.0.0.1:9", "connection refused")],
        }
    }

    fn render_to_strings(report: &Report, format: OutputFormat) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        render(report, format, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);

        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("invalid output format: xml"));
    }

    #[test]
    fn test_output_format_display() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Yaml] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_render_table() {
        let (out, err) = render_to_strings(&report(), OutputFormat::Table);

        for column in HEADER {
            assert!(out.contains(column), "missing column {column}");
        }
        assert!(out.contains("example.com:443"));
        assert!(out.contains("www.example.com"));
        assert!(out.contains("2025-04-01 12:30:00 UTC"));
        assert!(out.contains("Example CA"));
        assert!(!out.contains("connection refused"));

        assert!(err.contains("Errors encountered:"));
        assert!(err.contains("  127.0.0.1:9: connection refused"));
    }

    #[test]
    fn test_render_table_without_failures() {
        let mut report = report();
        report.failures.clear();
        let (_, err) = render_to_strings(&report, OutputFormat::Table);
        assert!(err.is_empty());
    }

    #[test]
    fn test_render_json() {
        let (out, err) = render_to_strings(&report(), OutputFormat::Json);
        assert!(err.is_empty());

        let parsed: Report = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_render_json_omits_empty_errors() {
        let mut report = report();
        report.failures.clear();
        let (out, _) = render_to_strings(&report, OutputFormat::Json);
        assert!(!out.contains("\"errors\""));
    }

    #[test]
    fn test_render_yaml() {
        let (out, err) = render_to_strings(&report(), OutputFormat::Yaml);
        assert!(err.is_empty());
        assert!(out.contains("certificates:"));
        assert!(out.contains("common_name: example.com"));
        assert!(out.contains("errors:"));

        let parsed: Report = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed, report());
    }
}
