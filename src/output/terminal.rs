//! Terminal listing of probe results.

use crate::cli::OutputFormat;
use crate::dns::types::ResultSet;
use crate::error::Result;
use std::io::Write;

/// Write the results to `out` in target order.
///
/// # Errors
///
/// Returns an error if writing to `out` fails or JSON encoding fails.
pub fn write_results(out: &mut impl Write, results: &ResultSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, results),
        OutputFormat::Json => write_json(out, results),
        OutputFormat::Csv => write_delimited(out, results, ','),
        OutputFormat::Tsv => write_delimited(out, results, '\t'),
    }
}

/// `"<label>: <ms> ms"`, one line per target.
fn write_text(out: &mut impl Write, results: &ResultSet) -> Result<()> {
    for sample in results {
        writeln!(out, "{}", sample.terminal_line())?;
    }
    Ok(())
}

fn write_json(out: &mut impl Write, results: &ResultSet) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

fn write_delimited(out: &mut impl Write, results: &ResultSet, sep: char) -> Result<()> {
    writeln!(out, "#{sep}Name{sep}IP{sep}Latency(ms){sep}Reachable")?;
    for (idx, sample) in results.iter().enumerate() {
        let latency = sample
            .latency
            .as_millis()
            .map(|ms| format!("{ms:.2}"))
            .unwrap_or_default();
        writeln!(
            out,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            idx + 1,
            quote(&sample.server.name, sep),
            quote(&sample.server.ip, sep),
            latency,
            sample.latency.is_reachable()
        )?;
    }
    Ok(())
}

/// Quote a CSV field containing the separator or quotes.
fn quote(field: &str, sep: char) -> String {
    if sep == ',' && (field.contains(',') || field.contains('"')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.replace(sep, " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::types::{DnsServer, Sample};
    use std::time::Duration;

    fn scenario() -> ResultSet {
        ResultSet::new(vec![
            Sample::reachable(DnsServer::new("A", "10.0.0.1"), Duration::from_millis(15)),
            Sample::unreachable(DnsServer::new("B", "10.0.0.2"), "timeout"),
        ])
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_results(&mut out, &scenario(), format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_lines() {
        assert_eq!(render(OutputFormat::Text), "A: 15.00 ms\nB: inf ms\n");
    }

    #[test]
    fn test_csv() {
        let csv = render(OutputFormat::Csv);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "#,Name,IP,Latency(ms),Reachable");
        assert_eq!(lines[1], "1,A,10.0.0.1,15.00,true");
        assert_eq!(lines[2], "2,B,10.0.0.2,,false");
    }

    #[test]
    fn test_tsv() {
        let tsv = render(OutputFormat::Tsv);
        assert!(tsv.lines().nth(1).unwrap().starts_with("1\tA\t10.0.0.1\t15.00"));
    }

    #[test]
    fn test_json() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        let samples = json.as_array().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0]["server"]["name"], "A");
        assert_eq!(samples[1]["status"], "unreachable");
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(quote("Comodo, Secure", ','), "\"Comodo, Secure\"");
        assert_eq!(quote("tab\there", '\t'), "tab here");
    }
}
