//! HTML report rendering.
//!
//! The report is a single self-contained document: styles are inline and the
//! chart is embedded as a base64 `data:` URI, so the file can be moved or
//! mailed on its own. The markup lives in a `minijinja` template; labels and
//! addresses go through its HTML auto-escaping.

use crate::dns::types::{Latency, ResultSet, Sample};
use crate::error::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use minijinja::{context, Environment, Value};
use serde::Serialize;

/// Default document title.
pub const DEFAULT_TITLE: &str = "DNS Performance Report";

/// Table cell text for targets that did not answer.
pub const UNREACHABLE_TEXT: &str = "unreachable";

/// Auto-escaping is picked from the `.html` suffix.
const TEMPLATE_NAME: &str = "report.html";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }
        table {
            width: 100%;
            border-collapse: collapse;
        }
        th, td {
            padding: 10px;
            border: 1px solid #ccc;
        }
        th {
            background-color: #f2f2f2;
            text-align: left;
        }
        td.latency {
            text-align: right;
            font-variant-numeric: tabular-nums;
        }
        tr.unreachable td {
            color: #b00020;
        }
        img {
            display: block;
            margin-left: auto;
            margin-right: auto;
            max-width: 100%;
            height: auto;
        }
        .footer {
            margin-top: 50px;
            text-align: center;
            font-size: 14px;
            color: #666;
        }
    </style>
</head>
<body>
    <h1>{{ title }}</h1>
    <p class="summary">
    {%- if summary.total == 0 -%}
        No DNS servers were probed.
    {%- else -%}
        {{ summary.reachable }} of {{ summary.total }} DNS servers answered.
        {%- if fastest %} Fastest: {{ fastest.name }} ({{ fastest.latency }} ms).{% endif %}
    {%- endif -%}
    </p>

    <h2>Table</h2>
    <table>
        <thead>
            <tr>
                <th>DNS Server</th>
                <th>Address</th>
                <th>Ping Time (ms)</th>
            </tr>
        </thead>
        <tbody>
        {% for row in rows %}
            <tr{% if not row.reachable %} class="unreachable"{% endif %}><td>{{ row.name }}</td><td>{{ row.ip }}</td><td class="latency">{{ row.latency }}</td></tr>
        {% endfor %}
        </tbody>
    </table>

    <h2>Chart</h2>
    <img src="data:image/png;base64,{{ chart }}" alt="DNS performance chart">

    <div class="footer">
        <p>Generated by dnsreport {{ version }}
        {%- if generated_at %} on <time datetime="{{ generated_at.iso }}">{{ generated_at.display }}</time>{% endif %}.</p>
    </div>
</body>
</html>
"#;

/// One table row, already formatted for display.
#[derive(Debug, Serialize)]
struct Row<'a> {
    name: &'a str,
    ip: &'a str,
    latency: String,
    reachable: bool,
}

impl<'a> Row<'a> {
    fn new(sample: &'a Sample) -> Self {
        let latency = match sample.latency {
            Latency::Reachable(_) => sample.latency.to_string(),
            Latency::Unreachable => UNREACHABLE_TEXT.to_string(),
        };
        Self {
            name: &sample.server.name,
            ip: &sample.server.ip,
            latency,
            reachable: sample.latency.is_reachable(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Fastest<'a> {
    name: &'a str,
    latency: String,
}

#[derive(Debug, Serialize)]
struct Stamp {
    iso: String,
    display: String,
}

/// Render a report without a generation timestamp.
///
/// The output depends only on `results` and `chart_png`.
///
/// # Errors
///
/// Returns [`Error::Render`](crate::error::Error::Render) if the template
/// fails to render.
pub fn render_report(results: &ResultSet, chart_png: &[u8]) -> Result<String> {
    ReportRenderer::new().render(results, chart_png)
}

/// HTML report builder.
///
/// # Example
///
/// ```ignore
/// let html = ReportRenderer::new()
///     .with_timestamp(chrono::Utc::now())
///     .render(&results, &chart)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRenderer {
    title: String,
    generated_at: Option<DateTime<Utc>>,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Stamp the footer with the generation time.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Build the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`](crate::error::Error::Render) if the template
    /// fails to render.
    pub fn render(&self, results: &ResultSet, chart_png: &[u8]) -> Result<String> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        let template = env.get_template(TEMPLATE_NAME)?;

        let rows: Vec<Row<'_>> = results.iter().map(Row::new).collect();
        let fastest = results.fastest().map(|sample| Fastest {
            name: &sample.server.name,
            latency: sample.latency.to_string(),
        });
        let generated_at = self.generated_at.map(|at| Stamp {
            iso: at.to_rfc3339(),
            display: at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        });

        let html = template.render(context! {
            title => self.title,
            summary => results.summary(),
            fastest => fastest,
            rows => rows,
            // base64 output needs no escaping
            chart => Value::from_safe_string(BASE64.encode(chart_png)),
            version => env!("CARGO_PKG_VERSION"),
            generated_at => generated_at,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::types::{DnsServer, Sample};
    use chrono::TimeZone;
    use std::time::Duration;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really a chart";

    fn scenario() -> ResultSet {
        ResultSet::new(vec![
            Sample::reachable(DnsServer::new("A", "10.0.0.1"), Duration::from_millis(15)),
            Sample::unreachable(DnsServer::new("B", "10.0.0.2"), "timeout"),
        ])
    }

    fn tbody(html: &str) -> &str {
        let start = html.find("<tbody>").unwrap();
        let end = html.find("</tbody>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_one_row_per_target_in_order() {
        let html = render_report(&scenario(), PNG).unwrap();
        let body = tbody(&html);
        assert_eq!(body.matches("<tr").count(), 2);

        let a = body.find("<td>A</td>").unwrap();
        let b = body.find("<td>B</td>").unwrap();
        assert!(a < b);
        assert!(body.contains(">15.00</td>"));
        assert!(body.contains(UNREACHABLE_TEXT));
    }

    #[test]
    fn test_exactly_one_embedded_image() {
        let html = render_report(&scenario(), PNG).unwrap();
        assert_eq!(html.matches("<img ").count(), 1);
        let encoded = BASE64.encode(PNG);
        assert!(html.contains(&format!("data:image/png;base64,{encoded}\"")));
        assert!(!html.contains("src=\"http"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_report(&scenario(), PNG).unwrap();
        let second = render_report(&scenario(), PNG).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_latency_formatting() {
        let results = ResultSet::new(vec![Sample::reachable(
            DnsServer::new("Quad9", "9.9.9.9"),
            Duration::from_secs_f64(0.0234),
        )]);
        let html = render_report(&results, PNG).unwrap();
        assert!(tbody(&html).contains(">23.40</td>"));
        assert!(html.contains("Fastest: Quad9 (23.40 ms)."));
    }

    #[test]
    fn test_labels_are_escaped() {
        let results = ResultSet::new(vec![Sample::reachable(
            DnsServer::new("<script>alert('x')</script>", "1.1.1.1\" onload=\"x"),
            Duration::from_millis(5),
        )]);
        let html = render_report(&results, PNG).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("alert('x')"));
        assert!(html.contains("&lt;script&gt;alert("));
        assert!(html.contains("1.1.1.1&quot; onload=&quot;x"));
    }

    #[test]
    fn test_empty_results() {
        let html = render_report(&ResultSet::default(), PNG).unwrap();
        assert_eq!(tbody(&html).matches("<tr").count(), 0);
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(html.contains("No DNS servers were probed."));
    }

    #[test]
    fn test_timestamp_and_title() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let html = ReportRenderer::new()
            .with_title("Office <LAN>")
            .with_timestamp(at)
            .render(&scenario(), PNG)
            .unwrap();
        assert!(html.contains("<title>Office &lt;LAN&gt;</title>"));
        assert!(html.contains("2024-05-01 12:30:00 UTC"));
        assert!(!render_report(&scenario(), PNG).unwrap().contains("<time"));
    }
}
