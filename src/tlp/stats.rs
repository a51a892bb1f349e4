//! Parsing of `tlp-stat -b` output into per-battery reports.

/// Placeholder for any field that is missing or malformed in the source text.
pub const UNKNOWN: &str = "???";

const SECTION_MARKER: &str = "Battery Status:";

/// One battery section from `tlp-stat -b`.
///
/// Every field except `name` starts out as [`UNKNOWN`] so a report can
/// always be rendered in full, no matter how sparse the source text was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryReport {
    pub name: String,
    pub status: String,
    pub start_threshold: String,
    pub end_threshold: String,
    pub charge: String,
    pub capacity: String,
}

impl BatteryReport {
    fn new(name: String) -> Self {
        Self {
            name,
            status: UNKNOWN.to_string(),
            start_threshold: UNKNOWN.to_string(),
            end_threshold: UNKNOWN.to_string(),
            charge: UNKNOWN.to_string(),
            capacity: UNKNOWN.to_string(),
        }
    }
}

impl std::fmt::Display for BatteryReport {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(formatter, "{}:", self.name)?;
        if self.status != UNKNOWN {
            writeln!(formatter, "  Current Status: {}", self.status)?;
        }
        writeln!(formatter, "  Start threshold: {}%", self.start_threshold)?;
        writeln!(formatter, "  End threshold: {}%", self.end_threshold)?;
        write!(
            formatter,
            "  Current Charge: {}% of {}%",
            self.charge, self.capacity
        )
    }
}

/// Parse raw `tlp-stat -b` output into one report per battery section.
///
/// Pure single forward pass over the lines; the open section is the
/// `Option<BatteryReport>` threaded through the scan. Empty input, or
/// input carrying an upstream `Error` marker, yields no reports.
pub fn parse(raw: &str) -> Vec<BatteryReport> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("Error") {
        return Vec::new();
    }

    let mut reports = Vec::new();
    let mut current: Option<BatteryReport> = None;

    for line in raw.lines() {
        let line = line.trim();

        if line.starts_with("+++ ") && line.contains(SECTION_MARKER) {
            finalize(&mut reports, current.take());

            let name = line
                .split_once(SECTION_MARKER)
                .map(|(_, rest)| rest.trim())
                .unwrap_or_default();
            // A header with no name still opens a section so stray field
            // lines attach to it; it is dropped again at finalize.
            current = Some(BatteryReport::new(name.to_string()));
            continue;
        }

        // Field lines outside any section have nothing to attach to.
        let Some(report) = current.as_mut() else {
            continue;
        };

        if line.contains("charge_control_start_threshold") {
            report.start_threshold = numeric_value(line);
        } else if line.contains("charge_control_end_threshold") {
            report.end_threshold = numeric_value(line);
        } else if line.starts_with("Charge") {
            report.charge = numeric_value(line);
        } else if line.starts_with("Capacity") {
            report.capacity = numeric_value(line);
        } else if line.contains("status") {
            report.status = text_value(line);
        }
    }

    finalize(&mut reports, current.take());
    reports
}

/// Parse and render in one step, producing the text shown in the stats pane.
pub fn summarize(raw: &str) -> String {
    let reports = parse(raw);

    if reports.is_empty() {
        return "No battery data found.".to_string();
    }

    reports
        .iter()
        .map(|report| report.to_string())
        .collect::<Vec<String>>()
        .join("\n\n")
}

fn finalize(reports: &mut Vec<BatteryReport>, section: Option<BatteryReport>) {
    match section {
        Some(report) if !report.name.is_empty() => reports.push(report),
        _ => (),
    }
}

/// First whitespace-delimited token after the `=` separator, which strips
/// trailing units like `[%]`.
fn text_value(line: &str) -> String {
    line.split_once('=')
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Like [`text_value`], but garbled tokens become the sentinel rather than
/// leaking into the rendered report.
fn numeric_value(line: &str) -> String {
    let token = text_value(line);
    if token.parse::<f64>().is_ok() {
        token
    } else {
        UNKNOWN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_BATTERY: &str = "\
+++ Battery Status: BAT0
charge_control_start_threshold = 75
charge_control_end_threshold = 80
Charge =                  62.3 [%]
Capacity =                 97 [%]
";

    const TWO_BATTERIES: &str = "\
+++ Battery Status: BAT0
charge_control_start_threshold = 75
charge_control_end_threshold = 80
Charge =                  62.3 [%]
Capacity =                 97 [%]

+++ Battery Status: BAT1
Charge =                  48.1 [%]
";

    const WITH_STATUS: &str = "\
+++ Battery Status: BAT0
/sys/class/power_supply/BAT0/status = Discharging
charge_control_start_threshold = 75
charge_control_end_threshold = 80
Charge =                  62.3 [%]
Capacity =                 97 [%]
";

    #[test]
    fn single_battery_renders_exact_template() {
        assert_eq!(
            summarize(SINGLE_BATTERY),
            "BAT0:\n\
             \x20 Start threshold: 75%\n\
             \x20 End threshold: 80%\n\
             \x20 Current Charge: 62.3% of 97%"
        );
    }

    #[test]
    fn status_line_included_when_present() {
        assert_eq!(
            summarize(WITH_STATUS),
            "BAT0:\n\
             \x20 Current Status: Discharging\n\
             \x20 Start threshold: 75%\n\
             \x20 End threshold: 80%\n\
             \x20 Current Charge: 62.3% of 97%"
        );
    }

    #[test]
    fn no_sections_is_no_data() {
        assert_eq!(summarize("TLP 1.6.1\nsome unrelated text"), "No battery data found.");
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(summarize(""), "No battery data found.");
        assert_eq!(summarize("   \n\t\n"), "No battery data found.");
    }

    #[test]
    fn upstream_error_text_is_no_data() {
        assert_eq!(
            summarize("Error: Failed to run tlp-stat"),
            "No battery data found."
        );
    }

    #[test]
    fn non_numeric_token_becomes_sentinel() {
        let raw = "\
+++ Battery Status: BAT0
charge_control_start_threshold = N/A
Charge = 62.3 [%]
";
        let reports = parse(raw);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].start_threshold, UNKNOWN);
        assert_eq!(reports[0].charge, "62.3");
    }

    #[test]
    fn missing_separator_becomes_sentinel() {
        let raw = "+++ Battery Status: BAT0\ncharge_control_end_threshold 80\n";
        assert_eq!(parse(raw)[0].end_threshold, UNKNOWN);
    }

    #[test]
    fn two_sections_in_input_order_without_leakage() {
        let reports = parse(TWO_BATTERIES);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, "BAT0");
        assert_eq!(reports[1].name, "BAT1");
        assert_eq!(reports[1].charge, "48.1");
        // BAT0's thresholds must not carry over into BAT1.
        assert_eq!(reports[1].start_threshold, UNKNOWN);
        assert_eq!(reports[1].end_threshold, UNKNOWN);
        assert_eq!(reports[1].capacity, UNKNOWN);
    }

    #[test]
    fn blocks_joined_by_blank_line() {
        let rendered = summarize(TWO_BATTERIES);
        assert!(rendered.contains("97%\n\nBAT1:"));
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(summarize(TWO_BATTERIES), summarize(TWO_BATTERIES));
        assert_eq!(parse(WITH_STATUS), parse(WITH_STATUS));
    }

    #[test]
    fn header_without_name_is_dropped() {
        let raw = "+++ Battery Status:\ncharge_control_start_threshold = 75\n";
        assert!(parse(raw).is_empty());
        assert_eq!(summarize(raw), "No battery data found.");
    }

    #[test]
    fn field_lines_outside_sections_are_ignored() {
        let raw = "\
charge_control_start_threshold = 75
+++ Battery Status: BAT0
Charge = 50 [%]
";
        let reports = parse(raw);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].start_threshold, UNKNOWN);
        assert_eq!(reports[0].charge, "50");
    }

    #[test]
    fn last_occurrence_of_a_field_wins() {
        let raw = "\
+++ Battery Status: BAT0
Charge = 50 [%]
Charge = 51 [%]
";
        assert_eq!(parse(raw)[0].charge, "51");
    }

    #[test]
    fn all_fields_default_to_sentinel() {
        let raw = "+++ Battery Status: BAT0\n";
        let report = &parse(raw)[0];
        assert_eq!(report.status, UNKNOWN);
        assert_eq!(report.start_threshold, UNKNOWN);
        assert_eq!(report.end_threshold, UNKNOWN);
        assert_eq!(report.charge, UNKNOWN);
        assert_eq!(report.capacity, UNKNOWN);
    }
}
