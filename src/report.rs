use crate::key::MethodKey;
use crate::stats::StatsSummary;

/// How report lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// `key \t count \t total_ns \t mean_ns`, raw integer nanoseconds.
    #[default]
    Raw,
    /// `key : count : total : mean` with durations scaled to the largest
    /// unit whose magnitude is at least 1, and grouped counts.
    Human,
}

/// Render a snapshot as the final report text, one line per key.
///
/// Line order follows the snapshot (the store sorts by elapsed time
/// descending), so one render of one snapshot is stable.
pub fn render(snapshot: &[(MethodKey, StatsSummary)], style: Style) -> String {
    let mut out = String::new();
    out.push_str("Dumping stats:\n");
    out.push_str("=======================================\n");
    for (key, summary) in snapshot {
        match style {
            Style::Raw => out.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                key,
                summary.invocations,
                summary.elapsed_ns,
                summary.mean_ns()
            )),
            Style::Human => out.push_str(&format!(
                "{} : {} : {} : {}\n",
                key,
                group_thousands(summary.invocations),
                format_nanos(summary.elapsed_ns as f64),
                format_nanos(summary.mean_ns() as f64)
            )),
        }
    }
    out
}

/// Scale a nanosecond duration to the largest unit with magnitude >= 1.
fn format_nanos(nanos: f64) -> String {
    if nanos >= 1_000_000_000.0 {
        format!("{} sec", format_scaled(nanos / 1_000_000_000.0))
    } else if nanos >= 1_000_000.0 {
        format!("{} ms", format_scaled(nanos / 1_000_000.0))
    } else if nanos >= 1_000.0 {
        format!("{} micros", format_scaled(nanos / 1_000.0))
    } else {
        format!("{} ns", format_scaled(nanos))
    }
}

/// At most two fraction digits, trailing zeros trimmed, grouped integer part.
fn format_scaled(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let int_part = rounded.trunc() as u64;
    let frac = ((rounded - rounded.trunc()) * 100.0).round() as u64;
    let grouped = group_thousands(int_part);
    if frac == 0 {
        grouped
    } else if frac % 10 == 0 {
        format!("{}.{}", grouped, frac / 10)
    } else {
        format!("{grouped}.{frac:02}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
