use anyhow::Result;

use crate::config::OutputFormat;
use crate::operators::ranking::RankedRegion;

/// Format a ratio the way a JavaScript runtime prints a number.
pub fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // also covers -0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    // Exponent form: Rust writes `1e21` / `1.5e-7`, JS wants `1e+21` / `1.5e-7`.
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// `"<rank>位<region>:<base>=><target> 変化率:<ratio>"`, rank starting at 1.
pub fn render_entry(position: usize, entry: &RankedRegion) -> String {
    format!(
        "{}位{}:{}=>{} 変化率:{}",
        position,
        entry.region,
        entry.aggregate.base_population,
        entry.aggregate.target_population,
        format_ratio(entry.change_ratio())
    )
}

pub fn render_ranking(ranking: &[RankedRegion]) -> Vec<String> {
    ranking
        .iter()
        .enumerate()
        .map(|(i, entry)| render_entry(i + 1, entry))
        .collect()
}

/// Combine the rendered entries into the single value printed at the end.
pub fn emit(lines: &[String], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string(lines)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(lines)?,
        OutputFormat::Lines => lines.join("\n"),
    };
    Ok(out)
}
