//! Export command - write a single chart as PNG or SVG.

use anyhow::{Context, Result};

use crate::config::resolve_output_path;
use crate::data::PayloadInputs;
use crate::models::{Series, SeriesKind};
use crate::visualization::{export_chart_png, export_chart_svg, open_file, render_chart, ChartSpec, Theme};


/// Run the export command.
pub fn run(
    inputs: &PayloadInputs,
    kind: SeriesKind,
    theme: Theme,
    svg: bool,
    output: Option<String>,
    should_open: bool,
) -> Result<()> {
    // Only this chart is drawn, so a bad payload is fatal here
    let series = inputs
        .load()
        .take(kind)
        .and_then(|text| Series::decode(&text))
        .with_context(|| format!("{} payload could not be decoded", kind))?;

    let spec = ChartSpec::for_kind(kind);
    let chart = render_chart(&spec, &series, theme);

    let format_type = if svg { "svg" } else { "png" };
    let file_name = format!("nft-{}.{}", kind, format_type);
    let output_path = resolve_output_path(output.as_deref(), &file_name)?;

    println!("Exporting {} to {}...", spec.title, format_type.to_uppercase());

    if svg {
        export_chart_svg(&chart, &output_path)?;
    } else {
        export_chart_png(&chart, &output_path, theme)?;
    }

    println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());

    if should_open {
        println!("Opening {}...", format_type.to_uppercase());
        open_file(&output_path)?;
    }

    Ok(())
}
