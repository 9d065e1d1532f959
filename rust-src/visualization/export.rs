//! Writing rendered charts and dashboards to disk.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::visualization::chart::{hex_to_rgb, Theme};
use crate::visualization::svg::RenderedChart;


/// Export one chart as SVG.
pub fn export_chart_svg(chart: &RenderedChart, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, &chart.svg)
        .with_context(|| format!("Failed to write SVG to {}", output_path.display()))?;

    info!(path = %output_path.display(), "wrote SVG");
    Ok(())
}


/// Export one chart as PNG.
pub fn export_chart_png(chart: &RenderedChart, output_path: &Path, theme: Theme) -> Result<()> {
    // Parse SVG, with system fonts so titles and ticks are drawn
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_str(&chart.svg, &options)
        .context("Failed to parse SVG")?;

    // Render to pixmap
    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .context("Failed to create pixmap")?;

    let bg = hex_to_rgb(theme.background());
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.0, bg.1, bg.2, 255));

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap.save_png(output_path)
        .with_context(|| format!("Failed to save PNG to {}", output_path.display()))?;

    info!(path = %output_path.display(), width, height, "wrote PNG");
    Ok(())
}


/// Write the dashboard page.
pub fn export_dashboard_html(html: &str, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, html)
        .with_context(|| format!("Failed to write dashboard to {}", output_path.display()))?;

    info!(path = %output_path.display(), "wrote dashboard");
    Ok(())
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}
