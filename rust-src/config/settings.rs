//! Application settings, fixed chart constants and default paths.

use std::path::PathBuf;

use anyhow::{Context, Result};


/// Refresh interval for the live terminal dashboard (seconds).
pub const DEFAULT_REFRESH_INTERVAL: u64 = 5;

/// Most x-axis tick labels drawn before labels are thinned out.
pub const MAX_X_TICK_LABELS: usize = 12;

/// Approximate number of y-axis ticks.
pub const Y_TICK_TARGET: usize = 5;

/// Mint chart region.
pub const MINT_REGION_ID: &str = "mint-chart";
pub const MINT_REGION_SIZE: (u32, u32) = (900, 420);

/// Sales chart region.
pub const SALES_REGION_ID: &str = "sales-chart";
pub const SALES_REGION_SIZE: (u32, u32) = (900, 360);

/// Mark colours.
pub const MINT_BAR_COLOR: &str = "#636EFA";
pub const SALES_LINE_COLOR: &str = "#FFA15A";
pub const SALES_LINE_WIDTH: f64 = 2.0;

/// Environment variable overriding the output directory.
pub const OUTPUT_DIR_ENV: &str = "NFTD_OUTPUT_DIR";


/// Get the directory rendered dashboards are written to by default.
pub fn get_output_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nftopia")
        .join("dashboard")
}


/// Resolve the output path for a render, creating the default directory
/// when no explicit path is given.
pub fn resolve_output_path(explicit: Option<&str>, file_name: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    let dir = get_output_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    Ok(dir.join(file_name))
}
