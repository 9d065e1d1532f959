//! Render command - write the HTML dashboard.

use anyhow::Result;

use crate::config::resolve_output_path;
use crate::data::PayloadInputs;
use crate::visualization::{export_dashboard_html, open_file, DashboardLayout, Theme};


const DEFAULT_FILE_NAME: &str = "dashboard.html";


/// Run the render command.
///
/// A chart that cannot be rendered is reported but does not fail the
/// command: the page is still written with the other chart in place.
pub fn run(inputs: &PayloadInputs, theme: Theme, output: Option<String>, should_open: bool) -> Result<()> {
    let layout = DashboardLayout::new(theme);
    let pass = layout.render(inputs.load());

    let output_path = resolve_output_path(output.as_deref(), DEFAULT_FILE_NAME)?;
    export_dashboard_html(&pass.to_html(), &output_path)?;

    for line in pass.summary() {
        println!("  {}", line);
    }

    let failures = pass.failures();
    if failures > 0 {
        println!("\x1b[33m! {} chart(s) could not be rendered\x1b[0m", failures);
    }

    println!("\x1b[32m+ Dashboard written to: {}\x1b[0m", output_path.display());

    if should_open {
        println!("Opening dashboard...");
        open_file(&output_path)?;
    }

    Ok(())
}
