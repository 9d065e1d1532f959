//! Show command - interactive terminal dashboard.

use anyhow::Result;

use crate::data::PayloadInputs;
use crate::visualization::{run_dashboard, Theme};


/// Run the show command.
pub fn run(inputs: &PayloadInputs, theme: Theme, live: bool) -> Result<()> {
    run_dashboard(inputs, theme, live)
}
