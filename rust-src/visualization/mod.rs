//! Visualization layer: chart drawing, the dashboard page and the terminal view.

mod chart;
mod dashboard;
mod export;
mod svg;
mod terminal;

#[allow(unused_imports)]
pub use chart::{ChartSpec, MarkStyle, Theme};
#[allow(unused_imports)]
pub use dashboard::{ChartRegion, DashboardLayout, RegionOutcome, RenderPass};
pub use export::{export_chart_png, export_chart_svg, export_dashboard_html, open_file};
#[allow(unused_imports)]
pub use svg::{render_chart, Mark, RenderedChart};
pub use terminal::run_dashboard;
