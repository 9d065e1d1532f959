//! Configuration and settings for the dashboard renderer.

mod settings;

#[allow(unused_imports)]
pub use settings::{
    get_output_dir,
    resolve_output_path,
    DEFAULT_REFRESH_INTERVAL,
    MAX_X_TICK_LABELS,
    Y_TICK_TARGET,
    MINT_REGION_ID,
    MINT_REGION_SIZE,
    SALES_REGION_ID,
    SALES_REGION_SIZE,
    MINT_BAR_COLOR,
    SALES_LINE_COLOR,
    SALES_LINE_WIDTH,
    OUTPUT_DIR_ENV,
};
