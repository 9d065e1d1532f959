//! Fixed presentation of the two dashboard charts.

use clap::ValueEnum;

use crate::config::{
    MINT_BAR_COLOR, MINT_REGION_ID, MINT_REGION_SIZE, SALES_LINE_COLOR, SALES_LINE_WIDTH,
    SALES_REGION_ID, SALES_REGION_SIZE,
};
use crate::models::SeriesKind;


/// How data points are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkStyle {
    Bar,
    Line { width: f64 },
}


/// Everything about a chart that does not depend on its data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: SeriesKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub mark: MarkStyle,
    pub color: &'static str,
    pub region_id: &'static str,
    pub width: u32,
    pub height: u32,
}


impl ChartSpec {
    pub fn for_kind(kind: SeriesKind) -> Self {
        match kind {
            SeriesKind::Mint => ChartSpec {
                kind,
                title: "NFT Minting Volume",
                x_label: "Date",
                y_label: "Number of Mints",
                mark: MarkStyle::Bar,
                color: MINT_BAR_COLOR,
                region_id: MINT_REGION_ID,
                width: MINT_REGION_SIZE.0,
                height: MINT_REGION_SIZE.1,
            },
            SeriesKind::Sales => ChartSpec {
                kind,
                title: "NFT Sales Volume",
                x_label: "Date",
                y_label: "Sales Count",
                mark: MarkStyle::Line { width: SALES_LINE_WIDTH },
                color: SALES_LINE_COLOR,
                region_id: SALES_REGION_ID,
                width: SALES_REGION_SIZE.0,
                height: SALES_REGION_SIZE.1,
            },
        }
    }
}


/// Page colour scheme. Mark colours are the same in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}


impl Theme {
    pub fn background(&self) -> &'static str {
        match self {
            Theme::Light => "#FFFFFF",
            Theme::Dark => "#111111",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Theme::Light => "#2a3f5f",
            Theme::Dark => "#FFFFFF",
        }
    }

    pub fn grid(&self) -> &'static str {
        match self {
            Theme::Light => "rgba(0,0,0,0.1)",
            Theme::Dark => "rgba(255,255,255,0.1)",
        }
    }

    pub fn error(&self) -> &'static str {
        match self {
            Theme::Light => "#B00020",
            Theme::Dark => "#FF6B6B",
        }
    }
}


/// Convert hex color to RGB tuple.
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 || !hex.is_ascii() {
        return (0, 0, 0);
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    (r, g, b)
}
