//! Dashboard render pass: fixed regions first, then one chart per region.

use tracing::{debug, warn};

use crate::data::PayloadSet;
use crate::models::{DecodeError, Series, SeriesKind};
use crate::visualization::chart::{ChartSpec, Theme};
use crate::visualization::svg::{escape_xml, render_chart, RenderedChart};


const PAGE_TITLE: &str = "NFT Analytics Dashboard";


/// A fixed-size, named target area for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRegion {
    spec: ChartSpec,
}


impl ChartRegion {
    fn new(kind: SeriesKind) -> Self {
        Self { spec: ChartSpec::for_kind(kind) }
    }

    pub fn id(&self) -> &'static str {
        self.spec.region_id
    }

    pub fn kind(&self) -> SeriesKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn size(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }
}


/// What ended up in a region after a render pass.
#[derive(Debug)]
pub enum RegionOutcome {
    Drawn(RenderedChart),
    Failed(DecodeError),
}


impl RegionOutcome {
    #[allow(dead_code)]
    pub fn chart(&self) -> Option<&RenderedChart> {
        match self {
            RegionOutcome::Drawn(chart) => Some(chart),
            RegionOutcome::Failed(_) => None,
        }
    }

    #[allow(dead_code)]
    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            RegionOutcome::Drawn(_) => None,
            RegionOutcome::Failed(err) => Some(err),
        }
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self, RegionOutcome::Drawn(_))
    }
}


/// The page structure. Charts can only be drawn into regions of an
/// existing layout, so drawing never races region creation.
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    theme: Theme,
    mint: ChartRegion,
    sales: ChartRegion,
}


impl DashboardLayout {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            mint: ChartRegion::new(SeriesKind::Mint),
            sales: ChartRegion::new(SeriesKind::Sales),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[allow(dead_code)]
    pub fn region(&self, kind: SeriesKind) -> &ChartRegion {
        match kind {
            SeriesKind::Mint => &self.mint,
            SeriesKind::Sales => &self.sales,
        }
    }

    pub fn regions(&self) -> [&ChartRegion; 2] {
        [&self.mint, &self.sales]
    }

    /// Decode one payload and draw it into its region.
    pub fn draw(&self, region: &ChartRegion, payload: Result<String, DecodeError>) -> RegionOutcome {
        let series = payload.and_then(|text| Series::decode(&text));

        match series {
            Ok(series) => {
                let chart = render_chart(region.spec(), &series, self.theme);
                debug!(chart = %region.kind(), marks = chart.mark_count(), "chart drawn");
                RegionOutcome::Drawn(chart)
            }
            Err(err) => {
                warn!(chart = %region.kind(), error = %err, "chart not rendered");
                RegionOutcome::Failed(err)
            }
        }
    }

    /// Run one render pass. Each chart is decoded and drawn on its own,
    /// so a bad payload only affects its own region.
    pub fn render(&self, payloads: PayloadSet) -> RenderPass {
        let PayloadSet { mint, sales } = payloads;

        RenderPass {
            layout: self.clone(),
            mint: self.draw(&self.mint, mint),
            sales: self.draw(&self.sales, sales),
        }
    }

    /// Render pass over payload text already in memory.
    #[cfg(test)]
    pub fn render_texts(&self, mint: &str, sales: &str) -> RenderPass {
        self.render(PayloadSet {
            mint: Ok(mint.to_string()),
            sales: Ok(sales.to_string()),
        })
    }
}


/// Result of one render pass over both regions.
#[derive(Debug)]
pub struct RenderPass {
    layout: DashboardLayout,
    mint: RegionOutcome,
    sales: RegionOutcome,
}


impl RenderPass {
    pub fn outcome(&self, kind: SeriesKind) -> &RegionOutcome {
        match kind {
            SeriesKind::Mint => &self.mint,
            SeriesKind::Sales => &self.sales,
        }
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    /// Number of regions left without a chart.
    pub fn failures(&self) -> usize {
        [&self.mint, &self.sales].iter().filter(|o| !o.is_drawn()).count()
    }

    /// One status line per chart, e.g. `mint: 2 bars`.
    pub fn summary(&self) -> Vec<String> {
        self.layout
            .regions()
            .iter()
            .map(|region| {
                let kind = region.kind();
                match self.outcome(kind) {
                    RegionOutcome::Drawn(chart) => {
                        let unit = match kind {
                            SeriesKind::Mint => "bars",
                            SeriesKind::Sales => "points",
                        };
                        format!("{}: {} {}", kind, chart.mark_count(), unit)
                    }
                    RegionOutcome::Failed(err) => format!("{}: not rendered ({})", kind, err),
                }
            })
            .collect()
    }

    /// Assemble the self-contained dashboard page.
    pub fn to_html(&self) -> String {
        let theme = self.layout.theme();

        let mut parts = vec![
            "<!DOCTYPE html>".to_string(),
            r#"<html lang="en">"#.to_string(),
            "<head>".to_string(),
            r#"<meta charset="utf-8">"#.to_string(),
            format!("<title>{}</title>", PAGE_TITLE),
            "<style>".to_string(),
            format!(
                "  body {{ background: {}; color: {}; font-family: sans-serif; margin: 24px; }}",
                theme.background(),
                theme.text()
            ),
            "  .chart-region { margin-bottom: 24px; overflow: hidden; }".to_string(),
            format!(
                "  .chart-error {{ color: {c}; border: 1px solid {c}; padding: 12px; }}",
                c = theme.error()
            ),
            "</style>".to_string(),
            "</head>".to_string(),
            "<body>".to_string(),
            format!("<h1>{}</h1>", PAGE_TITLE),
        ];

        for region in self.layout.regions() {
            let (width, height) = region.size();
            parts.push(format!(
                r#"<div id="{}" class="chart-region" style="width: {}px; height: {}px;">"#,
                region.id(),
                width,
                height
            ));

            match self.outcome(region.kind()) {
                RegionOutcome::Drawn(chart) => parts.push(chart.svg.clone()),
                RegionOutcome::Failed(err) => parts.push(format!(
                    r#"<div class="chart-error" role="alert"><strong>{}</strong> could not be rendered: {}</div>"#,
                    escape_xml(region.spec().title),
                    escape_xml(&err.to_string())
                )),
            }

            parts.push("</div>".to_string());
        }

        parts.push("</body>".to_string());
        parts.push("</html>".to_string());

        parts.join("\n")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = r#"{"labels": ["2024-01-01","2024-01-02"], "data": [3,5]}"#;
    const SALES: &str = r#"{"labels": ["2024-01-01"], "data": [10]}"#;

    #[test]
    fn test_render_pass_draws_both_charts() {
        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, SALES);

        let mint = pass.outcome(SeriesKind::Mint).chart().unwrap();
        assert_eq!(mint.values(), vec![3.0, 5.0]);

        let sales = pass.outcome(SeriesKind::Sales).chart().unwrap();
        assert_eq!(sales.mark_count(), 1);
        assert_eq!(sales.marks[0].label, "2024-01-01");
        assert_eq!(pass.failures(), 0);
    }

    #[test]
    fn test_empty_mint_series_is_not_an_error() {
        let pass = DashboardLayout::new(Theme::Light).render_texts(r#"{"labels": [], "data": []}"#, SALES);
        let mint = pass.outcome(SeriesKind::Mint).chart().unwrap();
        assert_eq!(mint.mark_count(), 0);
        assert_eq!(pass.summary()[0], "mint: 0 bars");
    }

    #[test]
    fn test_length_mismatch_leaves_sales_region_empty() {
        let bad_sales = r#"{"labels": ["2024-01-01","2024-01-02"], "data": [1,2,3]}"#;
        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, bad_sales);

        assert!(pass.outcome(SeriesKind::Mint).is_drawn());
        assert!(matches!(
            pass.outcome(SeriesKind::Sales).error(),
            Some(DecodeError::LengthMismatch { labels: 2, data: 3 })
        ));

        let html = pass.to_html();
        let sales_region = html.split(r#"<div id="sales-chart""#).nth(1).unwrap();
        assert!(!sales_region.contains("<svg"));
        assert!(sales_region.contains(r#"role="alert""#));
        assert_eq!(html.matches(r#"class="bar""#).count(), 2);
    }

    #[test]
    fn test_malformed_json_does_not_block_other_chart() {
        let pass = DashboardLayout::new(Theme::Dark).render_texts("{not json", SALES);
        assert!(matches!(pass.outcome(SeriesKind::Mint).error(), Some(DecodeError::Json(_))));
        assert!(pass.outcome(SeriesKind::Sales).is_drawn());
        assert_eq!(pass.failures(), 1);
    }

    #[test]
    fn test_extreme_values_render_alongside_other_chart() {
        let huge_mint = r#"{"labels": ["2024-01-01"], "data": [1.7e308]}"#;
        let wide_sales = r#"{"labels": ["2024-01-01","2024-01-02"], "data": [1e308,-1e308]}"#;

        let pass = DashboardLayout::new(Theme::Light).render_texts(huge_mint, SALES);
        assert!(pass.outcome(SeriesKind::Mint).is_drawn());
        assert!(pass.outcome(SeriesKind::Sales).is_drawn());

        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, wide_sales);
        assert_eq!(pass.failures(), 0);
        assert_eq!(pass.outcome(SeriesKind::Mint).chart().unwrap().values(), vec![3.0, 5.0]);
        assert!(!pass.to_html().contains("NaN"));
    }

    #[test]
    fn test_unavailable_payload_is_per_region() {
        let layout = DashboardLayout::new(Theme::Light);
        let pass = layout.render(PayloadSet {
            mint: Err(DecodeError::Unavailable { reason: "no mint payload given".into() }),
            sales: Ok(SALES.to_string()),
        });
        assert!(pass.outcome(SeriesKind::Mint).error().is_some());
        assert!(pass.outcome(SeriesKind::Sales).is_drawn());
        assert!(pass.summary()[0].starts_with("mint: not rendered"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let layout = DashboardLayout::new(Theme::Light);
        let first = layout.render_texts(MINT, SALES).to_html();
        let second = layout.render_texts(MINT, SALES).to_html();
        assert_eq!(first, second);
    }

    #[test]
    fn test_html_has_fixed_regions() {
        let html = DashboardLayout::new(Theme::Light).render_texts(MINT, SALES).to_html();
        assert!(html.contains(r#"<div id="mint-chart" class="chart-region" style="width: 900px; height: 420px;">"#));
        assert!(html.contains(r#"<div id="sales-chart" class="chart-region" style="width: 900px; height: 360px;">"#));
        assert!(html.find("mint-chart").unwrap() < html.find("sales-chart").unwrap());
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = DashboardLayout::new(Theme::Light)
            .render_texts(r#"{"labels": ["<script>"], "data": [1]}"#, SALES)
            .to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_regions_have_distinct_sizes_and_ids() {
        let layout = DashboardLayout::new(Theme::Light);
        let [mint, sales] = layout.regions();
        assert_eq!(mint.id(), "mint-chart");
        assert_eq!(sales.id(), "sales-chart");
        assert_ne!(mint.size(), sales.size());
        assert_eq!(layout.region(SeriesKind::Sales).kind(), SeriesKind::Sales);
    }
}
