//! Terminal dashboard drawing the same two charts with ratatui.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::config::DEFAULT_REFRESH_INTERVAL;
use crate::data::PayloadInputs;
use crate::models::DecodeError;
use crate::visualization::chart::{hex_to_rgb, ChartSpec, MarkStyle, Theme};
use crate::visualization::dashboard::{ChartRegion, DashboardLayout, RegionOutcome, RenderPass};
use crate::visualization::svg::{format_value, short_label, RenderedChart};


/// Terminal dashboard state.
struct App {
    layout: DashboardLayout,
    pass: RenderPass,
    rendered_at: String,
    should_quit: bool,
}


impl App {
    fn new(layout: DashboardLayout, inputs: &PayloadInputs) -> Self {
        let pass = layout.render(inputs.load());
        Self {
            layout,
            pass,
            rendered_at: Local::now().format("%H:%M:%S").to_string(),
            should_quit: false,
        }
    }

    /// Run a fresh render pass; nothing is kept from the previous one.
    fn refresh(&mut self, inputs: &PayloadInputs) {
        debug!("re-rendering terminal dashboard");
        self.pass = self.layout.render(inputs.load());
        self.rendered_at = Local::now().format("%H:%M:%S").to_string();
    }
}


/// Run the interactive dashboard until `q` or `Esc`.
pub fn run_dashboard(inputs: &PayloadInputs, theme: Theme, live: bool) -> Result<()> {
    // Stdin can only be read once; refreshes reuse the captured text
    let inputs = inputs.clone().capture_stdin();
    let mut app = App::new(DashboardLayout::new(theme), &inputs);

    enable_raw_mode().context("Failed to enable raw mode")?;

    restoring(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            event_loop(&mut terminal, &mut app, &inputs, live)
        },
        || {
            disable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, LeaveAlternateScreen, Show)
        },
    )
}


/// Run `body`, then `restore` whichever way `body` exits.
fn restoring<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> io::Result<()>) -> Result<T> {
    let result = body();
    let restored = restore().context("Failed to restore terminal");
    let value = result?;
    restored?;
    Ok(value)
}


fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    inputs: &PayloadInputs,
    live: bool,
) -> Result<()> {
    let tick_rate = Duration::from_secs(DEFAULT_REFRESH_INTERVAL);
    let mut last_tick = Instant::now();

    loop {
        let status = footer_text(&app.rendered_at, live);
        terminal.draw(|f| draw(f, &app.pass, &status))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('r') => app.refresh(inputs),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            if live {
                app.refresh(inputs);
            }
            last_tick = Instant::now();
        }
    }
}


fn footer_text(rendered_at: &str, live: bool) -> String {
    if live {
        format!("Rendered {} · refreshing every {}s", rendered_at, DEFAULT_REFRESH_INTERVAL)
    } else {
        format!("Rendered {}", rendered_at)
    }
}


/// Draw one render pass into the frame.
pub fn draw(f: &mut Frame, pass: &RenderPass, status: &str) {
    let [mint, sales] = pass.layout().regions();
    let mint_height = mint.size().1;
    let sales_height = sales.size().1;
    let total = mint_height + sales_height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Ratio(mint_height, total),
            Constraint::Ratio(sales_height, total),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, pass, chunks[0]);
    draw_region(f, mint, pass.outcome(mint.kind()), chunks[1]);
    draw_region(f, sales, pass.outcome(sales.kind()), chunks[2]);
    draw_footer(f, status, chunks[3]);
}


fn draw_header(f: &mut Frame, pass: &RenderPass, area: Rect) {
    let status = if pass.failures() == 0 {
        Span::styled("● ALL CHARTS RENDERED", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(
            format!("● {} CHART(S) FAILED", pass.failures()),
            Style::default().fg(Color::Red).bold(),
        )
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("  NFT Analytics Dashboard  ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" │ "),
        status,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}


fn draw_region(f: &mut Frame, region: &ChartRegion, outcome: &RegionOutcome, area: Rect) {
    match outcome {
        RegionOutcome::Drawn(chart) => match chart.spec.mark {
            MarkStyle::Bar => draw_bar_chart(f, chart, area),
            MarkStyle::Line { .. } => draw_line_chart(f, chart, area),
        },
        RegionOutcome::Failed(err) => draw_failure(f, region.spec(), err, area),
    }
}


fn chart_block(spec: &ChartSpec, color: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", spec.title))
        .title_style(Style::default().fg(color).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}


fn mark_color(spec: &ChartSpec) -> Color {
    let (r, g, b) = hex_to_rgb(spec.color);
    Color::Rgb(r, g, b)
}


fn draw_bar_chart(f: &mut Frame, chart: &RenderedChart, area: Rect) {
    let color = mark_color(&chart.spec);

    let bars: Vec<Bar> = chart
        .marks
        .iter()
        .map(|mark| {
            Bar::default()
                .value(mark.value.max(0.0).round() as u64)
                .text_value(format_value(mark.value))
                .label(Line::from(short_label(&mark.label)))
                .style(Style::default().fg(color))
        })
        .collect();

    // Fit all bars into the region
    let inner_width = area.width.saturating_sub(2) as usize;
    let slot = inner_width / bars.len().max(1);
    let bar_width = slot.saturating_sub(1).clamp(1, 9) as u16;

    let bar_chart = BarChart::default()
        .block(chart_block(&chart.spec, color))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    f.render_widget(bar_chart, area);
}


fn draw_line_chart(f: &mut Frame, chart: &RenderedChart, area: Rect) {
    let color = mark_color(&chart.spec);

    let points: Vec<(f64, f64)> = chart
        .marks
        .iter()
        .enumerate()
        .map(|(index, mark)| (index as f64, mark.value))
        .collect();

    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let y_min = points.iter().map(|p| p.1).fold(0.0, f64::min);
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_max = if y_max - y_min <= f64::EPSILON { y_min + 1.0 } else { y_max };

    let x_labels: Vec<Span> = match (chart.marks.first(), chart.marks.last()) {
        (Some(first), Some(last)) => vec![
            Span::raw(short_label(&first.label)),
            Span::raw(short_label(&last.label)),
        ],
        _ => Vec::new(),
    };
    let y_labels = vec![
        Span::raw(format_value(y_min)),
        Span::raw(format_value(y_min / 2.0 + y_max / 2.0)),
        Span::raw(format_value(y_max)),
    ];

    let datasets = vec![Dataset::default()
        .name(chart.spec.y_label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let line_chart = Chart::new(datasets)
        .block(chart_block(&chart.spec, color))
        .x_axis(
            Axis::default()
                .title(chart.spec.x_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(chart.spec.y_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(line_chart, area);
}


fn draw_failure(f: &mut Frame, spec: &ChartSpec, err: &DecodeError, area: Rect) {
    let message = Paragraph::new(vec![
        Line::from(Span::styled("Chart could not be rendered", Style::default().fg(Color::Red).bold())),
        Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
    ])
    .wrap(Wrap { trim: true })
    .block(chart_block(spec, Color::Red));

    f.render_widget(message, area);
}


fn draw_footer(f: &mut Frame, status: &str, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Quit  "),
        Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Re-render  "),
        Span::styled(status.to_string(), Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(footer, area);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PayloadSource;
    use ratatui::backend::TestBackend;

    const MINT: &str = r#"{"labels": ["2024-01-01","2024-01-02"], "data": [3,5]}"#;
    const SALES: &str = r#"{"labels": ["2024-01-01"], "data": [10]}"#;

    fn screen_text(pass: &RenderPass) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, pass, "Rendered 12:00:00")).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draws_both_charts() {
        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, SALES);
        let text = screen_text(&pass);

        assert!(text.contains("NFT Minting Volume"));
        assert!(text.contains("NFT Sales Volume"));
        assert!(text.contains("ALL CHARTS RENDERED"));
        assert!(text.contains("Jan 01"));
    }

    #[test]
    fn test_failed_chart_shows_error_panel() {
        let bad_sales = r#"{"labels": ["a","b"], "data": [1,2,3]}"#;
        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, bad_sales);
        let text = screen_text(&pass);

        assert!(text.contains("NFT Minting Volume"));
        assert!(text.contains("Chart could not be rendered"));
        assert!(text.contains("1 CHART(S) FAILED"));
    }

    #[test]
    fn test_empty_series_draws_without_panic() {
        let empty = r#"{"labels": [], "data": []}"#;
        let pass = DashboardLayout::new(Theme::Dark).render_texts(empty, empty);
        let text = screen_text(&pass);
        assert!(text.contains("NFT Sales Volume"));
    }

    #[test]
    fn test_refresh_reuses_captured_stdin() {
        let inputs = PayloadInputs {
            mint: Some(PayloadSource::Stdin),
            sales: Some(PayloadSource::Inline(SALES.into())),
            context: None,
        }
        .capture_stdin_from(std::io::Cursor::new(MINT));

        let mut app = App::new(DashboardLayout::new(Theme::Light), &inputs);
        let before = app.pass.to_html();
        app.refresh(&inputs);
        app.refresh(&inputs);

        assert_eq!(app.pass.failures(), 0);
        assert_eq!(app.pass.to_html(), before);
    }

    #[test]
    fn test_restore_runs_when_setup_fails() {
        let restored = std::cell::Cell::new(false);
        let result: Result<()> = restoring(
            || anyhow::bail!("Failed to enter alternate screen"),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert!(restored.get());
        assert_eq!(result.unwrap_err().to_string(), "Failed to enter alternate screen");
    }

    #[test]
    fn test_restore_error_reported_after_success() {
        let result = restoring(|| Ok(1), || Err(io::Error::other("tty gone")));
        assert!(result.is_err());
    }

    #[test]
    fn test_extreme_line_values_draw() {
        let wide = r#"{"labels": ["a","b"], "data": [1e308,-1e308]}"#;
        let pass = DashboardLayout::new(Theme::Light).render_texts(MINT, wide);
        let text = screen_text(&pass);
        assert!(text.contains("NFT Sales Volume"));
        assert!(text.contains("ALL CHARTS RENDERED"));
    }

    #[test]
    fn test_footer_text() {
        assert_eq!(footer_text("09:30:00", false), "Rendered 09:30:00");
        assert!(footer_text("09:30:00", true).contains("every 5s"));
    }
}
