//! Ratatui-based terminal UI.
//!
//! The TUI is the in-repo consumer of the map view's read surface: a country
//! table sorted by case count, a date slider mapped through the fraction→date
//! index, a per-country detail panel (the tooltip content), and a
//! cases-over-time chart. It draws no cartography; everything it shows comes
//! from the same calls any other renderer would make.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{load_view, LoadOutput};
use crate::cli::LoadArgs;
use crate::error::AppError;
use crate::report::{snapshot_rows, SnapshotRow};

mod plotters_chart;

use plotters_chart::EpiPlottersChart;

/// Start the TUI.
pub fn run(args: LoadArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    out: LoadOutput,
    /// Slider position, 0..=100, the UI twin of the cursor fraction.
    slider: u16,
    selected: usize,
    rows: Vec<SnapshotRow>,
    top_n: usize,
    status: String,
}

impl App {
    fn new(args: &LoadArgs) -> Result<Self, AppError> {
        let sources = crate::app::source_config_from_args(args);
        let config = crate::app::atlas_config_from_args(args);

        let out = load_view(&sources, &config)?;

        let mut app = Self {
            out,
            slider: 100,
            selected: 0,
            rows: Vec::new(),
            top_n: config.top_n,
            status: String::new(),
        };
        // The pipeline may have positioned the cursor below the latest date.
        app.slider = app.slider_from_cursor();
        app.refresh_rows();
        app.status = format!("date: {}", app.out.view.cursor());
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.move_slider(-1),
            KeyCode::Right => self.move_slider(1),
            KeyCode::PageUp => self.move_slider(-10),
            KeyCode::PageDown => self.move_slider(10),
            KeyCode::Home => self.set_slider(0),
            KeyCode::End => self.set_slider(100),
            _ => {}
        }
        false
    }

    fn move_slider(&mut self, delta: i32) {
        let next = (self.slider as i32 + delta).clamp(0, 100) as u16;
        self.set_slider(next);
    }

    fn set_slider(&mut self, value: u16) {
        self.slider = value.min(100);
        self.out.view.set_cursor_fraction(self.slider as f64 / 100.0);
        self.refresh_rows();
        self.status = format!("date: {}", self.out.view.cursor());
    }

    /// Slider position matching the current cursor, for a cursor set by date.
    fn slider_from_cursor(&self) -> u16 {
        let dates = self.out.view.series().dates();
        let cursor = self.out.view.cursor();
        match dates.iter().position(|&d| d == cursor) {
            Some(idx) if dates.len() > 1 => {
                ((idx as f64 / (dates.len() - 1) as f64) * 100.0).round() as u16
            }
            _ => 100,
        }
    }

    fn refresh_rows(&mut self) {
        self.rows = snapshot_rows(&self.out.view, self.top_n);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_slider(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = &self.out.view;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("epimap", Style::default().fg(Color::Cyan)),
            Span::raw(" — COVID cases & food security by country"),
        ]));

        let span = match (view.series().dates().first(), view.series().dates().last()) {
            (Some(first), Some(last)) => format!("{first} … {last}"),
            _ => "-".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "dates: {span} | countries: {} | feed rows: {} ({} dropped) | aux unmatched: {}",
                view.registry().len(),
                self.out.covid_rows_read,
                self.out.covid_row_errors.len(),
                view.aux().unmatched.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_slider(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("date"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(self.slider)
            .label(format!("{} ({}%)", self.out.view.cursor(), self.slider));
        frame.render_widget(gauge, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.draw_table(frame, chunks[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_detail(frame, right[0]);
        self.draw_chart(frame, right[1]);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| {
                let (cases, deaths) = match row.counts {
                    Some(c) => (c.cases.to_string(), c.deaths.to_string()),
                    None => ("-".to_string(), "-".to_string()),
                };
                ListItem::new(format!(
                    "{:<4} {:<24} {:>8} {:>7}",
                    row.code.as_str(),
                    clip(&row.name, 24),
                    cases,
                    deaths
                ))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("countries (top {})", self.top_n))
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select((!self.rows.is_empty()).then_some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("country").borders(Borders::ALL);

        let Some(row) = self.rows.get(self.selected) else {
            frame.render_widget(
                Paragraph::new("No countries to show.").block(block),
                area,
            );
            return;
        };

        // The tooltip content: name, aux value, cases, deaths.
        let aux = row
            .aux_value
            .map(|v| format!("{v:.1} %"))
            .unwrap_or_else(|| "no data".to_string());
        let (cases, deaths) = match row.counts {
            Some(c) => (c.cases.to_string(), c.deaths.to_string()),
            None => ("no data".to_string(), "no data".to_string()),
        };

        let lines = vec![
            Line::from(Span::styled(
                format!("{} ({})", row.name, row.code),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("undernourishment: {aux}")),
            Line::from(format!("cases:  {cases}")),
            Line::from(format!("deaths: {deaths}")),
            Line::from(Span::styled(
                format!("bubble magnitude: {:.2}", row.magnitude),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("cases over time").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(row) = self.rows.get(self.selected) else {
            return;
        };

        let series = chart_series(&self.out.view, &row.code);
        let widget = EpiPlottersChart {
            cases: &series.cases,
            deaths: &series.deaths,
            cursor: &series.cursor,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "days since first report",
            y_label: "count",
            fmt_x: fmt_axis_days,
            fmt_y: fmt_axis_count,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ date ±1  PgUp/PgDn ±10  Home/End  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

struct ChartSeries {
    cases: Vec<(f64, f64)>,
    deaths: Vec<(f64, f64)>,
    cursor: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for one country: x is days since the first indexed
/// date, missing days are simply absent from the polyline.
fn chart_series(view: &crate::query::MapView, code: &crate::domain::CountryCode) -> ChartSeries {
    let dates = view.series().dates();
    let base = dates.first().copied();

    let mut cases = Vec::new();
    let mut deaths = Vec::new();
    for (date, counts) in view.series().country_series(code) {
        let Some(counts) = counts else { continue };
        let Some(base) = base else { continue };
        let x = (date - base).num_days() as f64;
        cases.push((x, counts.cases as f64));
        deaths.push((x, counts.deaths as f64));
    }

    let x_max = match (base, dates.last()) {
        (Some(first), Some(last)) => ((*last - first).num_days() as f64).max(1.0),
        _ => 1.0,
    };

    let y_max = cases
        .iter()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let y_bounds = [0.0, y_max * 1.05];

    let cursor = match base {
        Some(first) => {
            let cx = (view.cursor() - first).num_days() as f64;
            vec![(cx, 0.0), (cx, y_bounds[1])]
        }
        None => Vec::new(),
    };

    ChartSeries {
        cases,
        deaths,
        cursor,
        x_bounds: [0.0, x_max],
        y_bounds,
    }
}

fn fmt_axis_days(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_count(v: f64) -> String {
    if v >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else {
        format!("{v:.0}")
    }
}

fn clip(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        name.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}
