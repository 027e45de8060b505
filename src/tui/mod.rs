//! TUI module - Statistics page with ratatui

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use std::io::{Stdout, stdout};

use crate::db::{Database, WorkoutRecord};
use crate::exercises::muscle_group_color;
use crate::stats::catalog::{self, Area, MetricInfo};
use crate::stats::{
    AreaSelection, ChartDataPoint, Grouping, Period, StatisticsService, StatsSelection,
    available_exercises, available_muscles,
};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Narrowest bar that still fits a `YYYY-MM-DD` label
const MIN_BAR_WIDTH: u16 = 10;

/// App state for TUI
pub struct App {
    db: Database,
    service: StatisticsService,
    workouts: Vec<WorkoutRecord>,
    area: Area,
    metric_index: usize,
    /// Selected muscle group or exercise
    item_index: usize,
    period_index: usize,
    grouping_index: usize,
    series: Vec<ChartDataPoint>,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        let workouts = db.get_workouts()?;
        let mut app = Self {
            db,
            service: StatisticsService::new(),
            workouts,
            area: Area::General,
            metric_index: 0,
            item_index: 0,
            period_index: 0,
            grouping_index: 1,
            series: Vec::new(),
            should_quit: false,
        };
        app.recompute();
        Ok(app)
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        restore_after(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn metric(&self) -> &'static MetricInfo {
        let metrics = catalog::metrics_for_area(self.area);
        &metrics[self.metric_index % metrics.len()]
    }

    fn period(&self) -> Period {
        Period::ALL[self.period_index % Period::ALL.len()]
    }

    fn grouping(&self) -> Grouping {
        Grouping::ALL[self.grouping_index % Grouping::ALL.len()]
    }

    /// Muscle groups or exercises present in the loaded workouts
    fn items(&self) -> Vec<String> {
        match self.area {
            Area::General => Vec::new(),
            Area::Muscle => available_muscles(&self.workouts),
            Area::Exercise => available_exercises(&self.workouts),
        }
    }

    fn selected_item(&self) -> Option<String> {
        let items = self.items();
        if items.is_empty() {
            return None;
        }
        let index = self.item_index % items.len();
        items.into_iter().nth(index)
    }

    /// None while muscle or exercise area has nothing to pick
    fn selection(&self) -> Option<StatsSelection> {
        let area = match self.area {
            Area::General => AreaSelection::General,
            Area::Muscle => AreaSelection::Muscle(self.selected_item()?),
            Area::Exercise => AreaSelection::Exercise(self.selected_item()?),
        };
        Some(StatsSelection {
            area,
            metric: self.metric().metric(),
            period: self.period(),
            grouping: self.grouping(),
        })
    }

    fn recompute(&mut self) {
        self.series = match self.selection() {
            Some(selection) => self.service.series(&self.workouts, &selection),
            None => Vec::new(),
        };
    }

    fn next_area(&mut self) {
        let index = Area::ALL.iter().position(|a| *a == self.area).unwrap_or(0);
        self.area = Area::ALL[(index + 1) % Area::ALL.len()];
        let default_metric = self.area.default_metric();
        self.metric_index = catalog::metrics_for_area(self.area)
            .iter()
            .position(|m| m.metric() == default_metric)
            .unwrap_or(0);
        self.item_index = 0;
    }

    fn reload(&mut self) -> Result<()> {
        self.workouts = self.db.get_workouts()?;
        self.service = StatisticsService::new();
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new("hantel - Statistik")
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Filters
        let item = match self.area {
            Area::General => "-".to_string(),
            _ => self.selected_item().unwrap_or_else(|| "keine Daten".to_string()),
        };
        let filters = Line::from(vec![
            Span::styled(self.area.label(), Style::default().bold()),
            Span::raw(format!(" | {}", self.metric().label)),
            Span::raw(format!(" | {}", item)),
            Span::raw(format!(" | {}", catalog::period_label(self.period()))),
            Span::raw(format!(" | {}", catalog::grouping_label(self.grouping()))),
        ]);
        let filters =
            Paragraph::new(filters).block(Block::default().borders(Borders::ALL).title("Filter"));
        frame.render_widget(filters, chunks[1]);

        self.render_chart(frame, chunks[2]);

        // Footer
        let keys = "q quit | a area | m metric | i/←/→ item | p period | g grouping | r reload";
        let footer = Paragraph::new(keys)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let metric = self.metric();
        let title = format!("{} ({})", metric.label, metric.unit);
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.series.is_empty() {
            let empty = Paragraph::new("Keine Daten für diesen Zeitraum")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let color = match (&self.area, self.selected_item()) {
            (Area::Muscle, Some(group)) => {
                muscle_group_color(&group).map(rgb).unwrap_or(Color::Cyan)
            }
            _ => Color::Cyan,
        };

        // Newest buckets win when the chart is too narrow for all of them
        let fits = (area.width.saturating_sub(2) / (MIN_BAR_WIDTH + 1)).max(1) as usize;
        let shown = &self.series[self.series.len().saturating_sub(fits)..];

        let bars: Vec<Bar> = shown
            .iter()
            .map(|point| {
                Bar::default()
                    .label(Line::from(point.date.clone()))
                    .value((point.value * 100.0).round().max(0.0) as u64)
                    .text_value(format!("{:.1}", point.value))
                    .style(Style::default().fg(color))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .bar_width(MIN_BAR_WIDTH)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('a') => self.next_area(),
            KeyCode::Char('m') => self.metric_index += 1,
            KeyCode::Char('i') | KeyCode::Right => self.item_index += 1,
            KeyCode::Left => {
                let len = self.items().len().max(1);
                self.item_index = (self.item_index % len + len - 1) % len;
            }
            KeyCode::Char('p') => self.period_index += 1,
            KeyCode::Char('g') => self.grouping_index += 1,
            KeyCode::Char('r') => self.reload()?,
            _ => return Ok(()),
        }
        self.recompute();
        Ok(())
    }
}

/// Run `body`, then `restore` even if `body` failed. The body's error wins.
fn restore_after<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn rgb(color: u32) -> Color {
    Color::Rgb((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
