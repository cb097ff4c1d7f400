//! Ratatui-based estimator form.
//!
//! Eight input fields and a submit action on the left, a premium-by-year
//! chart for the current inputs on the right. A submission runs the shared
//! quote flow and shows the result in the status line.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::quote;
use crate::domain::{Coded, FormInput, YEAR_OF_BIRTH_MAX, YEAR_OF_BIRTH_MIN};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::models::Pipeline;

mod plotters_chart;

use plotters_chart::{PremiumChart, curve_bounds};

/// Start the TUI with an already-loaded pipeline.
pub fn run(pipeline: Pipeline) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(pipeline);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
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

/// Form rows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Sex,
    YearOfBirth,
    Smoking,
    MaritalStatus,
    CoverageUnit,
    PolicyTerm,
    Product,
    IssueState,
    Submit,
}

impl Field {
    const ALL: [Field; 9] = [
        Field::Sex,
        Field::YearOfBirth,
        Field::Smoking,
        Field::MaritalStatus,
        Field::CoverageUnit,
        Field::PolicyTerm,
        Field::Product,
        Field::IssueState,
        Field::Submit,
    ];

    fn title(self) -> &'static str {
        match self {
            Field::Sex => "Sex",
            Field::YearOfBirth => "Year of Birth",
            Field::Smoking => "Smoking Class",
            Field::MaritalStatus => "Marital Status",
            Field::CoverageUnit => "Coverage Unit",
            Field::PolicyTerm => "Policy Term (years)",
            Field::Product => "Insurance Product",
            Field::IssueState => "Issue State",
            Field::Submit => "Estimate Quote",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Field::YearOfBirth | Field::CoverageUnit | Field::PolicyTerm)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Info(String),
    Success(String),
    Failure(String),
}

struct App {
    pipeline: Pipeline,
    input: FormInput,
    selected: usize,
    /// Digits typed into a numeric field, applied on Enter.
    editing: Option<String>,
    status: Status,
    curve: Vec<(f64, f64)>,
}

impl App {
    fn new(pipeline: Pipeline) -> Self {
        let mut app = Self {
            pipeline,
            input: FormInput::default(),
            selected: 0,
            editing: None,
            status: Status::Info("Provide customer details to estimate the yearly premium.".to_string()),
            curve: Vec::new(),
        };
        app.refresh_curve();
        app
    }

    fn field(&self) -> Field {
        Field::ALL[self.selected]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                self.selected = (self.selected + 1).min(Field::ALL.len() - 1);
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('s') => self.submit(),
            KeyCode::Enter => {
                if self.field() == Field::Submit {
                    self.submit();
                } else if self.field().is_numeric() {
                    self.editing = Some(String::new());
                    self.status = Status::Info(format!(
                        "Editing {}. Enter to apply, Esc to cancel.",
                        self.field().title()
                    ));
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.field().is_numeric() => {
                self.editing = Some(c.to_string());
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buf) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = Status::Info("Edit canceled.".to_string());
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && buf.len() < 9 => buf.push(c),
            KeyCode::Enter => {
                let text = self.editing.take().unwrap_or_default();
                self.apply_numeric(&text);
            }
            _ => {}
        }
    }

    /// Apply typed digits to the selected numeric field, enforcing the
    /// widget bounds.
    fn apply_numeric(&mut self, text: &str) {
        let field = self.field();
        let Ok(value) = text.parse::<u32>() else {
            self.status = Status::Failure(format!("{}: '{text}' is not a number.", field.title()));
            return;
        };

        match field {
            Field::YearOfBirth => {
                let in_range = u32::from(YEAR_OF_BIRTH_MIN)..=u32::from(YEAR_OF_BIRTH_MAX);
                match u16::try_from(value) {
                    Ok(year) if in_range.contains(&value) => self.input.year_of_birth = year,
                    _ => {
                        self.status = Status::Failure(format!(
                            "Year of Birth must be between {YEAR_OF_BIRTH_MIN} and {YEAR_OF_BIRTH_MAX}."
                        ));
                        return;
                    }
                }
            }
            Field::CoverageUnit | Field::PolicyTerm if value == 0 => {
                self.status = Status::Failure(format!("{} must be at least 1.", field.title()));
                return;
            }
            Field::CoverageUnit => self.input.coverage_unit = value,
            Field::PolicyTerm => self.input.policy_term = value,
            _ => return,
        }

        self.status = Status::Info(format!("{} set.", field.title()));
        self.refresh_curve();
    }

    fn adjust(&mut self, delta: i32) {
        let forward = delta >= 0;
        let field = self.field();
        let input = &mut self.input;
        match field {
            Field::Sex => input.sex = cycle(input.sex, forward),
            Field::Smoking => input.smoking = cycle(input.smoking, forward),
            Field::MaritalStatus => input.marital_status = cycle(input.marital_status, forward),
            Field::Product => input.product = cycle(input.product, forward),
            Field::IssueState => input.issue_state = cycle(input.issue_state, forward),
            Field::YearOfBirth => {
                input.year_of_birth = step_clamped(
                    i64::from(input.year_of_birth),
                    delta,
                    i64::from(YEAR_OF_BIRTH_MIN),
                    i64::from(YEAR_OF_BIRTH_MAX),
                ) as u16;
            }
            Field::CoverageUnit => {
                input.coverage_unit = step_clamped(i64::from(input.coverage_unit), delta, 1, i64::from(u32::MAX)) as u32;
            }
            Field::PolicyTerm => {
                input.policy_term = step_clamped(i64::from(input.policy_term), delta, 1, i64::from(u32::MAX)) as u32;
            }
            Field::Submit => return,
        }
        self.refresh_curve();
    }

    fn submit(&mut self) {
        self.status = match quote::submit(&self.pipeline, &self.input) {
            Ok(q) => Status::Success(q.message),
            Err(err) => Status::Failure(format!("Prediction failed: {err}")),
        };
    }

    fn refresh_curve(&mut self) {
        self.curve = quote::premium_by_birth_year(&self.pipeline, &self.input);
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(52), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_form(frame, body[0]);
        self.draw_chart(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Insurance Policy Price Estimator",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("model: {} | transform: {}", self.pipeline.name(), self.pipeline.transform().id()),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| {
                if field == Field::Submit {
                    return ListItem::new(Line::from(Span::styled(
                        format!("[ {} ]", field.title()),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    )));
                }
                let value = match (&self.editing, field == self.field()) {
                    (Some(buf), true) => format!("{buf}_"),
                    _ => self.value_text(field),
                };
                ListItem::new(format!("{:<20} {value}", field.title()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Customer details").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn value_text(&self, field: Field) -> String {
        let input = &self.input;
        match field {
            Field::Sex => format!("‹ {} ›", input.sex.label()),
            Field::YearOfBirth => input.year_of_birth.to_string(),
            Field::Smoking => format!("‹ {} ›", input.smoking.label()),
            Field::MaritalStatus => format!("‹ {} ›", input.marital_status.label()),
            Field::CoverageUnit => input.coverage_unit.to_string(),
            Field::PolicyTerm => input.policy_term.to_string(),
            Field::Product => format!("‹ {} ›", input.product.label()),
            Field::IssueState => format!("‹ {} ›", input.issue_state.label()),
            Field::Submit => String::new(),
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Premium by year of birth").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.curve.is_empty() {
            let msg = Paragraph::new("The model cannot price the current inputs.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (x_bounds, y_bounds) = curve_bounds(&self.curve);
        let year = f64::from(self.input.year_of_birth);
        let marker = self.curve.iter().copied().find(|&(x, _)| x == year);

        let widget = PremiumChart {
            curve: &self.curve,
            marker,
            x_bounds,
            y_bounds,
            x_label: "year of birth",
            y_label: "premium",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_premium,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  Enter edit/submit  s submit  q quit";
        let status = match &self.status {
            Status::Info(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
            Status::Success(msg) => Span::styled(
                msg.as_str(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Status::Failure(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            status,
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn cycle<T: Coded>(value: T, forward: bool) -> T {
    if forward { value.next() } else { value.prev() }
}

fn step_clamped(value: i64, delta: i32, min: i64, max: i64) -> i64 {
    (value + i64::from(delta)).clamp(min, max)
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_premium(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{IssueState, RECORD_COLUMNS, Sex};
    use crate::features::FeatureTransform;
    use crate::models::PipelineArtifact;
    use crate::models::artifact::{CategoricalStep, NumericStep};

    fn pipeline() -> Pipeline {
        Pipeline::from_artifact(PipelineArtifact {
            format_version: 1,
            name: "tui-test".to_string(),
            feature_transform: FeatureTransform::ExtractYearOfBirthV1.id(),
            input_columns: RECORD_COLUMNS.iter().map(|c| c.to_string()).collect(),
            intercept: 500.0,
            numeric: vec![NumericStep {
                column: "year_of_birth".to_string(),
                mean: 1980.0,
                scale: 10.0,
                weight: -10.0,
                impute: None,
            }],
            categorical: vec![CategoricalStep {
                column: "sex".to_string(),
                levels: BTreeMap::from([("M".to_string(), 20.0)]),
            }],
            min_prediction: None,
        })
        .unwrap()
    }

    fn select(app: &mut App, field: Field) {
        app.selected = Field::ALL.iter().position(|f| *f == field).unwrap();
    }

    #[test]
    fn starts_on_defaults_with_curve() {
        let app = App::new(pipeline());
        assert_eq!(app.input, FormInput::default());
        assert_eq!(app.curve.len(), 56);
    }

    #[test]
    fn submit_shows_formatted_estimate() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::Submit);
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.status, Status::Success("Estimated Yearly Policy Price: 520.00".to_string()));
    }

    #[test]
    fn prediction_failure_is_shown_and_form_stays_usable() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::Sex);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.input.sex, Sex::Female);
        assert!(app.curve.is_empty());

        app.handle_key(KeyCode::Char('s'));
        assert!(matches!(&app.status, Status::Failure(msg) if msg.contains("unknown category 'F'")));

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Char('s'));
        assert!(matches!(app.status, Status::Success(_)));
    }

    #[test]
    fn year_adjustment_is_clamped_to_widget_bounds() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::YearOfBirth);
        app.input.year_of_birth = YEAR_OF_BIRTH_MAX;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.input.year_of_birth, YEAR_OF_BIRTH_MAX);
        app.input.year_of_birth = YEAR_OF_BIRTH_MIN;
        app.handle_key(KeyCode::Left);
        assert_eq!(app.input.year_of_birth, YEAR_OF_BIRTH_MIN);
    }

    #[test]
    fn typed_year_outside_bounds_is_rejected() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::YearOfBirth);
        for key in [KeyCode::Char('1'), KeyCode::Char('9'), KeyCode::Char('5'), KeyCode::Char('9'), KeyCode::Enter] {
            app.handle_key(key);
        }
        assert_eq!(app.input.year_of_birth, 1980);
        assert!(matches!(app.status, Status::Failure(_)));

        for key in [KeyCode::Enter, KeyCode::Char('2'), KeyCode::Char('0'), KeyCode::Char('1'), KeyCode::Char('5'), KeyCode::Enter] {
            app.handle_key(key);
        }
        assert_eq!(app.input.year_of_birth, 2015);
    }

    #[test]
    fn coverage_unit_must_be_positive() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::CoverageUnit);
        app.handle_key(KeyCode::Char('0'));
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input.coverage_unit, 96);

        app.input.coverage_unit = 1;
        app.handle_key(KeyCode::Left);
        assert_eq!(app.input.coverage_unit, 1);
    }

    #[test]
    fn issue_state_cycles_through_all_codes() {
        let mut app = App::new(pipeline());
        select(&mut app, Field::IssueState);
        for _ in 0..IssueState::ALL.len() {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.input.issue_state, IssueState::default());
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new(pipeline());
        assert!(app.handle_key(KeyCode::Char('q')));

        // Esc while editing cancels the edit instead of quitting.
        select(&mut app, Field::PolicyTerm);
        app.handle_key(KeyCode::Enter);
        assert!(!app.handle_key(KeyCode::Esc));
        assert!(app.editing.is_none());
        assert!(app.handle_key(KeyCode::Esc));
    }
}
