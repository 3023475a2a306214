//! TUI module - terminal dashboard with ratatui
//!
//! Day tabs on top, the selected day's workouts in a table, shortcut keys in
//! the footer. Repeat/delete shortcuts go through the same pure mutations and
//! whole-document save as the CLI.

use anyhow::Result;
use chrono::Local;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
};
use std::io::{Stdout, stdout};

use crate::error::StoreError;
use crate::model::{RandomIdGen, Workout};
use crate::progression;
use crate::store::Store;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App {
    store: Store,
    selected_day: usize,
    selected_workout: usize,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            selected_day: 0,
            selected_workout: 0,
            status: String::new(),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Day tabs
        let titles: Vec<String> = self
            .store
            .current()
            .days
            .iter()
            .map(|d| d.name.clone())
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.selected_day)
            .highlight_style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL).title("GymBro"));
        frame.render_widget(tabs, chunks[0]);

        // Workout table for the selected day
        let workouts = self.current_workouts();
        let rows: Vec<Row> = workouts
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let style = if i == self.selected_workout {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(w.name.clone()),
                    Cell::from(format_last_log(w)),
                    Cell::from(
                        progression::for_workout(w)
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "No data yet".to_string()),
                    ),
                    Cell::from(w.logs.len().to_string()),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Length(24),
                Constraint::Min(30),
                Constraint::Length(5),
            ],
        )
        .header(
            Row::new(vec!["Workout", "Last log", "Suggestion", "Logs"])
                .style(Style::default().bold()),
        )
        .block(Block::default().borders(Borders::ALL).title("Workouts"));

        frame.render_widget(table, chunks[1]);

        // Footer
        let help = "q: quit | <-/->: day | up/down: workout | r: repeat last | d: delete last";
        let footer = Paragraph::new(if self.status.is_empty() {
            help.to_string()
        } else {
            format!("{help}  [{}]", self.status)
        })
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Left => self.switch_day(-1),
                        KeyCode::Right => self.switch_day(1),
                        KeyCode::Up => self.switch_workout(-1),
                        KeyCode::Down => self.switch_workout(1),
                        KeyCode::Char('r') => self.repeat_last()?,
                        KeyCode::Char('d') => self.delete_last()?,
                        _ => {}
                    }
                }
        Ok(())
    }

    fn current_workouts(&self) -> &[Workout] {
        self.store
            .current()
            .days
            .get(self.selected_day)
            .map(|d| d.workouts.as_slice())
            .unwrap_or(&[])
    }

    fn switch_day(&mut self, delta: isize) {
        let count = self.store.current().days.len();
        if count == 0 {
            return;
        }
        let next = self.selected_day as isize + delta;
        self.selected_day = next.rem_euclid(count as isize) as usize;
        self.selected_workout = 0;
        self.status.clear();
    }

    fn switch_workout(&mut self, delta: isize) {
        let count = self.current_workouts().len();
        if count == 0 {
            return;
        }
        let next = self.selected_workout as isize + delta;
        self.selected_workout = next.rem_euclid(count as isize) as usize;
    }

    fn selection(&self) -> Option<(String, String)> {
        let day = self.store.current().days.get(self.selected_day)?;
        let workout = day.workouts.get(self.selected_workout)?;
        Some((day.id.clone(), workout.id.clone()))
    }

    fn repeat_last(&mut self) -> Result<()> {
        let Some((day_id, workout_id)) = self.selection() else {
            return Ok(());
        };
        let today = Local::now().date_naive();
        let mut ids = RandomIdGen;
        let result = self
            .store
            .current()
            .repeat_last_log(&day_id, &workout_id, today, &mut ids);
        match result {
            Ok(doc) => {
                self.store.save(doc)?;
                self.status = "repeated last log".to_string();
            }
            Err(StoreError::Validation(msg)) => self.status = msg,
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    fn delete_last(&mut self) -> Result<()> {
        let Some((day_id, workout_id)) = self.selection() else {
            return Ok(());
        };
        if self
            .store
            .current()
            .find_workout(&day_id, &workout_id)
            .and_then(Workout::last_log)
            .is_none()
        {
            self.status = "no logs to delete".to_string();
            return Ok(());
        }
        let doc = self.store.current().delete_last_log(&day_id, &workout_id);
        self.store.save(doc)?;
        self.status = "deleted last log".to_string();
        Ok(())
    }
}

/// Compact one-line form of a workout's last log, e.g. "50kg 3x10 2024-01-01".
fn format_last_log(workout: &Workout) -> String {
    match workout.last_log() {
        Some(log) => format!("{}kg {}x{} {}", log.kg, log.sets, log.reps, log.date),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequentialIdGen;

    fn app_with_workout(dir: &std::path::Path, with_log: bool) -> App {
        let mut ids = SequentialIdGen::new();
        let mut store = Store::open(dir.join("gymbro_v1.json")).unwrap();
        let mut doc = store
            .current()
            .add_workout("day1", "Bench Press", None, &mut ids)
            .unwrap();
        if with_log {
            doc = doc
                .add_log("day1", "w1", 50.0, 3, 10, "2024-01-01".parse().unwrap(), &mut ids)
                .unwrap();
        }
        store.save(doc).unwrap();
        App::new(store)
    }

    #[test]
    fn test_delete_last_without_logs_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_workout(dir.path(), false);

        app.delete_last().unwrap();
        assert_eq!(app.status, "no logs to delete");
        assert!(
            app.store
                .current()
                .find_workout("day1", "w1")
                .unwrap()
                .logs
                .is_empty()
        );
    }

    #[test]
    fn test_delete_last_removes_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_workout(dir.path(), true);

        app.delete_last().unwrap();
        assert_eq!(app.status, "deleted last log");
        assert!(
            app.store
                .current()
                .find_workout("day1", "w1")
                .unwrap()
                .logs
                .is_empty()
        );
    }
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
