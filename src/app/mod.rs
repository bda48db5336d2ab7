//! UI-facing application state: wires the board to persistence, the AI
//! planner, celebrations, and the terminal event stream.

pub mod input;
pub mod interaction;
pub mod messages;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::warn;
use uuid::Uuid;

pub use self::interaction::{InteractionKind, InteractionMap};
pub use self::messages::Message;

use crate::board::{Board, DragDrop, Slot};
use crate::celebrate::{self, CelebrationBackend};
use crate::planner::Planner;
use crate::settings::Settings;
use crate::store::TaskStore;
use crate::theme::{Theme, ThemePreset};
use crate::types::{SortMode, Task, TaskStatus};

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Focus {
    Input,
    Board,
}

/// An in-progress mouse drag of one task card.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DragState {
    pub task_id: Uuid,
    pub source: Slot,
    pub position: (u16, u16),
}

pub struct App {
    pub should_quit: bool,
    pub board: Board,
    pub settings: Settings,
    pub theme: Theme,
    pub theme_preset: ThemePreset,
    pub focus: Focus,
    pub input: String,
    pub focused_column: usize,
    pub selected_per_column: [usize; 2],
    pub drag: Option<DragState>,
    pub hovered_message: Option<Message>,
    pub interaction_map: InteractionMap,
    pub footer_notice: Option<String>,
    notice_expires_at: Option<Instant>,
    pub plan_in_flight: bool,
    plan_rx: Option<Receiver<Vec<String>>>,
    planner: Planner,
    celebration: CelebrationBackend,
    pub pulse_phase: u8,
    pub clock: DateTime<Local>,
}

impl App {
    pub fn new(
        store_override: Option<PathBuf>,
        cli_theme_override: Option<ThemePreset>,
    ) -> Result<Self> {
        let store = match store_override {
            Some(path) => TaskStore::at(path),
            None => TaskStore::open_default()?,
        };
        let settings = Settings::load();
        Ok(Self::with_parts(store, settings, cli_theme_override))
    }

    pub fn with_parts(
        store: TaskStore,
        settings: Settings,
        cli_theme_override: Option<ThemePreset>,
    ) -> Self {
        let env_theme = std::env::var("CYBER_TASKER_THEME")
            .ok()
            .and_then(|value| ThemePreset::from_str(&value).ok());
        let settings_theme = ThemePreset::from_str(&settings.theme).ok();
        let effective_theme = cli_theme_override
            .or(env_theme)
            .or(settings_theme)
            .unwrap_or_default();

        let mut board = Board::from_tasks(store.load());
        let observer_store = store.clone();
        board.set_change_listener(move |tasks| {
            if let Err(error) = observer_store.save(tasks) {
                warn!("failed to persist task snapshot: {error:#}");
            }
        });

        let planner = Planner::new(
            settings.planner_model.clone(),
            Duration::from_millis(settings.plan_timeout_ms),
        );
        let celebration = settings.celebration_backend();

        Self {
            should_quit: false,
            board,
            settings,
            theme: Theme::from_preset(effective_theme),
            theme_preset: effective_theme,
            focus: Focus::Input,
            input: String::new(),
            focused_column: 0,
            selected_per_column: [0, 0],
            drag: None,
            hovered_message: None,
            interaction_map: InteractionMap::default(),
            footer_notice: None,
            notice_expires_at: None,
            plan_in_flight: false,
            plan_rx: None,
            planner,
            celebration,
            pulse_phase: 0,
            clock: Local::now(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key)?,
            Message::Mouse(mouse) => self.handle_mouse(mouse)?,
            Message::Tick => {
                self.pulse_phase = (self.pulse_phase + 1) % 4;
                self.clock = Local::now();
                self.expire_notice();
                self.drain_plan_result();
                self.clamp_selection();
            }
            Message::Resize(_, _) => {
                self.interaction_map.clear();
                self.drag = None;
                self.hovered_message = None;
            }
            Message::FocusInput => {
                self.focus = Focus::Input;
            }
            Message::SubmitInput => self.submit_input(),
            Message::RequestPlan => self.request_plan(),
            Message::DeleteTask(id) => {
                if self.board.delete(id) {
                    self.clamp_selection();
                }
            }
            Message::SelectTask(column, index) => {
                self.focus = Focus::Board;
                self.focused_column = column.min(1);
                self.selected_per_column[self.focused_column] = index;
                self.clamp_selection();
            }
            Message::FocusColumn(column) => {
                self.focus = Focus::Board;
                self.focused_column = column.min(1);
            }
            Message::CycleSortMode => {
                let mode = self.board.sort_mode().cycle();
                self.update(Message::SetSortMode(mode))?;
            }
            Message::SetSortMode(mode) => {
                self.board.set_sort_mode(mode);
                self.set_notice(format!("Sort: {}", mode.label()));
                self.clamp_selection();
            }
            Message::CycleTheme => {
                let preset = self.theme_preset.next();
                self.theme_preset = preset;
                self.theme = Theme::from_preset(preset);
                self.settings.theme = preset.as_str().to_string();
                if let Err(error) = self.settings.save() {
                    warn!("failed to persist settings: {error:#}");
                }
                self.set_notice(format!(
                    "Theme: {} ({})",
                    preset.as_str(),
                    preset.description()
                ));
            }
            Message::PurgeTasks => {
                let removed = self.board.clear();
                self.selected_per_column = [0, 0];
                self.set_notice(format!("Memory purged ({removed} tasks)"));
            }
            Message::Quit => {
                self.should_quit = true;
            }
        }
        Ok(())
    }

    pub fn focused_bucket(&self) -> TaskStatus {
        if self.focused_column == 0 {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        }
    }

    pub fn selected_index(&self, column: usize) -> usize {
        self.selected_per_column[column.min(1)]
    }

    pub fn task_at(&self, column: usize, index: usize) -> Option<Task> {
        let bucket = TaskStatus::from_column_index(column)?;
        self.board.view(bucket).get(index).map(|t| (*t).clone())
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.task_at(self.focused_column, self.selected_per_column[self.focused_column])
    }

    fn submit_input(&mut self) {
        if self.plan_in_flight {
            self.set_notice("Hold on, a plan request is still running");
            return;
        }
        if self.board.create(&self.input).is_some() {
            self.input.clear();
        }
    }

    fn request_plan(&mut self) {
        if self.plan_in_flight {
            self.set_notice("A plan request is already running");
            return;
        }
        let goal = self.input.trim().to_string();
        if goal.is_empty() {
            return;
        }

        let planner = self.planner.clone();
        let (tx, rx) = channel();
        self.plan_rx = Some(rx);
        self.plan_in_flight = true;
        self.set_notice("Decomposing goal...");

        tokio::task::spawn_blocking(move || {
            let _ = tx.send(planner.generate_plan(&goal));
        });
    }

    fn drain_plan_result(&mut self) {
        let Some(rx) = &self.plan_rx else {
            return;
        };

        match rx.try_recv() {
            Ok(plan) => {
                self.plan_in_flight = false;
                self.plan_rx = None;
                let added = self.board.bulk_create(&plan);
                if added > 0 {
                    self.input.clear();
                    self.set_notice(format!("AI plan merged: {added} task(s)"));
                } else {
                    self.set_notice("AI plan came back empty");
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!("plan worker vanished without a result");
                self.plan_in_flight = false;
                self.plan_rx = None;
                self.set_notice("AI plan failed; try again");
            }
        }
    }

    /// Route a finished drag (mouse or keyboard) through the board, fire the
    /// celebration on a completion transition, and follow the task with the
    /// selection.
    pub(crate) fn apply_drop(&mut self, drop: DragDrop) {
        let outcome = self.board.reorder_or_reclassify(drop);

        if outcome.completed
            && let Some(task) = self.board.find(drop.task_id)
        {
            celebrate::celebrate_completion(task, self.celebration);
        }

        if outcome.moved {
            if let Some(dest) = drop.destination {
                let column = dest.bucket.column_index();
                self.focused_column = column;
                let len = self.board.view(dest.bucket).len();
                self.selected_per_column[column] = dest.index.min(len.saturating_sub(1));
            }
        } else if self.board.sort_mode() != SortMode::Manual
            && drop
                .destination
                .is_some_and(|dest| dest.bucket == drop.source.bucket && dest != drop.source)
        {
            self.set_notice("Reordering is off while an automatic sort is active");
        }
    }

    pub(crate) fn move_selected(&mut self, dest_bucket: TaskStatus, dest_index: usize) {
        let source_bucket = self.focused_bucket();
        let source_index = self.selected_per_column[self.focused_column];
        let Some(task) = self.task_at(self.focused_column, source_index) else {
            return;
        };

        self.apply_drop(DragDrop {
            task_id: task.id,
            source: Slot::new(source_bucket, source_index),
            destination: Some(Slot::new(dest_bucket, dest_index)),
        });
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.footer_notice = Some(notice.into());
        self.notice_expires_at = Some(Instant::now() + NOTICE_TTL);
    }

    fn expire_notice(&mut self) {
        if let Some(expires_at) = self.notice_expires_at
            && Instant::now() >= expires_at
        {
            self.footer_notice = None;
            self.notice_expires_at = None;
        }
    }

    fn clamp_selection(&mut self) {
        for status in TaskStatus::ALL {
            let column = status.column_index();
            let len = self.board.view(status).len();
            self.selected_per_column[column] =
                self.selected_per_column[column].min(len.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;
    use tempfile::TempDir;

    fn test_app(temp: &TempDir) -> App {
        let store = TaskStore::at(temp.path().join("tasks.json"));
        let settings = Settings {
            celebration: "none".to_string(),
            ..Settings::default()
        };
        App::with_parts(store, settings, Some(ThemePreset::Mono))
    }

    #[test]
    fn submit_input_creates_a_task_and_clears_the_buffer() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.input = "Buy milk".to_string();

        app.update(Message::SubmitInput).expect("update should succeed");

        assert_eq!(app.board.len(), 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn submit_blank_input_is_a_noop() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.input = "   ".to_string();

        app.update(Message::SubmitInput).expect("update should succeed");

        assert!(app.board.is_empty());
        assert_eq!(app.input, "   ");
    }

    #[test]
    fn submit_is_blocked_while_a_plan_is_pending() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.plan_in_flight = true;
        app.input = "Buy milk".to_string();

        app.update(Message::SubmitInput).expect("update should succeed");

        assert!(app.board.is_empty());
        assert!(app.footer_notice.is_some());
    }

    #[test]
    fn request_plan_is_guarded_by_the_busy_flag() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.plan_in_flight = true;
        app.input = "ship the release".to_string();

        // Must not spawn a second request; just posts a notice.
        app.update(Message::RequestPlan).expect("update should succeed");
        assert!(app.plan_rx.is_none());
    }

    #[test]
    fn plan_results_merge_on_tick() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.input = "ship it".to_string();

        let (tx, rx) = channel();
        tx.send(vec!["Step 1".to_string(), "Step 2".to_string()])
            .expect("send should succeed");
        app.plan_rx = Some(rx);
        app.plan_in_flight = true;

        app.update(Message::Tick).expect("update should succeed");

        assert!(!app.plan_in_flight);
        assert!(app.input.is_empty());
        let pending: Vec<String> = app
            .board
            .view(TaskStatus::Pending)
            .iter()
            .map(|t| t.content.clone())
            .collect();
        assert_eq!(pending, vec!["Step 1", "Step 2"]);
    }

    #[test]
    fn empty_plan_result_leaves_the_board_untouched() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);

        let (tx, rx) = channel();
        tx.send(Vec::new()).expect("send should succeed");
        app.plan_rx = Some(rx);
        app.plan_in_flight = true;

        app.update(Message::Tick).expect("update should succeed");

        assert!(!app.plan_in_flight);
        assert!(app.board.is_empty());
        assert_eq!(app.footer_notice.as_deref(), Some("AI plan came back empty"));
    }

    #[test]
    fn mutations_reach_the_snapshot_store() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store_path = temp.path().join("tasks.json");
        {
            let mut app = test_app(&temp);
            app.input = "Persist me".to_string();
            app.update(Message::SubmitInput).expect("update should succeed");
        }

        let reloaded = TaskStore::at(store_path).load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].content, "Persist me");
    }

    #[test]
    fn keyboard_move_completes_and_follows_the_task() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.board.create("Buy milk");
        app.focused_column = 0;
        app.selected_per_column[0] = 0;

        app.move_selected(TaskStatus::Completed, 0);

        assert_eq!(app.board.count(TaskStatus::Completed), 1);
        assert_eq!(app.focused_column, 1);
        assert_eq!(app.selected_per_column[1], 0);
    }

    #[test]
    fn purge_empties_the_board() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.board.create("a");
        app.board.create("b");

        app.update(Message::PurgeTasks).expect("update should succeed");

        assert!(app.board.is_empty());
        assert_eq!(app.selected_per_column, [0, 0]);
    }

    #[test]
    fn sort_mode_cycles_and_posts_a_notice() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);

        app.update(Message::CycleSortMode).expect("update should succeed");

        assert_eq!(app.board.sort_mode(), SortMode::ByDateDesc);
        assert_eq!(app.footer_notice.as_deref(), Some("Sort: Newest first"));
    }

    #[test]
    fn selection_clamps_after_deletion() {
        let temp = TempDir::new().expect("temp dir should be created");
        let mut app = test_app(&temp);
        app.board.create("a");
        let id = app.board.create("b").expect("create should succeed");
        app.selected_per_column[0] = 1;

        app.update(Message::DeleteTask(id)).expect("update should succeed");

        assert_eq!(app.selected_per_column[0], 0);
    }
}
