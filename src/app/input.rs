//! Keyboard and mouse handling, translated into board operations.

use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::board::{DragDrop, Slot};

use super::interaction::InteractionKind;
use super::messages::Message;
use super::{App, DragState, Focus};

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c'))
        {
            return self.update(Message::Quit);
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Board => self.handle_board_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if matches!(key.code, KeyCode::Char('p')) {
                return self.update(Message::RequestPlan);
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::Board,
            KeyCode::Enter => return self.update(Message::SubmitInput),
            KeyCode::Backspace => {
                if !self.plan_in_flight {
                    self.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if !self.plan_in_flight {
                    self.input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => return self.update(Message::Quit),
            KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Tab => {
                return self.update(Message::FocusInput);
            }
            KeyCode::Char('h') | KeyCode::Left => return self.update(Message::FocusColumn(0)),
            KeyCode::Char('l') | KeyCode::Right => return self.update(Message::FocusColumn(1)),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            // Shifted j/k reorder the selected card within its column.
            KeyCode::Char('K') => self.nudge_selected(-1),
            KeyCode::Char('J') => self.nudge_selected(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                // Send the selected card to the top of the other column.
                self.move_selected(self.focused_bucket().other(), 0);
            }
            KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.selected_task() {
                    return self.update(Message::DeleteTask(task.id));
                }
            }
            KeyCode::Char('s') => return self.update(Message::CycleSortMode),
            KeyCode::Char('t') => return self.update(Message::CycleTheme),
            KeyCode::Char('1') => {
                return self.update(Message::SetSortMode(crate::types::SortMode::Manual));
            }
            KeyCode::Char('2') => {
                return self.update(Message::SetSortMode(crate::types::SortMode::ByDateDesc));
            }
            KeyCode::Char('3') => {
                return self.update(Message::SetSortMode(crate::types::SortMode::Alphabetical));
            }
            KeyCode::Char('D') => return self.update(Message::PurgeTasks),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.hovered_message = None;
                let hit = self
                    .interaction_map
                    .resolve_message(mouse.column, mouse.row, InteractionKind::LeftClick);

                // Pressing on a card arms a drag; it resolves on release.
                if let Some(Message::SelectTask(column, index)) = &hit
                    && let Some(task) = self.task_at(*column, *index)
                    && let Some(bucket) = crate::types::TaskStatus::from_column_index(*column)
                {
                    self.drag = Some(DragState {
                        task_id: task.id,
                        source: Slot::new(bucket, *index),
                        position: (mouse.column, mouse.row),
                    });
                }

                if let Some(message) = hit {
                    return self.update(message);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.drag {
                    drag.position = (mouse.column, mouse.row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.drag.take() {
                    let destination = self.interaction_map.resolve_drop(mouse.column, mouse.row);
                    self.apply_drop(DragDrop {
                        task_id: drag.task_id,
                        source: drag.source,
                        destination,
                    });
                }
            }
            MouseEventKind::Moved => {
                self.hovered_message = self.interaction_map.resolve_message(
                    mouse.column,
                    mouse.row,
                    InteractionKind::Hover,
                );
            }
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            _ => {}
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        let column = self.focused_column;
        let len = self.board.view(self.focused_bucket()).len();
        if len == 0 {
            return;
        }
        let current = self.selected_per_column[column] as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected_per_column[column] = next as usize;
    }

    /// Reorder the selected card one step within its column. Only observable
    /// in manual sort; the board rejects it otherwise.
    fn nudge_selected(&mut self, delta: isize) {
        let bucket = self.focused_bucket();
        let len = self.board.view(bucket).len();
        let index = self.selected_per_column[self.focused_column] as isize;
        let dest = index + delta;
        if len == 0 || dest < 0 || dest >= len as isize {
            return;
        }
        self.move_selected(bucket, dest as usize);
    }
}
