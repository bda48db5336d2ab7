use crossterm::event::{KeyEvent, MouseEvent};
use uuid::Uuid;

use crate::types::SortMode;

/// Everything the event loop can ask the app to do. Raw terminal events are
/// wrapped so the tui-realm bridge stays a thin translation layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
    FocusInput,
    SubmitInput,
    RequestPlan,
    DeleteTask(Uuid),
    SelectTask(usize, usize),
    FocusColumn(usize),
    CycleSortMode,
    SetSortMode(SortMode),
    CycleTheme,
    PurgeTasks,
    Quit,
}
