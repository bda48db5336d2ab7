//! Mouse hit-testing for the rendered frame.
//!
//! The renderer registers a node for every clickable region and every drag
//! drop target; the input layer resolves pointer coordinates against the
//! map. Within overlapping nodes the most recently registered one wins,
//! which matches paint order (cards paint over their column body).

use tuirealm::ratatui::layout::Rect;

use crate::board::Slot;

use super::messages::Message;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InteractionKind {
    Hover,
    LeftClick,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InteractionNode {
    pub rect: Rect,
    pub message: Message,
    /// Where a dragged card would land if released here.
    pub drop_slot: Option<Slot>,
    pub hoverable: bool,
    pub left_clickable: bool,
}

impl InteractionNode {
    pub fn click(rect: Rect, message: Message) -> Self {
        Self {
            rect,
            message,
            drop_slot: None,
            hoverable: true,
            left_clickable: true,
        }
    }

    pub fn card(rect: Rect, message: Message, slot: Slot) -> Self {
        Self {
            rect,
            message,
            drop_slot: Some(slot),
            hoverable: true,
            left_clickable: true,
        }
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.rect.x
            && col < self.rect.x + self.rect.width
            && row >= self.rect.y
            && row < self.rect.y + self.rect.height
    }

    fn supports(&self, kind: InteractionKind) -> bool {
        match kind {
            InteractionKind::Hover => self.hoverable,
            InteractionKind::LeftClick => self.left_clickable,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InteractionMap {
    nodes: Vec<InteractionNode>,
}

impl InteractionMap {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn register(&mut self, node: InteractionNode) {
        self.nodes.push(node);
    }

    pub fn register_click(&mut self, rect: Rect, message: Message) {
        self.register(InteractionNode::click(rect, message));
    }

    pub fn register_card(&mut self, rect: Rect, message: Message, slot: Slot) {
        self.register(InteractionNode::card(rect, message, slot));
    }

    /// A region that only accepts drops (a column body). Clicks fall
    /// through to whatever message it carries.
    pub fn register_drop_area(&mut self, rect: Rect, message: Message, slot: Slot) {
        self.register(InteractionNode {
            rect,
            message,
            drop_slot: Some(slot),
            hoverable: false,
            left_clickable: true,
        });
    }

    pub fn resolve_message(&self, col: u16, row: u16, kind: InteractionKind) -> Option<Message> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.contains(col, row) && node.supports(kind))
            .map(|node| node.message.clone())
    }

    /// The drop slot under the pointer, if any. `None` means the release
    /// happened outside every valid target and the drag is cancelled.
    pub fn resolve_drop(&self, col: u16, row: u16) -> Option<Slot> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.contains(col, row) && node.drop_slot.is_some())
            .and_then(|node| node.drop_slot)
    }
}
