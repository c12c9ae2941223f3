/// Drag-and-drop gesture state machine.
///
/// A gesture goes `Idle → Dragging → (Over target)* → Committed`. Only the
/// final transition produces a [`DragCommit`]; hovering is transient and
/// never touches the document. The commit is then resolved against the
/// board's columns with [`apply_commit`], exactly once per gesture.
use serde::{Deserialize, Serialize};

use crate::board;
use crate::types::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    Column,
    Card,
}

/// What is being dragged. `kind` is the discriminant that tells a column
/// drag apart from a card drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub id: String,
}

impl DragPayload {
    pub fn card(id: impl Into<String>) -> Self {
        Self { kind: DragKind::Card, id: id.into() }
    }

    pub fn column(id: impl Into<String>) -> Self {
        Self { kind: DragKind::Column, id: id.into() }
    }
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum DropTarget {
    Card(String),
    Column(String),
}

impl DropTarget {
    fn id(&self) -> &str {
        match self {
            DropTarget::Card(id) | DropTarget::Column(id) => id,
        }
    }
}

/// A finished gesture, ready to be applied to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragCommit {
    pub payload: DragPayload,
    pub target: DropTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragGesture {
    #[default]
    Idle,
    Dragging { payload: DragPayload },
    Over { payload: DragPayload, target: DropTarget },
}

impl DragGesture {
    pub fn new() -> Self {
        Self::Idle
    }

    /// The item being dragged, for overlay rendering.
    pub fn active(&self) -> Option<&DragPayload> {
        match self {
            DragGesture::Idle => None,
            DragGesture::Dragging { payload } | DragGesture::Over { payload, .. } => Some(payload),
        }
    }

    /// Current hover target, for highlighting.
    pub fn hovered(&self) -> Option<&DropTarget> {
        match self {
            DragGesture::Over { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn start(&mut self, payload: DragPayload) {
        if !matches!(self, DragGesture::Idle) {
            log::debug!("[clarity.drag] start while a gesture is active, restarting");
        }
        *self = DragGesture::Dragging { payload };
    }

    pub fn over(&mut self, target: DropTarget) {
        match std::mem::take(self) {
            DragGesture::Idle => {
                log::debug!("[clarity.drag] over {:?} without an active drag", target);
            }
            DragGesture::Dragging { payload } | DragGesture::Over { payload, .. } => {
                *self = DragGesture::Over { payload, target };
            }
        }
    }

    /// Pointer left every drop target.
    pub fn leave(&mut self) {
        if let DragGesture::Over { payload, .. } = std::mem::take(self) {
            *self = DragGesture::Dragging { payload };
        }
    }

    pub fn cancel(&mut self) {
        *self = DragGesture::Idle;
    }

    /// Finish the gesture. Returns a commit only when the drag ended over a
    /// target other than the dragged item itself.
    pub fn end(&mut self) -> Option<DragCommit> {
        match std::mem::take(self) {
            DragGesture::Over { payload, target } if payload.id != target.id() => {
                Some(DragCommit { payload, target })
            }
            DragGesture::Idle => {
                log::debug!("[clarity.drag] end without an active drag");
                None
            }
            _ => None,
        }
    }
}

/// Resolve a commit against the columns of a board.
///
/// `allow_column_moves` is false for boards rendered as a list, where columns
/// are sections and cannot be reordered.
pub fn apply_commit(columns: &[Column], commit: &DragCommit, allow_column_moves: bool) -> Vec<Column> {
    let DragCommit { payload, target } = commit;
    if payload.id == target.id() {
        return columns.to_vec();
    }

    match payload.kind {
        DragKind::Column => {
            if !allow_column_moves {
                return columns.to_vec();
            }
            let from = board::find_column(columns, &payload.id);
            let to = match target {
                DropTarget::Column(id) => board::find_column(columns, id),
                DropTarget::Card(id) => board::find_card_column(columns, id),
            };
            match (from, to) {
                (Some(from), Some(to)) => board::move_column(columns, from, to),
                _ => columns.to_vec(),
            }
        }
        DragKind::Card => {
            let Some(src) = board::find_card_column(columns, &payload.id) else {
                return columns.to_vec();
            };
            let (dst, dest_index) = match target {
                DropTarget::Card(id) => match board::find_card_column(columns, id) {
                    Some(dst) => (dst, columns[dst].position_of(id)),
                    None => return columns.to_vec(),
                },
                DropTarget::Column(id) => match board::find_column(columns, id) {
                    Some(dst) => (dst, None),
                    None => return columns.to_vec(),
                },
            };

            if src == dst {
                let from = columns[src].position_of(&payload.id).unwrap_or(0);
                let to = dest_index.unwrap_or(columns[src].cards.len().saturating_sub(1));
                board::move_card_in_column(columns, &columns[src].id, from, to)
            } else {
                board::move_card_to_column(columns, &payload.id, &columns[dst].id, dest_index)
            }
        }
    }
}
