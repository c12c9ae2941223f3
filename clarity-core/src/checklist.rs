/// Checklist editing operations. Same contract as the board engine: borrow,
/// return a new vector, treat unknown ids as no-ops.
use serde::Serialize;

use crate::board;
use crate::types::{ChecklistItem, Priority};

/// Append an item. Blank text is ignored.
pub fn add_item(items: &[ChecklistItem], item: ChecklistItem) -> Vec<ChecklistItem> {
    let mut out = items.to_vec();
    let text = item.text.trim().to_string();
    if text.is_empty() {
        return out;
    }
    out.push(ChecklistItem { text, ..item });
    out
}

fn update_item(
    items: &[ChecklistItem],
    item_id: &str,
    update: impl Fn(&ChecklistItem) -> ChecklistItem,
) -> Vec<ChecklistItem> {
    items
        .iter()
        .map(|item| if item.id == item_id { update(item) } else { item.clone() })
        .collect()
}

pub fn toggle_item(items: &[ChecklistItem], item_id: &str) -> Vec<ChecklistItem> {
    update_item(items, item_id, |item| ChecklistItem {
        completed: !item.completed,
        ..item.clone()
    })
}

/// Replace an item's text. Blank text keeps the old value.
pub fn update_item_text(items: &[ChecklistItem], item_id: &str, text: &str) -> Vec<ChecklistItem> {
    let text = text.trim();
    if text.is_empty() {
        return items.to_vec();
    }
    update_item(items, item_id, |item| ChecklistItem {
        text: text.to_string(),
        ..item.clone()
    })
}

pub fn set_priority(items: &[ChecklistItem], item_id: &str, priority: Priority) -> Vec<ChecklistItem> {
    update_item(items, item_id, |item| ChecklistItem {
        priority,
        ..item.clone()
    })
}

pub fn cycle_priority(items: &[ChecklistItem], item_id: &str) -> Vec<ChecklistItem> {
    update_item(items, item_id, |item| ChecklistItem {
        priority: item.priority.next(),
        ..item.clone()
    })
}

pub fn delete_item(items: &[ChecklistItem], item_id: &str) -> Vec<ChecklistItem> {
    items.iter().filter(|i| i.id != item_id).cloned().collect()
}

/// Drag reorder: take the item at `from`, drop it at `to`.
pub fn move_item(items: &[ChecklistItem], from: usize, to: usize) -> Vec<ChecklistItem> {
    board::reorder(items, from, to)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    /// Rounded completion percentage; an empty list is 0%.
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self { completed, total, percent }
    }
}

pub fn progress(items: &[ChecklistItem]) -> Progress {
    Progress::new(items.iter().filter(|i| i.completed).count(), items.len())
}
