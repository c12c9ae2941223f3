/// Board mutation engine.
///
/// Every operation borrows the current columns and returns a new value;
/// nothing here mutates shared state, so a failed lookup can only ever
/// produce an unchanged copy. Unknown ids are no-ops, never errors.
use crate::types::{Card, Column};

/// Remove the element at `from` and reinsert it at `to`, clamping `to` to the
/// shortened vector. Out-of-range `from` leaves the vector untouched.
pub(crate) fn reorder<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if from >= out.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    let to = to.min(out.len());
    out.insert(to, item);
    out
}

/// Move a card inside one column. Length is preserved and the result is a
/// permutation of the input.
pub fn move_card_within_column(column: &Column, from: usize, to: usize) -> Column {
    Column {
        cards: reorder(&column.cards, from, to),
        ..column.clone()
    }
}

/// Move the card `card_id` from `source` into `dest` at `dest_index`
/// (appended when absent or past the end).
///
/// Returns `(source, dest)`. When the card is not in `source` both columns
/// come back unchanged. Passing the same column twice degrades to a move
/// within that column.
pub fn move_card_across_columns(
    source: &Column,
    dest: &Column,
    card_id: &str,
    dest_index: Option<usize>,
) -> (Column, Column) {
    let Some(from) = source.position_of(card_id) else {
        log::debug!("[clarity.board] card {} not in column {}, ignoring move", card_id, source.id);
        return (source.clone(), dest.clone());
    };

    if source.id == dest.id {
        let to = dest_index.unwrap_or(source.cards.len().saturating_sub(1));
        let moved = move_card_within_column(source, from, to);
        return (moved.clone(), moved);
    }

    let mut new_source = source.clone();
    let card = new_source.cards.remove(from);

    let mut new_dest = dest.clone();
    let at = dest_index
        .filter(|i| *i <= new_dest.cards.len())
        .unwrap_or(new_dest.cards.len());
    new_dest.cards.insert(at, card);

    (new_source, new_dest)
}

/// Reorder the columns themselves.
pub fn move_column(columns: &[Column], from: usize, to: usize) -> Vec<Column> {
    reorder(columns, from, to)
}

/// Index of the column holding `card_id`.
pub fn find_card_column(columns: &[Column], card_id: &str) -> Option<usize> {
    columns.iter().position(|col| col.position_of(card_id).is_some())
}

pub fn find_column(columns: &[Column], column_id: &str) -> Option<usize> {
    columns.iter().position(|col| col.id == column_id)
}

/// Move a card between columns addressed by id. This is the board-level
/// entry point used by the store; it locates the source column itself.
pub fn move_card_to_column(
    columns: &[Column],
    card_id: &str,
    dest_column_id: &str,
    dest_index: Option<usize>,
) -> Vec<Column> {
    let (Some(src), Some(dst)) = (
        find_card_column(columns, card_id),
        find_column(columns, dest_column_id),
    ) else {
        return columns.to_vec();
    };

    let (new_source, new_dest) =
        move_card_across_columns(&columns[src], &columns[dst], card_id, dest_index);

    let mut out = columns.to_vec();
    out[src] = new_source;
    out[dst] = new_dest;
    out
}

/// Move a card inside the column `column_id`.
pub fn move_card_in_column(columns: &[Column], column_id: &str, from: usize, to: usize) -> Vec<Column> {
    columns
        .iter()
        .map(|col| {
            if col.id == column_id {
                move_card_within_column(col, from, to)
            } else {
                col.clone()
            }
        })
        .collect()
}

/// Append `card` to the column `column_id`.
pub fn add_card(columns: &[Column], column_id: &str, card: Card) -> Vec<Column> {
    columns
        .iter()
        .map(|col| {
            if col.id == column_id {
                let mut col = col.clone();
                col.cards.push(card.clone());
                col
            } else {
                col.clone()
            }
        })
        .collect()
}

pub fn delete_card(columns: &[Column], card_id: &str) -> Vec<Column> {
    columns
        .iter()
        .map(|col| Column {
            cards: col.cards.iter().filter(|c| c.id != card_id).cloned().collect(),
            ..col.clone()
        })
        .collect()
}

/// Replace a card's title and description and stamp its `lastModified`
/// with `now_ms`. A blank title is rejected as a no-op.
pub fn update_card(
    columns: &[Column],
    card_id: &str,
    title: &str,
    description: &str,
    now_ms: i64,
) -> Vec<Column> {
    let title = title.trim();
    if title.is_empty() {
        return columns.to_vec();
    }
    columns
        .iter()
        .map(|col| Column {
            cards: col
                .cards
                .iter()
                .map(|c| {
                    if c.id == card_id {
                        Card {
                            id: c.id.clone(),
                            title: title.to_string(),
                            description: description.trim().to_string(),
                            last_modified: now_ms,
                        }
                    } else {
                        c.clone()
                    }
                })
                .collect(),
            ..col.clone()
        })
        .collect()
}

/// Replace only a card's description (the AI "enhance" flow).
pub fn set_card_description(
    columns: &[Column],
    card_id: &str,
    description: &str,
    now_ms: i64,
) -> Vec<Column> {
    let Some(col_idx) = find_card_column(columns, card_id) else {
        return columns.to_vec();
    };
    let Some(card) = columns[col_idx].cards.iter().find(|c| c.id == card_id) else {
        return columns.to_vec();
    };
    let title = card.title.clone();
    update_card(columns, card_id, &title, description, now_ms)
}

/// Title used for a column added without an explicit one.
pub fn default_column_title(existing: usize) -> String {
    format!("New Column {}", existing + 1)
}

pub fn add_column(columns: &[Column], column: Column) -> Vec<Column> {
    let mut out = columns.to_vec();
    out.push(column);
    out
}

/// Rename a column. Blank titles are ignored.
pub fn update_column_title(columns: &[Column], column_id: &str, title: &str) -> Vec<Column> {
    let title = title.trim();
    if title.is_empty() {
        return columns.to_vec();
    }
    columns
        .iter()
        .map(|col| {
            if col.id == column_id {
                Column {
                    title: title.to_string(),
                    ..col.clone()
                }
            } else {
                col.clone()
            }
        })
        .collect()
}

/// Remove a column together with its cards.
pub fn delete_column(columns: &[Column], column_id: &str) -> Vec<Column> {
    columns.iter().filter(|c| c.id != column_id).cloned().collect()
}

pub fn card_count(columns: &[Column]) -> usize {
    columns.iter().map(|c| c.cards.len()).sum()
}
