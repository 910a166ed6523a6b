use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for a row in an [`EntryArena`]. Handles increase monotonically per arena and are
/// never handed out twice, even after the row they named is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two auxiliary lists a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Function,
    Constant,
}

/// A user-defined function row such as `f(x) = 2x`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub text: String,
}

/// A constant row. Name and value are kept together so they can never drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEntry {
    pub name: String,
    pub value: String,
}

/// Ordered rows addressed by [`EntryId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryArena<T> {
    rows: Vec<(EntryId, T)>,
    next_id: u64,
}

impl<T> Default for EntryArena<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> EntryArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns its fresh handle.
    pub fn push(&mut self, value: T) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.rows.push((id, value));
        id
    }

    /// Removes the row with `id`, keeping the relative order of the rest.
    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let index = self.rows.iter().position(|(row_id, _)| *row_id == id)?;
        Some(self.rows.remove(index).1)
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.rows
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> {
        self.rows.iter().map(|(id, value)| (*id, value))
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Default> EntryArena<T> {
    /// Appends an empty row, the way the "+" button does.
    pub fn push_default(&mut self) -> EntryId {
        self.push(T::default())
    }
}
