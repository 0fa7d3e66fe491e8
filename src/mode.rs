use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counts kept in first-seen order.
///
/// `slots` maps each distinct value to its position in `arena`, so scanning
/// the arena front to back visits values in the order they first appeared.
/// Ties in [`FrequencyTable::mode`] therefore resolve to the earliest value
/// without depending on hash iteration order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<T> {
    slots: HashMap<T, usize>,
    arena: Vec<(T, usize)>,
}

impl<T: Eq + Hash + Clone> FrequencyTable<T> {
    pub fn new() -> Self {
        FrequencyTable {
            slots: HashMap::new(),
            arena: Vec::new(),
        }
    }

    pub fn add(&mut self, value: T) {
        match self.slots.get(&value) {
            Some(&slot) => self.arena[slot].1 += 1,
            None => {
                self.slots.insert(value.clone(), self.arena.len());
                self.arena.push((value, 1));
            }
        }
    }

    /// Most frequent value; among equally frequent values the first seen wins.
    pub fn mode(&self) -> Option<&T> {
        let mut best: Option<&(T, usize)> = None;
        for entry in &self.arena {
            if best.is_none_or(|(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.map(|(value, _)| value)
    }

    /// Counts ordered by descending frequency, ties in first-seen order.
    pub fn into_counts(self) -> Vec<(T, usize)> {
        let mut counts = self.arena;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl<T: Eq + Hash + Clone> Default for FrequencyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for FrequencyTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

/// Most frequent value of `values`, ties broken by earliest occurrence.
/// `None` only when `values` is empty.
pub fn stable_mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    values.into_iter().collect::<FrequencyTable<T>>().mode().cloned()
}

/// Number of trips carrying one distinct value of a column.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Occurrences of each distinct value, most frequent first.
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .collect::<FrequencyTable<&str>>()
        .into_counts()
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
