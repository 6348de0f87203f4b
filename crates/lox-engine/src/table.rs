//! Open-addressed hash table keyed by interned strings.
//!
//! Ported from `examples/original_source/c/source/table.h`'s declared
//! shape (entries array, tombstone deletion, 75% load factor, linear
//! probing) — used for both the VM's global-variable table and, with an
//! empty value type, the weak string-intern set. Since every key is an
//! interned `ObjString`, probing compares keys by pointer identity rather
//! than re-hashing their bytes.

use crate::gc::GcRef;
use crate::object::ObjString;

const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;
const MIN_CAPACITY: usize = 8;

#[derive(Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(GcRef<ObjString>, V),
}

/// A hash table from interned strings to `V`.
pub struct Table<V> {
    entries: Vec<Slot<V>>,
    count: usize,
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, key: GcRef<ObjString>) -> Option<&V> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = find_entry_index(&self.entries, key);
        match &self.entries[idx] {
            Slot::Occupied(k, v) if *k == key => Some(v),
            _ => None,
        }
    }

    /// Insert or overwrite `key`. Returns `true` if `key` was not already
    /// present (matches clox's `tableSet` return value).
    pub fn set(&mut self, key: GcRef<ObjString>, value: V) -> bool {
        if self.needs_grow() {
            self.grow();
        }
        let idx = find_entry_index(&self.entries, key);
        let was_new = !matches!(self.entries[idx], Slot::Occupied(_, _));
        if matches!(self.entries[idx], Slot::Empty) {
            self.count += 1;
        }
        self.entries[idx] = Slot::Occupied(key, value);
        was_new
    }

    /// Remove `key`, leaving a tombstone so later probes still find
    /// entries that collided with it. Returns whether `key` was present.
    pub fn delete(&mut self, key: GcRef<ObjString>) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let idx = find_entry_index(&self.entries, key);
        if matches!(&self.entries[idx], Slot::Occupied(k, _) if *k == key) {
            self.entries[idx] = Slot::Tombstone;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GcRef<ObjString>, &V)> {
        self.entries.iter().filter_map(|slot| match slot {
            Slot::Occupied(k, v) => Some((*k, v)),
            _ => None,
        })
    }

    /// Find an already-interned string with the given content and hash,
    /// without needing a `GcRef` to probe with (the caller doesn't have
    /// one yet — that's the point of interning).
    pub fn find_string(&self, chars: &str, hash: u32) -> Option<GcRef<ObjString>> {
        if self.entries.is_empty() {
            return None;
        }
        let capacity = self.entries.len();
        let mut index = (hash as usize) & (capacity - 1);
        loop {
            match &self.entries[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(key, _) => {
                    if key.hash() == hash && key.as_str() == chars {
                        return Some(*key);
                    }
                }
            }
            index = (index + 1) & (capacity - 1);
        }
    }

    /// Turn every entry whose key is not GC-marked into a tombstone.
    ///
    /// Used only by the string-intern table: interning holds a *weak*
    /// reference, so a string with no other referents must be allowed to
    /// die, and this runs after marking but before the heap sweep so the
    /// table never retains a pointer to freed memory.
    pub fn retain_marked_keys(&mut self) {
        for slot in &mut self.entries {
            if let Slot::Occupied(key, _) = slot {
                if !key.header().is_marked() {
                    *slot = Slot::Tombstone;
                }
            }
        }
    }

    fn needs_grow(&self) -> bool {
        (self.count + 1) * LOAD_FACTOR_DEN > self.entries.len() * LOAD_FACTOR_NUM
    }

    fn grow(&mut self) {
        let new_capacity = if self.entries.is_empty() {
            MIN_CAPACITY
        } else {
            self.entries.len() * 2
        };
        let mut new_entries: Vec<Slot<V>> = (0..new_capacity).map(|_| Slot::Empty).collect();
        let mut live = 0;
        for slot in self.entries.drain(..) {
            if let Slot::Occupied(key, value) = slot {
                let idx = find_entry_index(&new_entries, key);
                new_entries[idx] = Slot::Occupied(key, value);
                live += 1;
            }
        }
        self.entries = new_entries;
        self.count = live;
    }
}

impl<V: Clone> Table<V> {
    pub fn add_all(&mut self, other: &Table<V>) {
        for (key, value) in other.iter() {
            self.set(key, value.clone());
        }
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_entry_index<V>(entries: &[Slot<V>], key: GcRef<ObjString>) -> usize {
    let capacity = entries.len();
    let mut index = (key.hash() as usize) & (capacity - 1);
    let mut tombstone: Option<usize> = None;
    loop {
        match &entries[index] {
            Slot::Empty => return tombstone.unwrap_or(index),
            Slot::Tombstone => {
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            }
            Slot::Occupied(k, _) => {
                if *k == key {
                    return index;
                }
            }
        }
        index = (index + 1) & (capacity - 1);
    }
}
