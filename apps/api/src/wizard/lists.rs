//! Append / remove / reorder over the ordered collections of the record.
//!
//! Reordering is pure data: a drag gesture arrives as an (active, over) pair of
//! identity tokens, a full reorder as the complete list of tokens in the new order.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{EducationDraft, EducationEntry, SkillDraft, SkillEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("new order is not a permutation of the current entries")]
    NotAPermutation,
}

/// An entry that carries a stable identity token.
pub trait ListEntry {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}

impl ListEntry for SkillEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl ListEntry for EducationEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// Turns the skill staging area into an entry and resets it.
/// Returns `None`, leaving the draft alone, when the skill name is blank.
pub fn stage_skill(draft: &mut SkillDraft) -> Option<SkillEntry> {
    if draft.skill_name.trim().is_empty() {
        return None;
    }
    let staged = std::mem::take(draft);
    Some(SkillEntry {
        id: Uuid::nil(),
        skill_name: staged.skill_name,
        level: staged.level,
    })
}

/// Turns the education staging area into an entry and resets it.
/// Every subfield is required; dates are reduced to their year.
pub fn stage_education(draft: &mut EducationDraft) -> Option<EducationEntry> {
    let (Some(start), Some(end)) = (draft.start_date, draft.end_date) else {
        return None;
    };
    if draft.degree.trim().is_empty() || draft.college.trim().is_empty() {
        return None;
    }
    let staged = std::mem::take(draft);
    Some(EducationEntry {
        id: Uuid::nil(),
        degree: staged.degree,
        college: staged.college,
        start_year: start.format("%Y").to_string(),
        end_year: end.format("%Y").to_string(),
    })
}

/// Adds `entry` at the end, assigning an identity token when it has none.
pub fn append<T: ListEntry>(list: &mut Vec<T>, mut entry: T) -> Uuid {
    if entry.id().is_nil() {
        entry.set_id(Uuid::new_v4());
    }
    let id = entry.id();
    list.push(entry);
    id
}

pub fn remove<T>(list: &mut Vec<T>, index: usize) -> Result<T, ListError> {
    if index >= list.len() {
        return Err(ListError::IndexOutOfRange {
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}

/// Rearranges `list` to follow `new_order`, which must name every current
/// identity token exactly once. The list is untouched on error.
pub fn apply_permutation<T: ListEntry>(
    list: &mut Vec<T>,
    new_order: &[Uuid],
) -> Result<(), ListError> {
    let current: HashSet<Uuid> = list.iter().map(ListEntry::id).collect();
    let requested: HashSet<Uuid> = new_order.iter().copied().collect();
    if current.len() != list.len()
        || requested.len() != new_order.len()
        || current != requested
    {
        return Err(ListError::NotAPermutation);
    }

    let mut by_id: HashMap<Uuid, T> = list.drain(..).map(|e| (e.id(), e)).collect();
    *list = new_order.iter().filter_map(|id| by_id.remove(id)).collect();
    Ok(())
}

/// Applies a finished drag: `active` moves to the position of `over`, shifting
/// the entries between them. Returns whether anything moved.
pub fn move_entry<T: ListEntry>(list: &mut Vec<T>, active: Uuid, over: Option<Uuid>) -> bool {
    let Some(over) = over else {
        return false;
    };
    if active == over {
        return false;
    }
    let from = list.iter().position(|e| e.id() == active);
    let to = list.iter().position(|e| e.id() == over);
    let (Some(from), Some(to)) = (from, to) else {
        return false;
    };
    let entry = list.remove(from);
    list.insert(to, entry);
    true
}
