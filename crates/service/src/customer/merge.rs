//! Pure diff-and-merge over a customer record and a sparse patch.
//!
//! The merge never touches storage: it returns the merged record together
//! with the set of fields that actually changed, so "zero changes" is a
//! first-class outcome the caller can reject explicitly.

use std::collections::BTreeSet;

use super::domain::{Customer, CustomerPatch};

/// A patchable customer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Age,
    Gender,
    PasswordHash,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Age => "age",
            Field::Gender => "gender",
            Field::PasswordHash => "password_hash",
        }
    }
}

/// The set of fields altered by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    fields: BTreeSet<Field>,
}

impl ChangeSet {
    pub fn insert(&mut self, field: Field) {
        self.fields.insert(field);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    /// Field names for logging.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(Field::as_str).collect()
    }
}

/// Merge a sparse patch into a customer record.
///
/// A patch value equal to the current value does not count as a change, so
/// "update to the same value" and "no update" are indistinguishable for that
/// field. The credential arrives already hashed; it is compared by value
/// like every other field.
pub fn merge(current: &Customer, patch: &CustomerPatch) -> (Customer, ChangeSet) {
    let mut merged = current.clone();
    let mut changes = ChangeSet::default();

    if let Some(name) = &patch.name {
        if *name != merged.name {
            merged.name = name.clone();
            changes.insert(Field::Name);
        }
    }
    if let Some(email) = &patch.email {
        if *email != merged.email {
            merged.email = email.clone();
            changes.insert(Field::Email);
        }
    }
    if let Some(age) = patch.age {
        if age != merged.age {
            merged.age = age;
            changes.insert(Field::Age);
        }
    }
    if let Some(gender) = patch.gender {
        if gender != merged.gender {
            merged.gender = gender;
            changes.insert(Field::Gender);
        }
    }
    if let Some(password_hash) = &patch.password_hash {
        if *password_hash != merged.password_hash {
            merged.password_hash = password_hash.clone();
            changes.insert(Field::PasswordHash);
        }
    }

    (merged, changes)
}
