//! Partial updates to an existing patient.
//!
//! A patch distinguishes between a field the caller did not send and a field the caller
//! explicitly set to `null`. Only fields that were sent take part in a merge.

use crate::patient::{Gender, PatientDraft};
use crate::validation::{check_age, check_positive, ValidationErrors};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

/// One optional field of a patch.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
    /// Not present in the request body.
    Unset,
    /// Present and explicitly `null`.
    Null,
    /// Present with a value.
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    pub fn is_set(&self) -> bool {
        !matches!(self, Field::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Writes this field onto `target`. `Unset` leaves it alone, `Null` clears it.
    pub fn merge_into(self, target: &mut Option<T>) {
        match self {
            Field::Unset => {}
            Field::Null => *target = None,
            Field::Value(v) => *target = Some(v),
        }
    }
}

// Absent keys never reach this impl; they fall back to `Default` via `#[serde(default)]`.
impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Fields to change on an existing patient. The ID cannot be changed.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct PatientPatch {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub city: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub age: Field<i64>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub gender: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub height: Field<f64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub weight: Field<f64>,
}

impl PatientPatch {
    /// Checks the supplied values against the same constraints as a full record.
    ///
    /// `null` values pass here; whether clearing a field is acceptable is decided when the
    /// merged record is validated.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(&age) = self.age.value() {
            check_age(&mut errors, age);
        }
        if let Some(gender) = self.gender.value() {
            if let Err(msg) = gender.parse::<Gender>() {
                errors.push("gender", msg);
            }
        }
        if let Some(&height) = self.height.value() {
            check_positive(&mut errors, "height", height);
        }
        if let Some(&weight) = self.weight.value() {
            check_positive(&mut errors, "weight", weight);
        }

        errors.into_result()
    }

    pub fn is_empty(&self) -> bool {
        !(self.name.is_set()
            || self.city.is_set()
            || self.age.is_set()
            || self.gender.is_set()
            || self.height.is_set()
            || self.weight.is_set())
    }

    pub fn apply_to(self, draft: &mut PatientDraft) {
        self.name.merge_into(&mut draft.name);
        self.city.merge_into(&mut draft.city);
        self.age.merge_into(&mut draft.age);
        self.gender.merge_into(&mut draft.gender);
        self.height.merge_into(&mut draft.height);
        self.weight.merge_into(&mut draft.weight);
    }
}
