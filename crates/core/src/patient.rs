//! Patient record model.
//!
//! Three shapes of the same patient flow through the system:
//!
//! - [`PatientDraft`]: an unvalidated request body. Every field is optional so that a
//!   missing field is reported by name rather than as an opaque parse failure.
//! - [`Patient`]: a validated record. Only obtainable through `TryFrom<PatientDraft>`.
//! - [`StoredPatient`]: the persisted value under a patient ID. No id, no derived fields.
//!
//! BMI and verdict are never stored. They are recomputed from height and weight each time a
//! record is materialised, see [`bmi`] and [`Verdict::from_bmi`].

use crate::validation::{check_age, check_positive, require, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Gender of a patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| "must be one of 'Male', 'Female' or 'Other'".to_string())
    }
}

/// Weight status derived from BMI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum Verdict {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl Verdict {
    /// Classifies a (rounded) BMI value.
    ///
    /// Lower bounds are inclusive: 18.5 is normal weight, 25 is overweight, 30 is obese.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 25.0 {
            Verdict::NormalWeight
        } else if bmi < 30.0 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::NormalWeight => "Normal weight",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body mass index in kg/m², rounded to two decimal places.
///
/// Rounds the exact binary value of the quotient with ties to even, so `30.5 / 2.0²` is 7.62.
/// Non-finite inputs come back unchanged.
pub fn bmi(height_m: f64, weight_kg: f64) -> f64 {
    let raw = weight_kg / (height_m * height_m);
    format!("{raw:.2}").parse().unwrap_or(raw)
}

/// Unvalidated patient as supplied by a caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDraft {
    /// ID of the patient
    #[schema(example = "P001")]
    pub id: Option<String>,
    /// Name of the patient
    pub name: Option<String>,
    /// City where the patient lives
    pub city: Option<String>,
    /// Age of the patient in years
    pub age: Option<i64>,
    /// One of `Male`, `Female` or `Other`
    pub gender: Option<String>,
    /// Height of the patient in metres
    pub height: Option<f64>,
    /// Weight of the patient in kilograms
    pub weight: Option<f64>,
}

impl PatientDraft {
    /// Rebuilds a draft from a persisted value so that a patch can be merged onto it.
    pub fn from_stored(id: &str, stored: &StoredPatient) -> Self {
        Self {
            id: Some(id.to_string()),
            name: stored.name.clone(),
            city: stored.city.clone(),
            age: stored.age.map(i64::from),
            gender: stored.gender.map(|g| g.to_string()),
            height: stored.height,
            weight: stored.weight,
        }
    }
}

/// A validated patient record.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: String,
    name: String,
    city: String,
    age: u32,
    gender: Gender,
    height: f64,
    weight: f64,
}

impl TryFrom<PatientDraft> for Patient {
    type Error = ValidationErrors;

    fn try_from(draft: PatientDraft) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let id = require(&mut errors, "id", draft.id);
        let name = require(&mut errors, "name", draft.name);
        let city = require(&mut errors, "city", draft.city);
        let age = require(&mut errors, "age", draft.age).and_then(|a| check_age(&mut errors, a));
        let gender = require(&mut errors, "gender", draft.gender).and_then(|g| {
            g.parse::<Gender>()
                .map_err(|msg| errors.push("gender", msg))
                .ok()
        });
        let height = require(&mut errors, "height", draft.height)
            .and_then(|h| check_positive(&mut errors, "height", h));
        let weight = require(&mut errors, "weight", draft.weight)
            .and_then(|w| check_positive(&mut errors, "weight", w));
        if let (Some(h), Some(w)) = (height, weight) {
            if !bmi(h, w).is_finite() {
                errors.push("height", "is too small to derive a BMI");
            }
        }

        match (id, name, city, age, gender, height, weight) {
            (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight))
                if errors.is_empty() =>
            {
                Ok(Patient {
                    id,
                    name,
                    city,
                    age,
                    gender,
                    height,
                    weight,
                })
            }
            _ => Err(errors),
        }
    }
}

impl Patient {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        bmi(self.height, self.weight)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_bmi(self.bmi())
    }

    /// Splits the record into its key and persisted value.
    pub fn into_stored(self) -> (String, StoredPatient) {
        let stored = StoredPatient {
            name: Some(self.name),
            city: Some(self.city),
            age: Some(self.age),
            gender: Some(self.gender),
            height: Some(self.height),
            weight: Some(self.weight),
        };
        (self.id, stored)
    }
}

/// Persisted value of a patient, keyed by ID in the store.
///
/// Read leniently: a stored value may lack fields. Derived fields are left out of the view
/// when height or weight are unusable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredPatient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl StoredPatient {
    pub fn bmi(&self) -> Option<f64> {
        match (self.height, self.weight) {
            (Some(h), Some(w)) if h > 0.0 => Some(bmi(h, w)).filter(|b| b.is_finite()),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.bmi().map(Verdict::from_bmi)
    }

    /// Materialises the output shape with freshly derived fields.
    pub fn view(&self, id: Option<&str>) -> PatientView {
        PatientView {
            id: id.map(str::to_string),
            fields: self.clone(),
            bmi: self.bmi(),
            verdict: self.verdict(),
        }
    }
}

/// Output shape of a patient: stored fields plus derived BMI and verdict.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PatientView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: StoredPatient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}
