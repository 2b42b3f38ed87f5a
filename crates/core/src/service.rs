//! Patient service.
//!
//! Lookup, sort, create, update and delete over an injected [`PatientStore`]. Every call reads
//! the store afresh; mutating calls perform one load, mutate, save cycle with no isolation from
//! concurrent callers.
//!
//! This module contains **only** data operations. Status codes and wire formats belong in
//! `api-rest`.

use crate::error::{PatientError, PatientResult};
use crate::patch::PatientPatch;
use crate::patient::{Patient, PatientDraft, PatientView, StoredPatient};
use crate::store::PatientStore;
use indexmap::IndexMap;
use std::str::FromStr;
use std::sync::Arc;

/// Field a sorted listing can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const VALID: [&'static str; 3] = ["height", "weight", "bmi"];

    /// Value used for ordering. Records without the field sort as 0.
    fn key(&self, patient: &StoredPatient) -> f64 {
        match self {
            SortField::Height => patient.height,
            SortField::Weight => patient.weight,
            SortField::Bmi => patient.bmi(),
        }
        .unwrap_or(0.0)
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(PatientError::InvalidArgument(format!(
                "Invalid field, select from {:?}",
                SortField::VALID
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::InvalidArgument(
                "Invalid order, select between ascending (asc) or descending (desc)".into(),
            )),
        }
    }
}

/// Every patient keyed by ID, in store order. Serialises as a JSON object.
pub type PatientListing = IndexMap<String, PatientView>;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Lists every patient with freshly derived BMI and verdict.
    pub fn list(&self) -> PatientResult<PatientListing> {
        let collection = self.store.load()?;
        Ok(collection
            .iter()
            .map(|(id, patient)| (id.clone(), patient.view(None)))
            .collect())
    }

    /// Fetches one patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has this ID.
    pub fn get(&self, id: &str) -> PatientResult<PatientView> {
        let collection = self.store.load()?;
        collection
            .get(id)
            .map(|patient| patient.view(Some(id)))
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Lists every patient ordered by `sort_by`.
    ///
    /// Both parameters are case-insensitive; `order` defaults to ascending. The sort is stable
    /// in both directions, so ties keep store order. Parameters are checked before the store
    /// is read.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidArgument`] if `sort_by` is missing or not one of
    /// `height`, `weight`, `bmi`, or if `order` is not `asc` or `desc`.
    pub fn sorted(
        &self,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> PatientResult<Vec<PatientView>> {
        let field: SortField = sort_by.unwrap_or_default().parse()?;
        let order = order
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();

        let collection = self.store.load()?;
        let mut keyed: Vec<(f64, PatientView)> = collection
            .iter()
            .map(|(id, patient)| (field.key(patient), patient.view(Some(id.as_str()))))
            .collect();

        match order {
            SortOrder::Asc => keyed.sort_by(|a, b| a.0.total_cmp(&b.0)),
            SortOrder::Desc => keyed.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }

        Ok(keyed.into_iter().map(|(_, view)| view).collect())
    }

    /// Creates a new patient and returns its ID.
    ///
    /// The draft is validated before the store is read.
    ///
    /// # Errors
    ///
    /// - [`PatientError::Validation`] if the draft is not a valid record.
    /// - [`PatientError::Conflict`] if the ID already exists; the store is left untouched.
    pub fn create(&self, draft: PatientDraft) -> PatientResult<String> {
        let patient = Patient::try_from(draft)?;

        let mut collection = self.store.load()?;
        if collection.contains_key(patient.id()) {
            return Err(PatientError::Conflict(patient.id().to_string()));
        }

        let (id, stored) = patient.into_stored();
        collection.insert(id.clone(), stored);
        self.store.save(&collection)?;

        tracing::info!("created patient {}", id);
        Ok(id)
    }

    /// Merges `patch` onto an existing patient.
    ///
    /// The merged record, with its ID reattached, is validated as a full record before it is
    /// saved, so clearing a required field with `null` is rejected. A patch that sends no
    /// fields leaves the store file untouched.
    ///
    /// # Errors
    ///
    /// - [`PatientError::Validation`] if the patch or the merged record is invalid.
    /// - [`PatientError::NotFound`] if no patient has this ID.
    pub fn update(&self, id: &str, patch: PatientPatch) -> PatientResult<()> {
        patch.validate()?;

        let mut collection = self.store.load()?;
        let existing = collection
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;
        if patch.is_empty() {
            tracing::debug!("empty update for patient {}", id);
            return Ok(());
        }

        let mut draft = PatientDraft::from_stored(id, existing);
        patch.apply_to(&mut draft);
        let merged = Patient::try_from(draft)?;

        let (id, stored) = merged.into_stored();
        collection.insert(id.clone(), stored);
        self.store.save(&collection)?;

        tracing::info!("updated patient {}", id);
        Ok(())
    }

    /// Removes a patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has this ID.
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let mut collection = self.store.load()?;
        if collection.shift_remove(id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.store.save(&collection)?;

        tracing::info!("deleted patient {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Verdict;
    use crate::store::{Collection, JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    fn draft(id: &str, city: &str, height: f64, weight: f64) -> PatientDraft {
        PatientDraft {
            id: Some(id.into()),
            name: Some(format!("Patient {id}")),
            city: Some(city.into()),
            age: Some(40),
            gender: Some("Other".into()),
            height: Some(height),
            weight: Some(weight),
        }
    }

    fn seeded() -> (Arc<MemoryStore>, PatientService) {
        let store = Arc::new(MemoryStore::new());
        let service = PatientService::new(store.clone());
        service.create(draft("P001", "Pune", 1.80, 60.0)).unwrap(); // 18.52
        service.create(draft("P002", "Delhi", 1.60, 80.0)).unwrap(); // 31.25
        service.create(draft("P003", "Goa", 1.70, 72.25)).unwrap(); // 25.0
        (store, service)
    }

    #[test]
    fn test_create_then_get_returns_supplied_and_derived_fields() {
        let (_store, service) = seeded();

        let view = service.get("P002").expect("get should succeed");
        assert_eq!(view.id.as_deref(), Some("P002"));
        assert_eq!(view.fields.city.as_deref(), Some("Delhi"));
        assert_eq!(view.fields.age, Some(40));
        assert_eq!(view.bmi, Some(31.25));
        assert_eq!(view.verdict, Some(Verdict::Obese));
    }

    #[test]
    fn test_create_rejects_duplicate_and_leaves_store_unchanged() {
        let (store, service) = seeded();
        let before = store.snapshot();

        let err = service
            .create(draft("P001", "Elsewhere", 1.5, 50.0))
            .expect_err("duplicate should fail");

        assert!(matches!(err, PatientError::Conflict(ref id) if id == "P001"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_create_validates_before_touching_store() {
        let store = Arc::new(MemoryStore::new());
        let service = PatientService::new(store.clone());

        let err = service
            .create(draft("P001", "Pune", -1.0, 60.0))
            .expect_err("invalid draft should fail");

        assert!(matches!(err, PatientError::Validation(_)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let (_store, service) = seeded();
        assert!(matches!(
            service.get("P999"),
            Err(PatientError::NotFound(ref id)) if id == "P999"
        ));
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let (_store, service) = seeded();

        service.delete("P002").expect("delete should succeed");

        assert!(matches!(service.get("P002"), Err(PatientError::NotFound(_))));
        assert!(matches!(
            service.delete("P002"),
            Err(PatientError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_weight_keeps_city_and_recomputes_bmi() {
        let (_store, service) = seeded();
        let patch: PatientPatch = serde_json::from_str(r#"{"weight": 51.2}"#).unwrap();

        service.update("P002", patch).expect("update should succeed");

        let view = service.get("P002").unwrap();
        assert_eq!(view.fields.city.as_deref(), Some("Delhi"));
        assert_eq!(view.fields.weight, Some(51.2));
        assert_eq!(view.bmi, Some(20.0));
        assert_eq!(view.verdict, Some(Verdict::NormalWeight));
    }

    #[test]
    fn test_update_keeps_position_in_store() {
        let (_store, service) = seeded();
        let patch: PatientPatch = serde_json::from_str(r#"{"city": "Mumbai"}"#).unwrap();

        service.update("P001", patch).unwrap();

        let ids: Vec<_> = service.list().unwrap().into_keys().collect();
        assert_eq!(ids, vec!["P001", "P002", "P003"]);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (_store, service) = seeded();
        let err = service
            .update("P404", PatientPatch::default())
            .expect_err("unknown id should fail");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn test_update_clearing_required_field_is_rejected() {
        let (store, service) = seeded();
        let before = store.snapshot();
        let patch: PatientPatch = serde_json::from_str(r#"{"height": null}"#).unwrap();

        let err = service.update("P001", patch).expect_err("merge should fail");

        match err {
            PatientError::Validation(errors) => assert_eq!(errors.issues()[0].field, "height"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_update_with_empty_patch_does_not_rewrite_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        let contents = r#"{"P001": {"name": "Old", "city": "Agra"}}"#;
        std::fs::write(&path, contents).unwrap();
        let service = PatientService::new(Arc::new(JsonFileStore::new(&path)));

        service
            .update("P001", PatientPatch::default())
            .expect("empty update should succeed");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
        assert!(matches!(
            service.update("P404", PatientPatch::default()),
            Err(PatientError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_rejects_invalid_patch_values() {
        let (_store, service) = seeded();
        let patch: PatientPatch = serde_json::from_str(r#"{"weight": 0}"#).unwrap();
        assert!(matches!(
            service.update("P001", patch),
            Err(PatientError::Validation(_))
        ));
    }

    #[test]
    fn test_sorted_by_bmi_desc_is_non_increasing() {
        let (_store, service) = seeded();

        let sorted = service.sorted(Some("BMI"), Some("DESC")).unwrap();
        let bmis: Vec<_> = sorted.iter().map(|v| v.bmi.unwrap()).collect();

        assert_eq!(bmis, vec![31.25, 25.0, 18.52]);
        assert!(bmis.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sorted_defaults_to_ascending() {
        let (_store, service) = seeded();

        let sorted = service.sorted(Some("height"), None).unwrap();
        let ids: Vec<_> = sorted.iter().map(|v| v.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["P002", "P003", "P001"]);
    }

    #[test]
    fn test_sorted_is_stable_and_missing_fields_sort_as_zero() {
        let mut collection = Collection::new();
        let weighing = |weight: f64| StoredPatient {
            weight: Some(weight),
            ..Default::default()
        };
        collection.insert("A".into(), weighing(70.0));
        collection.insert("B".into(), StoredPatient::default());
        collection.insert("C".into(), weighing(70.0));
        collection.insert("D".into(), weighing(-1.0));
        let service = PatientService::new(Arc::new(MemoryStore::with_collection(collection)));

        let ids = |order: &str| -> Vec<String> {
            service
                .sorted(Some("weight"), Some(order))
                .unwrap()
                .into_iter()
                .filter_map(|v| v.id)
                .collect()
        };

        assert_eq!(ids("asc"), vec!["D", "B", "A", "C"]);
        assert_eq!(ids("desc"), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_sorted_rejects_unsupported_field() {
        let (_store, service) = seeded();

        let err = service.sorted(Some("age"), None).expect_err("age is not sortable");
        match err {
            PatientError::InvalidArgument(msg) => {
                assert!(msg.contains("height") && msg.contains("weight") && msg.contains("bmi"))
            }
            other => panic!("expected invalid argument, got {other:?}"),
        }
        assert!(matches!(
            service.sorted(None, None),
            Err(PatientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sorted_rejects_unsupported_order() {
        let (_store, service) = seeded();
        assert!(matches!(
            service.sorted(Some("weight"), Some("sideways")),
            Err(PatientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_sort_is_reported_before_reading_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("missing.json"));
        let service = PatientService::new(Arc::new(store));

        assert!(matches!(
            service.sorted(Some("age"), None),
            Err(PatientError::InvalidArgument(_))
        ));
        assert!(service.list().unwrap_err().is_storage());
    }

    #[test]
    fn test_file_backed_service_persists_between_instances() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patients.json"));
        store.initialise().unwrap();

        PatientService::new(Arc::new(store.clone()))
            .create(draft("P010", "Agra", 1.75, 70.0))
            .unwrap();

        let view = PatientService::new(Arc::new(store)).get("P010").unwrap();
        assert_eq!(view.bmi, Some(22.86));
    }

    #[test]
    fn test_listing_serialises_as_ordered_object() {
        let (_store, service) = seeded();

        let json = serde_json::to_string(&service.list().unwrap()).unwrap();
        let p1 = json.find("\"P001\"").unwrap();
        let p2 = json.find("\"P002\"").unwrap();
        let p3 = json.find("\"P003\"").unwrap();
        assert!(p1 < p2 && p2 < p3);
        assert!(json.contains("\"verdict\":\"Normal weight\""));
    }
}
