use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use vasc_core::models::criteria::Criteria;
use vasc_core::models::exam::ExamType;

use crate::error::CriteriaError;
use crate::source::CriteriaSource;

/// Cache key. Criteria are immutable for a given version, so entries are
/// never invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriteriaKey {
    pub exam_type: ExamType,
    pub site: String,
    pub version: String,
}

type Slot = Arc<Mutex<Option<Arc<Criteria>>>>;

/// Read-through criteria cache, shared by concurrent calculation runs.
///
/// Each key has its own slot, so at most one load per key is in flight and
/// loads for different keys do not wait on each other. Failed loads are not
/// cached; the next request tries again.
pub struct CriteriaCache<S> {
    source: S,
    slots: Mutex<HashMap<CriteriaKey, Slot>>,
}

impl<S: CriteriaSource> CriteriaCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get(
        &self,
        exam_type: ExamType,
        site: &str,
        version: &str,
    ) -> Result<Arc<Criteria>, CriteriaError> {
        let key = CriteriaKey {
            exam_type,
            site: site.to_string(),
            version: version.to_string(),
        };

        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(criteria) = cached.as_ref() {
            tracing::debug!(exam_type = %exam_type, site, version, "criteria cache hit");
            return Ok(Arc::clone(criteria));
        }

        match self.source.load(exam_type, site, version) {
            Ok(criteria) => {
                let criteria = Arc::new(criteria);
                *cached = Some(Arc::clone(&criteria));
                Ok(criteria)
            }
            Err(e) => {
                drop(cached);
                self.release_empty_slot(&key, &slot);
                Err(e)
            }
        }
    }

    /// Drop a slot left empty by a failed load, unless another caller is
    /// already waiting on it. Slots are only handed out under the map lock,
    /// so the strong count cannot grow while it is held.
    fn release_empty_slot(&self, key: &CriteriaKey, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unshared = slots
            .get(key)
            .is_some_and(|held| Arc::ptr_eq(held, slot) && Arc::strong_count(slot) == 2);
        if unshared {
            slots.remove(key);
        }
    }

    /// Number of rulesets currently held.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
