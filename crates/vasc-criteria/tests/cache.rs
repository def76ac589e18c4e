use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vasc_core::models::criteria::Criteria;
use vasc_core::models::exam::ExamType;
use vasc_criteria::{parse_document, CriteriaCache, CriteriaError, CriteriaSource};

const DOCUMENT: &str = r#"{
    "site": "mount_sinai_gp1c",
    "version": "1.0.0",
    "stenosis_thresholds": {
        "0_19": {"psv_max": 104},
        "20_39": {"psv_min": 105, "psv_max": 109},
        "40_59": {"psv_min": 110, "psv_max": 179},
        "60_79": {"psv_min": 180, "psv_max": 240, "edv_max": 134},
        "80_99": {"psv_min": 241, "edv_min": 135},
        "upgrade_if_ratio_gt": 4
    }
}"#;

/// In-memory source that counts how often it is asked.
#[derive(Default)]
struct CountingSource {
    loads: AtomicUsize,
}

impl CountingSource {
    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl CriteriaSource for CountingSource {
    fn load(&self, _exam_type: ExamType, site: &str, version: &str) -> Result<Criteria, CriteriaError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        parse_document(Path::new("memory://carotid.json"), DOCUMENT, site, version)
    }
}

#[test]
fn repeated_requests_load_once() {
    let cache = CriteriaCache::new(CountingSource::default());

    let first = cache.get(ExamType::Carotid, "mount_sinai_gp1c", "1.0.0").unwrap();
    let second = cache.get(ExamType::Carotid, "mount_sinai_gp1c", "1.0.0").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.source().loads(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn failed_loads_are_not_cached() {
    let cache = CriteriaCache::new(CountingSource::default());

    assert!(cache.get(ExamType::Carotid, "mount_sinai_gp1c", "2.0.0").is_err());
    assert!(cache.get(ExamType::Carotid, "mount_sinai_gp1c", "2.0.0").is_err());

    assert_eq!(cache.source().loads(), 2);
    assert!(cache.is_empty());
}

#[test]
fn keys_are_independent() {
    let cache = CriteriaCache::new(CountingSource::default());

    cache.get(ExamType::Carotid, "mount_sinai_gp1c", "1.0.0").unwrap();
    let _ = cache.get(ExamType::Carotid, "other_site", "1.0.0");
    cache.get(ExamType::Carotid, "mount_sinai_gp1c", "1.0.0").unwrap();

    assert_eq!(cache.source().loads(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_requests_share_one_load() {
    let cache = CriteriaCache::new(CountingSource::default());

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let criteria = cache.get(ExamType::Carotid, "mount_sinai_gp1c", "1.0.0").unwrap();
                assert_eq!(criteria.version, "1.0.0");
            });
        }
    });

    assert_eq!(cache.source().loads(), 1);
}
