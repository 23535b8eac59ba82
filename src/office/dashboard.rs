use crate::storage::MockStore;
use serde::Serialize;

/// The admin landing page counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_classes: usize,
    pub total_programs: usize,
    pub total_templates: usize,
    pub total_enrollments: usize,
}

pub fn dashboard_stats(store: &MockStore) -> DashboardStats {
    DashboardStats {
        total_classes: store.row_count("classes"),
        total_programs: store.row_count("programs"),
        total_templates: store.row_count("workout_templates"),
        total_enrollments: store.row_count("class_enrollments"),
    }
}
