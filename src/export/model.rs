// src/export/model.rs

use serde::Serialize;

/// Flat row written by the CSV / JSON exporters: one per allocation.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AllocationExport {
    pub date: String,
    pub target_minutes: u32,
    pub minutes: u32,
    pub hours: String,
    pub percentage: f64,
    pub project_id: String,
    pub project_name: String,
    pub stage_id: String,
    pub stage_name: String,
    pub task_id: String,
    pub task_name: String,
    pub entry_id: String,
}
