//! Render context: the immutable inputs of one credential render.
//!
//! Constructed once per render from a [`CredentialRecord`] and passed by
//! reference to every step that needs snapshot data. Nothing in it is
//! mutated while rendering.

use std::path::PathBuf;
use uuid::Uuid;

use crate::snapshot::{CredentialRecord, EmployeeSnapshot, EventSnapshot, TemplateSnapshot, ZoneSnapshot};

/// Snapshot data for one render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub uuid: Uuid,
    pub employee: EmployeeSnapshot,
    pub event: EventSnapshot,
    pub zones: Vec<ZoneSnapshot>,
    /// Template in effect (the default template when the record has none).
    pub template: TemplateSnapshot,
    pub photo_path: Option<PathBuf>,
    pub qr_path: Option<PathBuf>,
}

impl RenderContext {
    /// Build the context for a record.
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            uuid: record.uuid,
            employee: record.employee.clone(),
            event: record.event.clone(),
            zones: record.zones.clone(),
            template: record
                .template
                .clone()
                .unwrap_or_else(TemplateSnapshot::fallback),
            photo_path: record
                .photo_path
                .clone()
                .or_else(|| record.employee.photo_path.clone()),
            qr_path: record.qr_path.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            uuid: Uuid::nil(),
            employee: EmployeeSnapshot::default(),
            event: EventSnapshot::default(),
            zones: Vec::new(),
            template: TemplateSnapshot::default(),
            photo_path: None,
            qr_path: None,
        }
    }
}
