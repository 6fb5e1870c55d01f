//! Immutable input records.
//!
//! Snapshots are captured by the surrounding application when a credential
//! is requested. Rendering only reads them; nothing here queries a live
//! data source.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::color::Color;
use crate::template::LayoutMeta;

/// Provider (company / federation) classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Internal,
    #[default]
    External,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Federation line printed for internal providers.
    pub federation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub document_id: String,
    pub role: String,
    pub position: String,
    pub company: String,
    pub photo_path: Option<PathBuf>,
    pub provider: Option<ProviderSnapshot>,
}

impl EmployeeSnapshot {
    /// Display name as printed on the badge: `"JUAN PEREZ"`.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        full.trim().to_uppercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSnapshot {
    pub name: String,
    pub location: String,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

/// One authorized access zone. `id` is the number printed on the badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Template captured at generation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSnapshot {
    pub file_path: Option<PathBuf>,
    pub layout_meta: LayoutMeta,
}

impl TemplateSnapshot {
    /// Template in effect when a record has none: no background image,
    /// the built-in [`LayoutMeta::default_layout`].
    pub fn fallback() -> Self {
        Self {
            file_path: None,
            layout_meta: LayoutMeta::default_layout(),
        }
    }
}

/// Everything needed to render one credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub uuid: Uuid,
    #[serde(default)]
    pub employee: EmployeeSnapshot,
    #[serde(default)]
    pub event: EventSnapshot,
    #[serde(default)]
    pub zones: Vec<ZoneSnapshot>,
    #[serde(default)]
    pub template: Option<TemplateSnapshot>,
    /// Pre-rendered QR image.
    #[serde(default)]
    pub qr_path: Option<PathBuf>,
    /// Overrides `employee.photo_path` when set.
    #[serde(default)]
    pub photo_path: Option<PathBuf>,
}

impl CredentialRecord {
    /// Parse a record from JSON.
    pub fn from_json(data: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uppercases_and_trims() {
        let employee = EmployeeSnapshot {
            first_name: " Juan".into(),
            last_name: "Perez ".into(),
            ..Default::default()
        };
        assert_eq!(employee.display_name(), "JUAN PEREZ");
        assert_eq!(EmployeeSnapshot::default().display_name(), "");
    }

    #[test]
    fn test_minimal_record_parses() {
        let record = CredentialRecord::from_json(
            r##"{
                "uuid": "6f1c2f57-52a4-4f5e-9f4e-8c3f0c2a9d11",
                "employee": {"first_name": "Ana", "provider": {"name": "Club Norte", "type": "internal"}},
                "zones": [{"id": 3, "name": "Pista", "color": "#DC2626"}]
            }"##,
        )
        .unwrap();
        assert_eq!(record.employee.first_name, "Ana");
        assert_eq!(
            record.employee.provider.as_ref().map(|p| p.kind),
            Some(ProviderKind::Internal)
        );
        assert_eq!(record.zones[0].color, Some(Color::rgb(0xDC, 0x26, 0x26)));
        assert!(record.template.is_none());
    }
}
