//! Block id → displayed text.
//!
//! Template authors name blocks by the field they show (`"nombre"`,
//! `"proveedor"`, `"zona3"`, ...). The id is looked up once in a static
//! table; the resulting [`BlockField`] reads its text from the render
//! context.

use serde::Serialize;

use crate::compose::RenderContext;
use crate::snapshot::{ProviderKind, ZoneSnapshot};

/// Zone names listed before collapsing into "and N more".
const ZONE_LIST_LIMIT: usize = 3;

/// Highest individual zone slot (`zona1`..`zona9`).
pub const MAX_ZONE_SLOT: u8 = 9;

/// Data field displayed by a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockField {
    Name,
    Role,
    Position,
    Company,
    Document,
    Event,
    Location,
    Provider,
    Federation,
    ZoneList,
    ZoneSlot(u8),
    Uuid,
}

/// Accepted block ids, Spanish first as authored in the editor.
const FIELD_IDS: &[(&str, BlockField)] = &[
    ("nombre", BlockField::Name),
    ("name", BlockField::Name),
    ("rol", BlockField::Role),
    ("role", BlockField::Role),
    ("cargo", BlockField::Position),
    ("puesto", BlockField::Position),
    ("funcion", BlockField::Position),
    ("position", BlockField::Position),
    ("function", BlockField::Position),
    ("empresa", BlockField::Company),
    ("company", BlockField::Company),
    ("documento", BlockField::Document),
    ("document", BlockField::Document),
    ("evento", BlockField::Event),
    ("event", BlockField::Event),
    ("ubicacion", BlockField::Location),
    ("lugar", BlockField::Location),
    ("location", BlockField::Location),
    ("proveedor", BlockField::Provider),
    ("provider", BlockField::Provider),
    ("federacion", BlockField::Federation),
    ("federation", BlockField::Federation),
    ("zonas", BlockField::ZoneList),
    ("zone_list", BlockField::ZoneList),
    ("uuid", BlockField::Uuid),
    ("codigo", BlockField::Uuid),
];

impl BlockField {
    /// Look up a block id (case-insensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        if let Some(&(_, field)) = FIELD_IDS.iter().find(|(name, _)| *name == id) {
            return Some(field);
        }
        let slot = id.strip_prefix("zona").or_else(|| id.strip_prefix("zone"))?;
        match slot.parse::<u8>() {
            Ok(n) if (1..=MAX_ZONE_SLOT).contains(&n) => Some(BlockField::ZoneSlot(n)),
            _ => None,
        }
    }

    /// Fields that shrink to a declared width instead of overflowing.
    pub fn is_autofit(self) -> bool {
        matches!(
            self,
            BlockField::Name
                | BlockField::Federation
                | BlockField::Role
                | BlockField::Provider
                | BlockField::Position
        )
    }

    /// Text to print for this field.
    pub fn resolve(self, ctx: &RenderContext) -> String {
        let provider = ctx.employee.provider.as_ref();
        match self {
            BlockField::Name => ctx.employee.display_name(),
            BlockField::Role => ctx.employee.role.clone(),
            BlockField::Position => ctx.employee.position.clone(),
            BlockField::Company => ctx.employee.company.clone(),
            BlockField::Document => ctx.employee.document_id.clone(),
            BlockField::Event => ctx.event.name.clone(),
            BlockField::Location => ctx.event.location.clone(),
            BlockField::Provider => provider.map(|p| p.name.clone()).unwrap_or_default(),
            BlockField::Federation => provider
                .filter(|p| p.kind == ProviderKind::Internal)
                .and_then(|p| p.federation.clone())
                .unwrap_or_default(),
            BlockField::ZoneList => zone_list(&ctx.zones),
            BlockField::ZoneSlot(n) => zone_number(n as i64, &ctx.zones),
            BlockField::Uuid => ctx.uuid.to_string(),
        }
    }
}

/// `"k"` if zone `k` is authorized, else empty.
pub fn zone_number(k: i64, zones: &[ZoneSnapshot]) -> String {
    if zones.iter().any(|z| z.id == k) {
        k.to_string()
    } else {
        String::new()
    }
}

/// Comma list of zone names, at most three, then `" and N more"`.
pub fn zone_list(zones: &[ZoneSnapshot]) -> String {
    let labels: Vec<String> = zones
        .iter()
        .map(|z| {
            if z.name.trim().is_empty() {
                z.id.to_string()
            } else {
                z.name.trim().to_string()
            }
        })
        .collect();
    if labels.len() <= ZONE_LIST_LIMIT {
        return labels.join(", ");
    }
    format!(
        "{} and {} more",
        labels[..ZONE_LIST_LIMIT].join(", "),
        labels.len() - ZONE_LIST_LIMIT
    )
}
