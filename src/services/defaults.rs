// services/defaults.rs - Starter labels and locations for a new group

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::{LabelCreate, LocationCreate};
use crate::database::Store;

/// The fixed label set every new group starts with.
pub fn default_labels() -> Vec<LabelCreate> {
    [
        ("Electronics", "#FF5733"),
        ("Books", "#33FF57"),
        ("Clothing", "#3357FF"),
        ("Tools", "#F3FF33"),
        ("Furniture", "#33FFF3"),
    ]
    .into_iter()
    .map(|(name, color)| LabelCreate {
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// The fixed location set every new group starts with.
pub fn default_locations() -> Vec<LocationCreate> {
    ["Home", "Garage", "Storage", "Office"]
        .into_iter()
        .map(|name| LocationCreate {
            name: name.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Label,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedFailure {
    pub kind: ResourceKind,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub labels_created: usize,
    pub locations_created: usize,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Best-effort: every item is attempted, failures are logged and collected.
pub async fn seed_group_defaults(store: &dyn Store, group_id: Uuid) -> SeedReport {
    let mut report = SeedReport::default();

    debug!(%group_id, "Creating default labels");
    for label in default_labels() {
        let name = label.name.clone();
        match store.create_label(group_id, label).await {
            Ok(_) => report.labels_created += 1,
            Err(e) => {
                warn!(%group_id, label = %name, error = %e, "Failed to create default label");
                report.failures.push(SeedFailure {
                    kind: ResourceKind::Label,
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    debug!(%group_id, "Creating default locations");
    for location in default_locations() {
        let name = location.name.clone();
        match store.create_location(group_id, location).await {
            Ok(_) => report.locations_created += 1,
            Err(e) => {
                warn!(%group_id, location = %name, error = %e, "Failed to create default location");
                report.failures.push(SeedFailure {
                    kind: ResourceKind::Location,
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
