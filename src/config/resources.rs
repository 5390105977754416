//! Resource definitions from a CSV config file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One configured resource: an id and its service-queue capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Resource identifier.
    pub id: String,
    /// Service-queue capacity. Zero is legal (nothing can be allocated).
    pub capacity: usize,
}

impl ResourceSpec {
    /// Reject definitions that cannot name a usable resource.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("resource id must not be empty".into());
        }
        Ok(())
    }
}

/// Built-in resource set used when no config file yields any valid rows.
pub fn default_resource_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            id: "Room 1".into(),
            capacity: 5,
        },
        ResourceSpec {
            id: "Room 2".into(),
            capacity: 3,
        },
        ResourceSpec {
            id: "Room 3".into(),
            capacity: 4,
        },
    ]
}

/// Read resource definitions from a CSV file of `id,capacity` rows.
///
/// An optional `Name,...` header row and any malformed row (fewer than two
/// fields, or a capacity that is not an unsigned integer) are skipped. A
/// missing file, or a file that yields no valid rows, falls back to
/// [`default_resource_specs`].
pub fn load_resource_specs(path: impl AsRef<Path>) -> Vec<ResourceSpec> {
    let path = path.as_ref();
    let mut specs = Vec::new();

    if let Ok(contents) = std::fs::read_to_string(path) {
        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 2 || fields[0] == "Name" {
                continue;
            }
            let Ok(capacity) = fields[1].parse::<usize>() else {
                continue;
            };
            specs.push(ResourceSpec {
                id: fields[0].to_string(),
                capacity,
            });
        }
    }

    if specs.is_empty() {
        debug!(path = %path.display(), "no usable resource config, using defaults");
        return default_resource_specs();
    }
    specs
}
