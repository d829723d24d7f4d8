//! Resource registry and the resources served by this server.

pub mod server_info;

use std::{collections::BTreeMap, fmt, sync::Arc};

use rmcp::model::{
    AnnotateAble, ErrorData, RawResource, ReadResourceResult, Resource, ResourceContents,
};
use serde_json::json;

use crate::lib::errors::RegistryError;

/// Produces the resource body on every read.
pub type ResourceSupplier = Arc<dyn Fn() -> Result<String, serde_json::Error> + Send + Sync>;

/// A URI-addressed, read-only content supplier.
#[derive(Clone)]
pub struct ResourceDefinition {
    pub name: &'static str,
    pub uri: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub supplier: ResourceSupplier,
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("name", &self.name)
            .field("uri", &self.uri)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

impl ResourceDefinition {
    fn to_resource(&self) -> Resource {
        let mut raw = RawResource::new(self.uri, self.name);
        raw.title = Some(self.title.to_string());
        raw.description = Some(self.description.to_string());
        raw.mime_type = Some(self.mime_type.to_string());
        raw.no_annotation()
    }
}

/// Keyed by URI. Read-only after construction.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: BTreeMap<&'static str, ResourceDefinition>,
}

impl ResourceRegistry {
    /// Duplicate names or URIs are rejected.
    pub fn register(&mut self, definition: ResourceDefinition) -> Result<(), RegistryError> {
        let clash = self.entries.contains_key(definition.uri)
            || self
                .entries
                .values()
                .any(|existing| existing.name == definition.name);
        if clash {
            return Err(RegistryError::Duplicate {
                kind: "resource",
                name: definition.name.to_string(),
            });
        }
        self.entries.insert(definition.uri, definition);
        Ok(())
    }

    pub fn uris(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn list(&self) -> Vec<Resource> {
        self.entries
            .values()
            .map(ResourceDefinition::to_resource)
            .collect()
    }

    /// Invoke the supplier registered for `uri`.
    pub fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let definition = self.entries.get(uri).ok_or_else(|| {
            ErrorData::resource_not_found(
                "No resource is registered under this URI",
                Some(json!({ "uri": uri })),
            )
        })?;

        let text = (definition.supplier)().map_err(|err| {
            ErrorData::internal_error(
                "Failed to produce resource contents",
                Some(json!({ "uri": uri, "reason": err.to_string() })),
            )
        })?;

        let mut contents = ResourceContents::text(text, definition.uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(definition.mime_type.to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}
