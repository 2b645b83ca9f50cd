//! Shape template catalog shown in the sidebar.

use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Catalog bundled with the binary.
const BUNDLED_CATALOG: &str = include_str!("../assets/shapes.json");

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog has no templates")]
    Empty,
    #[error("Duplicate template id: {0}")]
    DuplicateId(u32),
}

/// A named entry in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
}

/// Ordered list of shape templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    templates: Vec<ShapeTemplate>,
}

impl Catalog {
    /// Load the catalog bundled with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse and validate a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<ShapeTemplate> = serde_json::from_str(json)?;
        Self::from_templates(templates)
    }

    pub fn from_templates(templates: Vec<ShapeTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.id) {
                return Err(CatalogError::DuplicateId(template.id));
            }
        }
        log::info!("Loaded catalog with {} templates", templates.len());
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[ShapeTemplate] {
        &self.templates
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeTemplate> {
        self.templates.iter()
    }

    /// Template by id.
    pub fn get(&self, id: u32) -> Option<&ShapeTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
