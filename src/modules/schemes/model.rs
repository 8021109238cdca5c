use serde::Serialize;
use serde_json::Value;

use crate::services::beckn::{Item, Provider};

const UNTITLED: &str = "Untitled Scheme";
const DEFAULT_PROVIDER: &str = "Government";

/// A government scheme flattened out of its catalog entry for listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scheme {
    pub id: Option<String>,
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    pub provider_name: String,
    pub categories: Vec<String>,
    pub fulfillments: Vec<String>,
    pub images: Vec<Value>,
    /// Untouched catalog entry, kept for detail views.
    pub original: Item,
}

impl Scheme {
    pub fn from_item(item: Item, provider_name: &str) -> Self {
        let descriptor = item.descriptor.clone().unwrap_or_default();

        let categories = item
            .tags
            .iter()
            .filter_map(|tag| tag.descriptor.as_ref()?.name.clone())
            .filter(|name| !name.is_empty())
            .collect();

        let fulfillments = item
            .tags
            .iter()
            .flat_map(|tag| tag.list.iter())
            .filter_map(|entry| {
                entry
                    .descriptor
                    .as_ref()
                    .and_then(|d| d.name.clone())
                    .filter(|name| !name.is_empty())
                    .or_else(|| entry.value.clone())
            })
            .filter(|value| !value.is_empty())
            .collect();

        Self {
            id: item.id.clone(),
            title: descriptor
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            short_desc: descriptor.short_desc.unwrap_or_default(),
            long_desc: descriptor.long_desc.unwrap_or_default(),
            provider_name: provider_name.to_string(),
            categories,
            fulfillments,
            images: descriptor.images,
            original: item,
        }
    }

    pub fn from_provider(provider: Provider) -> Vec<Self> {
        let provider_name = provider
            .descriptor
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PROVIDER)
            .to_string();

        provider
            .items
            .into_iter()
            .map(|item| Scheme::from_item(item, &provider_name))
            .collect()
    }
}
