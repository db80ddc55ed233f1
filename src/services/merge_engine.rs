//! Merge engine
//!
//! Collects the documents produced by successful probes into one figment.
//! Maps are unioned level by level; scalars and arrays collide, and the
//! [`MergePolicy`] picks the winner by load order.

use figment::value::{Dict, Map, Value};
use figment::{Error, Figment, Metadata, Profile, Provider};

use crate::domain::models::{MergePolicy, Source};

/// One probed document, fed to figment as a provider
#[derive(Debug, Clone)]
pub struct SourceLayer {
    pub source: Source,
    /// Path or URL the document was read from
    pub location: String,
    pub data: Dict,
}

impl Provider for SourceLayer {
    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::named(self.source.as_str());
        metadata.source = Some(figment::Source::Custom(self.location.clone()));
        metadata
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut map = Map::new();
        map.insert(Profile::Default, self.data.clone());
        Ok(map)
    }
}

/// Flat dotted-key view over every loaded source
#[derive(Debug)]
pub struct MergeEngine {
    policy: MergePolicy,
    figment: Figment,
    layers: Vec<SourceLayer>,
}

impl MergeEngine {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            figment: Figment::new(),
            layers: Vec::new(),
        }
    }

    /// Add a source on top of everything loaded so far
    pub fn load(&mut self, layer: SourceLayer) {
        let figment = std::mem::replace(&mut self.figment, Figment::new());
        self.figment = match self.policy {
            MergePolicy::LastLoadedWins => figment.merge(layer.clone()),
            MergePolicy::FirstLoadedWins => figment.join(layer.clone()),
        };
        self.layers.push(layer);
    }

    /// Sources loaded so far, in load order
    pub fn loaded_sources(&self) -> Vec<Source> {
        self.layers.iter().map(|layer| layer.source).collect()
    }

    /// Value at a dotted key; keys are case-insensitive
    pub fn find(&self, key: &str) -> Option<Value> {
        if self.layers.is_empty() {
            return None;
        }
        self.figment.find_value(&key.to_lowercase()).ok()
    }

    /// Source that supplied the value currently visible at `key`
    pub fn origin(&self, key: &str) -> Option<Source> {
        let path = key.to_lowercase();
        let contains = |layer: &&SourceLayer| lookup_path(&layer.data, &path).is_some();

        match self.policy {
            MergePolicy::LastLoadedWins => self.layers.iter().rev().find(contains),
            MergePolicy::FirstLoadedWins => self.layers.iter().find(contains),
        }
        .map(|layer| layer.source)
    }

    /// Every leaf key of the merged document, dotted and sorted
    pub fn keys(&self) -> Vec<String> {
        let merged: Dict = if self.layers.is_empty() {
            Dict::new()
        } else {
            self.figment.extract().unwrap_or_default()
        };

        let mut keys = Vec::new();
        collect_keys(&merged, "", &mut keys);
        keys.sort();
        keys
    }
}

fn lookup_path<'a>(dict: &'a Dict, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = dict.get(segments.next()?)?;
    for segment in segments {
        current = current.as_dict()?.get(segment)?;
    }
    Some(current)
}

fn collect_keys(dict: &Dict, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in dict {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Dict(_, nested) if !nested.is_empty() => collect_keys(nested, &path, keys),
            _ => keys.push(path),
        }
    }
}
