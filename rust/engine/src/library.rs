//! Point-in-time snapshots of the authored rule library.
//!
//! Stores hand out whole snapshots; evaluation never goes back to the store
//! mid-call. [`CachedStore`] keeps the last snapshot around until told the
//! underlying rules changed.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::LibraryError;
use crate::format::GameProfile;
use crate::rules::TagRule;

pub type TagId = i64;
pub type SpotId = i64;
pub type DocumentId = i64;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TagDocumentLink {
    pub tag_id: TagId,
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A spot condition as stored: a kind plus kind-specific JSON params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRule {
    pub id: i64,
    pub spot_id: SpotId,
    pub condition_type: String,
    #[serde(default)]
    pub condition_params: serde_json::Value,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpotDocumentLink {
    pub spot_id: SpotId,
    pub document_id: DocumentId,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpotProfileLink {
    pub spot_id: SpotId,
    pub profile_name: String,
}

/// Everything the tag classifier reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagLibrary {
    pub tags: Vec<Tag>,
    pub rules: Vec<TagRule>,
    pub documents: Vec<Document>,
    pub links: Vec<TagDocumentLink>,
}

impl TagLibrary {
    /// Rules grouped by owning tag, in load order within each tag.
    pub fn rules_by_tag(&self) -> BTreeMap<TagId, Vec<&TagRule>> {
        let mut grouped: BTreeMap<TagId, Vec<&TagRule>> = BTreeMap::new();
        for rule in &self.rules {
            grouped.entry(rule.tag_id).or_default().push(rule);
        }
        grouped
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn documents_for_tag(&self, tag_id: TagId) -> Vec<&Document> {
        self.links
            .iter()
            .filter(|l| l.tag_id == tag_id)
            .filter_map(|l| self.document(l.document_id))
            .collect()
    }
}

/// Everything the spot resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotLibrary {
    pub spots: Vec<Spot>,
    pub rules: Vec<SpotRule>,
    pub documents: Vec<Document>,
    pub links: Vec<SpotDocumentLink>,
    #[serde(default)]
    pub profiles: Vec<GameProfile>,
    #[serde(default)]
    pub profile_links: Vec<SpotProfileLink>,
}

impl SpotLibrary {
    pub fn rules_by_spot(&self) -> BTreeMap<SpotId, Vec<&SpotRule>> {
        let mut grouped: BTreeMap<SpotId, Vec<&SpotRule>> = BTreeMap::new();
        for rule in &self.rules {
            grouped.entry(rule.spot_id).or_default().push(rule);
        }
        grouped
    }

    pub fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Linked documents, the default one first.
    pub fn documents_for_spot(&self, spot_id: SpotId) -> Vec<&Document> {
        let mut links: Vec<&SpotDocumentLink> =
            self.links.iter().filter(|l| l.spot_id == spot_id).collect();
        links.sort_by_key(|l| !l.is_default);
        links
            .into_iter()
            .filter_map(|l| self.document(l.document_id))
            .collect()
    }

    /// The document marked default for a spot, if any.
    pub fn default_document(&self, spot_id: SpotId) -> Option<&Document> {
        self.links
            .iter()
            .find(|l| l.spot_id == spot_id && l.is_default)
            .and_then(|l| self.document(l.document_id))
    }

    pub fn profile(&self, name: &str) -> Option<&GameProfile> {
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Spots assigned to the named game profile.
    pub fn spots_for_profile(&self, profile_name: &str) -> Vec<&Spot> {
        self.spots
            .iter()
            .filter(|s| {
                self.profile_links.iter().any(|l| {
                    l.spot_id == s.id && l.profile_name.eq_ignore_ascii_case(profile_name)
                })
            })
            .collect()
    }
}

/// The whole library in one serializable value; also an in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tag_rules: Vec<TagRule>,
    #[serde(default)]
    pub tag_documents: Vec<TagDocumentLink>,
    #[serde(default)]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub spot_rules: Vec<SpotRule>,
    #[serde(default)]
    pub spot_documents: Vec<SpotDocumentLink>,
    #[serde(default)]
    pub profiles: Vec<GameProfile>,
    #[serde(default)]
    pub spot_profiles: Vec<SpotProfileLink>,
}

impl LibrarySnapshot {
    pub fn tag_library(&self) -> TagLibrary {
        TagLibrary {
            tags: self.tags.clone(),
            rules: self.tag_rules.clone(),
            documents: self.documents.clone(),
            links: self.tag_documents.clone(),
        }
    }

    pub fn spot_library(&self) -> SpotLibrary {
        SpotLibrary {
            spots: self.spots.clone(),
            rules: self.spot_rules.clone(),
            documents: self.documents.clone(),
            links: self.spot_documents.clone(),
            profiles: self.profiles.clone(),
            profile_links: self.spot_profiles.clone(),
        }
    }
}

/// Bulk reads of the authored library. The only blocking step of an evaluation.
pub trait LibraryStore {
    fn load_tag_library(&self) -> Result<TagLibrary, LibraryError>;
    fn load_spot_library(&self) -> Result<SpotLibrary, LibraryError>;
}

impl LibraryStore for LibrarySnapshot {
    fn load_tag_library(&self) -> Result<TagLibrary, LibraryError> {
        Ok(self.tag_library())
    }

    fn load_spot_library(&self) -> Result<SpotLibrary, LibraryError> {
        Ok(self.spot_library())
    }
}

impl<S: LibraryStore + ?Sized> LibraryStore for &S {
    fn load_tag_library(&self) -> Result<TagLibrary, LibraryError> {
        (**self).load_tag_library()
    }

    fn load_spot_library(&self) -> Result<SpotLibrary, LibraryError> {
        (**self).load_spot_library()
    }
}

/// Memoizes snapshots from an inner store until [`CachedStore::invalidate`] is called.
///
/// No change notification exists; whoever edits the rules must invalidate.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    tags: Mutex<Option<TagLibrary>>,
    spots: Mutex<Option<SpotLibrary>>,
}

impl<S: LibraryStore> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            tags: Mutex::new(None),
            spots: Mutex::new(None),
        }
    }

    pub fn invalidate(&self) {
        *lock(&self.tags) = None;
        *lock(&self.spots) = None;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

// A poisoned cache only means a previous load panicked; the data is still usable.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl<S: LibraryStore> LibraryStore for CachedStore<S> {
    fn load_tag_library(&self) -> Result<TagLibrary, LibraryError> {
        let mut slot = lock(&self.tags);
        if let Some(lib) = slot.as_ref() {
            return Ok(lib.clone());
        }
        let lib = self.inner.load_tag_library()?;
        *slot = Some(lib.clone());
        Ok(lib)
    }

    fn load_spot_library(&self) -> Result<SpotLibrary, LibraryError> {
        let mut slot = lock(&self.spots);
        if let Some(lib) = slot.as_ref() {
            return Ok(lib.clone());
        }
        let lib = self.inner.load_spot_library()?;
        *slot = Some(lib.clone());
        Ok(lib)
    }
}
