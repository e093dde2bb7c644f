//! Ordered collection of resolved catalogs awaiting the merge
//!
//! Catalogs are collected in waves: catalogs of BOMs imported directly by a
//! project, platform passes (the requested core version first, then each
//! upstream version) and finally the community catalogs of every known core
//! version. Within a wave catalogs are ranked by registry, platform, stream,
//! release and member, in the order the platform catalogs declare them. A
//! stable sort over [`CollectionKey`] gives the merge order, so the first
//! catalog to provide an extension is the most preferred one.

use keel_core::types::{ExtensionCatalog, OriginPreference};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Collection wave a catalog belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Catalogs of BOMs a project imports that belong to no platform release
    Direct,
    /// Platform member catalogs of the n-th version pass
    Platform { pass: u32 },
    /// Non-platform catalogs compatible with a core version
    Community { compatibility_code: u32 },
}

/// Sort key of a collected catalog
///
/// The origin preference carries no stream, so the stream's position in its
/// platform is kept alongside and ranks between platform and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionKey {
    pub stage: Stage,
    pub stream_index: u32,
    pub preference: OriginPreference,
}

impl CollectionKey {
    fn rank(&self) -> (Stage, u32, u32, u32, u32, u32, u32) {
        let p = &self.preference;
        (
            self.stage,
            p.registry_index,
            p.platform_index,
            self.stream_index,
            p.release_index,
            p.member_index,
            p.compatibility_code,
        )
    }
}

impl Ord for CollectionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for CollectionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct CatalogArena {
    entries: Vec<(CollectionKey, ExtensionCatalog)>,
}

impl CatalogArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank `catalog` with `preference` and collect it under `stage`
    pub fn push(
        &mut self,
        stage: Stage,
        stream_index: u32,
        preference: OriginPreference,
        mut catalog: ExtensionCatalog,
    ) {
        catalog.set_origin_preference(preference);
        self.entries.push((
            CollectionKey {
                stage,
                stream_index,
                preference,
            },
            catalog,
        ));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalogs in merge order
    ///
    /// A catalog collected more than once (e.g. a preferred platform served
    /// by several registries) is kept at its best position only.
    pub fn into_sorted(mut self) -> Vec<ExtensionCatalog> {
        self.entries.sort_by_key(|(key, _)| *key);
        let mut seen = HashSet::new();
        self.entries
            .into_iter()
            .map(|(_, c)| c)
            .filter(|c| seen.insert(c.id.clone()))
            .collect()
    }
}
