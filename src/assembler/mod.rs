// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Save, load, update and delete of whole tours.
//!
//! Saving a new tour is two-phase: nodes are submitted under their temp ids, the backend
//! answers with one server id per temp id, and only after the whole answer checks out is the
//! resulting [`IdMap`] applied to the session ([`EditorSession::commit_save`]). The assembler
//! itself never mutates a [`NodeStore`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::editor::{EditorSession, Viewer};
use crate::model::{
    IdMap, IdMapError, Node, NodeId, NodeStore, OverlayKind, ServerNodeId, StoreOutcome,
    TempNodeId, TourId,
};

pub mod backend;
pub mod folder;
pub mod payload;

pub use backend::{BackendError, MemoryBackend, TourBackend, TourRecords};
pub use folder::{FolderBackend, WriteDurability};
pub use payload::{
    AckResponse, CreateTourResponse, DecodeError, EncodedOverlays, FetchedTour, LinkRecord,
    MarkerRecord, NodeDraft, NodeIdAssignment, NodeOverlays, NodeRecord, PolygonRecord,
    SaveTourRequest, TextRecord, TourSummary, UpdateOverlaysRequest,
};

#[derive(Debug)]
pub enum AssemblerError {
    SaveInFlight,
    LoadInFlight,
    Transport(BackendError),
    Rejected {
        message: String,
    },
    /// The create response did not assign every submitted temp id exactly once.
    IncompleteIdAssignment {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    IdAssignment(IdMapError),
    /// An update needs every node to carry a server id.
    UnsavedNode {
        node_id: NodeId,
    },
    /// A create cannot carry nodes that already have a server id.
    AlreadySaved {
        node_id: NodeId,
    },
    Encode(serde_json::Error),
    EmptyTour,
}

impl fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SaveInFlight => f.write_str("a save is already in progress"),
            Self::LoadInFlight => f.write_str("a load is already in progress"),
            Self::Transport(source) => write!(f, "backend unavailable: {source}"),
            Self::Rejected { message } => write!(f, "backend rejected the request: {message}"),
            Self::IncompleteIdAssignment {
                missing,
                unexpected,
            } => write!(
                f,
                "id assignment mismatch (missing: [{}], unexpected: [{}])",
                missing.join(", "),
                unexpected.join(", ")
            ),
            Self::IdAssignment(source) => write!(f, "invalid id assignment: {source}"),
            Self::UnsavedNode { node_id } => {
                write!(f, "node {node_id} has not been saved yet")
            }
            Self::AlreadySaved { node_id } => {
                write!(f, "node {node_id} already belongs to a saved tour")
            }
            Self::Encode(source) => write!(f, "cannot encode tour: {source}"),
            Self::EmptyTour => f.write_str("tour has no nodes"),
        }
    }
}

impl std::error::Error for AssemblerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(source) => Some(source),
            Self::IdAssignment(source) => Some(source),
            Self::Encode(source) => Some(source),
            _ => None,
        }
    }
}

impl From<BackendError> for AssemblerError {
    fn from(value: BackendError) -> Self {
        Self::Transport(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TourMeta {
    pub tour_id: Option<TourId>,
    pub title: String,
    pub description: String,
}

impl TourMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            tour_id: None,
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn with_tour_id(mut self, tour_id: TourId) -> Self {
        self.tour_id = Some(tour_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A successful save. The id map is empty for an update.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    tour_id: TourId,
    id_map: IdMap,
    created: bool,
}

impl SaveOutcome {
    pub fn tour_id(&self) -> TourId {
        self.tour_id
    }

    pub fn id_map(&self) -> &IdMap {
        &self.id_map
    }

    pub fn created(&self) -> bool {
        self.created
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkippedItem {
    Overlay { kind: OverlayKind, element_id: String },
    Link { index: usize },
}

/// A stored record dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub node_id: ServerNodeId,
    pub item: SkippedItem,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTour {
    pub meta: TourMeta,
    pub store: NodeStore,
    pub skipped: Vec<SkippedRecord>,
}

/// Holds an in-flight flag for the lifetime of one request.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TourAssembler<B> {
    backend: B,
    saving: AtomicBool,
    loading: AtomicBool,
}

impl<B: fmt::Debug> fmt::Debug for TourAssembler<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourAssembler")
            .field("backend", &self.backend)
            .field("saving", &self.is_saving())
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl<B> TourAssembler<B> {
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

impl<B: TourBackend> TourAssembler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            saving: AtomicBool::new(false),
            loading: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Saves `store`: creates a new tour when `meta.tour_id` is `None`, otherwise replaces the
    /// overlays of every node of the existing tour.
    ///
    /// A second call while one is pending fails with [`AssemblerError::SaveInFlight`].
    #[tracing::instrument(skip_all, fields(tour_id = ?meta.tour_id, nodes = store.len()))]
    pub async fn save(
        &self,
        meta: &TourMeta,
        store: &NodeStore,
    ) -> Result<SaveOutcome, AssemblerError> {
        let Some(_in_flight) = InFlight::acquire(&self.saving) else {
            tracing::warn!("save rejected: another save is in flight");
            return Err(AssemblerError::SaveInFlight);
        };
        if store.is_empty() {
            return Err(AssemblerError::EmptyTour);
        }
        let result = match meta.tour_id {
            None => self.create(meta, store).await,
            Some(tour_id) => self.update(tour_id, meta, store).await,
        };
        if let Err(err) = &result {
            tracing::warn!(%err, "save failed");
        }
        result
    }

    async fn create(
        &self,
        meta: &TourMeta,
        store: &NodeStore,
    ) -> Result<SaveOutcome, AssemblerError> {
        let request = build_save_request(meta, store)?;
        let submitted: Vec<String> = request.nodes.iter().map(|n| n.temp_id.clone()).collect();

        let response = self.backend.create_tour(request).await?;
        if !response.success {
            return Err(AssemblerError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "create failed".to_owned()),
            });
        }
        let Some(tour_id) = response.tour_id else {
            return Err(AssemblerError::Rejected {
                message: "response carries no tour id".to_owned(),
            });
        };
        let id_map = assignment_map(&submitted, &response.nodes)?;
        tracing::info!(tour_id, mapped = id_map.len(), "tour created");
        Ok(SaveOutcome {
            tour_id: TourId::new(tour_id),
            id_map,
            created: true,
        })
    }

    async fn update(
        &self,
        tour_id: TourId,
        meta: &TourMeta,
        store: &NodeStore,
    ) -> Result<SaveOutcome, AssemblerError> {
        let request = build_update_request(tour_id, meta, store)?;
        let response = self.backend.update_overlays(request).await?;
        if !response.success {
            return Err(AssemblerError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "update failed".to_owned()),
            });
        }
        tracing::info!(%tour_id, "tour updated");
        Ok(SaveOutcome {
            tour_id,
            id_map: IdMap::new(),
            created: false,
        })
    }

    /// Fetches a tour into a fresh store with the start node current.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, tour_id: TourId) -> Result<LoadedTour, AssemblerError> {
        let Some(_in_flight) = InFlight::acquire(&self.loading) else {
            return Err(AssemblerError::LoadInFlight);
        };
        let fetched = self.backend.fetch_tour(tour_id).await?;
        let loaded = decode_tour(fetched);
        tracing::info!(
            nodes = loaded.store.len(),
            skipped = loaded.skipped.len(),
            "tour loaded"
        );
        Ok(loaded)
    }

    pub async fn delete(&self, tour_id: TourId) -> Result<(), AssemblerError> {
        self.backend.delete_tour(tour_id).await?;
        tracing::info!(%tour_id, "tour deleted");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<TourSummary>, AssemblerError> {
        Ok(self.backend.list_tours().await?)
    }

    /// Saves the session's store and applies the id remap to the session on success.
    pub async fn save_session<V: Viewer>(
        &self,
        meta: &TourMeta,
        session: &mut EditorSession<V>,
    ) -> Result<SaveOutcome, AssemblerError> {
        let outcome = self.save(meta, session.store()).await?;
        session.commit_save(&outcome);
        Ok(outcome)
    }

    /// Loads a tour into the session, replacing its store, and returns the tour metadata.
    pub async fn load_session<V: Viewer>(
        &self,
        tour_id: TourId,
        session: &mut EditorSession<V>,
    ) -> Result<(TourMeta, Vec<SkippedRecord>), AssemblerError> {
        let loaded = self.load(tour_id).await?;
        Ok(session.open_tour(loaded))
    }
}

impl<V: Viewer> EditorSession<V> {
    /// Rewrites temp ids to the server ids a save assigned.
    pub fn commit_save(&mut self, outcome: &SaveOutcome) {
        self.apply_id_map(outcome.id_map());
    }

    pub fn open_tour(&mut self, loaded: LoadedTour) -> (TourMeta, Vec<SkippedRecord>) {
        self.replace_store(loaded.store);
        (loaded.meta, loaded.skipped)
    }
}

fn encode_overlays(node: &Node) -> Result<[String; 4], AssemblerError> {
    EncodedOverlays::from_node(node)
        .and_then(|encoded| encoded.to_json())
        .map_err(AssemblerError::Encode)
}

/// Builds the create request. Every node and every reference is in the temp namespace.
pub fn build_save_request(
    meta: &TourMeta,
    store: &NodeStore,
) -> Result<SaveTourRequest, AssemblerError> {
    let start = store.start_node_id();
    let mut nodes = Vec::with_capacity(store.len());
    for node in store.nodes() {
        let Some(temp_id) = node.id().as_temp() else {
            return Err(AssemblerError::AlreadySaved {
                node_id: node.id().clone(),
            });
        };
        let [markers, polygons, texts, links] = encode_overlays(node)?;
        nodes.push(NodeDraft {
            temp_id: temp_id.as_str().to_owned(),
            name: node.name().to_owned(),
            caption: node.caption().to_owned(),
            scene_ref: node.scene_ref().to_owned(),
            is_start_node: start == Some(node.id()),
            markers,
            polygons,
            texts,
            links,
        });
    }
    Ok(SaveTourRequest {
        title: meta.title.clone(),
        description: meta.description.clone(),
        nodes,
    })
}

pub fn build_update_request(
    tour_id: TourId,
    meta: &TourMeta,
    store: &NodeStore,
) -> Result<UpdateOverlaysRequest, AssemblerError> {
    let mut nodes = Vec::with_capacity(store.len());
    for node in store.nodes() {
        let Some(server_id) = node.id().as_server() else {
            return Err(AssemblerError::UnsavedNode {
                node_id: node.id().clone(),
            });
        };
        let [markers, polygons, texts, links] = encode_overlays(node)?;
        nodes.push(NodeOverlays {
            id: server_id.get(),
            markers,
            polygons,
            texts,
            links,
        });
    }
    Ok(UpdateOverlaysRequest {
        tour_id: tour_id.get(),
        title: meta.title.clone(),
        description: meta.description.clone(),
        nodes,
    })
}

/// Matches assignments to submitted temp ids by echo, not by position.
fn assignment_map(
    submitted: &[String],
    assignments: &[NodeIdAssignment],
) -> Result<IdMap, AssemblerError> {
    let mut id_map = IdMap::new();
    let mut unexpected = Vec::new();
    for assignment in assignments {
        if !submitted.contains(&assignment.temp_id) {
            unexpected.push(assignment.temp_id.clone());
            continue;
        }
        let Ok(temp_id) = TempNodeId::new(&assignment.temp_id) else {
            unexpected.push(assignment.temp_id.clone());
            continue;
        };
        id_map
            .insert(temp_id, ServerNodeId::new(assignment.id))
            .map_err(AssemblerError::IdAssignment)?;
    }
    let missing: Vec<String> = submitted
        .iter()
        .filter(|temp_id| {
            TempNodeId::new(temp_id.as_str())
                .map(|id| id_map.server_id(&id).is_none())
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(AssemblerError::IncompleteIdAssignment {
            missing,
            unexpected,
        });
    }
    Ok(id_map)
}

/// Builds a store from a fetched tour, skipping records that do not decode.
pub fn decode_tour(fetched: FetchedTour) -> LoadedTour {
    let mut store = NodeStore::new();
    let mut skipped = Vec::new();
    let mut flagged_start = None;

    for record in fetched.nodes {
        let server_id = ServerNodeId::new(record.id);
        let node_id = NodeId::Server(server_id);
        let mut node = Node::new(node_id.clone(), record.name, record.scene_path);
        node.set_caption(record.caption);
        node.set_thumbnail_ref(record.thumbnail_path);

        let mut skip = |item: SkippedItem, reason: String| {
            tracing::warn!(node_id = %server_id, ?item, %reason, "skipping malformed record");
            skipped.push(SkippedRecord {
                node_id: server_id,
                item,
                reason,
            });
        };

        let overlays = record
            .markers
            .iter()
            .map(|r| (OverlayKind::Marker, r.id.as_str(), r.decode()))
            .chain(
                record
                    .polygons
                    .iter()
                    .map(|r| (OverlayKind::Polygon, r.id.as_str(), r.decode())),
            )
            .chain(
                record
                    .texts
                    .iter()
                    .map(|r| (OverlayKind::Text, r.id.as_str(), r.decode())),
            );
        for (kind, element_id, decoded) in overlays {
            let item = || SkippedItem::Overlay {
                kind,
                element_id: element_id.to_owned(),
            };
            match decoded {
                Ok(overlay) if node.find_overlay(overlay.id()).is_some() => {
                    skip(item(), "duplicate element id".to_owned());
                }
                Ok(overlay) => node.overlays_mut(kind).push(overlay),
                Err(err) => skip(item(), err.to_string()),
            }
        }

        for (index, link) in record.links.iter().enumerate() {
            match link.decode() {
                Ok(link) => node.links_mut().push(link),
                Err(err) => skip(SkippedItem::Link { index }, err.to_string()),
            }
        }

        if record.start_node && flagged_start.is_none() {
            flagged_start = Some(node_id.clone());
        }
        if store.push_node(node) != StoreOutcome::Ok {
            tracing::warn!(node_id = %server_id, "skipping duplicate node record");
        }
    }

    let start = flagged_start.or_else(|| store.nodes().first().map(|n| n.id().clone()));
    if let Some(start) = start {
        let _ = store.set_start_node(&start);
        let _ = store.set_current_node_id(&start);
    }

    LoadedTour {
        meta: TourMeta {
            tour_id: Some(TourId::new(fetched.tour_id)),
            title: fetched.title,
            description: fetched.description,
        },
        store,
        skipped,
    }
}
