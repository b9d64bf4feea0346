// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::payload::{
    AckResponse, CreateTourResponse, EncodedOverlays, FetchedTour, NodeIdAssignment, NodeRecord,
    SaveTourRequest, TourSummary, UpdateOverlaysRequest,
};
use crate::model::{IdMap, ServerNodeId, TempNodeId, TourId};

#[derive(Debug)]
pub enum BackendError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    TourNotFound {
        tour_id: TourId,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::TourNotFound { tour_id } => write!(f, "tour {tour_id} not found"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::TourNotFound { .. } => None,
        }
    }
}

/// The persistence collaborator. Transport failures are `Err`; a backend that received the
/// request but refused it answers `success: false`.
#[async_trait]
pub trait TourBackend: Send + Sync {
    async fn create_tour(
        &self,
        request: SaveTourRequest,
    ) -> Result<CreateTourResponse, BackendError>;

    async fn fetch_tour(&self, tour_id: TourId) -> Result<FetchedTour, BackendError>;

    async fn update_overlays(
        &self,
        request: UpdateOverlaysRequest,
    ) -> Result<AckResponse, BackendError>;

    /// Removes a tour. Deleting an unknown tour succeeds.
    async fn delete_tour(&self, tour_id: TourId) -> Result<(), BackendError>;

    async fn list_tours(&self) -> Result<Vec<TourSummary>, BackendError>;
}

/// Server-side tour table shared by the bundled backends.
///
/// Ids come from monotonic counters and are never reused, even after a delete. Overlay fields
/// are kept in their JSON-encoded record form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourRecords {
    #[serde(default)]
    last_tour_id: u64,
    #[serde(default)]
    last_node_id: u64,
    #[serde(default)]
    tours: BTreeMap<u64, FetchedTour>,
}

impl TourRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty records whose first assigned ids are `first_tour_id` and `first_node_id`.
    pub fn with_first_ids(first_tour_id: u64, first_node_id: u64) -> Self {
        Self {
            last_tour_id: first_tour_id.saturating_sub(1),
            last_node_id: first_node_id.saturating_sub(1),
            tours: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Persists a new tour, assigning server ids in request order and rewriting every temp
    /// target in the encoded overlays. Nothing is written when the request is refused.
    pub fn create(&mut self, request: &SaveTourRequest) -> CreateTourResponse {
        if request.nodes.is_empty() {
            return create_rejected("tour has no nodes");
        }

        let mut id_map = IdMap::new();
        let mut assignments = Vec::with_capacity(request.nodes.len());
        let mut next_node_id = self.last_node_id;
        for draft in &request.nodes {
            let Ok(temp_id) = TempNodeId::new(&draft.temp_id) else {
                return create_rejected(format!("invalid temp id {:?}", draft.temp_id));
            };
            next_node_id += 1;
            if let Err(err) = id_map.insert(temp_id, ServerNodeId::new(next_node_id)) {
                return create_rejected(err.to_string());
            }
            assignments.push(NodeIdAssignment {
                temp_id: draft.temp_id.clone(),
                id: next_node_id,
            });
        }

        let mut nodes = Vec::with_capacity(request.nodes.len());
        for (draft, assignment) in request.nodes.iter().zip(&assignments) {
            let mut overlays = match EncodedOverlays::from_json(
                &draft.markers,
                &draft.polygons,
                &draft.texts,
                &draft.links,
            ) {
                Ok(overlays) => overlays,
                Err(err) => {
                    return create_rejected(format!("node {}: {err}", draft.temp_id));
                }
            };
            overlays.map_targets(|target| id_map.resolve(target));
            nodes.push(NodeRecord {
                id: assignment.id,
                name: draft.name.clone(),
                caption: draft.caption.clone(),
                scene_path: draft.scene_ref.clone(),
                thumbnail_path: None,
                start_node: draft.is_start_node,
                markers: overlays.markers,
                polygons: overlays.polygons,
                texts: overlays.texts,
                links: overlays.links,
            });
        }

        self.last_node_id = next_node_id;
        self.last_tour_id += 1;
        let tour_id = self.last_tour_id;
        self.tours.insert(
            tour_id,
            FetchedTour {
                tour_id,
                title: request.title.clone(),
                description: request.description.clone(),
                nodes,
            },
        );
        tracing::debug!(tour_id, nodes = assignments.len(), "tour created");

        CreateTourResponse {
            success: true,
            tour_id: Some(tour_id),
            nodes: assignments,
            message: None,
        }
    }

    pub fn fetch(&self, tour_id: TourId) -> Option<&FetchedTour> {
        self.tours.get(&tour_id.get())
    }

    /// Replaces the overlays and links of each listed node wholesale. Nodes that are not listed
    /// keep theirs.
    pub fn update(&mut self, request: &UpdateOverlaysRequest) -> AckResponse {
        let Some(tour) = self.tours.get_mut(&request.tour_id) else {
            return AckResponse::rejected(format!("tour {} not found", request.tour_id));
        };

        let mut replacements = Vec::with_capacity(request.nodes.len());
        for row in &request.nodes {
            if !tour.nodes.iter().any(|node| node.id == row.id) {
                return AckResponse::rejected(format!(
                    "node {} is not part of tour {}",
                    row.id, request.tour_id
                ));
            }
            match EncodedOverlays::from_json(&row.markers, &row.polygons, &row.texts, &row.links)
            {
                Ok(overlays) => replacements.push((row.id, overlays)),
                Err(err) => return AckResponse::rejected(format!("node {}: {err}", row.id)),
            }
        }

        for (node_id, overlays) in replacements {
            if let Some(node) = tour.nodes.iter_mut().find(|node| node.id == node_id) {
                node.markers = overlays.markers;
                node.polygons = overlays.polygons;
                node.texts = overlays.texts;
                node.links = overlays.links;
            }
        }
        tour.title = request.title.clone();
        tour.description = request.description.clone();
        tracing::debug!(tour_id = request.tour_id, nodes = request.nodes.len(), "tour updated");
        AckResponse::ok()
    }

    /// Returns whether a tour was removed.
    pub fn delete(&mut self, tour_id: TourId) -> bool {
        self.tours.remove(&tour_id.get()).is_some()
    }

    pub fn summaries(&self) -> Vec<TourSummary> {
        self.tours
            .values()
            .map(|tour| TourSummary {
                tour_id: tour.tour_id,
                title: tour.title.clone(),
                nodes: tour.nodes.len() as u64,
                overlays: tour
                    .nodes
                    .iter()
                    .map(|n| (n.markers.len() + n.polygons.len() + n.texts.len()) as u64)
                    .sum(),
            })
            .collect()
    }
}

fn create_rejected(message: impl Into<String>) -> CreateTourResponse {
    CreateTourResponse {
        success: false,
        tour_id: None,
        nodes: Vec::new(),
        message: Some(message.into()),
    }
}

/// Process-local backend holding [`TourRecords`] behind an async mutex.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<TourRecords>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: TourRecords) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub async fn snapshot(&self) -> TourRecords {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl TourBackend for MemoryBackend {
    async fn create_tour(
        &self,
        request: SaveTourRequest,
    ) -> Result<CreateTourResponse, BackendError> {
        Ok(self.records.lock().await.create(&request))
    }

    async fn fetch_tour(&self, tour_id: TourId) -> Result<FetchedTour, BackendError> {
        self.records
            .lock()
            .await
            .fetch(tour_id)
            .cloned()
            .ok_or(BackendError::TourNotFound { tour_id })
    }

    async fn update_overlays(
        &self,
        request: UpdateOverlaysRequest,
    ) -> Result<AckResponse, BackendError> {
        Ok(self.records.lock().await.update(&request))
    }

    async fn delete_tour(&self, tour_id: TourId) -> Result<(), BackendError> {
        self.records.lock().await.delete(tour_id);
        Ok(())
    }

    async fn list_tours(&self) -> Result<Vec<TourSummary>, BackendError> {
        Ok(self.records.lock().await.summaries())
    }
}

#[async_trait]
impl<B: TourBackend + ?Sized> TourBackend for std::sync::Arc<B> {
    async fn create_tour(
        &self,
        request: SaveTourRequest,
    ) -> Result<CreateTourResponse, BackendError> {
        (**self).create_tour(request).await
    }

    async fn fetch_tour(&self, tour_id: TourId) -> Result<FetchedTour, BackendError> {
        (**self).fetch_tour(tour_id).await
    }

    async fn update_overlays(
        &self,
        request: UpdateOverlaysRequest,
    ) -> Result<AckResponse, BackendError> {
        (**self).update_overlays(request).await
    }

    async fn delete_tour(&self, tour_id: TourId) -> Result<(), BackendError> {
        (**self).delete_tour(tour_id).await
    }

    async fn list_tours(&self) -> Result<Vec<TourSummary>, BackendError> {
        (**self).list_tours().await
    }
}
