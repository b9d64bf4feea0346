// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire shapes exchanged with the persistence backend.
//!
//! Overlay geometry and style travel as JSON text inside the records (`position`, `points`,
//! `data`, `styles`), and the create request nests whole overlay arrays as JSON text. Node
//! references use [`NodeId`]'s wire form: a string for a temp id, a number for a server id.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    Node, NodeId, NodeLink, Overlay, OverlayBody, OverlayError, OverlayId, SphericalCoord,
    StyleMap,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarkerRecord {
    pub id: String,
    /// JSON `{"yaw": .., "pitch": ..}`.
    pub position: String,
    /// JSON object.
    pub styles: String,
    #[serde(default)]
    pub is_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub target_node_id: Option<NodeId>,
    #[serde(default)]
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolygonRecord {
    pub id: String,
    /// JSON array of `{"yaw": .., "pitch": ..}`.
    pub points: String,
    pub styles: String,
    #[serde(default)]
    pub is_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub target_node_id: Option<NodeId>,
    #[serde(default)]
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextRecord {
    pub id: String,
    pub position: String,
    /// JSON `{"content": .., "rotation_deg": ..}`.
    pub data: String,
    pub styles: String,
    #[serde(default)]
    pub is_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub target_node_id: Option<NodeId>,
    #[serde(default)]
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LinkRecord {
    #[schemars(with = "serde_json::Value")]
    pub target_node_id: NodeId,
    pub position: String,
}

/// One node of a create request. The overlay and link fields hold JSON arrays of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeDraft {
    pub temp_id: String,
    pub name: String,
    #[serde(default)]
    pub caption: String,
    pub scene_ref: String,
    pub is_start_node: bool,
    pub markers: String,
    pub polygons: String,
    pub texts: String,
    pub links: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SaveTourRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<NodeDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NodeIdAssignment {
    pub temp_id: String,
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreateTourResponse {
    pub success: bool,
    #[serde(default)]
    pub tour_id: Option<u64>,
    /// One entry per submitted node, echoing its temp id.
    #[serde(default)]
    pub nodes: Vec<NodeIdAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Full replacement of one existing node's overlays and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeOverlays {
    pub id: u64,
    pub markers: String,
    pub polygons: String,
    pub texts: String,
    pub links: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateOverlaysRequest {
    pub tour_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<NodeOverlays>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub caption: String,
    pub scene_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub start_node: bool,
    #[serde(default)]
    pub markers: Vec<MarkerRecord>,
    #[serde(default)]
    pub polygons: Vec<PolygonRecord>,
    #[serde(default)]
    pub texts: Vec<TextRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FetchedTour {
    pub tour_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TourSummary {
    pub tour_id: u64,
    pub title: String,
    pub nodes: u64,
    pub overlays: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextData {
    content: String,
    #[serde(default)]
    rotation_deg: f64,
}

/// Why one stored overlay or link could not be turned back into a model value.
#[derive(Debug)]
pub enum DecodeError {
    Json {
        field: &'static str,
        source: serde_json::Error,
    },
    InvalidId {
        id: String,
    },
    NonObjectStyle,
    Overlay(OverlayError),
    NonFiniteCoordinate,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { field, source } => write!(f, "cannot decode {field}: {source}"),
            Self::InvalidId { id } => write!(f, "invalid element id {id:?}"),
            Self::NonObjectStyle => f.write_str("styles is not a JSON object"),
            Self::Overlay(source) => write!(f, "invalid overlay: {source}"),
            Self::NonFiniteCoordinate => f.write_str("coordinate is not finite"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::Overlay(source) => Some(source),
            _ => None,
        }
    }
}

fn decode_field<T: serde::de::DeserializeOwned>(
    field: &'static str,
    raw: &str,
) -> Result<T, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError::Json { field, source })
}

fn decode_position(raw: &str) -> Result<SphericalCoord, DecodeError> {
    let position: SphericalCoord = decode_field("position", raw)?;
    if !position.is_finite() {
        return Err(DecodeError::NonFiniteCoordinate);
    }
    Ok(position)
}

fn decode_styles(raw: &str) -> Result<StyleMap, DecodeError> {
    // Older rows store an empty string when no style was chosen.
    if raw.trim().is_empty() {
        return Ok(StyleMap::new());
    }
    match decode_field::<serde_json::Value>("styles", raw)? {
        serde_json::Value::Object(map) => Ok(StyleMap::from(map)),
        serde_json::Value::Null => Ok(StyleMap::new()),
        _ => Err(DecodeError::NonObjectStyle),
    }
}

fn decode_id(raw: &str) -> Result<OverlayId, DecodeError> {
    OverlayId::new(raw).map_err(|_| DecodeError::InvalidId { id: raw.to_owned() })
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

impl MarkerRecord {
    pub fn decode(&self) -> Result<Overlay, DecodeError> {
        let overlay = Overlay::marker(
            decode_id(&self.id)?,
            decode_position(&self.position)?,
            decode_styles(&self.styles)?,
        );
        Ok(overlay
            .with_link_target(self.target_node_id.clone())
            .with_created_at(self.created_at))
    }
}

impl PolygonRecord {
    pub fn decode(&self) -> Result<Overlay, DecodeError> {
        let points: Vec<SphericalCoord> = decode_field("points", &self.points)?;
        let overlay = Overlay::polygon(decode_id(&self.id)?, points, decode_styles(&self.styles)?)
            .map_err(DecodeError::Overlay)?;
        Ok(overlay
            .with_link_target(self.target_node_id.clone())
            .with_created_at(self.created_at))
    }
}

impl TextRecord {
    pub fn decode(&self) -> Result<Overlay, DecodeError> {
        let data: TextData = decode_field("data", &self.data)?;
        let overlay = Overlay::text(
            decode_id(&self.id)?,
            decode_position(&self.position)?,
            data.content,
            decode_styles(&self.styles)?,
        )
        .with_rotation(data.rotation_deg);
        Ok(overlay
            .with_link_target(self.target_node_id.clone())
            .with_created_at(self.created_at))
    }
}

impl LinkRecord {
    pub fn decode(&self) -> Result<NodeLink, DecodeError> {
        Ok(NodeLink::new(
            self.target_node_id.clone(),
            decode_position(&self.position)?,
        ))
    }

    pub fn encode(link: &NodeLink) -> Result<Self, serde_json::Error> {
        Ok(Self {
            target_node_id: link.target().clone(),
            position: encode_json(&link.position())?,
        })
    }
}

/// One node's overlays and links in their stored, JSON-encoded form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedOverlays {
    pub markers: Vec<MarkerRecord>,
    pub polygons: Vec<PolygonRecord>,
    pub texts: Vec<TextRecord>,
    pub links: Vec<LinkRecord>,
}

impl EncodedOverlays {
    pub fn from_node(node: &Node) -> Result<Self, serde_json::Error> {
        let mut out = Self::default();
        for overlay in node.all_overlays() {
            let id = overlay.id().as_str().to_owned();
            let styles = encode_json(overlay.style())?;
            let target_node_id = overlay.link_target().cloned();
            let is_link = overlay.is_link();
            let created_at = overlay.created_at();
            match overlay.body() {
                OverlayBody::Marker(body) => out.markers.push(MarkerRecord {
                    id,
                    position: encode_json(&body.position)?,
                    styles,
                    is_link,
                    target_node_id,
                    created_at,
                }),
                OverlayBody::Polygon(body) => out.polygons.push(PolygonRecord {
                    id,
                    points: encode_json(&body.points)?,
                    styles,
                    is_link,
                    target_node_id,
                    created_at,
                }),
                OverlayBody::Text(body) => out.texts.push(TextRecord {
                    id,
                    position: encode_json(&body.position)?,
                    data: encode_json(&TextData {
                        content: body.content.clone(),
                        rotation_deg: body.rotation_deg,
                    })?,
                    styles,
                    is_link,
                    target_node_id,
                    created_at,
                }),
            }
        }
        for link in node.links() {
            out.links.push(LinkRecord::encode(link)?);
        }
        Ok(out)
    }

    /// Parses the four JSON array strings of a draft or update row.
    pub fn from_json(
        markers: &str,
        polygons: &str,
        texts: &str,
        links: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            markers: decode_array("markers", markers)?,
            polygons: decode_array("polygons", polygons)?,
            texts: decode_array("texts", texts)?,
            links: decode_array("links", links)?,
        })
    }

    pub fn to_json(&self) -> Result<[String; 4], serde_json::Error> {
        Ok([
            encode_json(&self.markers)?,
            encode_json(&self.polygons)?,
            encode_json(&self.texts)?,
            encode_json(&self.links)?,
        ])
    }

    pub fn overlay_count(&self) -> usize {
        self.markers.len() + self.polygons.len() + self.texts.len()
    }

    /// Rewrites every node reference in place.
    pub fn map_targets(&mut self, mut f: impl FnMut(&NodeId) -> NodeId) {
        let targets = self
            .markers
            .iter_mut()
            .filter_map(|r| r.target_node_id.as_mut())
            .chain(
                self.polygons
                    .iter_mut()
                    .filter_map(|r| r.target_node_id.as_mut()),
            )
            .chain(self.texts.iter_mut().filter_map(|r| r.target_node_id.as_mut()))
            .chain(self.links.iter_mut().map(|r| &mut r.target_node_id));
        for target in targets {
            *target = f(target);
        }
    }
}

fn decode_array<T: serde::de::DeserializeOwned>(
    field: &'static str,
    raw: &str,
) -> Result<Vec<T>, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    decode_field(field, raw)
}
