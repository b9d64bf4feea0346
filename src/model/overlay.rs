// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coord::{centroid, rotate_about, CoordDelta, SphericalCoord};
use super::ids::{NodeId, OverlayId};

pub const MIN_POLYGON_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Marker,
    Polygon,
    Text,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 3] = [Self::Marker, Self::Polygon, Self::Text];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polygon => "polygon",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering attributes for an overlay.
///
/// The core never interprets these; they go to the viewer and to persistence unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(Map<String, Value>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for StyleMap {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBody {
    pub position: SphericalCoord,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonBody {
    pub points: Vec<SphericalCoord>,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub position: SphericalCoord,
    pub content: String,
    pub rotation_deg: f64,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayBody {
    Marker(MarkerBody),
    Polygon(PolygonBody),
    Text(TextBody),
}

impl OverlayBody {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Marker(_) => OverlayKind::Marker,
            Self::Polygon(_) => OverlayKind::Polygon,
            Self::Text(_) => OverlayKind::Text,
        }
    }

    pub fn style(&self) -> &StyleMap {
        match self {
            Self::Marker(body) => &body.style,
            Self::Polygon(body) => &body.style,
            Self::Text(body) => &body.style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    TooFewPoints { count: usize },
    NonFiniteCoordinate,
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { count } => write!(
                f,
                "a polygon needs at least {MIN_POLYGON_POINTS} points (got {count})"
            ),
            Self::NonFiniteCoordinate => f.write_str("coordinate is not finite"),
        }
    }
}

impl std::error::Error for OverlayError {}

/// An annotation attached to one node: a marker, a polygon or a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    id: OverlayId,
    link_target: Option<NodeId>,
    created_at: u64,
    body: OverlayBody,
}

impl Overlay {
    pub fn marker(id: OverlayId, position: SphericalCoord, style: StyleMap) -> Self {
        Self::from_body(id, OverlayBody::Marker(MarkerBody { position, style }))
    }

    pub fn polygon(
        id: OverlayId,
        points: Vec<SphericalCoord>,
        style: StyleMap,
    ) -> Result<Self, OverlayError> {
        if points.len() < MIN_POLYGON_POINTS {
            return Err(OverlayError::TooFewPoints {
                count: points.len(),
            });
        }
        if !points.iter().all(SphericalCoord::is_finite) {
            return Err(OverlayError::NonFiniteCoordinate);
        }
        Ok(Self::from_body(
            id,
            OverlayBody::Polygon(PolygonBody { points, style }),
        ))
    }

    pub fn text(
        id: OverlayId,
        position: SphericalCoord,
        content: impl Into<String>,
        style: StyleMap,
    ) -> Self {
        Self::from_body(
            id,
            OverlayBody::Text(TextBody {
                position,
                content: content.into(),
                rotation_deg: 0.0,
                style,
            }),
        )
    }

    fn from_body(id: OverlayId, body: OverlayBody) -> Self {
        Self {
            id,
            link_target: None,
            created_at: 0,
            body,
        }
    }

    pub fn with_link_target(mut self, target: Option<NodeId>) -> Self {
        self.link_target = target;
        self
    }

    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        if let OverlayBody::Text(body) = &mut self.body {
            body.rotation_deg = rotation_deg;
        }
        self
    }

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.body.kind()
    }

    pub fn body(&self) -> &OverlayBody {
        &self.body
    }

    pub fn style(&self) -> &StyleMap {
        self.body.style()
    }

    pub fn link_target(&self) -> Option<&NodeId> {
        self.link_target.as_ref()
    }

    pub fn set_link_target(&mut self, target: Option<NodeId>) {
        self.link_target = target;
    }

    pub fn is_link(&self) -> bool {
        self.link_target.is_some()
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// The point a drag or rotation is measured from.
    pub fn anchor(&self) -> SphericalCoord {
        match &self.body {
            OverlayBody::Marker(body) => body.position,
            OverlayBody::Text(body) => body.position,
            OverlayBody::Polygon(body) => centroid(&body.points).unwrap_or_default(),
        }
    }

    /// Moves the overlay by `delta`, stopping at the poles without distorting polygons.
    ///
    /// Returns `false` and leaves the overlay untouched for a non-finite delta.
    pub fn translate(&mut self, delta: CoordDelta) -> bool {
        if !delta.is_finite() {
            return false;
        }
        match &mut self.body {
            OverlayBody::Marker(body) => {
                let delta = delta.clamped_for(std::slice::from_ref(&body.position));
                body.position = body.position.offset(delta);
            }
            OverlayBody::Text(body) => {
                let delta = delta.clamped_for(std::slice::from_ref(&body.position));
                body.position = body.position.offset(delta);
            }
            OverlayBody::Polygon(body) => {
                let delta = delta.clamped_for(&body.points);
                for point in &mut body.points {
                    *point = point.offset(delta);
                }
            }
        }
        true
    }

    /// Rotates polygons about their centroid and turns text labels in place.
    ///
    /// Returns `false` for markers, which have no orientation, and for a non-finite angle.
    pub fn rotate(&mut self, angle_rad: f64) -> bool {
        if !angle_rad.is_finite() {
            return false;
        }
        match &mut self.body {
            OverlayBody::Marker(_) => false,
            OverlayBody::Text(body) => {
                body.rotation_deg = (body.rotation_deg + angle_rad.to_degrees()).rem_euclid(360.0);
                true
            }
            OverlayBody::Polygon(body) => {
                let Some(center) = centroid(&body.points) else {
                    return false;
                };
                for point in &mut body.points {
                    *point = rotate_about(*point, center, angle_rad);
                }
                true
            }
        }
    }
}
