// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::ids::{NodeId, ServerNodeId, TempNodeId};

/// Bijective temp-id → server-id assignment produced by a save round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    forward: BTreeMap<TempNodeId, ServerNodeId>,
    reverse: BTreeMap<ServerNodeId, TempNodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdMapError {
    DuplicateTemp {
        temp_id: TempNodeId,
    },
    DuplicateServer {
        server_id: ServerNodeId,
        first: TempNodeId,
        second: TempNodeId,
    },
}

impl fmt::Display for IdMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTemp { temp_id } => {
                write!(f, "temp id {temp_id} was assigned more than once")
            }
            Self::DuplicateServer {
                server_id,
                first,
                second,
            } => write!(
                f,
                "server id {server_id} was assigned to both {first} and {second}"
            ),
        }
    }
}

impl std::error::Error for IdMapError {}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        temp_id: TempNodeId,
        server_id: ServerNodeId,
    ) -> Result<(), IdMapError> {
        if self.forward.contains_key(&temp_id) {
            return Err(IdMapError::DuplicateTemp { temp_id });
        }
        if let Some(first) = self.reverse.get(&server_id) {
            return Err(IdMapError::DuplicateServer {
                server_id,
                first: first.clone(),
                second: temp_id,
            });
        }
        self.forward.insert(temp_id.clone(), server_id);
        self.reverse.insert(server_id, temp_id);
        Ok(())
    }

    pub fn server_id(&self, temp_id: &TempNodeId) -> Option<ServerNodeId> {
        self.forward.get(temp_id).copied()
    }

    pub fn temp_id(&self, server_id: ServerNodeId) -> Option<&TempNodeId> {
        self.reverse.get(&server_id)
    }

    /// Maps a temp reference to its server id; server ids and unknown temp ids pass through.
    pub fn resolve(&self, node_id: &NodeId) -> NodeId {
        match node_id {
            NodeId::Temp(temp) => self
                .server_id(temp)
                .map(NodeId::Server)
                .unwrap_or_else(|| node_id.clone()),
            NodeId::Server(_) => node_id.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TempNodeId, ServerNodeId)> {
        self.forward.iter().map(|(temp, server)| (temp, *server))
    }
}
