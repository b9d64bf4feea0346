// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tourgraph: the editing core of a 360° panorama tour builder.
//!
//! A tour is a graph of panorama nodes carrying markers, polygons and text labels. Edits go
//! through an [`editor::EditorSession`] with a bounded undo log; [`assembler::TourAssembler`]
//! saves and loads whole tours against a [`assembler::TourBackend`].

pub mod assembler;
pub mod editor;
pub mod history;
pub mod model;
