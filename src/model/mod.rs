// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Document data model

pub mod document;
pub mod entity_id;

pub use document::{Document, Shape, ShapeSnapshot, read_document, write_document};
pub use entity_id::{CurveId, OriginTag, ShapeId};
