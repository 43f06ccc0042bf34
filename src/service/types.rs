// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire contract of the map/block backend.
//!
//! Ids and timestamps stay plain strings here; the sync layer converts them
//! into typed model values when a map is hydrated into a note.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapResponse {
    pub map_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub map_id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMapsResponse {
    pub maps: Vec<MapSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMap {
    pub map_id: String,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub blocks: Vec<BackendBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendBlock {
    pub block_id: String,
    pub title: String,
    #[serde(default)]
    pub parent_block_id: Option<String>,
    pub is_finalized: bool,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub reformatted_content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub messages: Option<Vec<BackendMessage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockResponse {
    pub block_id: String,
    pub title: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeBlockResponse {
    pub summary: String,
    pub reformatted_content: String,
}

/// Structured error body some endpoints return alongside a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
