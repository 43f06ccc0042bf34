// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! AI capability layer.
//!
//! Two implementations, a mock generator and a backend REST client, sit
//! behind one tagged provider type, selected by a factory that health-checks
//! the backend with a cached verdict. Operations one variant does not
//! implement fail with a typed `Unsupported` error instead of being probed
//! for.

pub mod backend;
pub mod error;
pub mod factory;
pub mod mock;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use backend::BackendAi;
pub use error::ServiceError;
pub use factory::AiServiceFactory;
pub use mock::MockAi;
pub use types::{
    BackendBlock, BackendMap, BackendMessage, CreateBlockResponse, CreateMapResponse,
    FinalizeBlockResponse, MapSummary, SendMessageResponse, UserMapsResponse,
};

use crate::model::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    Backend,
}

/// The resolved AI service: mock generator or backend REST client.
///
/// `send_message` is the shared core; map/block operations exist only on the
/// backend and the legacy `generate_notes` only on the mock. Calling an
/// operation the variant lacks returns `ServiceError::Unsupported`
/// synchronously with respect to the network (no request is made).
#[derive(Debug, Clone)]
pub enum AiProvider {
    Mock(MockAi),
    Backend(BackendAi),
}

impl AiProvider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Mock(_) => ProviderKind::Mock,
            Self::Backend(_) => ProviderKind::Backend,
        }
    }

    /// Sends a message and returns the assistant reply. The target is a block
    /// id for the backend; the mock ignores it.
    pub async fn send_message(
        &self,
        target_id: &str,
        message: &str,
    ) -> Result<String, ServiceError> {
        match self {
            Self::Mock(mock) => mock.send_message(target_id, message).await,
            Self::Backend(backend) => backend.send_message(target_id, message).await,
        }
    }

    pub async fn create_map(&self, message: &str) -> Result<CreateMapResponse, ServiceError> {
        match self {
            Self::Backend(backend) => backend.create_map(message).await,
            Self::Mock(_) => Err(ServiceError::Unsupported {
                operation: "create_map",
            }),
        }
    }

    pub async fn get_user_maps(&self) -> Result<UserMapsResponse, ServiceError> {
        match self {
            Self::Backend(backend) => backend.get_user_maps().await,
            Self::Mock(_) => Err(ServiceError::Unsupported {
                operation: "get_user_maps",
            }),
        }
    }

    pub async fn get_map(&self, map_id: &str) -> Result<BackendMap, ServiceError> {
        match self {
            Self::Backend(backend) => backend.get_map(map_id).await,
            Self::Mock(_) => Err(ServiceError::Unsupported {
                operation: "get_map",
            }),
        }
    }

    pub async fn create_block(
        &self,
        map_id: &str,
        message: &str,
        parent_block_id: Option<&str>,
        highlighted_text: Option<&str>,
    ) -> Result<CreateBlockResponse, ServiceError> {
        match self {
            Self::Backend(backend) => {
                backend
                    .create_block(map_id, message, parent_block_id, highlighted_text)
                    .await
            }
            Self::Mock(_) => Err(ServiceError::Unsupported {
                operation: "create_block",
            }),
        }
    }

    pub async fn finalize_block(
        &self,
        block_id: &str,
    ) -> Result<FinalizeBlockResponse, ServiceError> {
        match self {
            Self::Backend(backend) => backend.finalize_block(block_id).await,
            Self::Mock(_) => Err(ServiceError::Unsupported {
                operation: "finalize_block",
            }),
        }
    }

    /// Legacy note generation from a conversation transcript. The backend
    /// replaces this with `finalize_block`.
    pub async fn generate_notes(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> Result<String, ServiceError> {
        match self {
            Self::Mock(mock) => mock.generate_notes(conversation_id, messages).await,
            Self::Backend(_) => Err(ServiceError::Unsupported {
                operation: "generate_notes",
            }),
        }
    }
}
