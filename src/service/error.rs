// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::Duration;

/// Failure taxonomy for AI service calls.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Non-2xx response. Never retried; carries the parsed `detail` field of
    /// a JSON error body when present, the raw status text otherwise.
    Api { status: u16, detail: String },

    /// The client-side per-request timeout fired on every attempt.
    Timeout { limit: Duration },

    /// Transport-level failure (connect, transfer, body decode) on every
    /// attempt.
    Network { message: String },

    /// The resolved provider does not implement the requested operation.
    Unsupported { operation: &'static str },
}

impl ServiceError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { status, detail } => {
                write!(f, "backend returned HTTP {status}: {detail}")
            }
            Self::Timeout { limit } => {
                write!(f, "request timed out after {}ms", limit.as_millis())
            }
            Self::Network { message } => write!(f, "network request failed: {message}"),
            Self::Unsupported { operation } => {
                write!(f, "operation not supported by the active AI provider: {operation}")
            }
        }
    }
}

impl std::error::Error for ServiceError {}
