// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Provider selection with a cached backend health check.
//!
//! Construction never fails and resolution never propagates an error: when
//! the backend is unavailable (or statically disabled) the factory degrades
//! to the mock provider.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::AppConfig;

use super::backend::BackendAi;
use super::mock::MockAi;
use super::AiProvider;

#[derive(Debug, Default)]
struct HealthCache {
    available: Option<bool>,
    checked_at: Option<Instant>,
}

#[derive(Debug)]
pub struct AiServiceFactory {
    use_mock: bool,
    health_check_interval: Duration,
    mock: MockAi,
    backend: BackendAi,
    health: Mutex<HealthCache>,
}

impl AiServiceFactory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            use_mock: config.use_mock_ai,
            health_check_interval: config.health_check_interval,
            mock: MockAi::new(config),
            backend: BackendAi::new(config),
            health: Mutex::new(HealthCache::default()),
        }
    }

    /// Resolves the provider to use, probing backend health at most once per
    /// cache interval.
    pub async fn resolve(&self) -> AiProvider {
        if self.use_mock {
            debug!("using mock AI service (configured)");
            return AiProvider::Mock(self.mock.clone());
        }
        if self.check_backend_health().await {
            AiProvider::Backend(self.backend.clone())
        } else {
            warn!("backend unavailable, falling back to mock AI service");
            AiProvider::Mock(self.mock.clone())
        }
    }

    /// Non-probing resolution for call sites that cannot await: trusts the
    /// last cached verdict (or the static config) and may therefore be stale
    /// by up to the cache interval. An unknown backend state resolves to the
    /// backend, matching the optimistic first-contact behavior of `resolve`.
    pub fn resolve_sync(&self) -> AiProvider {
        if self.use_mock {
            return AiProvider::Mock(self.mock.clone());
        }
        let available = self
            .health
            .lock()
            .expect("health cache lock poisoned")
            .available;
        if available == Some(false) {
            AiProvider::Mock(self.mock.clone())
        } else {
            AiProvider::Backend(self.backend.clone())
        }
    }

    /// Last cached health verdict; `None` before the first probe.
    pub fn backend_available(&self) -> Option<bool> {
        self.health
            .lock()
            .expect("health cache lock poisoned")
            .available
    }

    /// Drops the cached verdict and probes immediately.
    pub async fn refresh_backend_status(&self) -> bool {
        {
            let mut cache = self.health.lock().expect("health cache lock poisoned");
            *cache = HealthCache::default();
        }
        self.check_backend_health().await
    }

    async fn check_backend_health(&self) -> bool {
        {
            let cache = self.health.lock().expect("health cache lock poisoned");
            if let (Some(available), Some(checked_at)) = (cache.available, cache.checked_at) {
                if checked_at.elapsed() < self.health_check_interval {
                    return available;
                }
            }
        }

        // Probe outside the lock; a second caller racing here at worst probes
        // once more and overwrites with an equally fresh verdict.
        let available = self.backend.health_check().await;

        let mut cache = self.health.lock().expect("health cache lock poisoned");
        cache.available = Some(available);
        cache.checked_at = Some(Instant::now());
        available
    }
}
