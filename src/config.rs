// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Environment-provided configuration.
//!
//! Every knob is read from a `MINDCANVAS_*` variable; unset or unparseable
//! values fall back to the default with a warning rather than failing
//! startup.

use std::str::FromStr;
use std::time::Duration;

use log::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the map/block backend.
    pub api_base_url: String,
    /// Client-side timeout per HTTP attempt.
    pub api_timeout: Duration,
    /// Retries after the first attempt (total attempts = retries + 1).
    pub api_retries: u32,
    /// Statically force the mock provider, skipping health checks entirely.
    pub use_mock_ai: bool,
    pub mock_delay_min: Duration,
    pub mock_delay_max: Duration,
    /// Probability in [0, 1] that a mock call fails.
    pub mock_error_rate: f64,
    /// How long a backend health verdict stays fresh.
    pub health_check_interval: Duration,
    /// Static per-session identity sent as the `Authorization` header.
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_owned(),
            api_timeout: Duration::from_millis(30_000),
            api_retries: 3,
            use_mock_ai: false,
            mock_delay_min: Duration::from_millis(1_000),
            mock_delay_max: Duration::from_millis(3_000),
            mock_error_rate: 0.05,
            health_check_interval: Duration::from_millis(30_000),
            user_id: "local-user".to_owned(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("MINDCANVAS_API_URL").unwrap_or(defaults.api_base_url),
            api_timeout: Duration::from_millis(parse_or(
                lookup("MINDCANVAS_API_TIMEOUT_MS"),
                "MINDCANVAS_API_TIMEOUT_MS",
                defaults.api_timeout.as_millis() as u64,
            )),
            api_retries: parse_or(
                lookup("MINDCANVAS_API_RETRIES"),
                "MINDCANVAS_API_RETRIES",
                defaults.api_retries,
            ),
            use_mock_ai: parse_bool_or(
                lookup("MINDCANVAS_USE_MOCK_AI"),
                "MINDCANVAS_USE_MOCK_AI",
                defaults.use_mock_ai,
            ),
            mock_delay_min: Duration::from_millis(parse_or(
                lookup("MINDCANVAS_MOCK_DELAY_MIN_MS"),
                "MINDCANVAS_MOCK_DELAY_MIN_MS",
                defaults.mock_delay_min.as_millis() as u64,
            )),
            mock_delay_max: Duration::from_millis(parse_or(
                lookup("MINDCANVAS_MOCK_DELAY_MAX_MS"),
                "MINDCANVAS_MOCK_DELAY_MAX_MS",
                defaults.mock_delay_max.as_millis() as u64,
            )),
            mock_error_rate: parse_or(
                lookup("MINDCANVAS_MOCK_ERROR_RATE"),
                "MINDCANVAS_MOCK_ERROR_RATE",
                defaults.mock_error_rate,
            )
            .clamp(0.0, 1.0),
            health_check_interval: Duration::from_millis(parse_or(
                lookup("MINDCANVAS_HEALTH_CHECK_INTERVAL_MS"),
                "MINDCANVAS_HEALTH_CHECK_INTERVAL_MS",
                defaults.health_check_interval.as_millis() as u64,
            )),
            user_id: lookup("MINDCANVAS_USER_ID").unwrap_or(defaults.user_id),
        }
    }
}

fn parse_or<T: FromStr + Copy>(value: Option<String>, key: &str, default: T) -> T {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("ignoring unparseable {key}={raw:?}");
            default
        }
    }
}

fn parse_bool_or(value: Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => {
            warn!("ignoring unparseable {key}={raw:?}");
            default
        }
    }
}
