// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Flow Endpoint Node

/// Full version string with feature description
pub const VERSION: &str = "v1.2.0-appointment-flow-2025-11-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.2.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-04";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "rsa-oaep-sha256-key-unwrap",
    "aes-128-gcm",
    "aes-256-gcm",
    "flipped-iv-responses",
    "hmac-sha256-signatures",
    "encrypted-pkcs8-keys",
    "key-rotation-signal",
    "appointment-booking-flow",
    "file-store",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Flow Endpoint Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Full version info, served under `build` on `/health`
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
