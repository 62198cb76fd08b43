// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0

use axum::response::Json;
use serde_json::{json, Value};

/// Liveness probe. Unauthenticated by design.
pub async fn health() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}
