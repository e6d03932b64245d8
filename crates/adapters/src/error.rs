// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors crossing an adapter boundary.

use thiserror::Error;
use wa_core::WorkloadType;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("process listing failed: {0}")]
    ProcessList(String),

    #[error("no embedded driver for {0}; a deployment-provided connector is required")]
    NoDriver(WorkloadType),

    #[error("database error: {0}")]
    Database(String),

    #[error("query timed out after {0:?}")]
    QueryTimeout(std::time::Duration),

    #[error("secret {project_id}/{secret_name} could not be accessed: {reason}")]
    Secret { project_id: String, secret_name: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint rejected request with status {0}")]
    Status(u16),

    #[error("name resolution failed for {0}: {1}")]
    Resolve(String, String),
}
