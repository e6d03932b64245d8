// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for daemon tests: a `ServiceDeps` wired entirely to
//! fakes, with handles kept for assertions.

use std::sync::Arc;

use wa_adapters::{
    FakeDatabase, FakeInsightClient, FakeNameResolver, FakeSecretResolver,
    FakeTimeSeriesClient, FakeUsageSink,
};
use wa_core::CloudProperties;

use crate::service::ServiceDeps;

pub(crate) struct FakeHandles {
    pub db: Arc<FakeDatabase>,
    pub insights: Arc<FakeInsightClient>,
    pub timeseries: Arc<FakeTimeSeriesClient>,
    pub secrets: Arc<FakeSecretResolver>,
    pub resolver: Arc<FakeNameResolver>,
    pub usage: Arc<FakeUsageSink>,
    /// Holds the override-file directory alive for the test.
    pub dir: tempfile::TempDir,
}

pub(crate) fn test_cloud() -> CloudProperties {
    CloudProperties {
        project_id: "test-project".to_string(),
        instance_id: "1234567890".to_string(),
        instance_name: "db-host-1".to_string(),
        zone: "us-central1-a".to_string(),
        ..CloudProperties::default()
    }
}

pub(crate) fn fake_deps() -> (Arc<ServiceDeps>, FakeHandles) {
    let db = FakeDatabase::new();
    let insights = FakeInsightClient::new();
    let timeseries = FakeTimeSeriesClient::new();
    let secrets = FakeSecretResolver::new();
    let resolver = FakeNameResolver::new();
    let usage = FakeUsageSink::new();
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

    let deps = Arc::new(ServiceDeps {
        connector: Arc::new(Arc::clone(&db)),
        secrets: Arc::clone(&secrets) as _,
        insights: Arc::clone(&insights) as _,
        timeseries: Arc::clone(&timeseries) as _,
        resolver: Arc::clone(&resolver) as _,
        usage: Arc::clone(&usage) as _,
        cloud: test_cloud(),
        override_path: dir.path().join("metricoverride.yaml"),
    });

    (deps, FakeHandles { db, insights, timeseries, secrets, resolver, usage, dir })
}
