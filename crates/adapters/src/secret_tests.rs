// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_returns_stored_secret() {
    let resolver = FakeSecretResolver::new();
    resolver.store("test-project", "mysql-password", "hunter2");

    let value = resolver.access("test-project", "mysql-password").await.unwrap();
    assert_eq!(value, "hunter2");
    assert_eq!(resolver.accesses.lock().len(), 1);
}

#[tokio::test]
async fn missing_secret_is_an_error() {
    let resolver = FakeSecretResolver::new();
    let err = resolver.access("test-project", "absent").await.unwrap_err();
    assert!(matches!(err, AdapterError::Secret { .. }));
}

#[test]
fn access_response_decodes() {
    let body: AccessResponse =
        serde_json::from_str(r#"{"payload": {"data": "aHVudGVyMg=="}}"#).unwrap();
    let bytes =
        base64::engine::general_purpose::STANDARD.decode(body.payload.data.as_bytes()).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "hunter2");
}
