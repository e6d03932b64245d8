// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forward and reverse DNS for replication-topology resolution.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::AdapterError;

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// PTR lookup: address to FQDN.
    async fn reverse(&self, ip: IpAddr) -> Result<String, AdapterError>;

    /// A/AAAA lookup: hostname to addresses.
    async fn forward(&self, host: &str) -> Result<Vec<IpAddr>, AdapterError>;
}

/// Resolver backed by the host's DNS configuration.
pub struct SystemNameResolver {
    resolver: trust_dns_resolver::TokioAsyncResolver,
}

impl SystemNameResolver {
    pub fn from_system_conf() -> Result<Self, AdapterError> {
        let resolver = trust_dns_resolver::TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| AdapterError::Resolve("system".to_string(), e.to_string()))?;
        Ok(Self { resolver })
    }
}

#[async_trait]
impl NameResolver for SystemNameResolver {
    async fn reverse(&self, ip: IpAddr) -> Result<String, AdapterError> {
        let lookup = self
            .resolver
            .reverse_lookup(ip)
            .await
            .map_err(|e| AdapterError::Resolve(ip.to_string(), e.to_string()))?;
        lookup
            .iter()
            .next()
            .map(|name| name.to_string())
            .ok_or_else(|| AdapterError::Resolve(ip.to_string(), "no PTR record".to_string()))
    }

    async fn forward(&self, host: &str) -> Result<Vec<IpAddr>, AdapterError> {
        let lookup = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| AdapterError::Resolve(host.to_string(), e.to_string()))?;
        let addrs: Vec<IpAddr> = lookup.iter().collect();
        if addrs.is_empty() {
            return Err(AdapterError::Resolve(host.to_string(), "no addresses".to_string()));
        }
        Ok(addrs)
    }
}

/// Programmable resolver for tests.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeNameResolver {
    ptr: parking_lot::Mutex<std::collections::HashMap<IpAddr, String>>,
    hosts: parking_lot::Mutex<std::collections::HashMap<String, Vec<IpAddr>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeNameResolver {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            ptr: parking_lot::Mutex::new(std::collections::HashMap::new()),
            hosts: parking_lot::Mutex::new(std::collections::HashMap::new()),
        })
    }

    pub fn add_ptr(&self, ip: &str, fqdn: &str) {
        if let Ok(addr) = ip.parse() {
            self.ptr.lock().insert(addr, fqdn.to_string());
        }
    }

    pub fn add_host(&self, host: &str, ip: &str) {
        if let Ok(addr) = ip.parse() {
            self.hosts.lock().entry(host.to_string()).or_default().push(addr);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl NameResolver for FakeNameResolver {
    async fn reverse(&self, ip: IpAddr) -> Result<String, AdapterError> {
        self.ptr
            .lock()
            .get(&ip)
            .cloned()
            .ok_or_else(|| AdapterError::Resolve(ip.to_string(), "no PTR record".to_string()))
    }

    async fn forward(&self, host: &str) -> Result<Vec<IpAddr>, AdapterError> {
        self.hosts
            .lock()
            .get(host)
            .cloned()
            .ok_or_else(|| AdapterError::Resolve(host.to_string(), "no addresses".to_string()))
    }
}
