//! Recording `PolicyClient` shared by the lifecycle and plugin tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use resbind_core::error::{ResBindError, Result};
use resbind_core::PolicyBinding;
use resbind_provider::compute::PolicyClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(PolicyBinding),
    Remove(PolicyBinding),
}

#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    fail_add: Option<ResBindError>,
    fail_remove: Option<ResBindError>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_add(err: ResBindError) -> Self {
        Self { fail_add: Some(err), ..Self::default() }
    }

    pub fn failing_remove(err: ResBindError) -> Self {
        Self { fail_remove: Some(err), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Net attachments implied by the recorded calls, in order.
    pub fn attached(&self) -> Vec<PolicyBinding> {
        let mut out: Vec<PolicyBinding> = Vec::new();
        for c in self.calls() {
            match c {
                Call::Add(b) => {
                    if !out.contains(&b) {
                        out.push(b);
                    }
                }
                Call::Remove(b) => out.retain(|x| x != &b),
            }
        }
        out
    }
}

#[async_trait]
impl PolicyClient for RecordingClient {
    async fn add(&self, binding: &PolicyBinding) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Add(binding.clone()));
        match &self.fail_add {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn remove(&self, binding: &PolicyBinding) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Remove(binding.clone()));
        match &self.fail_remove {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub fn binding(zone: &str, instance: &str, policy: &str) -> PolicyBinding {
    PolicyBinding::new("p1", zone, instance, policy)
}
