//! Wait-for polling
//!
//! After an apply the provider can wait for JSONPath conditions on the live
//! object, and after a delete for the object to disappear. Both loops check
//! immediately, then sleep `poll_interval` between checks until `timeout`
//! has elapsed. A zero timeout performs exactly one check. There is no
//! backoff and no jitter.

use crate::error::ProviderError;
use kube::api::ApiResource;
use kube_dynamic::{DynamicClientTrait, ObjectRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Default time to wait
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time between checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A `{jsonpath, value}` condition on a live object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitCondition {
    /// JSONPath expression, `$.a.b`, `.a.b` or `{.a.b}`
    pub jsonpath: String,
    /// Expected value of the expression
    pub value: String,
}

/// Timing of a wait loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    /// Maximum time to wait
    pub timeout: Duration,
    /// Time between checks
    pub poll_interval: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Deadline tracking shared by both wait loops
struct Poller {
    started: Instant,
    settings: WaitSettings,
}

impl Poller {
    fn start(settings: WaitSettings) -> Self {
        Self {
            started: Instant::now(),
            settings,
        }
    }

    /// Sleep until the next check, or return the elapsed time once the
    /// timeout has been reached
    async fn tick(&self) -> Result<(), Duration> {
        let elapsed = self.started.elapsed();
        if elapsed >= self.settings.timeout {
            return Err(elapsed);
        }
        sleep(self.settings.poll_interval.min(self.settings.timeout - elapsed)).await;
        Ok(())
    }
}

/// Rewrite kubectl-style and relative expressions into `$`-rooted JSONPath
pub fn normalize_jsonpath(expression: &str) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|e| e.strip_suffix('}'))
        .unwrap_or(trimmed)
        .trim();
    if inner.starts_with('$') {
        inner.to_string()
    } else if inner.starts_with('.') || inner.starts_with('[') {
        format!("${}", inner)
    } else {
        format!("$.{}", inner)
    }
}

/// String form used to compare selected values: strings raw, everything
/// else as JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Check that an expression parses
pub fn validate_jsonpath(expression: &str) -> Result<(), ProviderError> {
    jsonpath_lib::select(&Value::Object(serde_json::Map::new()), &normalize_jsonpath(expression))
        .map(|_| ())
        .map_err(|e| ProviderError::InvalidJsonPath {
            expression: expression.to_string(),
            reason: format!("{:?}", e),
        })
}

/// Whether any value selected by the condition's expression equals its value
pub fn condition_matches(object: &Value, condition: &WaitCondition) -> Result<bool, ProviderError> {
    let expression = normalize_jsonpath(&condition.jsonpath);
    let selected = jsonpath_lib::select(object, &expression).map_err(|e| ProviderError::InvalidJsonPath {
        expression: condition.jsonpath.clone(),
        reason: format!("{:?}", e),
    })?;
    Ok(selected.into_iter().any(|v| text(v) == condition.value))
}

/// Wait until every condition matches the live object
///
/// A missing object counts as not matching yet.
pub async fn wait_for_upsert(
    client: &dyn DynamicClientTrait,
    resource: &ApiResource,
    object: &ObjectRef,
    conditions: &[WaitCondition],
    settings: WaitSettings,
) -> Result<(), ProviderError> {
    if conditions.is_empty() {
        return Ok(());
    }

    let poller = Poller::start(settings);
    loop {
        match client.get(resource, object).await {
            Ok(live) => {
                let live = serde_json::to_value(&live)?;
                let mut all = true;
                for condition in conditions {
                    if !condition_matches(&live, condition)? {
                        debug!("{} {}: waiting for {} == {:?}", resource.kind, object, condition.jsonpath, condition.value);
                        all = false;
                        break;
                    }
                }
                if all {
                    return Ok(());
                }
            }
            Err(e) if e.is_not_found() => debug!("{} {} not visible yet", resource.kind, object),
            Err(e) => return Err(e.into()),
        }

        poller.tick().await.map_err(|elapsed| ProviderError::Timeout {
            object: format!("{} {}", resource.kind, object),
            condition: "meet its wait conditions",
            elapsed,
        })?;
    }
}

/// Wait until the object no longer exists
pub async fn wait_for_delete(
    client: &dyn DynamicClientTrait,
    resource: &ApiResource,
    object: &ObjectRef,
    settings: WaitSettings,
) -> Result<(), ProviderError> {
    let poller = Poller::start(settings);
    loop {
        match client.get(resource, object).await {
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.into()),
            Ok(_) => debug!("{} {} still exists", resource.kind, object),
        }

        poller.tick().await.map_err(|elapsed| ProviderError::Timeout {
            object: format!("{} {}", resource.kind, object),
            condition: "be deleted",
            elapsed,
        })?;
    }
}
