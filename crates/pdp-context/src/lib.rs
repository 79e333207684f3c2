//! The context pipeline (spec §4.5): an ordered chain of providers that
//! enrich a request with environment key/value pairs before it reaches the
//! engine. Grounded on `pkg/contextprovider/*.go`.

use kernel::Clock;
use std::collections::HashMap;
use thiserror::Error;

/// Request metadata available to a provider. Stands in for the original's
/// `*http.Request` parameter so providers don't depend on any particular web
/// framework's request type.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub remote_addr: Option<String>,
    pub headers: HashMap<String, String>,
}

impl RequestMeta {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("context provider failed: {0}")]
pub struct ContextError(pub String);

/// One contributor to the evaluation environment.
pub trait ContextProvider: Send + Sync {
    fn get_context(&self, req: &RequestMeta) -> Result<HashMap<String, String>, ContextError>;
}

/// Ordered chain of providers. Later providers overwrite earlier keys on
/// collision; a provider error is non-fatal and skipped — the chain keeps
/// going.
#[derive(Default)]
pub struct Chain {
    providers: Vec<Box<dyn ContextProvider>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    pub fn push(&mut self, provider: Box<dyn ContextProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn get_context(&self, req: &RequestMeta) -> HashMap<String, String> {
        let mut env = HashMap::new();
        for provider in &self.providers {
            match provider.get_context(req) {
                Ok(values) => env.extend(values),
                Err(err) => tracing::warn!(%err, "context provider skipped"),
            }
        }
        env
    }
}

/// Sets `business_hours = "true"|"false"` based on the clock's hour.
pub struct TimeProvider {
    clock: Box<dyn Clock>,
}

impl TimeProvider {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl ContextProvider for TimeProvider {
    fn get_context(&self, _req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
        use chrono::Timelike;
        let hour = self.clock.now().hour();
        let in_business = (9..17).contains(&hour);
        Ok([("business_hours".to_string(), in_business.to_string())].into())
    }
}

/// Sets `ip` (remote address) and a stubbed `geo_country`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoIpProvider;

impl ContextProvider for GeoIpProvider {
    fn get_context(&self, req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
        let ip = req.remote_addr.clone().unwrap_or_default();
        Ok([
            ("ip".to_string(), ip),
            ("geo_country".to_string(), "US".to_string()),
        ]
        .into())
    }
}

/// Sets `risk_score` from the `X-Risk-Score` header, defaulting to `"0"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskProvider;

impl ContextProvider for RiskProvider {
    fn get_context(&self, req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
        let score = req.header("x-risk-score").unwrap_or("0").to_string();
        Ok([("risk_score".to_string(), score)].into())
    }
}

/// A provider that always errors, used to exercise the chain's
/// skip-on-error path in tests.
#[cfg(test)]
struct FailingProvider;

#[cfg(test)]
impl ContextProvider for FailingProvider {
    fn get_context(&self, _req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
        Err(ContextError("boom".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::FixedClock;

    #[test]
    fn time_provider_reports_business_hours() {
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2026, 7, 26, 10, 0, 0).unwrap());
        let provider = TimeProvider::new(Box::new(clock));
        let env = provider.get_context(&RequestMeta::default()).unwrap();
        assert_eq!(env.get("business_hours").unwrap(), "true");
    }

    #[test]
    fn time_provider_reports_after_hours() {
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2026, 7, 26, 22, 0, 0).unwrap());
        let provider = TimeProvider::new(Box::new(clock));
        let env = provider.get_context(&RequestMeta::default()).unwrap();
        assert_eq!(env.get("business_hours").unwrap(), "false");
    }

    #[test]
    fn geoip_provider_extracts_remote_addr() {
        let req = RequestMeta {
            remote_addr: Some("203.0.113.7".to_string()),
            headers: HashMap::new(),
        };
        let env = GeoIpProvider.get_context(&req).unwrap();
        assert_eq!(env.get("ip").unwrap(), "203.0.113.7");
        assert_eq!(env.get("geo_country").unwrap(), "US");
    }

    #[test]
    fn risk_provider_defaults_to_zero() {
        let env = RiskProvider.get_context(&RequestMeta::default()).unwrap();
        assert_eq!(env.get("risk_score").unwrap(), "0");
    }

    #[test]
    fn risk_provider_reads_header_case_insensitively() {
        let req = RequestMeta {
            remote_addr: None,
            headers: [("x-risk-score".to_string(), "77".to_string())].into(),
        };
        let env = RiskProvider.get_context(&req).unwrap();
        assert_eq!(env.get("risk_score").unwrap(), "77");
    }

    #[test]
    fn chain_merges_in_order_and_later_keys_win() {
        struct First;
        impl ContextProvider for First {
            fn get_context(&self, _req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
                Ok([("k".to_string(), "first".to_string())].into())
            }
        }
        struct Second;
        impl ContextProvider for Second {
            fn get_context(&self, _req: &RequestMeta) -> Result<HashMap<String, String>, ContextError> {
                Ok([("k".to_string(), "second".to_string())].into())
            }
        }
        let mut chain = Chain::new();
        chain.push(Box::new(First)).push(Box::new(Second));
        let env = chain.get_context(&RequestMeta::default());
        assert_eq!(env.get("k").unwrap(), "second");
    }

    #[test]
    fn chain_skips_failing_providers_and_keeps_going() {
        let mut chain = Chain::new();
        chain.push(Box::new(FailingProvider)).push(Box::new(RiskProvider));
        let env = chain.get_context(&RequestMeta::default());
        assert_eq!(env.get("risk_score").unwrap(), "0");
    }
}
