use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use tax_core::{CalculationError, ServiceConfig, TaxCalculator, TaxRequest, TaxResponse};
use tracing::{debug, warn};

/// Calls a remote tax service over HTTP.
///
/// Every call is a single POST; there is no retry. Without a configured
/// timeout a hung service blocks the caller indefinitely.
#[derive(Debug, Clone)]
pub struct HttpTaxCalculator {
    http: Client,
    endpoint: Url,
}

impl HttpTaxCalculator {
    /// Build a calculator for `endpoint`.
    ///
    /// # Errors
    /// [`CalculationError::Configuration`] when the endpoint is not an
    /// `http`/`https` URL or the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, CalculationError> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if is_loopback(&endpoint) {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(|e| {
            CalculationError::Configuration(format!("cannot build HTTP client: {e}"))
        })?;

        Ok(Self { http, endpoint })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, CalculationError> {
        Self::new(&config.endpoint, config.timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TaxCalculator for HttpTaxCalculator {
    async fn calculate(&self, income: Decimal) -> Result<TaxResponse, CalculationError> {
        let body = serde_json::to_vec(&TaxRequest { income }).map_err(|e| {
            CalculationError::Encoding(format!("income {income}: {e}"))
        })?;

        debug!(endpoint = %self.endpoint, %income, "requesting tax calculation");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "tax service unreachable");
                CalculationError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "tax service rejected the request");
            return Err(CalculationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CalculationError::Transport(e.to_string()))?;

        let parsed: TaxResponse = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(body = %String::from_utf8_lossy(&bytes), "malformed tax service response");
            CalculationError::InvalidResponse(e.to_string())
        })?;

        debug!(tax = %parsed.tax, "tax calculation succeeded");
        Ok(parsed)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, CalculationError> {
    let url = Url::parse(endpoint).map_err(|e| {
        CalculationError::Configuration(format!("invalid endpoint '{endpoint}': {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CalculationError::Configuration(format!(
            "unsupported scheme '{other}' in endpoint '{endpoint}'"
        ))),
    }
}

/// Requests to the local machine never go through a proxy.
fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_endpoint_is_accepted() {
        let calculator = HttpTaxCalculator::from_config(&ServiceConfig::default()).unwrap();

        assert_eq!(
            calculator.endpoint().as_str(),
            "http://127.0.0.1:8000/calculate-tax"
        );
    }

    #[test]
    fn garbage_endpoint_is_a_configuration_error() {
        let result = HttpTaxCalculator::new("not a url", None);

        assert!(matches!(result, Err(CalculationError::Configuration(msg)) if msg.starts_with("invalid endpoint 'not a url'")));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let result = HttpTaxCalculator::new("ftp://127.0.0.1/calculate-tax", None);

        assert!(matches!(result, Err(CalculationError::Configuration(msg)) if msg.contains("unsupported scheme 'ftp'")));
    }

    #[test]
    fn loopback_hosts_are_detected() {
        assert!(is_loopback(&Url::parse("http://127.0.0.1:8000/").unwrap()));
        assert!(is_loopback(&Url::parse("http://localhost/").unwrap()));
        assert!(is_loopback(&Url::parse("http://[::1]:8000/").unwrap()));
        assert!(!is_loopback(&Url::parse("https://tax.example.com/").unwrap()));
    }
}
