use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{SwarmError, TransportError};

use super::plan::WorkerShare;
use super::protocol::{REPORT_PATH, START_PATH, start_query};
use super::roster::Worker;

const USER_AGENT: &str = concat!("swarmstrike/", env!("CARGO_PKG_VERSION"));

/// Port to a worker's control endpoint.
///
/// Sessions only ever see raw response bodies; classification happens on
/// top of this trait so it can be driven by a scripted transport in tests.
#[async_trait]
pub trait ControlTransport: Send + Sync {
    /// Sends the start request carrying this worker's share of the plan.
    ///
    /// # Errors
    ///
    /// Returns an error when the worker cannot be reached.
    async fn start(&self, worker: &Worker, share: &WorkerShare) -> Result<String, TransportError>;

    /// Fetches the worker's current report.
    ///
    /// # Errors
    ///
    /// Returns an error when the worker cannot be reached.
    async fn report(&self, worker: &Worker) -> Result<String, TransportError>;

    /// Plain fetch of a target URL so its caches are warm before the attack.
    ///
    /// # Errors
    ///
    /// Returns an error when the target cannot be reached.
    async fn warm(&self, url: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, Copy)]
pub struct TransportSettings {
    pub control_port: u16,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            control_port: DEFAULT_CONTROL_PORT,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

pub const DEFAULT_CONTROL_PORT: u16 = 8080;

/// [`ControlTransport`] over plain HTTP GETs.
pub struct HttpControlTransport {
    client: Client,
    control_port: u16,
}

impl HttpControlTransport {
    /// Builds the shared client used for every worker.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(settings: &TransportSettings) -> Result<Self, SwarmError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SwarmError::ClientBuild { source: err })?;
        Ok(Self {
            client,
            control_port: settings.control_port,
        })
    }

    async fn get_text(&self, url: Url) -> Result<String, TransportError> {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| TransportError::Request {
                url: url_text.clone(),
                source: err,
            })?;
        response.text().await.map_err(|err| TransportError::Request {
            url: url_text,
            source: err,
        })
    }
}

#[async_trait]
impl ControlTransport for HttpControlTransport {
    async fn start(&self, worker: &Worker, share: &WorkerShare) -> Result<String, TransportError> {
        let mut url = control_url(&worker.address, self.control_port, START_PATH)?;
        url.query_pairs_mut()
            .extend_pairs(start_query(share).iter().map(|(key, value)| (*key, value.as_str())));
        self.get_text(url).await
    }

    async fn report(&self, worker: &Worker) -> Result<String, TransportError> {
        let url = control_url(&worker.address, self.control_port, REPORT_PATH)?;
        self.get_text(url).await
    }

    async fn warm(&self, url: &str) -> Result<(), TransportError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|err| TransportError::Request {
                url: url.to_owned(),
                source: err,
            })?;
        Ok(())
    }
}

/// Resolves a worker address (`host`, `host:port` or a full URL) into the
/// URL of one control path. A path already on the address is kept as a
/// prefix.
///
/// # Errors
///
/// Returns an error when the address cannot form a valid URL.
pub fn control_url(address: &str, default_port: u16, path: &str) -> Result<Url, TransportError> {
    let address = address.trim();
    let base = if address.contains("://") {
        address.to_owned()
    } else {
        format!("http://{}", address)
    };
    let mut url = Url::parse(&base).map_err(|err| TransportError::InvalidUrl {
        address: address.to_owned(),
        source: err,
    })?;
    if url.port().is_none() && !address.contains("://") {
        url.set_port(Some(default_port))
            .map_err(|()| TransportError::InvalidUrl {
                address: address.to_owned(),
                source: url::ParseError::InvalidPort,
            })?;
    }
    let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    Ok(url)
}

/// URL fetched to warm a target host before the attack.
#[must_use]
pub fn warm_url(host: &str, port: u16, no_ssl: bool) -> String {
    let scheme = if no_ssl { "http" } else { "https" };
    format!("{}://{}:{}/", scheme, host, port)
}
