//! HTTP client for the Ambari management API.
//!
//! This module provides [`AmbariClient`], which owns the connection settings
//! and issues every request. Reads live here; state changes are in
//! [`driver`](crate::driver) and resource location in
//! [`locator`](crate::locator).

use ambari_core::{ClusterName, ComponentName, HostName, ServiceName};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ClientConfig, RetryPolicy};
use crate::error::{ClientError, Result};
use crate::locator::ResourceRef;
use crate::types::{
    ClusterItem, Collection, HostComponentItem, HostItem, Located, NamedItem, Resource,
    ServiceComponentItem, ServiceItem,
};

/// Header naming the user on whose behalf a mutation is made.
pub const REQUESTED_BY_HEADER: &str = "X-Requested-By";

/// Error body returned by the Ambari server.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Client for one Ambari server.
///
/// The client holds only read-only settings and a connection handle, so it
/// can be cloned and shared freely.
#[derive(Clone)]
pub struct AmbariClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AmbariClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbariClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AmbariClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            retry: config.retry,
        }
    }

    /// Get the root URL of the management API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the user requests are made as.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Resolve a path relative to the API root.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// List the clusters managed by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn clusters(&self) -> Result<Vec<ClusterName>> {
        self.list::<ClusterItem>("clusters/").await
    }

    /// List the hosts of a cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn hosts(&self, cluster: &ClusterName) -> Result<Vec<HostName>> {
        self.list::<HostItem>(&format!("clusters/{cluster}/hosts/"))
            .await
    }

    /// List the services of a cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn services(&self, cluster: &ClusterName) -> Result<Vec<ServiceName>> {
        self.list::<ServiceItem>(&format!("clusters/{cluster}/services/"))
            .await
    }

    /// List the components of a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn service_components(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<ComponentName>> {
        self.list::<ServiceComponentItem>(&format!(
            "clusters/{cluster}/services/{service}/components/"
        ))
        .await
    }

    /// List the components installed on a host.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn host_components(
        &self,
        cluster: &ClusterName,
        host: &HostName,
    ) -> Result<Vec<ComponentName>> {
        self.list::<HostComponentItem>(&format!(
            "clusters/{cluster}/hosts/{host}/host_components/"
        ))
        .await
    }

    // =========================================================================
    // Single resources
    // =========================================================================

    /// Fetch the full description of a cluster.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the cluster does not exist.
    pub async fn cluster(&self, cluster: &ClusterName) -> Result<Resource> {
        self.get_resource(&ResourceRef::cluster(cluster).path())
            .await
    }

    /// Fetch the full description of a host.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the host does not exist.
    pub async fn host(&self, cluster: &ClusterName, host: &HostName) -> Result<Resource> {
        self.get_resource(&ResourceRef::host(cluster, host).path())
            .await
    }

    /// Fetch the full description of a service.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the service does not exist.
    pub async fn service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<Resource> {
        self.get_resource(&ResourceRef::service(cluster, service).path())
            .await
    }

    /// Fetch the full description of a service component.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the component does not exist.
    pub async fn service_component(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Result<Resource> {
        self.get_resource(&ResourceRef::service_component(cluster, service, component).path())
            .await
    }

    /// Fetch the full description of a component on a host.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the host-component does not exist.
    pub async fn host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<Resource> {
        self.get_resource(&ResourceRef::host_component(cluster, host, component).path())
            .await
    }

    // =========================================================================
    // Creation and removal
    // =========================================================================

    /// Create a service resource.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the server rejects the request.
    pub async fn create_service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<()> {
        let url = self.url(&format!("clusters/{cluster}/services/{service}"));
        self.post_empty(&url).await
    }

    /// Create a component under a service.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the server rejects the request.
    pub async fn create_service_component(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Result<()> {
        let url = self.url(&format!(
            "clusters/{cluster}/services/{service}/components/{component}"
        ));
        self.post_empty(&url).await
    }

    /// Register a host with a cluster.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the server rejects the request.
    pub async fn create_host(&self, cluster: &ClusterName, host: &HostName) -> Result<()> {
        let url = self.url(&format!("clusters/{cluster}/hosts/{host}"));
        self.post_empty(&url).await
    }

    /// Create a component instance on a host.
    ///
    /// The host is located first and the component is created under the
    /// host's reported endpoint. The new host-component is left pending until
    /// it is moved to `INSTALLED`.
    ///
    /// # Errors
    ///
    /// Returns the locate error if the host cannot be found, in which case no
    /// create request is sent.
    pub async fn create_host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<()> {
        let located = self.locate(&ResourceRef::host(cluster, host)).await?;
        let url = format!(
            "{}/host_components/{component}",
            located.endpoint.trim_end_matches('/')
        );
        self.post_empty(&url).await
    }

    /// Delete a located resource.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the server rejects the deletion.
    pub async fn delete(&self, located: &Located) -> Result<()> {
        self.send(Method::DELETE, &located.endpoint, None::<&()>)
            .await
            .map(drop)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn post_empty(&self, url: &str) -> Result<()> {
        self.send(Method::POST, url, None::<&()>).await.map(drop)
    }

    /// Send a mutating request with credentials and the identity header.
    ///
    /// Mutations are never retried.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        tracing::debug!(method = %method, url = %url, "Sending Ambari request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.username, Some(&self.password))
            .header(REQUESTED_BY_HEADER, &self.username);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = Self::check_status(response, url).await;
        if let Err(e) = &response {
            tracing::error!(method = %method, url = %url, error = %e, "Ambari request failed");
        }
        response
    }

    pub(crate) async fn get_resource(&self, path: &str) -> Result<Resource> {
        let attributes: Value = self.get_json(path).await?;
        Ok(Resource { attributes })
    }

    async fn list<T>(&self, path: &str) -> Result<Vec<T::Name>>
    where
        T: NamedItem + DeserializeOwned,
    {
        let collection: Collection<T> = self.get_json(path).await?;
        Ok(collection
            .items
            .into_iter()
            .map(NamedItem::into_name)
            .collect())
    }

    /// GET a path and decode the JSON body, retrying per the retry policy.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            match self.get_once(&url).await {
                Err(e) if attempt < attempts && e.is_retriable() => {
                    tracing::warn!(
                        url = %url,
                        attempt,
                        attempts,
                        error = %e,
                        "Ambari read failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay()).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url = %url, "Fetching Ambari resource");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        let response = Self::check_status(response, url).await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(format!("{url}: {e}")))
    }

    /// Map a non-success response to `NotFound` or `Remote`.
    async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                resource: url.to_string(),
            });
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("Ambari returned status {status}"));

        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}
