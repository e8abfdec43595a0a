use anyhow::{Context, Result};
use reqwest::{Client, Proxy, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: u64 = 10;

const USER_AGENT: &str = concat!("gqlhound/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` carrying the per-run header set.
/// Cloning is cheap; the inner client is shared.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(proxy: Option<&str>, headers: HashMap<String, String>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
            .danger_accept_invalid_certs(true)
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = Proxy::all(proxy_url).context("Invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, headers })
    }

    fn apply_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.headers {
            req = req.header(key, value);
        }
        req
    }

    /// POSTs a GraphQL query as a JSON body and returns the parsed response.
    pub async fn post_graphql(&self, url: &str, query: &str) -> Result<GraphqlResponse> {
        let body = json!({ "query": query });

        let req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body);

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send POST request")?;

        GraphqlResponse::from_response(response).await
    }

    pub async fn get_html(&self, url: &str) -> Result<HtmlResponse> {
        let req = self.client.get(url).header("Accept", "text/html");

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send GET request")?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(HtmlResponse {
            status,
            body,
            url: url.to_string(),
        })
    }

    /// POSTs an arbitrary JSON payload, returning the response status.
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<u16> {
        let req = self.client.post(url).json(body);

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send JSON POST request")?;

        Ok(response.status().as_u16())
    }

    /// Plain JSON GET, used for certificate-transparency lookups.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let req = self.client.get(url).header("Accept", "application/json");

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send JSON GET request")?;

        response.json().await.context("Response was not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct GraphqlResponse {
    pub status: u16,
    pub body: Value,
}

impl GraphqlResponse {
    async fn from_response(response: Response) -> Result<Self> {
        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        Ok(Self { status, body })
    }

    pub fn is_json(&self) -> bool {
        !self.body.is_null()
    }

    pub fn get_data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    pub fn get_errors(&self) -> Option<&Value> {
        self.body.get("errors")
    }
}

#[derive(Debug, Clone)]
pub struct HtmlResponse {
    pub status: u16,
    pub body: String,
    pub url: String,
}
