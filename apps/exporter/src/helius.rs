use anyhow::{Result, anyhow};
use log::debug;
use reqwest::{Client, Request};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::FetchOptions;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct TransactionsQuery<'a> {
    #[serde(rename = "api-key")]
    api_key: &'a str,
    limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    until: Option<&'a str>,
}

/// Client for the enhanced transactions REST endpoint.
///
/// One request per call: no retry and no pagination.
#[derive(Clone)]
pub struct HeliusClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HeliusClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("http client init failed: {e:?}"))?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn transactions_request(&self, address: &str, opts: &FetchOptions) -> Result<Request> {
        let url = format!("{}/addresses/{}/transactions", self.base_url, address);
        let query = TransactionsQuery {
            api_key: &self.api_key,
            limit: opts.limit,
            before: opts.before.as_deref(),
            until: opts.until.as_deref(),
        };

        self.http
            .get(&url)
            .query(&query)
            .build()
            .map_err(|e| anyhow!("invalid request for {url}: {:?}", e.without_url()))
    }

    /// Fetches enhanced transactions for `address`, newest first.
    pub async fn get_transactions(&self, address: &str, opts: &FetchOptions) -> Result<Vec<Value>> {
        let req = self.transactions_request(address, opts)?;
        debug!(
            "GET {}/addresses/{}/transactions limit={} before={:?} until={:?}",
            self.base_url, address, opts.limit, opts.before, opts.until
        );

        let resp = self
            .http
            .execute(req)
            .await
            // reqwest errors carry the url, which holds the api key
            .map_err(|e| anyhow!("enhanced api request failed: {:?}", e.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| {
                anyhow!(
                    "enhanced api body read failed status={status}: {:?}",
                    e.without_url()
                )
            })?;

        parse_transactions_response(status.as_u16(), &body)
    }
}

/// Turns a response into raw transactions. Non-2xx and anything but a JSON
/// array are errors.
fn parse_transactions_response(status: u16, body: &str) -> Result<Vec<Value>> {
    if !(200..300).contains(&status) {
        return Err(anyhow!("enhanced api http error status={status} body={body}"));
    }

    let v: Value = serde_json::from_str(body)
        .map_err(|e| anyhow!("enhanced api decode error: {e:?} body={body}"))?;

    match v {
        Value::Array(txs) => Ok(txs),
        other => Err(anyhow!(
            "unexpected enhanced api response: expected array, got {}",
            other
        )),
    }
}
