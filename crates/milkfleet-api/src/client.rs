// Hand-crafted async HTTP client for the vending backend REST API.
//
// Base path: /api/
// Auth: none (the backend exposes no auth surface)

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    AccountDto, Ack, AmountRequest, CashPaymentDto, DeviceDto, NewDeviceRequest, PriceUpdate,
    PricingDto, TransactionDto, UpdateVendorRequest, VendorDto,
};

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the vending backend.
///
/// Cheaply cloneable — `reqwest::Client` is an `Arc` internally, so one
/// instance can be shared across poll tasks.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Ensure the base URL ends with a single trailing slash so relative
    /// joins of `api/…` paths behave uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/devices"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining `api/…` works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_ack<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_ack(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    /// Handle a write ack: any 2xx body is accepted, but an explicit
    /// `success: false` is an operation rejection.
    async fn handle_ack(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let ack: Ack = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })?;
        if ack.success == Some(false) {
            return Err(Error::Rejected {
                message: ack.message.unwrap_or_else(|| "operation rejected".into()),
            });
        }
        Ok(())
    }

    // ── Vendor ───────────────────────────────────────────────────────

    pub async fn vendor(&self) -> Result<VendorDto, Error> {
        self.get("api/vendor").await
    }

    pub async fn update_vendor(
        &self,
        id: &str,
        req: &UpdateVendorRequest,
    ) -> Result<VendorDto, Error> {
        self.put(&format!("api/vendor/{id}"), req).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<DeviceDto>, Error> {
        self.get("api/devices").await
    }

    pub async fn get_device(&self, id: &str) -> Result<DeviceDto, Error> {
        self.get(&format!("api/devices/{id}")).await
    }

    pub async fn add_device(&self, req: &NewDeviceRequest) -> Result<(), Error> {
        self.post_ack("api/devices", req).await
    }

    // ── Transactions ─────────────────────────────────────────────────

    pub async fn list_transactions(&self) -> Result<Vec<TransactionDto>, Error> {
        self.get("api/transactions").await
    }

    // ── Pricing ──────────────────────────────────────────────────────

    pub async fn pricing(&self) -> Result<PricingDto, Error> {
        self.get("api/pricing").await
    }

    pub async fn set_pricing(&self, req: &PriceUpdate) -> Result<(), Error> {
        self.post_ack("api/pricing", req).await
    }

    // ── Account ──────────────────────────────────────────────────────

    pub async fn account(&self) -> Result<AccountDto, Error> {
        self.get("api/account").await
    }

    pub async fn withdraw(&self, req: &AmountRequest) -> Result<AccountDto, Error> {
        self.post("api/account/withdraw", req).await
    }

    pub async fn deposit(&self, req: &AmountRequest) -> Result<AccountDto, Error> {
        self.post("api/account/deposit", req).await
    }

    pub async fn list_cash_payments(&self) -> Result<Vec<CashPaymentDto>, Error> {
        self.get("api/account/cash").await
    }
}

/// Parse a non-2xx response into an [`Error::Api`], preferring the
/// normalized `{error}` envelope and falling back to the raw body.
async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw
            }
        });

    Error::Api {
        status: status.as_u16(),
        message,
    }
}
