// ── FleetController ──
//
// Full lifecycle management for a vending-backend session. Owns one
// SyncCell per resource, the poll tasks that keep them fresh, and the
// invalidation signal that wires mutating views to their siblings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use milkfleet_api::types::{AmountRequest, NewDeviceRequest, PriceUpdate, UpdateVendorRequest};
use milkfleet_api::{BackendClient, TransportConfig};

use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::model::{Account, CashPayment, Device, Pricing, Transaction, Vendor};
use crate::signal::ChangeSignal;
use crate::sync::{ResourceStream, SyncCell};

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── FleetController ──────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<Inner>`. [`connect()`](Self::connect)
/// performs the initial foreground load and spawns poll tasks;
/// [`refresh()`](Self::refresh) alone serves one-shot consumers that
/// don't want background polling.
#[derive(Clone)]
pub struct FleetController {
    inner: Arc<Inner>,
}

struct Inner {
    config: FleetConfig,
    client: BackendClient,

    vendor: SyncCell<Vendor>,
    devices: SyncCell<Vec<Device>>,
    transactions: SyncCell<Vec<Transaction>>,
    pricing: SyncCell<Pricing>,
    account: SyncCell<Account>,
    cash_payments: SyncCell<Vec<CashPayment>>,

    invalidations: ChangeSignal,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    /// Child token for the current session — cancelled on disconnect,
    /// replaced on reconnect (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl FleetController {
    /// Create a controller from configuration. Does NOT touch the network --
    /// call [`connect()`](Self::connect) or [`refresh()`](Self::refresh).
    pub fn new(config: FleetConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
        };
        let client = BackendClient::new(config.base_url.as_str(), &transport)?;

        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                client,
                vendor: SyncCell::new(),
                devices: SyncCell::new(),
                transactions: SyncCell::new(),
                pricing: SyncCell::new(),
                account: SyncCell::new(),
                cash_payments: SyncCell::new(),
                invalidations: ChangeSignal::new(),
                connection_state,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect: initial foreground load, then spawn poll tasks.
    ///
    /// Calling this on an already-connected controller tears down the
    /// previous session's poll tasks before starting the new one.
    pub async fn connect(&self) -> Result<(), CoreError> {
        // send_replace updates even with zero receivers.
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        self.stop_poll_tasks().await;

        // Fresh child token for this session (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        if let Err(e) = self.refresh().await {
            self.inner
                .connection_state
                .send_replace(ConnectionState::Failed);
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;

        let period = self.inner.config.device_poll_interval;
        if !period.is_zero() {
            let ctrl = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(device_poll_task(ctrl, period, cancel)));
        }

        let period = self.inner.config.transaction_poll_interval;
        if !period.is_zero() {
            let ctrl = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(transaction_poll_task(ctrl, period, cancel)));
        }

        let period = self.inner.config.account_poll_interval;
        if !period.is_zero() {
            let ctrl = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(account_poll_task(ctrl, period, cancel)));
        }
        drop(handles);

        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(url = %self.inner.config.base_url, "connected to backend");
        Ok(())
    }

    /// Disconnect: cancel poll tasks, join them, reset connection state.
    ///
    /// After this returns no further state writes can occur, even for
    /// requests that were in flight when the session was torn down.
    pub async fn disconnect(&self) {
        self.stop_poll_tasks().await;

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Cancel the current session's child token and join its poll tasks.
    /// The parent token survives, so a later `connect` can start fresh.
    async fn stop_poll_tasks(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }

    // ── Foreground refresh ───────────────────────────────────────

    /// Foreground refresh of every resource.
    ///
    /// The device list is the backbone of every view, so its failure is
    /// fatal; the remaining resources fail soft into their own Error
    /// states (last-known-good data preserved).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let inner = &self.inner;

        let ticket = inner.devices.begin();
        inner.devices.set_loading();
        match inner.client.list_devices().await {
            Ok(dtos) => {
                inner
                    .devices
                    .commit(ticket, dtos.into_iter().map(Device::from).collect());
            }
            Err(e) => {
                let err = CoreError::from(e);
                inner.devices.fail(ticket, err.to_string());
                return Err(err);
            }
        }

        let vendor_ticket = inner.vendor.begin();
        inner.vendor.set_loading();
        let tx_ticket = inner.transactions.begin();
        inner.transactions.set_loading();
        let pricing_ticket = inner.pricing.begin();
        inner.pricing.set_loading();
        let account_ticket = inner.account.begin();
        inner.account.set_loading();
        let cash_ticket = inner.cash_payments.begin();
        inner.cash_payments.set_loading();

        let (vendor_res, tx_res, pricing_res, account_res, cash_res) = tokio::join!(
            inner.client.vendor(),
            inner.client.list_transactions(),
            inner.client.pricing(),
            inner.client.account(),
            inner.client.list_cash_payments(),
        );

        match vendor_res {
            Ok(dto) => {
                inner.vendor.commit(vendor_ticket, Vendor::from(dto));
            }
            Err(e) => {
                warn!(error = %e, "vendor fetch failed");
                inner
                    .vendor
                    .fail(vendor_ticket, CoreError::from(e).to_string());
            }
        }
        match tx_res {
            Ok(dtos) => {
                inner
                    .transactions
                    .commit(tx_ticket, dtos.into_iter().map(Transaction::from).collect());
            }
            Err(e) => {
                warn!(error = %e, "transaction fetch failed");
                inner
                    .transactions
                    .fail(tx_ticket, CoreError::from(e).to_string());
            }
        }
        match pricing_res {
            Ok(dto) => {
                inner.pricing.commit(pricing_ticket, Pricing::from(dto));
            }
            Err(e) => {
                warn!(error = %e, "pricing fetch failed");
                inner
                    .pricing
                    .fail(pricing_ticket, CoreError::from(e).to_string());
            }
        }
        match account_res {
            Ok(dto) => {
                inner.account.commit(account_ticket, Account::from(dto));
            }
            Err(e) => {
                warn!(error = %e, "account fetch failed");
                inner
                    .account
                    .fail(account_ticket, CoreError::from(e).to_string());
            }
        }
        match cash_res {
            Ok(dtos) => {
                inner.cash_payments.commit(
                    cash_ticket,
                    dtos.into_iter().map(CashPayment::from).collect(),
                );
            }
            Err(e) => {
                warn!(error = %e, "cash payment fetch failed");
                inner
                    .cash_payments
                    .fail(cash_ticket, CoreError::from(e).to_string());
            }
        }

        Ok(())
    }

    /// Foreground re-fetch of the vendor record. Sibling views call this
    /// when the invalidation signal fires.
    pub async fn refresh_vendor(&self) -> Result<Vendor, CoreError> {
        let ticket = self.inner.vendor.begin();
        self.inner.vendor.set_loading();
        match self.inner.client.vendor().await {
            Ok(dto) => {
                let vendor = Vendor::from(dto);
                self.inner.vendor.commit(ticket, vendor.clone());
                Ok(vendor)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.inner.vendor.fail(ticket, err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch a single device directly (detail views). Not cached.
    pub async fn device(&self, id: &str) -> Result<Device, CoreError> {
        let dto = self.inner.client.get_device(id).await?;
        Ok(Device::from(dto))
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn vendor(&self) -> ResourceStream<Vendor> {
        self.inner.vendor.stream()
    }

    pub fn devices(&self) -> ResourceStream<Vec<Device>> {
        self.inner.devices.stream()
    }

    pub fn transactions(&self) -> ResourceStream<Vec<Transaction>> {
        self.inner.transactions.stream()
    }

    pub fn pricing(&self) -> ResourceStream<Pricing> {
        self.inner.pricing.stream()
    }

    pub fn account(&self) -> ResourceStream<Account> {
        self.inner.account.stream()
    }

    pub fn cash_payments(&self) -> ResourceStream<Vec<CashPayment>> {
        self.inner.cash_payments.stream()
    }

    /// Invalidation signal: bumped after every successful write. Consumers
    /// re-fetch on any change; the value itself carries no meaning.
    pub fn invalidations(&self) -> watch::Receiver<u64> {
        self.inner.invalidations.subscribe()
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Writes ───────────────────────────────────────────────────
    //
    // Discipline, project-wide: validate locally, send, then reconcile
    // cached state from backend truth through the silent-diff path.
    // Entity-echoing endpoints reconcile from the echo (it IS the
    // post-write state); ack-only endpoints re-fetch explicitly. Local
    // state is never mutated optimistically.

    /// Update the vendor record.
    pub async fn update_vendor(
        &self,
        id: &str,
        name: &str,
        shop_name: &str,
    ) -> Result<Vendor, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "vendor name cannot be empty".into(),
            });
        }
        if shop_name.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "shop name cannot be empty".into(),
            });
        }

        let req = UpdateVendorRequest {
            name: name.trim().to_owned(),
            shop_name: shop_name.trim().to_owned(),
        };
        let echoed = self.inner.client.update_vendor(id, &req).await?;
        let vendor = Vendor::from(echoed);

        let ticket = self.inner.vendor.begin();
        self.inner.vendor.commit_silent(ticket, vendor.clone());
        self.inner.invalidations.notify();
        Ok(vendor)
    }

    /// Set the fleet-wide price per litre.
    pub async fn set_price(&self, price_per_litre: f64) -> Result<(), CoreError> {
        if !price_per_litre.is_finite() || price_per_litre <= 0.0 {
            return Err(CoreError::ValidationFailed {
                message: format!("price must be a positive number, got {price_per_litre}"),
            });
        }

        self.inner
            .client
            .set_pricing(&PriceUpdate { price_per_litre })
            .await?;

        self.refetch_pricing_silent().await;
        self.inner.invalidations.notify();
        Ok(())
    }

    /// Register a new device with the fleet.
    pub async fn add_device(&self, name: &str, capacity: Option<f64>) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "device name cannot be empty".into(),
            });
        }

        let req = NewDeviceRequest {
            name: name.trim().to_owned(),
            capacity,
        };
        self.inner.client.add_device(&req).await?;

        self.refetch_devices_silent().await;
        self.inner.invalidations.notify();
        Ok(())
    }

    /// Withdraw from the vendor account.
    ///
    /// Local checks run against the cached balance before any network
    /// call; the backend remains authoritative and performs its own check.
    pub async fn withdraw(&self, amount: f64) -> Result<Account, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationFailed {
                message: "withdrawal amount must be positive".into(),
            });
        }

        let balance = match self.inner.account.current().data {
            Some(account) => account.balance,
            // No cached balance yet -- fetch one so the local check is real.
            None => Account::from(self.inner.client.account().await?).balance,
        };
        if amount > balance {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "withdrawal of {amount:.2} exceeds available balance {balance:.2}"
                ),
            });
        }

        let echoed = self.inner.client.withdraw(&AmountRequest { amount }).await?;
        let account = Account::from(echoed);

        let ticket = self.inner.account.begin();
        self.inner.account.commit_silent(ticket, account.clone());
        self.inner.invalidations.notify();
        Ok(account)
    }

    /// Deposit into the vendor account.
    pub async fn deposit(&self, amount: f64) -> Result<Account, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationFailed {
                message: "deposit amount must be positive".into(),
            });
        }

        let echoed = self.inner.client.deposit(&AmountRequest { amount }).await?;
        let account = Account::from(echoed);

        let ticket = self.inner.account.begin();
        self.inner.account.commit_silent(ticket, account.clone());
        self.inner.invalidations.notify();
        Ok(account)
    }

    // ── Silent re-fetch helpers ──────────────────────────────────

    async fn refetch_pricing_silent(&self) {
        let ticket = self.inner.pricing.begin();
        match self.inner.client.pricing().await {
            Ok(dto) => {
                self.inner.pricing.commit_silent(ticket, Pricing::from(dto));
            }
            Err(e) => debug!(error = %e, "silent pricing re-fetch failed"),
        }
    }

    async fn refetch_devices_silent(&self) {
        let ticket = self.inner.devices.begin();
        match self.inner.client.list_devices().await {
            Ok(dtos) => {
                self.inner
                    .devices
                    .commit_silent(ticket, dtos.into_iter().map(Device::from).collect());
            }
            Err(e) => debug!(error = %e, "silent device re-fetch failed"),
        }
    }
}

// ── Poll tasks ───────────────────────────────────────────────────
//
// Fixed cadence, no backoff. The fetch itself is raced against the
// cancellation token, so a response arriving after teardown can never
// write state. Errors on this path are swallowed (logged at debug):
// the next successful tick self-heals.

async fn device_poll_task(controller: FleetController, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    'outer: loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tracing::debug!("device poll tick");
                let ticket = controller.inner.devices.begin();
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break 'outer,
                    res = controller.inner.client.list_devices() => match res {
                        Ok(dtos) => {
                            let devices: Vec<Device> =
                                dtos.into_iter().map(Device::from).collect();
                            if controller.inner.devices.commit_silent(ticket, devices) {
                                tracing::debug!("device snapshot changed");
                            }
                        }
                        Err(e) => debug!(error = %e, "device poll failed"),
                    }
                }
            }
        }
    }
}

async fn transaction_poll_task(
    controller: FleetController,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;

    'outer: loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tracing::debug!("transaction poll tick");
                let ticket = controller.inner.transactions.begin();
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break 'outer,
                    res = controller.inner.client.list_transactions() => match res {
                        Ok(dtos) => {
                            let txs: Vec<Transaction> =
                                dtos.into_iter().map(Transaction::from).collect();
                            controller.inner.transactions.commit_silent(ticket, txs);
                        }
                        Err(e) => debug!(error = %e, "transaction poll failed"),
                    }
                }
            }
        }
    }
}

/// Polls the account and the cash-payment list together -- both feed the
/// same account view.
async fn account_poll_task(
    controller: FleetController,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;

    'outer: loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tracing::debug!("account poll tick");
                let account_ticket = controller.inner.account.begin();
                let cash_ticket = controller.inner.cash_payments.begin();
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break 'outer,
                    (account_res, cash_res) = async {
                        tokio::join!(
                            controller.inner.client.account(),
                            controller.inner.client.list_cash_payments(),
                        )
                    } => {
                        match account_res {
                            Ok(dto) => {
                                controller
                                    .inner
                                    .account
                                    .commit_silent(account_ticket, Account::from(dto));
                            }
                            Err(e) => debug!(error = %e, "account poll failed"),
                        }
                        match cash_res {
                            Ok(dtos) => {
                                let payments: Vec<CashPayment> =
                                    dtos.into_iter().map(CashPayment::from).collect();
                                controller
                                    .inner
                                    .cash_payments
                                    .commit_silent(cash_ticket, payments);
                            }
                            Err(e) => debug!(error = %e, "cash payment poll failed"),
                        }
                    }
                }
            }
        }
    }
}
