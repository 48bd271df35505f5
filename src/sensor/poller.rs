use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::foundation::error::{FloaterError, FloaterResult};

const USER_AGENT: &str = concat!("floater/", env!("CARGO_PKG_VERSION"));

/// One decoded sensor payload: particulate-matter concentrations, consumed
/// directly as animation speeds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SensorReading {
    pub pm25: f64,
    pub pm10: f64,
}

/// Polling cadence. The first tick polls immediately; afterwards a poll
/// fires once `interval_ms` has elapsed since the previous one, whether or
/// not it succeeded.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PollerOpts {
    pub interval_ms: u64,
}

impl Default for PollerOpts {
    fn default() -> Self {
        Self { interval_ms: 3000 }
    }
}

/// Blocking HTTP client for the sensor endpoint.
#[derive(Clone)]
pub struct SensorClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl SensorClient {
    pub fn new(endpoint: impl Into<String>) -> FloaterResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FloaterError::sensor(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one GET and decode the JSON payload.
    ///
    /// A transport failure, a non-success status or an undecodable body is a
    /// typed error; the caller decides whether to log or propagate.
    pub fn fetch(&self) -> FloaterResult<SensorReading> {
        let resp = self
            .http
            .get(&self.endpoint)
            .send()
            .map_err(|e| FloaterError::sensor(format!("sensor request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FloaterError::sensor(format!(
                "sensor endpoint returned {status}"
            )));
        }
        resp.json::<SensorReading>()
            .map_err(|e| FloaterError::sensor(format!("sensor payload decode failed: {e}")))
    }
}

/// Fire-and-forget interval poller.
///
/// Each due tick dispatches the GET on a detached thread; results come back
/// over a channel and are merged into animation state only when the frame
/// loop calls [`SensorPoller::drain`], so flight-list mutation stays on one
/// thread. Failures are logged and skipped: no retry, no backoff, and the
/// next attempt happens on the next interval tick regardless.
pub struct SensorPoller {
    client: SensorClient,
    interval: Duration,
    last_poll: Option<Instant>,
    tx: mpsc::Sender<FloaterResult<SensorReading>>,
    rx: mpsc::Receiver<FloaterResult<SensorReading>>,
}

impl SensorPoller {
    pub fn new(client: SensorClient, opts: PollerOpts) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            interval: Duration::from_millis(opts.interval_ms),
            last_poll: None,
            tx,
            rx,
        }
    }

    /// Dispatch a poll if one is due.
    pub fn tick(&mut self, now: Instant) {
        let due = self
            .last_poll
            .is_none_or(|t| now.saturating_duration_since(t) >= self.interval);
        if !due {
            return;
        }
        self.last_poll = Some(now);

        let client = self.client.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            // The receiver outlives the session; a send failure only means
            // the poller was dropped mid-flight.
            let _ = tx.send(client.fetch());
        });
    }

    /// Collect completed polls. Successful readings are returned in arrival
    /// order; failures are logged at `warn` and dropped.
    pub fn drain(&mut self) -> Vec<SensorReading> {
        let mut out = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(reading) => out.push(reading),
                Err(err) => tracing::warn!(%err, "sensor poll failed; skipping"),
            }
        }
        out
    }
}
