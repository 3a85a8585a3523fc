//! The instrumentation facade the proxy core records into.
//!
//! One `ProxyMetrics` is built at startup, registered against an explicit
//! `prometheus::Registry`, and handed to every component that times requests.
//! Recording is fire-and-forget: none of the `record_*` operations can fail
//! or block, and all are safe for unsynchronized concurrent use from
//! per-connection tasks. The only fatal condition is duplicate metric
//! registration at startup, which aborts initialization.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder};

use crate::error::{Result, SocksLensError};
use crate::instrument::RollingSummary;
use crate::label::LabelMode;

/// Latency histogram buckets: seven exponentially doubling thresholds
/// anchored at 125 ms, in microseconds (125ms .. 8s). Fixed at registration
/// time; sized for typical network round trips.
const LATENCY_BUCKETS_START_MICROS: f64 = 125_000.0;
const LATENCY_BUCKETS_FACTOR: f64 = 2.0;
const LATENCY_BUCKETS_COUNT: usize = 7;

/// Facade configuration. The label key is a deployment choice (see
/// [`LabelMode`]); everything else rarely moves off the defaults.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Prefix for every exported metric name.
    pub namespace: String,
    /// Dimension the per-request series are keyed by.
    pub label_mode: LabelMode,
    /// Tag used when `label_mode` is [`LabelMode::Constant`].
    pub constant_value: String,
    /// Rolling window for summary quantiles.
    pub summary_max_age: Duration,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: "sockslens".into(),
            label_mode: LabelMode::Constant,
            constant_value: "request".into(),
            summary_max_age: Duration::from_secs(3600),
        }
    }
}

/// All instruments of the facade, registered once at startup.
pub struct ProxyMetrics {
    registry: Registry,
    requests_handled: IntCounter,
    requests_succeeded: IntCounter,
    requests_failed: IntCounter,
    request_duration: RollingSummary,
    request_latency: HistogramVec,
    setup_duration: RollingSummary,
    setup_latency: HistogramVec,
    label_mode: LabelMode,
    constant_value: String,
}

impl ProxyMetrics {
    /// Build and register every instrument against `registry`.
    ///
    /// Fails with [`SocksLensError::DuplicateMetric`] if any name is already
    /// taken in the registry; callers must treat that as fatal and abort
    /// startup.
    pub fn register(registry: &Registry, cfg: &MetricsConfig) -> Result<Self> {
        let ns = cfg.namespace.as_str();
        let label_key = cfg.label_mode.key();

        let requests_handled = register_counter(
            registry,
            ns,
            "requests_handled_total",
            "Requests handled by the proxy",
        )?;
        let requests_succeeded = register_counter(
            registry,
            ns,
            "requests_succeeded_total",
            "Requests that were successfully fulfilled",
        )?;
        let requests_failed = register_counter(
            registry,
            ns,
            "requests_failed_total",
            "Requests that failed to be handled properly",
        )?;

        let request_latency = register_latency_histogram(
            registry,
            ns,
            "request_latency_micros",
            "Request latency distribution in microseconds",
            label_key,
        )?;
        let setup_latency = register_latency_histogram(
            registry,
            ns,
            "request_setup_latency_micros",
            "Connection setup latency distribution in microseconds",
            label_key,
        )?;

        let request_duration = RollingSummary::new(
            format!("{ns}_request_duration_micros"),
            "Request duration summary in microseconds",
            label_key,
            cfg.summary_max_age,
        );
        let setup_duration = RollingSummary::new(
            format!("{ns}_request_setup_duration_micros"),
            "Connection setup duration summary in microseconds",
            label_key,
            cfg.summary_max_age,
        );

        tracing::debug!(namespace = %ns, label_key = %label_key, "proxy metrics registered");

        Ok(Self {
            registry: registry.clone(),
            requests_handled,
            requests_succeeded,
            requests_failed,
            request_duration,
            request_latency,
            setup_duration,
            setup_latency,
            label_mode: cfg.label_mode,
            constant_value: cfg.constant_value.clone(),
        })
    }

    /// Convenience constructor owning a fresh registry.
    pub fn new(cfg: &MetricsConfig) -> Result<Self> {
        Self::register(&Registry::new(), cfg)
    }

    /// Registry all prometheus-backed instruments live in.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count one handled request.
    pub fn record_handled(&self) {
        self.requests_handled.inc();
    }

    /// Count one successfully fulfilled request.
    pub fn record_succeeded(&self) {
        self.requests_succeeded.inc();
    }

    /// Count one failed request.
    pub fn record_failed(&self) {
        self.requests_failed.inc();
    }

    /// Observe the elapsed time since `start` (microseconds) into the
    /// request duration summary and latency histogram under `label`.
    ///
    /// `start` must be the timestamp captured when this request began;
    /// monotonic time makes a negative elapsed unrepresentable.
    pub fn record_duration(&self, start: Instant, label: &str) {
        let elapsed = start.elapsed().as_micros() as f64;
        self.request_duration.observe(label, elapsed);
        self.request_latency.with_label_values(&[label]).observe(elapsed);
    }

    /// Same contract as [`Self::record_duration`], against the setup-phase
    /// summary/histogram pair. Used to split connection-setup latency from
    /// full-request latency.
    pub fn record_setup_duration(&self, start: Instant, label: &str) {
        let elapsed = start.elapsed().as_micros() as f64;
        self.setup_duration.observe(label, elapsed);
        self.setup_latency.with_label_values(&[label]).observe(elapsed);
    }

    /// Resolve the label value for one proxied connection per the configured
    /// label mode.
    pub fn request_label(&self, client: SocketAddr, remote: &str) -> String {
        self.label_mode.value(&self.constant_value, client, remote)
    }

    /// Current handled count.
    pub fn handled(&self) -> u64 {
        self.requests_handled.get()
    }

    /// Current succeeded count.
    pub fn succeeded(&self) -> u64 {
        self.requests_succeeded.get()
    }

    /// Current failed count.
    pub fn failed(&self) -> u64 {
        self.requests_failed.get()
    }

    /// Render every instrument in the Prometheus text exposition format:
    /// registry-owned metrics first, then the summary families.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        TextEncoder::new()
            .encode_utf8(&self.registry.gather(), &mut out)
            .map_err(|e| SocksLensError::Internal(format!("text encode failed: {e}")))?;
        self.request_duration.render_into(&mut out);
        self.setup_duration.render_into(&mut out);
        Ok(out)
    }
}

fn register_counter(registry: &Registry, ns: &str, name: &str, help: &str) -> Result<IntCounter> {
    let counter = IntCounter::with_opts(Opts::new(name, help).namespace(ns))?;
    register(registry, Box::new(counter.clone()), name)?;
    Ok(counter)
}

fn register_latency_histogram(
    registry: &Registry,
    ns: &str,
    name: &str,
    help: &str,
    label_key: &str,
) -> Result<HistogramVec> {
    let buckets = prometheus::exponential_buckets(
        LATENCY_BUCKETS_START_MICROS,
        LATENCY_BUCKETS_FACTOR,
        LATENCY_BUCKETS_COUNT,
    )?;
    let hist = HistogramVec::new(
        HistogramOpts::new(name, help).namespace(ns).buckets(buckets),
        &[label_key],
    )?;
    register(registry, Box::new(hist.clone()), name)?;
    Ok(hist)
}

fn register(registry: &Registry, collector: Box<dyn Collector>, name: &str) -> Result<()> {
    registry.register(collector).map_err(|e| match e {
        prometheus::Error::AlreadyReg => SocksLensError::DuplicateMetric(name.to_string()),
        other => SocksLensError::InvalidMetric(format!("{name}: {other}")),
    })
}
