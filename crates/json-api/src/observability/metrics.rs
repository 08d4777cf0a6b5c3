//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

use super::settings;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    purchases_total: IntCounterVec,
    redemptions_total: IntCounterVec,
    top_ups_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a completed purchase by currency and mode.
pub(crate) fn observe_purchase(currency: &str, mode: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .purchases_total
            .with_label_values(&[currency, mode])
            .inc();
    }
}

/// Count a successful promo code redemption by reward kind.
pub(crate) fn observe_redemption(reward: &str) {
    if let Some(metrics) = metrics() {
        metrics.redemptions_total.with_label_values(&[reward]).inc();
    }
}

/// Count a deposit, split by whether a bonus code was used.
pub(crate) fn observe_top_up(with_bonus: bool) {
    if let Some(metrics) = metrics() {
        let label = if with_bonus { "bonus" } else { "plain" };

        metrics.top_ups_total.with_label_values(&[label]).inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    if !settings::metrics_enabled() {
        res.status_code(StatusCode::NOT_FOUND);
        return;
    }

    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static Metrics> {
    if !settings::metrics_enabled() {
        return None;
    }

    METRICS.get_or_init(build_metrics).as_ref()
}

fn register<M>(registry: &Registry, metric: Result<M, prometheus::Error>, name: &str) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "ostrum_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, and status code.",
            ),
            &["method", "route", "status_code"],
        ),
        "requests_total",
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "ostrum_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "route"],
        ),
        "request_duration",
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "ostrum_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
        "requests_in_flight",
    )?;

    let purchases_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "ostrum_store_purchases_total",
                "Completed purchases partitioned by currency and mode.",
            ),
            &["currency", "mode"],
        ),
        "purchases_total",
    )?;

    let redemptions_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "ostrum_store_promo_redemptions_total",
                "Successful promo code redemptions partitioned by reward kind.",
            ),
            &["reward"],
        ),
        "redemptions_total",
    )?;

    let top_ups_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "ostrum_store_top_ups_total",
                "Recorded balance deposits partitioned by bonus usage.",
            ),
            &["kind"],
        ),
        "top_ups_total",
    )?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        purchases_total,
        redemptions_total,
        top_ups_total,
    })
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_store_metrics() -> TestResult {
        observe_request("GET", "/products", 200, 0.042);
        observe_purchase("RUB", "paid");
        observe_redemption("RUB_BALANCE");
        observe_top_up(true);

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        for name in [
            "ostrum_json_http_requests_total",
            "ostrum_json_http_request_duration_seconds",
            "ostrum_json_http_requests_in_flight",
            "ostrum_store_purchases_total",
            "ostrum_store_promo_redemptions_total",
            "ostrum_store_top_ups_total",
        ] {
            assert!(response.contains(name), "expected {name} in metrics response");
        }

        Ok(())
    }
}
