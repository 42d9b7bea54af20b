use std::net::SocketAddr;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::core::config::Settings;

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let addr: SocketAddr = settings.telemetry().prometheus_addr.parse().with_context(|| {
        format!("Invalid PROMETHEUS_ADDR: {}", settings.telemetry().prometheus_addr)
    })?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
