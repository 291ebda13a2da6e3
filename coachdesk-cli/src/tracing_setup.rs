//! Logging for the coachdesk CLI
//!
//! One subscriber stack: an `EnvFilter`, compact console output, and, when
//! built with `telemetry` and run with `--otel`, an OTLP span exporter.
//!
//! `RUST_LOG` overrides the built-in filters, e.g.
//! `RUST_LOG=coachdesk_server=debug,sqlx=warn coachdesk serve`.
//! The exporter reads `OTEL_EXPORTER_OTLP_ENDPOINT` and `OTEL_SERVICE_NAME`.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type ExportLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging switches taken from the global CLI flags
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

/// Filter used when `RUST_LOG` is unset.
///
/// sqlx statement logs only show up under `--debug`.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "debug,hyper=info,h2=info,sqlx=info"
    } else {
        "info,sqlx=warn"
    }
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(debug)))
}

/// Keeps span export alive; dropping it flushes and stops the exporter.
#[must_use]
#[derive(Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl TelemetryGuard {
    pub fn is_exporting(&self) -> bool {
        #[cfg(feature = "telemetry")]
        return self.provider.is_some();

        #[cfg(not(feature = "telemetry"))]
        false
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to flush trace export: {err}");
            }
        }
    }
}

/// Where spans go when exporting is on
#[cfg(feature = "telemetry")]
#[derive(Debug, PartialEq, Eq)]
struct ExportTarget {
    endpoint: String,
    service_name: String,
}

#[cfg(feature = "telemetry")]
impl ExportTarget {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:4317".to_string()),
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| "coachdesk".to_string()),
        }
    }
}

#[cfg(feature = "telemetry")]
fn export_layer(config: &TracingConfig, guard: &mut TelemetryGuard) -> Result<Option<ExportLayer>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;

    if !config.otel {
        return Ok(None);
    }

    let target = ExportTarget::from_lookup(|key| std::env::var(key).ok());
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&target.endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter for {}: {}", target.endpoint, e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            target.service_name,
        )]))
        .build();

    let tracer = provider.tracer("coachdesk");
    let _ = opentelemetry::global::set_tracer_provider(provider.clone());
    guard.provider = Some(provider);

    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed()))
}

#[cfg(not(feature = "telemetry"))]
fn export_layer(_config: &TracingConfig, _guard: &mut TelemetryGuard) -> Result<Option<ExportLayer>> {
    Ok(None)
}

/// Install the global subscriber. Hold the returned guard until exit.
pub fn init(config: &TracingConfig) -> Result<TelemetryGuard> {
    let mut guard = TelemetryGuard::default();
    let export = export_layer(config, &mut guard)?;

    tracing_subscriber::registry()
        .with(export)
        .with(filter(config.debug))
        .with(fmt::layer().with_target(config.debug).compact())
        .try_init()
        .map_err(|err| anyhow!(err))?;

    if guard.is_exporting() {
        tracing::info!("exporting traces over OTLP");
    } else if config.otel {
        tracing::warn!("--otel ignored: built without the `telemetry` feature");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_filter_hides_statement_logs() {
        let directives = default_directives(false);
        assert!(directives.starts_with("info"));
        assert!(directives.contains("sqlx=warn"));
    }

    #[test]
    fn debug_filter_parses() {
        assert!(default_directives(true).starts_with("debug"));
        for debug in [true, false] {
            assert!(EnvFilter::try_new(default_directives(debug)).is_ok());
        }
    }

    #[test]
    fn guard_without_export_is_inert() {
        let guard = TelemetryGuard::default();
        assert!(!guard.is_exporting());
        drop(guard);
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn export_target_defaults() {
        let target = ExportTarget::from_lookup(|_| None);
        assert_eq!(target.endpoint, "http://localhost:4317");
        assert_eq!(target.service_name, "coachdesk");

        let target = ExportTarget::from_lookup(|key| {
            (key == "OTEL_SERVICE_NAME").then(|| "coachdesk-staging".to_string())
        });
        assert_eq!(target.service_name, "coachdesk-staging");
    }
}
