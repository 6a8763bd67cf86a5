//! Structured logging, and span export over OTLP.

use miette::{IntoDiagnostic, WrapErr};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{InstrumentationScope, KeyValue};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use tracing::{Subscriber, info};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::TracingConfig, consts};

/// The filter used when `RUST_LOG` isn't set.
const DEFAULT_FILTER: &str = "lexis=debug,lexis_dictionary=debug,tower_http=info";

/// Describes this service to the collector.
fn resource(config: &TracingConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attribute(KeyValue::new("service.version", consts::SERVICE_VERSION))
        .build()
}

/// Builds a layer that exports spans over OTLP/HTTP.
fn otlp_layer<S>(config: &TracingConfig) -> miette::Result<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .build()
        .into_diagnostic()
        .wrap_err("building otlp http exporter failed")?;
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource(config))
        .build();
    let scope = InstrumentationScope::builder(consts::SERVICE_NAME)
        .with_version(consts::SERVICE_VERSION)
        .build();

    Ok(tracing_opentelemetry::layer().with_tracer(provider.tracer_with_scope(scope)))
}

/// Installs the global subscriber: JSON logs on stdout, plus an OTLP exporter when tracing is
/// enabled.
///
/// # Errors
///
/// Fails if the exporter can't be built or a global subscriber is already installed.
pub fn try_init(config: &TracingConfig) -> miette::Result<()> {
    let telemetry_layer = if config.enabled {
        Some(otlp_layer(config)?)
    } else {
        None
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry_layer)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    info!(
        otlp = config.enabled,
        service = %config.service_name,
        version = consts::SERVICE_VERSION,
        "tracing initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use opentelemetry::{Key, Value};

    use super::*;

    #[test]
    fn test_resource_names_the_service() {
        let config = TracingConfig {
            enabled: true,
            service_name: String::from("lexis-staging"),
        };
        let resource = resource(&config);

        assert_eq!(
            resource.get(&Key::from_static_str("service.name")),
            Some(Value::from("lexis-staging"))
        );
        assert_eq!(
            resource.get(&Key::from_static_str("service.version")),
            Some(Value::from(consts::SERVICE_VERSION))
        );
    }
}
