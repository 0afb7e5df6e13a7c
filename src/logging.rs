//! Tracing subscriber for the shell.
//!
//! Engine events go to the browser console on wasm and to stderr elsewhere.
//! `RUST_LOG` overrides the default filter where the platform has one.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "info";

/// Plain-text event formatting shared by every sink.
pub fn fmt_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .compact()
        .with_writer(writer)
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    #[cfg(target_arch = "wasm32")]
    let writer = tracing_web::MakeWebConsoleWriter::new();
    #[cfg(not(target_arch = "wasm32"))]
    let writer = std::io::stderr;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(writer))
        .init();
}
