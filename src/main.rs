//! # Glance Weather Companion Entry Point
//!
//! Runs one request cycle: reads the configuration and the watch's request
//! payload, gathers the forecast and writes every outbound message as a JSON
//! line on stdout for the message bridge. Logs go to stderr.
//!
//! With `--table` each day batch is also decoded and printed as a text table
//! (development mode).

use anyhow::Context;
use argh::FromArgs;
use glance_weather::{
    config::Config,
    forecast::ForecastClient,
    geocode::GeocodeClient,
    locate::IpLocator,
    message::{JsonLinesSink, MessageSink, OutboundMessage},
    pipeline::WeatherPipeline,
    renderer::draw_ascii,
    request::{Coordinates, FetchRequest, InboundPayload, RequestOptions},
};

#[derive(FromArgs)]
/// Fetch a weather forecast and pack it for a wrist-worn display
struct Args {
    /// path to the configuration file (default: glance-weather.toml)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// forecast API key, overrides the config file and the watch
    #[argh(option)]
    api_key: Option<String>,

    /// latitude in decimal degrees (requires --lon)
    #[argh(option)]
    lat: Option<f64>,

    /// longitude in decimal degrees (requires --lat)
    #[argh(option)]
    lon: Option<f64>,

    /// inbound request payload as JSON, e.g. '{"FIOW_REQUEST": 1}'
    #[argh(option)]
    request: Option<String>,

    /// print decoded day batches as tables on stderr
    #[argh(switch)]
    table: bool,
}

/// Sink decorator printing each forecast batch before passing it on.
struct TableSink<S> {
    inner: S,
    enabled: bool,
}

impl<S: MessageSink> MessageSink for TableSink<S> {
    fn send(&mut self, message: &OutboundMessage) {
        if let (true, OutboundMessage::Forecast(batch)) = (self.enabled, message) {
            draw_ascii(batch);
        }
        self.inner.send(message);
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Initialize logging
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let mut options = config.request_options();
    if let Some(key) = args.api_key.clone() {
        options.api_key = Some(key);
    }
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => options.location = Some(Coordinates::new(lat, lon)),
        (None, None) => {}
        _ => log::warn!("Ignoring --lat/--lon: both must be given"),
    }

    let payload = match &args.request {
        Some(json) => serde_json::from_str::<InboundPayload>(json)
            .context("request payload is not valid JSON")?,
        None => InboundPayload::fetch(),
    };

    let mut sink = TableSink {
        inner: JsonLinesSink::stdout(),
        enabled: args.table,
    };
    run(&config, &payload, &options, &mut sink)
}

fn run<S: MessageSink>(
    config: &Config,
    payload: &InboundPayload,
    options: &RequestOptions,
    sink: &mut S,
) -> anyhow::Result<()> {
    sink.send(&OutboundMessage::Ready);

    let Some(request) = FetchRequest::from_payload(payload, options) else {
        return Ok(());
    };

    let timeout = config.api.timeout();
    let pipeline = WeatherPipeline::new(
        ForecastClient::new(config.api.forecast_url.as_str(), timeout)?,
        GeocodeClient::new(config.api.geocode_url.as_str(), timeout)?,
        IpLocator::new(config.api.locate_url.as_str())?,
        config.encoder.trailing_day,
    );

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    let delivery = rt
        .block_on(pipeline.run(&request, sink))
        .context("weather request failed")?;

    log::info!(
        "Request complete: current conditions {}, {} day batches",
        if delivery.current_sent { "sent" } else { "missing" },
        delivery.batches_sent
    );
    Ok(())
}
