//! # Request Pipeline
//!
//! One request cycle runs in two explicit stages:
//!
//! 1. **Gather** ([`WeatherPipeline::gather`]): resolve the location, fetch
//!    the forecast, look up the place name.
//! 2. **Deliver** ([`deliver`]): send current conditions, then encode the
//!    hourly series and send every [`DayBatch`](crate::DayBatch) in day order.
//!
//! Network collaborators sit behind the [`ForecastSource`], [`PlaceLookup`]
//! and [`Locator`] traits so each stage can run against fakes.
//!
//! ## Failure Reporting
//! - Location failure: `LocationUnavailable` is sent, the cycle ends
//! - Forecast failure: `BadKey` is sent, the cycle ends
//! - Place name failure: logged, the cycle continues with an empty name
//!
//! Every failure is reported to the watch exactly once and never retried.

#![allow(async_fn_in_trait)]

use crate::{
    conditions::CurrentConditions,
    encoder::{encode, TrailingDay},
    forecast::{Forecast, ForecastClient},
    geocode::GeocodeClient,
    locate::IpLocator,
    message::{MessageSink, OutboundMessage},
    request::{Coordinates, FetchRequest, LocationSource},
    WeatherError,
};

/// Something that can fetch a forecast.
pub trait ForecastSource {
    async fn forecast(&self, api_key: &str, coords: Coordinates) -> Result<Forecast, WeatherError>;
}

/// Something that can name a place.
pub trait PlaceLookup {
    async fn place_name(&self, coords: Coordinates) -> Result<String, WeatherError>;
}

/// Something that can determine the device position.
pub trait Locator {
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

impl ForecastSource for ForecastClient {
    async fn forecast(&self, api_key: &str, coords: Coordinates) -> Result<Forecast, WeatherError> {
        self.fetch(api_key, coords).await
    }
}

impl PlaceLookup for GeocodeClient {
    async fn place_name(&self, coords: Coordinates) -> Result<String, WeatherError> {
        GeocodeClient::place_name(self, coords).await
    }
}

impl Locator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        IpLocator::locate(self).await
    }
}

/// Result of the gather stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Gathered {
    pub coords: Coordinates,
    pub forecast: Forecast,
    /// Place name, empty if the lookup failed or found nothing
    pub name: String,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

/// Summary of the deliver stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Whether a current-conditions message was sent
    pub current_sent: bool,
    /// Number of day batches sent
    pub batches_sent: usize,
}

/// The request cycle, wired to its collaborators.
#[derive(Debug, Clone)]
pub struct WeatherPipeline<F, P, L> {
    forecasts: F,
    places: P,
    locator: L,
    trailing: TrailingDay,
}

impl<F, P, L> WeatherPipeline<F, P, L>
where
    F: ForecastSource,
    P: PlaceLookup,
    L: Locator,
{
    pub fn new(forecasts: F, places: P, locator: L, trailing: TrailingDay) -> Self {
        WeatherPipeline {
            forecasts,
            places,
            locator,
            trailing,
        }
    }

    /// Run a full cycle: gather, then deliver.
    pub async fn run<S: MessageSink>(
        &self,
        request: &FetchRequest,
        sink: &mut S,
    ) -> Result<Delivery, WeatherError> {
        let gathered = self.gather(request, sink).await?;
        Ok(deliver(&gathered, self.trailing, sink))
    }

    /// Stage 1: resolve location, fetch forecast, name the place.
    ///
    /// Failures of the first two steps are reported to `sink` before the error
    /// is returned.
    pub async fn gather<S: MessageSink>(
        &self,
        request: &FetchRequest,
        sink: &mut S,
    ) -> Result<Gathered, WeatherError> {
        let coords = match request.location {
            LocationSource::Fixed(coords) => coords,
            LocationSource::Device => match self.locator.locate().await {
                Ok(coords) => coords,
                Err(e) => {
                    log::warn!("Location error: {}", e);
                    sink.send(&OutboundMessage::LocationUnavailable);
                    return Err(e);
                }
            },
        };

        let forecast = match self.forecasts.forecast(&request.api_key, coords).await {
            Ok(forecast) => forecast,
            Err(e) => {
                log::warn!("Forecast fetch failed: {}", e);
                sink.send(&OutboundMessage::BadKey);
                return Err(e);
            }
        };

        let name = self.places.place_name(coords).await.unwrap_or_else(|e| {
            log::warn!("Place name lookup failed: {}", e);
            String::new()
        });

        Ok(Gathered {
            coords,
            forecast,
            name,
            fetched_at: chrono::Utc::now(),
        })
    }
}

/// Stage 2: send current conditions and every day batch.
pub fn deliver<S: MessageSink>(gathered: &Gathered, trailing: TrailingDay, sink: &mut S) -> Delivery {
    let mut delivery = Delivery::default();

    if let Some(currently) = &gathered.forecast.currently {
        sink.send(&OutboundMessage::Current {
            conditions: CurrentConditions::from_currently(currently),
            name: gathered.name.clone(),
        });
        delivery.current_sent = true;
    }

    let samples = gathered.forecast.hourly_samples();
    if let Some(first) = samples.first().and_then(|s| s.time()) {
        log::info!(
            "Encoding {} hourly samples starting {}",
            samples.len(),
            first.format("%Y-%m-%d %H:%M UTC")
        );
    }

    for batch in encode(samples.iter().copied(), trailing) {
        sink.send(&OutboundMessage::Forecast(batch));
        delivery.batches_sent += 1;
    }

    log::info!(
        "Delivered {} day batches for ({:.4}, {:.4})",
        delivery.batches_sent,
        gathered.coords.latitude,
        gathered.coords.longitude
    );
    delivery
}
