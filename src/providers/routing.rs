// Routing API client with great-circle fallback

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Km, Location, Minutes};
use crate::providers::DistanceProvider;
use crate::utils::distance::haversine_km;

/// Default distance-matrix endpoint, overridable via `ROUTING_API_URL`
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport mode of a distance lookup and of the surrounding store search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TransportMode {
    /// Radius growth per adaptive-search iteration
    pub fn radius_step_km(self) -> Km {
        match self {
            TransportMode::Walking => 0.1,
            TransportMode::Bicycling | TransportMode::Transit => 0.5,
            TransportMode::Driving => 1.0,
        }
    }

    /// Upper bound on how far the search may grow past the user's budget
    pub fn max_extension_km(self) -> Km {
        match self {
            TransportMode::Walking => 0.5,
            TransportMode::Bicycling | TransportMode::Transit => 2.0,
            TransportMode::Driving => 5.0,
        }
    }

    /// Parameter value understood by the routing API
    pub fn api_name(self) -> &'static str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Bicycling => "bicycling",
            TransportMode::Transit => "transit",
        }
    }
}

/// Which path produced a distance estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSource {
    /// The routing API answered
    Routed,
    /// Local haversine fallback; no duration available
    GreatCircle,
}

/// Best-effort travel estimate between two coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceEstimate {
    pub distance_km: Km,
    pub duration_minutes: Option<Minutes>,
    pub source: DistanceSource,
}

/// Failure of a single routing request, before the fallback rescues it
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing API rejected the request: {0}")]
    Rejected(String),

    #[error("routing response carried no usable element")]
    NoElement,
}

/// Routing client configuration
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl RoutingConfig {
    /// Reads `ROUTING_API_KEY` (required) and `ROUTING_API_URL` (optional)
    /// from the environment
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            api_key: std::env::var("ROUTING_API_KEY")?,
            base_url: std::env::var("ROUTING_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// Distance-matrix client.
///
/// Owned by whoever constructs the optimizer and passed by reference; there
/// is no hidden global instance. Every failed lookup degrades to the
/// great-circle estimate, so [`DistanceProvider::distance`] never fails.
pub struct RoutingClient {
    config: RoutingConfig,
    http: reqwest::blocking::Client,
}

impl RoutingClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn request_route(
        &self,
        from: &Location,
        to: &Location,
        mode: TransportMode,
    ) -> Result<DistanceEstimate, RoutingError> {
        let origins = format!("{},{}", from.latitude, from.longitude);
        let destinations = format!("{},{}", to.latitude, to.longitude);

        let mut request = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", mode.api_name()),
                ("key", self.config.api_key.as_str()),
            ]);
        if mode == TransportMode::Driving {
            // Ask for live traffic so driving durations are realistic
            request = request.query(&[("departure_time", "now")]);
        }

        let response: MatrixResponse = request.send()?.error_for_status()?.json()?;
        if response.status != "OK" {
            return Err(RoutingError::Rejected(response.status));
        }

        let element = response
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or(RoutingError::NoElement)?;
        if element.status != "OK" {
            return Err(RoutingError::Rejected(element.status.clone()));
        }

        let distance = element.distance.as_ref().ok_or(RoutingError::NoElement)?;
        let duration = element
            .duration_in_traffic
            .as_ref()
            .or(element.duration.as_ref());

        Ok(DistanceEstimate {
            distance_km: distance.value / 1000.0,
            duration_minutes: duration.map(|d| d.value / 60.0),
            source: DistanceSource::Routed,
        })
    }
}

impl DistanceProvider for RoutingClient {
    fn distance(&self, from: &Location, to: &Location, mode: TransportMode) -> DistanceEstimate {
        match self.request_route(from, to, mode) {
            Ok(estimate) => estimate,
            Err(err) => {
                warn!("routing lookup failed ({}), using great-circle estimate", err);
                great_circle_estimate(from, to)
            }
        }
    }
}

/// Deterministic distance provider backed only by the haversine formula.
///
/// The permanent fallback path of [`RoutingClient`], also usable on its own
/// when no routing API is configured (tests, demos, offline mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceProvider for GreatCircle {
    fn distance(&self, from: &Location, to: &Location, _mode: TransportMode) -> DistanceEstimate {
        great_circle_estimate(from, to)
    }
}

fn great_circle_estimate(from: &Location, to: &Location) -> DistanceEstimate {
    DistanceEstimate {
        distance_km: haversine_km(from, to),
        duration_minutes: None,
        source: DistanceSource::GreatCircle,
    }
}

// Distance-matrix response payload, reduced to the fields in use
#[derive(Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixValue>,
    duration: Option<MatrixValue>,
    duration_in_traffic: Option<MatrixValue>,
}

#[derive(Deserialize)]
struct MatrixValue {
    value: f64,
}
