//! Device location with a fixed fallback
//!
//! [`LocationProvider::resolve`] never fails. Any geolocation error is logged
//! and replaced by [`DEFAULT_COORDINATE`] (Tokyo).

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LocationError;
use crate::observation::Coordinate;

/// Used whenever the device location is unknown
pub const DEFAULT_COORDINATE: Coordinate = Coordinate::new(35.6762, 139.6503);

pub const IP_LOOKUP_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

/// The device's location capability
pub trait Geolocator {
    fn locate(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate location from the public IP address
#[derive(Clone, Debug)]
pub struct IpGeolocator {
    http: reqwest::Client,
    url: String,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(IP_LOOKUP_URL)
    }
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            http,
            url: url.into(),
        }
    }
}

impl Geolocator for IpGeolocator {
    fn locate(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send {
        async move {
            let response = self.http.get(&self.url).send().await?;
            let data: IpLookupResponse = response.json().await?;
            match (data.status.as_str(), data.lat, data.lon) {
                ("success", Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
                _ => Err(LocationError::Unavailable(
                    data.message.unwrap_or(data.status),
                )),
            }
        }
    }
}

/// Location capabilities the app can be configured with
#[derive(Clone, Debug)]
pub enum DeviceLocator {
    /// Look up the public IP address
    Ip(IpGeolocator),
    /// A coordinate given on the command line
    Fixed(Coordinate),
    /// No capability: always falls back
    Disabled,
}

impl Geolocator for DeviceLocator {
    fn locate(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send {
        async move {
            match self {
                DeviceLocator::Ip(ip) => ip.locate().await,
                DeviceLocator::Fixed(coordinate) => Ok(*coordinate),
                DeviceLocator::Disabled => Err(LocationError::Unsupported),
            }
        }
    }
}

/// Resolves a coordinate, falling back instead of failing
#[derive(Clone, Debug)]
pub struct LocationProvider<G> {
    geolocator: G,
    fallback: Coordinate,
}

impl<G: Geolocator> LocationProvider<G> {
    pub fn new(geolocator: G) -> Self {
        Self {
            geolocator,
            fallback: DEFAULT_COORDINATE,
        }
    }

    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    pub async fn resolve(&self) -> Coordinate {
        match self.geolocator.locate().await {
            Ok(coordinate) => {
                debug!(%coordinate, "device location resolved");
                coordinate
            }
            Err(e) => {
                warn!(error = %e, fallback = %self.fallback, "using default location");
                self.fallback
            }
        }
    }
}
