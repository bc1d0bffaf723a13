use std::{fmt::Display, str::FromStr};

use cyclable_core::{fetch::ItineraryProvider, pairs::PairRequest, point::Point, ride::Ride};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cache::{NoCache, ResponseCache},
    response::BRouterResponse,
};

pub const BROUTER_URL_ENV_VAR: &str = "BROUTER_URL";
pub const BROUTER_PROFILE_ENV_VAR: &str = "BROUTER_PROFILE";
pub const DEFAULT_BROUTER_URL: &str = "http://localhost:17777";
pub const BROUTER_API_PATH: &str = "/brouter";

/// https://github.com/abrensch/brouter/tree/master/misc/profiles2
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BRouterProfile {
    Safety,
    Trekking,
    Fastbike,
    Shortest,
    Custom(String),
}

impl Display for BRouterProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BRouterProfile::Safety => "safety",
                BRouterProfile::Trekking => "trekking",
                BRouterProfile::Fastbike => "fastbike",
                BRouterProfile::Shortest => "shortest",
                BRouterProfile::Custom(name) => name.as_str(),
            }
        )
    }
}

impl FromStr for BRouterProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(String::from("Empty profile name")),
            "safety" => Ok(BRouterProfile::Safety),
            "trekking" => Ok(BRouterProfile::Trekking),
            "fastbike" => Ok(BRouterProfile::Fastbike),
            "shortest" => Ok(BRouterProfile::Shortest),
            other => Ok(BRouterProfile::Custom(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum BRouterError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Malformed ride: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct BRouterClientParams {
    pub base_url: String,
    pub profile: BRouterProfile,
}

impl Default for BRouterClientParams {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BROUTER_URL.to_string(),
            profile: BRouterProfile::Safety,
        }
    }
}

impl BRouterClientParams {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: std::env::var(BROUTER_URL_ENV_VAR).unwrap_or(defaults.base_url),
            profile: std::env::var(BROUTER_PROFILE_ENV_VAR)
                .ok()
                .and_then(|profile| profile.parse().ok())
                .unwrap_or(defaults.profile),
        }
    }
}

/// `lon,lat|lon,lat`, origin first.
pub fn lonlats(origin: &Point, destination: &Point) -> String {
    format!(
        "{},{}|{},{}",
        origin.lon, origin.lat, destination.lon, destination.lat
    )
}

pub struct BRouterClient<C = NoCache> {
    params: BRouterClientParams,
    client: reqwest::Client,
    cache: C,
}

impl BRouterClient<NoCache> {
    pub fn new(params: BRouterClientParams) -> Self {
        Self::with_cache(params, NoCache)
    }
}

impl<C> BRouterClient<C>
where
    C: ResponseCache,
{
    pub fn with_cache(params: BRouterClientParams, cache: C) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
            cache,
        }
    }

    pub fn params(&self) -> &BRouterClientParams {
        &self.params
    }

    fn url(&self) -> String {
        format!(
            "{}{}",
            self.params.base_url.trim_end_matches('/'),
            BROUTER_API_PATH
        )
    }

    async fn request(&self, origin: &Point, destination: &Point) -> Result<String, BRouterError> {
        let response = self
            .client
            .get(self.url())
            .query(&[
                ("lonlats", lonlats(origin, destination)),
                ("profile", self.params.profile.to_string()),
                ("alternativeidx", "0".to_string()),
                ("format", "geojson".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BRouterError::Api { status, message });
        }

        Ok(response.text().await?)
    }

    fn cached(&self, origin: &Point, destination: &Point) -> Option<String> {
        match self
            .cache
            .get_cached(origin, destination, &self.params.profile)
        {
            Ok(Some(body)) => {
                debug!("BRouter: cache hit {} -> {}", origin.id, destination.id);
                Some(body)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("BRouter: could not read cached itinerary: {}", err);
                None
            }
        }
    }

    fn store(&self, origin: &Point, destination: &Point, body: &str) {
        if let Err(err) = self
            .cache
            .cache(origin, destination, &self.params.profile, body)
        {
            warn!("BRouter: could not cache itinerary: {}", err);
        }
    }
}

fn parse_ride(body: &str, pair: &PairRequest<'_>) -> Result<Ride, BRouterError> {
    let response: BRouterResponse = serde_json::from_str(body)?;

    response.into_ride(pair)
}

impl<C> ItineraryProvider for BRouterClient<C>
where
    C: ResponseCache,
{
    type Error = BRouterError;

    /// Only responses that parse into a ride are cached.
    async fn fetch_ride(&self, pair: &PairRequest<'_>) -> Result<Ride, BRouterError> {
        if let Some(body) = self.cached(pair.origin, pair.destination) {
            return parse_ride(&body, pair);
        }

        let body = self.request(pair.origin, pair.destination).await?;
        debug!(
            "BRouter: fetched {} -> {}",
            pair.origin.id, pair.destination.id
        );

        let ride = parse_ride(&body, pair)?;
        self.store(pair.origin, pair.destination, &body);

        Ok(ride)
    }
}
