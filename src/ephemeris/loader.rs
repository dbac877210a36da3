use crate::ephemeris::sample::EphemerisSeries;
use crate::error::OrreryError;
use std::future::Future;

pub const EPHEMERIS_PATH: &str = "/api/mysql/get-planet-locations-by-horizon-id";

/// Anything that can produce the ephemeris of a body
pub trait EphemerisSource: Send + Sync + 'static {
    fn fetch(
        &self,
        horizon_id: u32,
    ) -> impl Future<Output = Result<EphemerisSeries, OrreryError>> + Send;
}

/// Ephemeris service client over HTTP
#[derive(Debug, Clone)]
pub struct HttpEphemerisSource {
    client: reqwest::Client,
    base_url: String,
    coordinate_scale: f64,
}

impl HttpEphemerisSource {
    pub fn new(base_url: impl Into<String>, coordinate_scale: f64) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, coordinate_scale)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        coordinate_scale: f64,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            coordinate_scale,
        }
    }

    pub fn url_for(&self, horizon_id: u32) -> String {
        format!(
            "{}{}?horizonId={}",
            self.base_url.trim_end_matches('/'),
            EPHEMERIS_PATH,
            horizon_id
        )
    }
}

impl EphemerisSource for HttpEphemerisSource {
    async fn fetch(&self, horizon_id: u32) -> Result<EphemerisSeries, OrreryError> {
        let url = self.url_for(horizon_id);
        log::debug!("Requesting ephemeris from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| OrreryError::Network { horizon_id, source })?;

        if !response.status().is_success() {
            return Err(OrreryError::Status {
                horizon_id,
                status: response.status(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| OrreryError::Network { horizon_id, source })?;

        EphemerisSeries::from_json(horizon_id, &body, self.coordinate_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let source = HttpEphemerisSource::new("http://localhost:5259/", 1.0);
        assert_eq!(
            source.url_for(499),
            "http://localhost:5259/api/mysql/get-planet-locations-by-horizon-id?horizonId=499"
        );
    }
}
