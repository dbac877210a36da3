use crate::ephemeris::loader::EphemerisSource;
use crate::ephemeris::sample::EphemerisSeries;
use crate::error::OrreryError;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreStatus {
    NotRequested,
    Loading,
    Loaded,
    Failed(String),
}

/// Holds the one ephemeris series a body will ever play back
#[derive(Debug, Clone)]
pub struct EphemerisStore {
    horizon_id: u32,
    status: StoreStatus,
    series: Option<EphemerisSeries>,
}

impl EphemerisStore {
    pub fn new(horizon_id: u32) -> Self {
        Self {
            horizon_id,
            status: StoreStatus::NotRequested,
            series: None,
        }
    }

    pub fn horizon_id(&self) -> u32 {
        self.horizon_id
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn series(&self) -> Option<&EphemerisSeries> {
        self.series.as_ref()
    }

    pub fn len(&self) -> usize {
        self.series.as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.series.is_some()
    }

    /// Mark the single fetch as started. A store accepts exactly one request.
    pub fn begin_load(&mut self) -> Result<(), OrreryError> {
        if self.status != StoreStatus::NotRequested {
            return Err(OrreryError::AlreadyRequested {
                horizon_id: self.horizon_id,
            });
        }
        self.status = StoreStatus::Loading;
        Ok(())
    }

    /// Record the outcome of the fetch. Returns the series on success.
    pub fn finish_load(
        &mut self,
        result: Result<EphemerisSeries, OrreryError>,
    ) -> Result<&EphemerisSeries, OrreryError> {
        match result {
            Ok(series) => {
                log::info!(
                    "Ephemeris for horizon id {} loaded: {} samples",
                    self.horizon_id,
                    series.len()
                );
                self.status = StoreStatus::Loaded;
                Ok(&*self.series.insert(series))
            }
            Err(e) => {
                log::error!("Failed to load ephemeris for horizon id {}: {}", self.horizon_id, e);
                self.status = StoreStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch and record in one go, for callers that drive the future themselves
    pub async fn load<S: EphemerisSource>(
        &mut self,
        source: &S,
    ) -> Result<&EphemerisSeries, OrreryError> {
        self.begin_load()?;
        let result = source.fetch(self.horizon_id).await;
        self.finish_load(result)
    }
}
