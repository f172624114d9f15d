//! Asynchronous task-data loading over the edge proxy.
//!
//! Loads are issued once, with no retry: a failed task stays unregistered
//! and the checkbox reverts, so the only retry path is the user re-toggling
//! the task. Individual raster images are not fetched here at all: the map
//! surface loads them itself and a missing PNG is tolerated silently.

use catalog::endpoints;
use catalog::task::TaskId;
use formats::error::FormatError;
use scene::index::TileIndex;
use scene::split_filter::SplitIndex;

#[derive(Debug)]
pub enum FetchError {
    Http { url: String, error: String },
    Status { url: String, status: u16 },
    Decode { url: String, error: FormatError },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http { url, error } => write!(f, "request to {url} failed: {error}"),
            FetchError::Status { url, status } => write!(f, "{url} returned status {status}"),
            FetchError::Decode { url, error } => write!(f, "payload from {url} undecodable: {error}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub struct DataClient {
    http: reqwest::Client,
    base: String,
}

impl DataClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    /// Geometry and split data for one task, fetched concurrently.
    pub async fn load_task(
        &self,
        task: &TaskId,
    ) -> Result<(TileIndex, Option<SplitIndex>), FetchError> {
        tokio::try_join!(self.task_geometry(task), self.split_index(task))
    }

    pub async fn task_geometry(&self, task: &TaskId) -> Result<TileIndex, FetchError> {
        let url = endpoints::task_geometry_url(&self.base, task);
        let body = self.get_text(&url).await?;
        let tiles = formats::geojson::decode_feature_collection(&body, task.as_str())
            .map_err(|error| FetchError::Decode { url, error })?;
        Ok(TileIndex::new(tiles))
    }

    /// A task's split data, or `None` when the task has none.
    ///
    /// Absent split data surfaces as an upstream 404 and means "no
    /// filtering"; any other failure is a real load error.
    pub async fn split_index(&self, task: &TaskId) -> Result<Option<SplitIndex>, FetchError> {
        let url = endpoints::split_data_url(&self.base, task);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Http {
                url: url.clone(),
                error: e.to_string(),
            })?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Http {
            url: url.clone(),
            error: e.to_string(),
        })?;
        let split = formats::split_index::decode_split_index(&body)
            .map_err(|error| FetchError::Decode { url, error })?;
        Ok(Some(split))
    }

    pub async fn species_labels(&self) -> Result<Vec<String>, FetchError> {
        let url = endpoints::species_labels_url(&self.base);
        let body = self.get_text(&url).await?;
        formats::species::decode_species_labels(&body)
            .map_err(|error| FetchError::Decode { url, error })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            error: e.to_string(),
        })
    }
}
