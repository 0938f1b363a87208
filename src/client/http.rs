//! reqwest-backed tracker API.

use super::{ApiError, TrackerApi, WorkoutQuery};
use crate::domain::{Exercise, NewExercise, NewWorkout, Player, PlayerInput, Workout};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpTrackerApi {
    client: Client,
    base_url: String,
}

impl HttpTrackerApi {
    /// `base_url` is the server root, e.g. `http://localhost:5038`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Network(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TrackerApi for HttpTrackerApi {
    async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let url = self.url(&["api", "Player"])?;
        debug!(%url, "Fetching players");
        self.send_json(self.client.get(url)).await
    }

    async fn player_by_email(&self, email: &str) -> Result<Player, ApiError> {
        let url = self.url(&["api", "Player", "email", email])?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_player(&self, input: &PlayerInput) -> Result<Player, ApiError> {
        let url = self.url(&["api", "Player"])?;
        self.send_json(self.client.post(url).json(input)).await
    }

    async fn update_player(&self, id: i64, input: &PlayerInput) -> Result<Player, ApiError> {
        let url = self.url(&["api", "Player", &id.to_string()])?;
        self.send_json(self.client.put(url).json(input)).await
    }

    async fn delete_player(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&["api", "Player", &id.to_string()])?;
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        let url = self.url(&["api", "Exercise"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_exercise(&self, input: &NewExercise) -> Result<Exercise, ApiError> {
        let url = self.url(&["api", "Exercise"])?;
        self.send_json(self.client.post(url).json(input)).await
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&["api", "Exercise", &id.to_string()])?;
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn list_workouts(&self, query: &WorkoutQuery) -> Result<Vec<Workout>, ApiError> {
        let url = self.url(&["api", "Workout"])?;
        debug!(%url, ?query, "Fetching workouts");
        self.send_json(self.client.get(url).query(&query.to_pairs()))
            .await
    }

    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ApiError> {
        let url = self.url(&["api", "Workout"])?;
        self.send_json(self.client.post(url).json(workout)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_and_encodes_segments() {
        let api = HttpTrackerApi::new("http://localhost:5038/");
        let url = api.url(&["api", "Player", "email", "coach k@tide.edu"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5038/api/Player/email/coach%20k@tide.edu"
        );

        let api = HttpTrackerApi::new("http://localhost:5038");
        assert_eq!(
            api.url(&["api", "Workout"]).unwrap().as_str(),
            "http://localhost:5038/api/Workout"
        );
    }

    #[test]
    fn bad_base_url_is_a_network_error() {
        let api = HttpTrackerApi::new("not a url");
        assert!(api.url(&["api"]).unwrap_err().is_network());
    }
}
