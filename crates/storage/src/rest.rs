//! Client of the public wger exercise catalog.

use std::sync::LazyLock;

use fittrack_domain as domain;
use gloo_net::http::{Request, Response};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::lenient;

pub const DEFAULT_NAME: &str = "Unnamed exercise";

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct Wger<S: SendRequest> {
    base_url: String,
    sender: S,
}

impl Wger<GlooNetSendRequest> {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_sender(base_url, GlooNetSendRequest)
    }
}

impl<S: SendRequest> Wger<S> {
    pub fn with_sender(base_url: &str, sender: S) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sender,
        }
    }

    #[must_use]
    pub fn exercises_url(&self, limit: u32) -> String {
        format!("{}/exercise/?limit={limit}&status=2", self.base_url)
    }
}

impl<S: SendRequest> domain::CatalogRepository for Wger<S> {
    async fn fetch_catalog(
        &self,
        limit: u32,
    ) -> Result<Vec<domain::CatalogExercise>, domain::FetchError> {
        let url = self.exercises_url(limit);
        debug!("requesting {url}");
        let request = Request::get(&url).build().map_err(|err| {
            warn!("failed to build request: {err}");
            domain::FetchError::NoConnection
        })?;
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| domain::FetchError::NoConnection)?;
        if !response.ok() {
            return Err(domain::FetchError::Status(response.status()));
        }
        let page = response
            .json::<Value>()
            .await
            .map_err(|err| domain::FetchError::InvalidResponse(err.to_string()))?;
        Ok(exercises(&page))
    }
}

/// Exercises of a result page. A page without a list of results contains no exercises.
#[must_use]
pub fn exercises(page: &Value) -> Vec<domain::CatalogExercise> {
    page.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter(|r| r.is_object())
                .filter_map(|r| Exercise::deserialize(r).ok())
                .map(domain::CatalogExercise::from)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Exercise {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub muscles: Option<Vec<u32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub muscles_secondary: Option<Vec<u32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub equipment: Option<Vec<u32>>,
}

impl From<Exercise> for domain::CatalogExercise {
    fn from(value: Exercise) -> Self {
        let category = value.category.filter(|c| *c != 0);
        Self {
            id: value.id.unwrap_or_default(),
            name: value
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: strip_html(value.description.as_deref().unwrap_or_default()),
            muscles: value.muscles.unwrap_or_default(),
            muscles_secondary: value.muscles_secondary.unwrap_or_default(),
            category,
            equipment: value.equipment.unwrap_or_default(),
            muscle_group: category.map_or(domain::MuscleGroup::Other, muscle_group),
        }
    }
}

/// Muscle group corresponding to a wger exercise category.
#[must_use]
pub fn muscle_group(category: u32) -> domain::MuscleGroup {
    match category {
        10 => domain::MuscleGroup::Core,
        8 => domain::MuscleGroup::Arms,
        12 => domain::MuscleGroup::Back,
        9 | 14 => domain::MuscleGroup::Legs,
        11 => domain::MuscleGroup::Chest,
        13 => domain::MuscleGroup::Shoulders,
        _ => domain::MuscleGroup::Other,
    }
}

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Remove all tags and surrounding whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    TAG.replace_all(html, "").trim().to_string()
}
