//! `/job-descriptions/` and semantic search.

use std::sync::Arc;

use vectordemo_core::{
  Model, Record, Shape,
  filter::{ApiFilter, Extractor, FilterMap, FilterValidator},
  models::{JobDescription, JobDescriptionSearchResult, NewJobDescription, SearchQuery},
};

use crate::{
  CallUtils, CustomCall, HttpClient, ResourceApi, Result, transport::Transport,
};

pub const JOB_DESCRIPTIONS_URI: &str = "/job-descriptions/";

pub type JobDescriptionApi<T> = ResourceApi<T, JobDescription, NewJobDescription>;

/// List filters: `title`, `company`, `location`, `language`, `ordering`,
/// and `ids` (sent comma-joined).
pub fn filters() -> FilterMap {
  FilterMap::new()
    .with("title", ApiFilter::new("title"))
    .with("company", ApiFilter::new("company"))
    .with("location", ApiFilter::new("location"))
    .with("language", ApiFilter::new("language"))
    .with("ordering", ApiFilter::new("ordering"))
    .with(
      "ids",
      ApiFilter::new("ids")
        .with_validators(vec![FilterValidator::IsNotEmpty])
        .with_extractor(Extractor::join(",")),
    )
}

pub fn job_description_api<T: Transport>(client: Arc<HttpClient<T>>) -> JobDescriptionApi<T> {
  ResourceApi::new(client, JOB_DESCRIPTIONS_URI).with_filters(filters())
}

/// `POST /job-descriptions/search/` → matches, best first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Search;

impl CustomCall for Search {
  type Input = SearchQuery;
  type Output = Vec<JobDescriptionSearchResult>;

  fn output_shape(&self) -> Option<Shape> { Some(JobDescriptionSearchResult::shape()) }

  async fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> Result<Self::Output> {
    let path = format!("{JOB_DESCRIPTIONS_URI}search/");
    let wire = client.post(&path, utils.to_api(&input)).await?;
    utils.from_api_many(&wire)
  }
}

impl<T: Transport> ResourceApi<T, JobDescription, NewJobDescription> {
  pub async fn search(&self, query: impl Into<String>) -> Result<Vec<JobDescriptionSearchResult>> {
    self.call(&Search, SearchQuery { query: query.into() }).await
  }
}
