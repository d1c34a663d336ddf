//! Job descriptions, their embedding chunks, and semantic search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{field::Field, record::Model, shape::Shape};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
  pub id:               Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub datetime_created: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_edited:      Option<DateTime<Utc>>,
  pub title:            String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skills:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language:         Option<String>,
}

impl Model for JobDescription {
  fn shape() -> Shape {
    Shape::base()
      .field("title", Field::string())
      .field("company", Field::string().optional())
      .field("location", Field::string().optional())
      .field("description", Field::string().optional())
      .field("skills", Field::string().optional())
      .field("language", Field::string().optional())
  }
}

/// Create payload: the entity minus its server-assigned fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobDescription {
  pub title:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skills:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language:    Option<String>,
}

impl Model for NewJobDescription {
  fn shape() -> Shape { JobDescription::shape().create_subset() }
}

/// One embedded slice of a job description's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionChunk {
  pub job_description_id: Uuid,
  pub chunk:              String,
  pub token_count:        Option<i64>,
  pub embedding:          Vec<f64>,
}

impl Model for JobDescriptionChunk {
  fn shape() -> Shape {
    Shape::new()
      .field("jobDescriptionId", Field::uuid())
      .field("chunk", Field::string())
      .field("tokenCount", Field::integer().nullable())
      .field("embedding", Field::array(Field::number()))
  }
}

/// A job description ranked against a query. Lower scores are closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionSearchResult {
  pub score:           f64,
  pub job_description: JobDescription,
  pub chunks:          Vec<JobDescriptionChunk>,
}

impl Model for JobDescriptionSearchResult {
  fn shape() -> Shape {
    Shape::new()
      .field("score", Field::number().read_only())
      .field("jobDescription", Field::object(JobDescription::shape()))
      .field("chunks", Field::array(Field::object(JobDescriptionChunk::shape())))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
  pub query: String,
}

impl Model for SearchQuery {
  fn shape() -> Shape { Shape::new().field("query", Field::string()) }
}
