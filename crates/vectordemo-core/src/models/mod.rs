//! Concrete resource models for the job-description search API.

pub mod job_descriptions;
pub mod page;
pub mod users;

pub use job_descriptions::{
  JobDescription, JobDescriptionChunk, JobDescriptionSearchResult, NewJobDescription,
  SearchQuery,
};
pub use page::{Page, Pagination};
pub use users::{ForgotPassword, LoginCredentials, PasswordReset, User, UserCreate};
