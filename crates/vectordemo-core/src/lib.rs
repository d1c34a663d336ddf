//! Core types for the vectordemo API client.
//!
//! Resources are described as plain data: a [`Shape`] maps internal
//! (camelCase) field names to validated [`Field`] types. Typed models bind
//! themselves to a shape through the [`Model`] trait, and every crossing of
//! the wire boundary goes through shape validation and naming translation.
//!
//! This crate is free of HTTP and storage dependencies.

pub mod case;
pub mod error;
pub mod field;
pub mod filter;
pub mod form;
pub mod models;
pub mod record;
pub mod shape;

pub use error::{Error, FieldIssue, Result, ValidationError};
pub use field::{Field, FieldKind};
pub use record::{Model, NoInput, Record};
pub use shape::Shape;
