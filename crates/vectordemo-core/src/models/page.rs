//! Page-number pagination envelope used by every list endpoint.

use serde::{Deserialize, Serialize};

use crate::{field::Field, record::Model, shape::Shape};

/// Server default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "M: Model"))]
pub struct Page<M> {
  pub count:    u64,
  pub next:     Option<String>,
  pub previous: Option<String>,
  pub results:  Vec<M>,
}

impl<M: Model> Model for Page<M> {
  fn shape() -> Shape {
    Shape::new()
      .field("count", Field::integer())
      .field("next", Field::string().nullable())
      .field("previous", Field::string().nullable())
      .field("results", Field::array(Field::object(M::shape())))
  }
}

/// Which page to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  /// 1-based.
  pub page: u32,
  pub size: u32,
}

impl Default for Pagination {
  fn default() -> Self { Self { page: 1, size: DEFAULT_PAGE_SIZE } }
}

impl Pagination {
  pub fn to_params(self) -> Vec<(String, String)> {
    vec![
      ("page".to_owned(), self.page.to_string()),
      ("page_size".to_owned(), self.size.to_string()),
    ]
  }
}
