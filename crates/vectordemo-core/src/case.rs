//! Field-name conversion between the internal (camelCase) and wire
//! (snake_case) conventions.

/// `datetimeCreated` → `datetime_created`. Already-snake names pass through.
pub fn to_snake_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len() + 4);
  for (i, ch) in name.char_indices() {
    if ch.is_ascii_uppercase() {
      if i > 0 && !out.ends_with('_') {
        out.push('_');
      }
      out.push(ch.to_ascii_lowercase());
    } else {
      out.push(ch);
    }
  }
  out
}

/// `datetime_created` → `datetimeCreated`. Leading underscores are dropped.
pub fn to_camel_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut upper = false;
  for ch in name.chars() {
    if ch == '_' || ch == '-' {
      upper = !out.is_empty();
      continue;
    }
    if upper {
      out.push(ch.to_ascii_uppercase());
      upper = false;
    } else {
      out.push(ch);
    }
  }
  out
}
