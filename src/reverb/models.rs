use serde::Deserialize;
use serde_json::Value;

// response
//  ├── listings: [ Listing, ... ]
//  └── _links
//       └── next
//            └── href

/// Response body as sent by the API. Listings stay untyped: their shape
/// varies per listing and the row mapper reads them by path. The `_links`
/// block is read by path as well, so an odd shape there never fails a page.
#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    pub listings: Option<Vec<Value>>,
}

/// One decoded page of the listings collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub listings: Vec<Value>,
    /// Absolute URL of the following page, `None` on the last page.
    pub next: Option<String>,
}
