use crate::hal::{Hal, Link, Links, ResourceUrls};

use super::{contacts, installations};

/// API root: entry links to both collections.
pub async fn api_root(urls: ResourceUrls) -> Hal<serde_json::Value> {
    let links = Links::new()
        .with(
            contacts::REL_COLLECTION,
            Link::templated(format!("{}{{?page,size,sort}}", urls.contacts())),
        )
        .with(
            installations::REL_COLLECTION,
            Link::templated(format!("{}{{?page,size,sort}}", urls.installations())),
        );
    Hal(serde_json::json!({ "_links": links }))
}
