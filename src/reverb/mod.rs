mod client;
mod models;

pub use client::{PageSource, ReverbClient};
pub use models::Page;
