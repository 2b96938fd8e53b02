//! Blog domain module: posts published alongside the inventory.

pub mod post;

pub use post::{BlogPost, POSTS, PostDraft};
