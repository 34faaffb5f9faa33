//! Documents as persisted in the document store.
//!
//! Field names are camelCase on disk. Image URL and public id pairs default to
//! `""` so documents written without an image still decode.

pub mod category;
pub mod offer;
pub mod product;
pub mod restaurant;
pub mod restaurant_admin;
