//! Common types for moviexml.
//!
//! This crate provides the foundational types shared by all moviexml crates:
//!
//! - [`EntityKind`] - The three exported record kinds (movie, person, award)
//! - [`Relation`] - The many-to-many links resolved into ID list attributes
//! - [`make_id`] - Synthesis of globally unique, prefix-tagged identifiers

mod error;
mod id;
mod kind;

pub use error::{Error, Result};
pub use id::{award_id, make_id, movie_id, person_id, AWARD_PLACEHOLDER};
pub use kind::{EntityKind, Relation};
