//!
//! Archetype-based ECS storage engine.
//!
//! Entities are grouped into *archetypes* by their exact component
//! signature. Each archetype owns chunked, cache-line-aligned column
//! storage: every field of every component lives in its own contiguous
//! array, addressed through a sparse-dense entity index in O(1).
//!
//! This crate is the storage core only. It has no opinion on what a
//! "system" is, does not schedule anything, and does not know how to
//! serialize a `World`. See [`World`] for the operations it does provide.
//!
//! # Concurrency
//!
//! `World` is not thread-safe: every operation assumes exclusive access.
//! Any mutating call ([`World::add_entity`], [`World::remove_entity`],
//! [`World::add_component_type`]) invalidates every outstanding
//! [`WorldIterator`] and every field address previously returned by
//! [`World::get_component_field`] for any entity whose storage moved.
//! Nothing in this crate suspends, blocks, or yields.

mod archetype;
mod config;
mod error;
mod id_allocator;
mod iterator;
mod registry;
mod sparse;
mod util;
mod world;

pub use self::{
    error::WorldError,
    iterator::{destroy, ChunkColumns, ComponentColumn, WorldIterator},
    registry::ComponentId,
    world::World,
};

/// An entity is a plain 32-bit index; there is no per-entity handle object.
pub type EntityId = u32;
