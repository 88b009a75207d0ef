//! Storage layer for Stacks
//!
//! This crate holds the authoritative tables in memory:
//! - ShardedStore: DashMap keyed by table, FxHashMap within
//! - One shard per table (Inventory Store, Loan Table, Return Log)
//! - Latest committed row per key, stamped with its commit version
//!
//! Durability is layered on top by the WAL in `stacks-durability`; this
//! crate never touches the filesystem.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sharded;

pub use sharded::{Shard, ShardedStore};
