//! Backing storage for the cache: the ordered system-of-record.

pub mod btree;

pub use btree::{InOrderIter, OrderedStore, ORDER};
