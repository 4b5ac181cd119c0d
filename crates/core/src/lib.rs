//! ghost_trail_core - Pure no_std game logic for the Ghost Trail scavenger hunt
//!
//! This crate contains the platform-agnostic geodesy, trail model and
//! progress engine. Everything here is synchronous arithmetic that can be
//! tested on host without a runtime or any sensor plumbing.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside tests
//! - **No allocation**: Trails and names use fixed-capacity `heapless` storage
//!
//! # Modules
//!
//! - [`navigation`]: Haversine distance, bearing, guidance and overview projection
//! - [`sensors`]: Position fixes and heading samples as delivered by device sources
//! - [`trail`]: Waypoints, trails and the trail progress engine

#![cfg_attr(not(test), no_std)]

pub mod navigation;
pub mod sensors;
pub mod trail;
