//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `isosorter` – the sorter itself, keyed by entity
//! - `movearea` – world rectangle moving bodies bounce inside
//! - `sortconfig` – INI-backed tunables of the ordering pass
//! - `sortstats` – statistics of the last ordering pass
//! - `sortview` – visible world rectangle and sort-range focus
//! - `worldtime` – simulation time and delta
pub mod isosorter;
pub mod movearea;
pub mod sortconfig;
pub mod sortstats;
pub mod sortview;
pub mod worldtime;
