//! `gn-agent`: the list of active agents.
//!
//! The reservation arbiter and the movement engine iterate "every tracked
//! agent" on each occupancy check.  This crate owns that list and the
//! lifecycle calls that keep it current.
//!
//! # Crate layout
//!
//! | Module       | Contents                                   |
//! |--------------|--------------------------------------------|
//! | [`registry`] | `AgentRegistry`, `AgentRecord`             |
//!
//! # Id allocation
//!
//! Ids are handed out in increasing order and never reused.  A caller that
//! holds the id of a destroyed agent sees `is_active == false` forever, so a
//! stale handle can never alias a newer agent.

pub mod registry;


pub use registry::{AgentRecord, AgentRegistry};
