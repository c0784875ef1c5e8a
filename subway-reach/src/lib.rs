//! Transit map reachability server.
//!
//! A web application that answers: "where can I get to from this platform
//! within half an hour?", and animates the answer spreading across the map.

pub mod animation;
pub mod cache;
pub mod domain;
pub mod graph;
pub mod preprocess;
pub mod reach;
pub mod web;
