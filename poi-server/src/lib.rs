//! Restaurant and transit map server.
//!
//! Loads restaurants, railway stations and bus stops from JSON feeds,
//! classifies restaurants into display categories, annotates each with its
//! nearest station and bus stop, and decides which markers are visible under
//! the current filter toggles. Station timetables are looked up on demand.

pub mod config;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod filter;
pub mod proximity;
pub mod timetable;
pub mod web;
