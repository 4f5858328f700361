//! HTTP route handlers

pub mod editor;
pub mod modules;
pub mod practice;
pub mod questions;
