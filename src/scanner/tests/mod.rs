//! Test modules for the scanner system

mod helpers;
mod repository_scan;
