//! Algorithm implementations for the swap engine
//!
//! This module contains the matching engine that finds two-way and
//! triangle swaps over a snapshot of participants.

pub mod matching;
