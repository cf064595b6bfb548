//! Golden vector tests for the fragment codec.
//!
//! These pin the observable contract — fragment counts, fragment lengths,
//! and recovery behavior — for the configurations the system deploys with.
