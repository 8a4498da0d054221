#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for the competitive award engine.
///
/// This module contains the fundamental data structures that represent the
/// domain entities: quotations and their items and lots, supplier responses,
/// the consolidated baseline, auction sessions, bids, and award decisions.
///
/// The models are primarily data structures with minimal business logic.
/// The exceptions are deliberate: offer validation happens at construction
/// time so an invalid offer cannot exist, and the session-status derivation
/// lives on the model so every backend gates bids identically.
pub mod models;

/// Interface traits for the competitive award engine.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the engine's operations and
/// external adapters (such as databases or the embedding application)
/// without specifying implementation details. This separation allows for
/// easier testing and the ability to swap out infrastructure components
/// without affecting the core business logic.
pub mod ports;
