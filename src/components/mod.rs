//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world: what an entity is for interaction purposes, where it sits,
//! how it glows, which puzzle session owns it, and how it moves on its own.
//!
//! Submodules overview:
//! - [`antagonist`] – pursuit parameters of the shadow that chases the player
//! - [`decoration`] – non-interactive scene pieces (answer board, furniture, room shell)
//! - [`emissive`] – glow color and intensity written by flashes and highlights
//! - [`interactable`] – tagged union of every interactable entity kind
//! - [`puzzleowned`] – puzzle session back-reference and compound part links
//! - [`roomscoped`] – markers for room lifetime and the exit door
//! - [`rotation`] – yaw/pitch orientation in radians
//! - [`spin`] – continuous spin and vertical bobbing
//! - [`worldposition`] – world-space center and axis-aligned hit extents

pub mod antagonist;
pub mod decoration;
pub mod emissive;
pub mod interactable;
pub mod puzzleowned;
pub mod roomscoped;
pub mod rotation;
pub mod spin;
pub mod worldposition;
