//! Maquette Core Types and Definitions
//!
//! This crate provides the foundational types for the Maquette layout
//! generation engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned room identifiers ([`identifier::RoomId`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Planar geometric types used by layout resolution ([`geometry`] module)
//! - **Program**: The architectural program model describing room requirements ([`program`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod program;
