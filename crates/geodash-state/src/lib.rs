//! # geodash-state — Selection State Machine
//!
//! Holds a session's selector values and defines every valid transition
//! between them. The cascade is strictly hierarchical:
//!
//! ```text
//! Empty ──SetZone──▶ ZoneChosen ──MapClicked──▶ CountryChosen ──SetSector──▶ SectorChosen
//!
//! SetZone     from any level          ──▶ ZoneChosen
//! MapClicked  from ZoneChosen or above ──▶ CountryChosen
//! SetSector   from CountryChosen or above ──▶ SectorChosen
//! Reset       from any level          ──▶ Empty
//! ```
//!
//! A change at level k clears every level above k. The state is an enum
//! whose variants carry only the fields valid at that level, so a country
//! outside the zone or a sector without records cannot be represented.
//!
//! Events that do not fit the current level are dropped and reported as
//! [`Outcome::Ignored`] with a reason. They are stale UI events, not errors.

pub mod selection;

pub use selection::{
    transition, IgnoreReason, Outcome, Selection, SelectionEvent, SelectionLevel,
    SelectionMachine, SelectionSnapshot, TransitionRecord, Widget, HISTORY_LIMIT,
};
