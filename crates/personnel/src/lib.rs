//! `brigada-personnel` — the people side of the roster.
//!
//! Only what the certificate workflow needs: a firefighter's identity and
//! home company. Roster management screens live elsewhere.

pub mod firefighter;

pub use firefighter::Firefighter;
