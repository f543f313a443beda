//! Typed per-service command helpers built on [`crate::tlv`]. Only the control service's
//! client bootstrap exchange is implemented as a representative example; the generic
//! TLV codec in `tlv` covers the rest (spec.md §9: "a strongly typed builder per message
//! kind; a generic low-level builder remains").

pub mod ctl;
