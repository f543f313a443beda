//! Typed, per-service command helpers built on [`crate::builder::Builder`] and
//! [`crate::info_reader::InfoReader`]. Only a representative handful of commands are
//! implemented; the generic low-level codec in `builder`/`info_reader` covers the rest
//! (spec.md §9: "a strongly typed builder per message kind; a generic low-level builder
//! remains for the composite offset/size layout").

pub mod basic_connect;
