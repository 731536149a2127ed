//! Flutter-facing bridge over `notetmp_core`.

pub mod api;
