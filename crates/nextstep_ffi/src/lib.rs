//! Flutter bridge crate over `nextstep_core`.

pub mod api;
