// Library root
// -----------
// This crate exposes the catalog library used by the interactive CLI in
// `main.rs`.
//
// Module responsibilities:
// - `movie`: the movie record, the catalog map and small catalog queries.
// - `storage`: the `MovieStorage` contract and its CSV and JSON backends.
// - `api`: blocking OMDb lookup that resolves a title into a record.
// - `report`: static HTML page generation from a template.
// - `commands`: the menu commands, returning the text to print.
// - `ui`: the terminal menu loop built on `dialoguer`.
// - `config` / `error`: environment configuration and error types.
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod movie;
pub mod report;
pub mod storage;
pub mod ui;
