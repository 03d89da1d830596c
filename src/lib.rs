//! Terminal client for a Latin vocabulary trainer backed by a JSON API:
//! vocabulary list management, a multiple-choice quiz, verb and noun
//! sorting quizzes and a gallery of reward cards.

pub mod api;
pub mod app;
pub mod cards;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod model;
pub mod quiz;
pub mod router;
pub mod theme;
pub mod ui;
pub mod vocab;
