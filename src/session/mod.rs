//! The wall-clock frame loop tying stage, renderer and poller together.

pub mod run;
