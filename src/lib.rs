//! Voice Recorder - record, search and play back voice notes
//!
//! This crate captures microphone audio to FLAC files, keeps a searchable
//! list of saved recordings and plays them back at adjustable speed.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, filesystem, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod logging;
