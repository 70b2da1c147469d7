//! **histmap** - Batch cleanup toolkit for a historical-events map dataset
//!
//! Pure deduplication, scoring, and slug-generation core with JSON I/O
//! isolated at the edges. The CLI consolidates the one-off fix-up scripts
//! the dataset used to accumulate into repeatable subcommands.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core pipeline - pure transformations over the in-memory dataset
pub mod core {
    /// Event record schema and the closed category set
    pub mod model;
    pub use model::{DatasetError, EventRecord, EventType, LatLng, TypeTag};

    /// Canonical comparison keys for duplicate detection
    pub mod normalize;
    pub use normalize::normalize;

    /// Quality scoring as an ordered list of named rules
    pub mod score;
    pub use score::{ScoreConfig, breakdown, score};

    /// Duplicate grouping and best-of-group selection
    pub mod dedupe;
    pub use dedupe::{DedupeOutcome, DroppedRecord, deduplicate, run as dedupe_run};

    /// URL slug generation and collision detection
    pub mod slug;
    pub use slug::{collisions, generate_slug, slug_map, slugify, run as slugs_run};

    /// Schema validation at the dataset boundary
    pub mod validate;
    pub use validate::{Finding, Severity, run as validate_run};

    /// Category counts and completeness summaries
    pub mod stats;
    pub use stats::run as stats_run;
}

/// Infrastructure - configuration and dataset I/O
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Dataset JSON load/save with atomic replacement
    pub mod io;
    pub use io::{load_events, save_events, save_json};
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, load_config};
pub use self::core::{dedupe_run, slugs_run, stats_run, validate_run};

// Core types for external consumers
pub use self::core::model::{EventRecord, EventType, LatLng, TypeTag};
pub use self::core::{deduplicate, generate_slug, normalize, score, slugify};
