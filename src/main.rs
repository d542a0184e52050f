//! # dupsweep CLI
//!
//! Command-line interface for the duplicate image sweeper.
//!
//! ## Usage
//! ```bash
//! dupsweep scan ~/Photos --threshold 5
//! dupsweep scan ~/Photos --move-duplicates
//! ```

mod cli;

use dupsweep::Result;

fn main() -> Result<()> {
    dupsweep::init_tracing();
    cli::run()
}
