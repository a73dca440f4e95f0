//! Common types and utilities shared across modules

use clap::Parser;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    ///
    /// `configured` is the `verbosity` config value, used when neither flag is given.
    pub fn verbosity_level(&self, configured: Option<u8>) -> u8 {
        if self.quiet {
            0
        } else if self.verbose > 0 {
            self.verbose
        } else {
            configured.unwrap_or(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::common::*;

    #[test]
    fn test_flags_override_config_verbosity() {
        let quiet = GlobalOpts {
            quiet: true,
            verbose: 2,
        };
        assert_eq!(quiet.verbosity_level(Some(2)), 0);

        let verbose = GlobalOpts {
            quiet: false,
            verbose: 1,
        };
        assert_eq!(verbose.verbosity_level(Some(2)), 1);

        assert_eq!(GlobalOpts::default().verbosity_level(Some(2)), 2);
        assert_eq!(GlobalOpts::default().verbosity_level(None), 0);
    }
}
