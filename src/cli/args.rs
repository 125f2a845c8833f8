use clap::Parser;
use std::path::PathBuf;

/// DropPrune — keep backup drop folders down to the newest N files
#[derive(Parser, Debug)]
#[command(
    name = "dropprune",
    version,
    about = "Keep Dropbox and local backup folders pruned to the newest matching files",
    long_about = "DropPrune lists every configured Dropbox folder (or local directory), matches file\n\
                   names against a regex, and deletes all but the N most recently modified\n\
                   matches. Files on a target's ignore list are never touched.",
    after_help = "EXAMPLES:\n  \
        dropprune --config prune.toml           Prune every target in prune.toml\n  \
        dropprune -c /etc/dropprune.toml        Same, short flag (e.g. from cron)\n\n\
        Set `dry_run = true` under [settings] to preview deletions."
)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(
        long = "config",
        short = 'c',
        visible_alias = "config-path",
        alias = "configPath",
        value_name = "PATH"
    )]
    pub config: PathBuf,
}
