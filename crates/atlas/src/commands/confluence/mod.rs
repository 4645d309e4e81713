//! `atlas confluence` subcommands.

mod publish;

use clap::Subcommand;

use crate::error::CliError;

pub(crate) use publish::PublishArgs;

/// Confluence publishing commands.
#[derive(Subcommand)]
pub(crate) enum ConfluenceCommand {
    /// Publish a markdown file as a Confluence page.
    Publish(PublishArgs),
}

impl ConfluenceCommand {
    /// Execute the selected subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Publish(args) => args.execute(),
        }
    }
}
