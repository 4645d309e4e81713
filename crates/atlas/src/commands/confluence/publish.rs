//! `atlas confluence publish` command implementation.

use std::path::{Path, PathBuf};

use atlas_config::{CliSettings, Config, ConfluenceConfig};
use atlas_confluence::{
    ConfluenceClient, DryRunResult, PagePublisher, PublishRequest, PublishResult, PublishTarget,
    PublisherConfig,
};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the confluence publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Confluence page ID to update.
    #[arg(long, conflicts_with_all = ["space", "parent_id"])]
    page_id: Option<String>,

    /// Space to find or create the page in (overrides config).
    #[arg(long)]
    space: Option<String>,

    /// Parent page for newly created pages.
    #[arg(long)]
    parent_id: Option<String>,

    /// Page title (default: first H1 heading, then file name).
    #[arg(long)]
    title: Option<String>,

    /// Version message for the update.
    #[arg(short, long)]
    message: Option<String>,

    /// Overwrite pages that lack the managed label.
    #[arg(long)]
    force: bool,

    /// Preview changes without updating Confluence.
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file (default: auto-discover atlas.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete or publishing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            space_key: self.space.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let conf_config = require_confluence_config(&config, &output)?;
        let target = self.target(conf_config)?;

        let client = ConfluenceClient::from_config(
            &conf_config.base_url,
            &conf_config.username,
            &conf_config.api_token,
        );

        let markdown_text = std::fs::read_to_string(&self.markdown_file)?;
        output.info(&format!("Converting {}...", self.markdown_file.display()));

        let source_dir = self
            .markdown_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let request = PublishRequest {
            markdown: &markdown_text,
            source_dir,
            target,
            title: self.title.clone(),
            fallback_title: fallback_title(&self.markdown_file),
            message: self.message.as_deref(),
        };

        let publisher_config = PublisherConfig::from_config(&config).force(self.force);
        let publisher = PagePublisher::new(&client, publisher_config);

        if self.dry_run {
            let result = publisher.dry_run(&request)?;
            print_dry_run_result(&output, &result);
            output.data(&result.adf)?;
        } else {
            let result = publisher.publish(&request)?;
            print_publish_result(&output, &result);
        }

        Ok(())
    }

    fn target(&self, conf_config: &ConfluenceConfig) -> Result<PublishTarget, CliError> {
        if let Some(page_id) = &self.page_id {
            return Ok(PublishTarget::Existing {
                page_id: page_id.clone(),
            });
        }

        let space_key = conf_config.space_key.clone().ok_or_else(|| {
            CliError::Validation(
                "either --page-id or a space (--space or confluence.space_key) is required"
                    .to_owned(),
            )
        })?;
        Ok(PublishTarget::InSpace {
            space_key,
            parent_id: self.parent_id.clone(),
        })
    }
}

fn fallback_title(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "Untitled".to_owned(), |s| s.to_string_lossy().into_owned())
}

fn require_confluence_config<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a ConfluenceConfig, CliError> {
    config.require_confluence().map_err(|err| {
        if config.confluence.is_none() {
            output.error("Error: confluence configuration required in atlas.toml");
            output.info("\nAdd the following to your atlas.toml:");
            output.info("\n[confluence]");
            output.info(r#"base_url = "https://example.atlassian.net/wiki""#);
            output.info(r#"username = "you@example.com""#);
            output.info(r#"api_token = "${CONFLUENCE_TOKEN}""#);
            output.info(r#"space_key = "DOCS""#);
        }
        CliError::Config(err)
    })
}

fn print_dry_run_result(output: &Output, result: &DryRunResult) {
    output.highlight("\n[DRY RUN] No changes made.");
    output.info(&format!("Title: {}", result.title));

    match &result.existing {
        Some(page) => output.info(&format!(
            "Current page: \"{}\" (id {}, v{})",
            page.title, page.id, page.version.number
        )),
        None => output.warning("Page does not exist and would be created."),
    }

    if !result.attachment_names.is_empty() {
        output.info(&format!(
            "\nAttachments ({}):",
            result.attachment_names.len()
        ));
        for name in &result.attachment_names {
            output.info(&format!("  -> {name}"));
        }
    }
}

fn print_publish_result(output: &Output, result: &PublishResult) {
    if result.created {
        output.success("\nPage created successfully!");
    } else {
        output.success("\nPage updated successfully!");
    }
    output.info(&format!("ID: {}", result.page.id));
    output.info(&format!("Title: {}", result.page.title));
    output.info(&format!("Version: {}", result.page.version.number));
    output.info(&format!("URL: {}", result.url));

    if result.attachments_uploaded > 0 {
        output.info(&format!(
            "Attachments uploaded: {}",
            result.attachments_uploaded
        ));
    }
}
