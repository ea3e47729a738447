//! Command-line interface.

use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::LawApiConfig;
use crate::error::Result;
use crate::lookup::{read_statute_article, ArticleOutcome};
use crate::service::LawService;
use crate::source::LawApiClient;
use crate::types::strip_type_prefix;

/// Korean law lookup - statutes, precedents and administrative rules from law.go.kr.
///
/// Requires the Open API user id in `OPEN_LAW_ID`.
#[derive(Parser)]
#[command(name = "korean-law")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override the Open API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up an article ("민법 제103조", "Civil Act Article 103") or search broadly.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Look up a statute: one article, or its table of contents when no article is given.
    Lookup {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Read a document by typed id (e.g., statute:265307, prec:228541).
    Read { resource_id: String },

    /// Read one article of a statute.
    Article {
        /// Statute id (with or without the `statute:` prefix)
        law_id: String,

        /// Article number (e.g., 20, 20-2, 제20조의2)
        article_no: String,

        /// Print the article as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an article with the articles it cites and its delegated decree articles.
    Chain {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Find articles of a statute containing all keywords.
    Articles {
        law_id: String,

        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// Search statutes by name.
    Statutes {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Search legal term definitions.
    Terms {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Search statutory interpretations.
    Interpretations {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List attached tables and forms of a statute.
    Attachments { law_id: String },

    /// Show revision information of a statute.
    History { law_id: String },

    /// Show the latest amendment and the old/new article comparison link.
    Compare { law_id: String },
}

/// Run the CLI and return the text to print.
pub async fn run() -> Result<String> {
    let cli = Cli::parse();

    let mut config = LawApiConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let service = LawService::new(LawApiClient::new(config)?);

    let pb = spinner();
    let output = execute(&service, cli.command, &pb).await;
    pb.finish_and_clear();
    output
}

async fn execute(service: &LawService<LawApiClient>, command: Commands, pb: &ProgressBar) -> Result<String> {
    let output = match command {
        Commands::Search { query } => {
            let query = query.join(" ");
            announce(pb, "Searching", &query);
            service.search(&query).await
        }
        Commands::Lookup { query } => {
            let query = query.join(" ");
            announce(pb, "Looking up", &query);
            service.lookup(&query).await
        }
        Commands::Read { resource_id } => {
            announce(pb, "Reading", &resource_id);
            service.read_resource(&resource_id).await
        }
        Commands::Article {
            law_id,
            article_no,
            json,
        } => {
            announce(pb, "Reading article", &format!("{law_id} {article_no}"));
            if json {
                return article_json(service, &law_id, &article_no).await;
            }
            service.read_article(&law_id, &article_no).await
        }
        Commands::Chain { query } => {
            let query = query.join(" ");
            announce(pb, "Exploring", &query);
            service.explore_chain(&query).await
        }
        Commands::Articles { law_id, keywords } => {
            let keywords = keywords.join(" ");
            announce(pb, "Searching articles of", &law_id);
            service.search_articles(&law_id, &keywords).await
        }
        Commands::Statutes { query } => {
            let query = query.join(" ");
            announce(pb, "Searching statutes", &query);
            service.search_statutes(&query).await
        }
        Commands::Terms { query } => {
            let query = query.join(" ");
            announce(pb, "Searching legal terms", &query);
            service.search_terms(&query).await
        }
        Commands::Interpretations { query } => {
            let query = query.join(" ");
            announce(pb, "Searching interpretations", &query);
            service.search_interpretations(&query).await
        }
        Commands::Attachments { law_id } => {
            announce(pb, "Listing attachments of", &law_id);
            service.attachments(&law_id).await
        }
        Commands::History { law_id } => {
            announce(pb, "Reading history of", &law_id);
            service.law_history(&law_id).await
        }
        Commands::Compare { law_id } => {
            announce(pb, "Comparing revisions of", &law_id);
            service.old_new_comparison(&law_id).await
        }
    };
    Ok(output)
}

/// The article as JSON, or the usual not-found text.
async fn article_json(service: &LawService<LawApiClient>, law_id: &str, article_no: &str) -> Result<String> {
    let outcome = read_statute_article(service.source(), strip_type_prefix(law_id), article_no).await?;
    match outcome {
        ArticleOutcome::Found { article, .. } => Ok(serde_json::to_string_pretty(&article)?),
        not_found @ ArticleOutcome::NotFound { .. } => Ok(not_found.render()),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn announce(pb: &ProgressBar, action: &str, subject: &str) {
    pb.set_message(format!("{} {}", style(action).bold(), style(subject).cyan()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_search_joins_words() {
        let cli = Cli::parse_from(["korean-law", "search", "Civil", "Act", "Article", "103"]);
        let Commands::Search { query } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(query.join(" "), "Civil Act Article 103");
    }

    #[test]
    fn test_cli_parse_article_with_json() {
        let cli = Cli::parse_from([
            "korean-law",
            "article",
            "statute:265307",
            "제103조",
            "--json",
            "--timeout",
            "5",
        ]);
        assert_eq!(cli.timeout, Some(5));
        let Commands::Article {
            law_id,
            article_no,
            json,
        } = cli.command
        else {
            panic!("expected article");
        };
        assert_eq!(law_id, "statute:265307");
        assert_eq!(article_no, "제103조");
        assert!(json);
    }

    #[test]
    fn test_cli_parse_compare() {
        let cli = Cli::parse_from(["korean-law", "compare", "statute:265307"]);
        let Commands::Compare { law_id } = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(law_id, "statute:265307");
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["korean-law", "search"]).is_err());
    }
}
