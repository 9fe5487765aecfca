//! crypto-news-sentiment cli entrypoint

use anyhow::{bail, Context, Result};
use cns_headlines::{ApiCredentials, Article, NewsSources};
use cns_sentiment::{SentimentLabel, SentimentModel};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

/// The word cloud keeps this many of the most frequent words.
const MAX_CLOUD_WORDS: usize = 100;

const UPLOADED_EXPORT_FILE: &str = "crypto_sentiment_uploaded.csv";
const LIVE_EXPORT_FILE: &str = "crypto_sentiment_results.csv";

#[derive(Debug, StructOpt)]
#[structopt(name = "crypto-news-sentiment")]
enum CliArgs {
    /// Classify the sentiment of news articles from an uploaded CSV file.
    /// The file must contain a 'text' column, one article per row, any
    /// other columns are ignored.
    Analyze {
        /// Path to the CSV file to analyze
        #[structopt(long)]
        csv_path: PathBuf,

        #[structopt(flatten)]
        output: OutputArgs,
    },

    /// Fetch the latest headlines from the external news APIs
    /// (GNews first, NewsData as the fallback) and classify them
    Fetch {
        /// Maximum number of headlines to accumulate across all sources
        #[structopt(long, default_value = "30")]
        limit: usize,

        /// Topic to query the news APIs for
        #[structopt(long, default_value = "cryptocurrency")]
        topic: stdx::NonHollowString,

        #[structopt(flatten)]
        credentials: CredentialsArgs,

        #[structopt(flatten)]
        output: OutputArgs,
    },
}

#[derive(StructOpt)]
struct CredentialsArgs {
    /// GNews API key
    #[structopt(long, env = "CNS_GNEWS_API_KEY", hide_env_values = true)]
    gnews_api_key: String,

    /// NewsData API key
    #[structopt(long, env = "CNS_NEWSDATA_API_KEY", hide_env_values = true)]
    newsdata_api_key: String,
}

// Keys must never end up in debug logs
impl fmt::Debug for CredentialsArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsArgs")
            .field("gnews_api_key", &"<redacted>")
            .field("newsdata_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, StructOpt)]
struct OutputArgs {
    /// Directory to write the csv export and the svg charts into
    #[structopt(long, default_value = ".")]
    out_dir: PathBuf,

    /// Open the rendered distribution chart in the browser once done
    #[structopt(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenv::dotenv() {
        log::debug!("Dotenv could not be loaded: {:?}", err);
    }

    env_logger::init();

    let cli_args = CliArgs::from_args();

    log::debug!("Using cli args: {:?}", cli_args);

    let model = SentimentModel::load();

    match cli_args {
        CliArgs::Analyze { csv_path, output } => {
            eprintln!("Analyzing the uploaded news file...");

            let file = fs::File::open(&csv_path)
                .with_context(|| format!("Failed to open {}", csv_path.display()))?;
            let articles = cns_headlines::read_uploaded(io::BufReader::new(file))?;

            eprintln!("Read {} articles from {}", articles.len(), csv_path.display());

            analyze_and_report(&model, articles, UPLOADED_EXPORT_FILE, &output)?;
        }
        CliArgs::Fetch {
            limit,
            topic,
            credentials,
            output,
        } => {
            eprintln!("Fetching the latest '{}' headlines...", topic);

            let sources = NewsSources::new(ApiCredentials {
                gnews_api_key: credentials.gnews_api_key,
                newsdata_api_key: credentials.newsdata_api_key,
            })?;

            let time = std::time::Instant::now();
            let headlines = sources.fetch_live(&topic, limit).await;
            eprintln!(
                "Fetched {} headlines in {:?}",
                headlines.len(),
                time.elapsed()
            );

            let articles = headlines
                .into_iter()
                .map(|text| Article { text })
                .collect();

            analyze_and_report(&model, articles, LIVE_EXPORT_FILE, &output)?;
        }
    }

    Ok(())
}

/// The tail shared by both flows: classify, export the (text, sentiment)
/// table as csv and render the three charts next to it.
fn analyze_and_report(
    model: &SentimentModel,
    articles: Vec<Article>,
    export_file_name: &str,
    output: &OutputArgs,
) -> Result<()> {
    let articles = drop_blank_articles(articles);
    if articles.is_empty() {
        bail!(
            "there is nothing to classify: no input article has non-blank text \
            (live fetch may legitimately come up empty when both news APIs are down)"
        );
    }

    let texts: Vec<String> = articles.iter().map(|it| it.text.clone()).collect();
    let labels = model.classify(&texts)?;
    let score = cns_sentiment::mood_index(&labels);

    fs::create_dir_all(&output.out_dir).with_context(|| {
        format!("Failed to create output directory {}", output.out_dir.display())
    })?;

    let export_path = output.out_dir.join(export_file_name);
    export_csv(&articles, &labels, &export_path)?;

    let wedges = cns_charts::sentiment_distribution(&labels);
    let distribution_path = output.out_dir.join("sentiment_distribution.svg");
    cns_charts::render_distribution_chart(&wedges, &distribution_path)?;

    let frequencies = cns_charts::word_frequencies(&texts, MAX_CLOUD_WORDS);
    let wordcloud_path = output.out_dir.join("wordcloud.svg");
    cns_charts::render_wordcloud(&frequencies, &wordcloud_path)?;

    let mood_path = output.out_dir.join("mood_index.svg");
    cns_charts::render_mood_chart(score, &mood_path)?;

    eprintln!("Analysis complete!");
    for (article, label) in articles.iter().zip(&labels) {
        println!("{}\t{}", label, article.text);
    }
    for wedge in &wedges {
        eprintln!("{}: {} ({:.1}%)", wedge.label, wedge.count, wedge.percent);
    }
    eprintln!("Crypto market mood index: {:.3}", score);
    eprintln!(
        "Results exported to {}, charts to {}, {} and {}",
        export_path.display(),
        distribution_path.display(),
        wordcloud_path.display(),
        mood_path.display(),
    );

    if output.open {
        std::process::Command::new("google-chrome")
            .arg(&distribution_path)
            .spawn()?
            .wait()?;
    }

    Ok(())
}

/// Classification requires non-empty strings, so blank rows are filtered
/// out (and logged) before the batch is handed to the model.
fn drop_blank_articles(mut articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    articles.retain(|article| !article.text.trim().is_empty());
    if articles.len() < before {
        log::info!(
            "Dropped {} blank articles before classification",
            before - articles.len()
        );
    }
    articles
}

fn export_csv(articles: &[Article], labels: &[SentimentLabel], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create the export file {}", path.display()))?;

    writer.write_record(&["text", "sentiment"])?;
    for (article, label) in articles.iter().zip(labels) {
        writer.write_record(&[article.text.as_str(), label.as_str()])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cns_sentiment::SentimentLabel::*;

    fn article(text: &str) -> Article {
        Article {
            text: text.to_owned(),
        }
    }

    #[test]
    fn blank_articles_are_dropped_preserving_order() {
        let articles = vec![
            article("Bitcoin rallies"),
            article("   "),
            article(""),
            article("Ethereum stalls"),
        ];
        let kept = drop_blank_articles(articles);
        assert_eq!(kept, vec![article("Bitcoin rallies"), article("Ethereum stalls")]);
    }

    #[test]
    fn export_writes_text_and_sentiment_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        let articles = vec![article("Bitcoin rallies"), article("Exchange hacked, millions lost")];
        export_csv(&articles, &[Positive, Negative], &path).unwrap();

        let exported = fs::read_to_string(&path).unwrap();
        assert_eq!(
            exported,
            "text,sentiment\n\
            Bitcoin rallies,Positive\n\
            \"Exchange hacked, millions lost\",Negative\n"
        );
    }
}
