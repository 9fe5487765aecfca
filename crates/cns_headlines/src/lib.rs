//! Sources of raw headline text: user-uploaded CSV files and live news APIs.

use std::io;

mod news_api;

pub use news_api::{ApiCredentials, NewsSources, SourceFetchError};

/// A single unit of input text. There is no identity beyond the string
/// content, duplicates are permitted and never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("the uploaded file must contain a 'text' column")]
    MissingTextColumn,

    #[error("failed to parse the uploaded file: {0}")]
    Malformed(#[from] csv::Error),
}

/// Parses an uploaded CSV file into one [`Article`] per row, in file order.
///
/// The file must have a header row with a column named `text`, any other
/// columns are ignored. Rows with empty text are kept as is, filtering
/// is the caller's business.
pub fn read_uploaded(input: impl io::Read) -> Result<Vec<Article>, UploadError> {
    let mut reader = csv::Reader::from_reader(input);

    let text_column = reader
        .headers()?
        .iter()
        .position(|header| header == "text")
        .ok_or(UploadError::MissingTextColumn)?;

    let mut articles = Vec::new();
    for record in reader.records() {
        let record = record?;
        let text = record.get(text_column).unwrap_or_default();
        articles.push(Article {
            text: text.to_owned(),
        });
    }

    log::debug!("Read {} articles from the uploaded file", articles.len());

    Ok(articles)
}
