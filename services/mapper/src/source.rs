//! Where the discussion comes from.

use std::io::Read;
use std::path::Path;

use discussion_parser::Discussion;
use meso_common::{MesoError, MesoResult};
use tracing::info;

use crate::fetch::Fetch;

/// Exactly one discussion source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Link to a discussion page; HTML with a product block.
    DirectLink(String),
    /// Pasted discussion text; no issuance date available.
    RawText(String),
}

impl SourceSelection {
    /// Build from the mutually exclusive command-line inputs.
    ///
    /// A text file path of `-` reads standard input.
    pub fn from_inputs(
        url: Option<&str>,
        text: Option<&str>,
        text_file: Option<&Path>,
    ) -> MesoResult<Self> {
        let given = [url.is_some(), text.is_some(), text_file.is_some()]
            .iter()
            .filter(|&&g| g)
            .count();

        match given {
            0 => {
                return Err(MesoError::InvalidSourceSelection(
                    "provide one of --url, --text or --text-file".to_string(),
                ))
            }
            1 => {}
            n => {
                return Err(MesoError::InvalidSourceSelection(format!(
                    "{} sources given; --url, --text and --text-file are mutually exclusive",
                    n
                )))
            }
        }

        if let Some(url) = url {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(MesoError::InvalidSourceSelection(format!(
                    "'{}' is not an http(s) link",
                    url
                )));
            }
            return Ok(Self::DirectLink(url.to_string()));
        }

        let text = match text_file {
            Some(path) => read_text_file(path)?,
            None => text.unwrap_or_default().to_string(),
        };

        if text.trim().is_empty() {
            return Err(MesoError::InvalidSourceSelection(
                "discussion text is empty".to_string(),
            ));
        }
        Ok(Self::RawText(text))
    }

    /// Load the discussion, fetching it when the source is a link.
    pub async fn load(&self, fetcher: &dyn Fetch) -> MesoResult<Discussion> {
        match self {
            Self::DirectLink(url) => {
                info!(url = %url, "Fetching discussion");
                let html = fetcher.fetch_text(url).await?;
                Ok(Discussion::from_html(&html))
            }
            Self::RawText(text) => {
                info!(chars = text.len(), "Using pasted discussion text");
                Ok(Discussion::from_raw_text(text.clone()))
            }
        }
    }
}

fn read_text_file(path: &Path) -> MesoResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| MesoError::Io(format!("Failed to read {}: {}", path.display(), e)))
}
