//! A discussion ready for extraction.

use chrono::NaiveDate;
use meso_common::{MesoError, MesoResult, Polygon, ValidityWindow};
use scraper::Html;
use tracing::debug;

use crate::coordinates::extract_polygon;
use crate::html::{first_preformatted, visible_text};
use crate::validity::{extract_issuance_date, ValidityParser};

/// Discussion text plus the product block, when the source had one.
#[derive(Debug, Clone)]
pub struct Discussion {
    text: String,
    preformatted: Option<String>,
}

impl Discussion {
    /// Build from a fetched discussion page.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        let preformatted = first_preformatted(&document);

        debug!(
            text_len = text.len(),
            has_product_block = preformatted.is_some(),
            "Reduced discussion HTML to text"
        );

        Self { text, preformatted }
    }

    /// Build from text pasted by the user. No issuance date is available.
    pub fn from_raw_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preformatted: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preformatted(&self) -> Option<&str> {
        self.preformatted.as_deref()
    }

    /// The area of concern.
    pub fn polygon(&self) -> MesoResult<Polygon> {
        extract_polygon(&self.text)
    }

    /// Issuance date from the product block.
    pub fn issuance_date(&self) -> MesoResult<NaiveDate> {
        let block = self.preformatted.as_deref().ok_or_else(|| {
            MesoError::UnparsableIssuanceDate("source has no preformatted product block".to_string())
        })?;
        extract_issuance_date(block)
    }

    /// The stated validity window, in display time.
    pub fn validity(&self, parser: &ValidityParser) -> MesoResult<ValidityWindow> {
        let issued = self.issuance_date()?;
        parser.parse(&self.text, issued)
    }
}
