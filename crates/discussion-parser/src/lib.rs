//! Extraction of the area of concern and validity window from forecast
//! discussions.
//!
//! A discussion arrives either as an HTML page (direct link) or as raw text
//! pasted by the user. [`Discussion`] holds the visible text plus, for HTML,
//! the preformatted product block that carries the issuance date.
//!
//! - [`coordinates`]: 8-digit `LAT...LON` tokens to a closed [`Polygon`]
//! - [`validity`]: `DDHHMMZ` tokens to a [`ValidityWindow`]
//! - [`html`]: HTML to visible text

pub mod coordinates;
pub mod discussion;
pub mod html;
pub mod validity;

pub use coordinates::{decode_token, extract_polygon};
pub use discussion::Discussion;
pub use validity::{extract_issuance_date, parse_validity, ValidityParser};

pub use meso_common::{Polygon, ValidityWindow};
