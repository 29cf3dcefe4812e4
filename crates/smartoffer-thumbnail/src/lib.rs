//! Branded offer thumbnails.
//!
//! Derives image details from an extracted offer, picks a colour theme from
//! brand and reward cues, and renders a small SVG returned as a data URI.

pub mod details;
pub mod render;
pub mod theme;

pub use details::ImageDetails;
pub use render::{badge_text, render, render_svg, ThumbnailRequest};
pub use theme::{detect_theme, Theme};
