//! jobtext - job posting extraction.
//!
//! Turns a URL for a single job listing on LinkedIn, Indeed, JustJoin,
//! Google Jobs, ZipRecruiter or FlexJobs into one plain-text document:
//!
//! ```text
//! Position: Senior Rust Engineer
//!
//! Company: Acme
//!
//! Description:
//! ...
//! ```
//!
//! Extraction is staged. A plain HTTP GET is tried first and its JSON-LD
//! `JobPosting` used when complete. Otherwise the page is rendered in headless
//! Chrome, JSON-LD is tried again, and finally per-site selectors are applied
//! to the rendered markup.
//!
//! ```no_run
//! # async fn run() -> Result<(), jobtext::ExtractionError> {
//! let text = jobtext::extract_job_text("https://www.indeed.com/viewjob?jk=abc123").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod platforms;
pub mod scrapers;
pub mod structured;
pub mod utils;

pub use config::ExtractorConfig;
pub use document::{assemble, JobFields};
pub use error::{ExtractionError, ExtractionResult};
pub use pipeline::{extract_job_text, JobTextExtractor};
pub use platform::{resolve, Platform, ResolvedUrl};
pub use platforms::{detect_block_signal, extractor_for, BlockSignal, PlatformExtractor};
pub use scrapers::{PageFetcher, PageRenderer, PageSession};
pub use structured::StructuredPosting;
pub use utils::strip_html;
