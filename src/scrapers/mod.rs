//! Scraping a user's upvoted topics from the forum.
//!
//! The work is split into three pieces so each can change on its own:
//!
//! 1. [`fetcher`]: downloads one listing page (`FetchPage` / `PageFetcher`)
//! 2. [`extract`]: turns a page's HTML into articles for a given markup scheme
//! 3. [`aggregate`]: drives the two across pages, deduplicates, and decides
//!    when to stop
//!
//! Pages are fetched strictly one after another with a short pause between
//! them. A failed page ends the whole run.

pub mod aggregate;
pub mod extract;
pub mod fetcher;
