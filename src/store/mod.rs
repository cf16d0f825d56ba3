//! Client-side stores.
//!
//! Each store owns one collection behind a freshness-windowed cache, applies
//! writes optimistically, and exposes derived views computed on read.

mod applications;
mod cache;
mod campaigns;
mod clock;
mod optimistic;
mod pets;
mod settings;
mod volunteers;

pub use applications::*;
pub use cache::*;
pub use campaigns::*;
pub use clock::*;
pub use optimistic::*;
pub use pets::*;
pub use settings::*;
pub use volunteers::*;
