//! State Module - Stores owned by individual components
//!
//! - **Channel** - Publish/subscribe bus shared by the whole tree
//! - **Catalog** - Variants and the selected index (product node)
//! - **Reviews** - Append-only review list (product node)
//! - **Cart** - Variant ids added so far (root)
//! - **Tabs** - Single active tab out of a fixed label set

mod cart;
mod catalog;
mod channel;
mod reviews;
mod tabs;

pub use cart::*;
pub use catalog::*;
pub use channel::*;
pub use reviews::*;
pub use tabs::*;
