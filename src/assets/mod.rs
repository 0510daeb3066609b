//! Asset locations, URL resolution and page preload helpers.

mod location;
mod preload;

pub use location::{
    AssetError,
    Collection,
    DEFAULT_PACKAGE,
    split_location,
    url,
};
pub use preload::{
    PageAssets,
    PreloadFlags,
};
