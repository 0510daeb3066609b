//! Per-page preload queue and HTML tag rendering.

use super::location::{
    AssetError,
    Collection,
    url,
};
use crate::registry::PackageRegistry;

/// Weight step between consecutive auto-weighted entries.
const WEIGHT_STEP: u32 = 10;

/// Rendering flags for a preloaded script location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadFlags {
    /// Render inside the document head instead of the body.
    pub head: bool,
    /// `async` attribute on the script tag.
    pub asynchr: bool,
    /// `defer` attribute on the script tag.
    pub defer: bool,
}

/// A single queued asset location.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreloadEntry {
    /// Location as given to [`PageAssets::preload`].
    location: String,
    /// Collection the entry renders under.
    collection: Collection,
    /// Ordering weight, smaller renders first.
    weight: u32,
    /// Script rendering flags.
    flags: PreloadFlags,
}

/// Weighted list of entries with the shared auto-weight rule.
#[derive(Debug, Clone, Default)]
struct WeightedQueue {
    /// Entries in insertion order.
    entries: Vec<PreloadEntry>,
    /// Highest weight seen so far.
    last_weight: u32,
}

impl WeightedQueue {
    /// Push an entry, assigning the next auto weight when `weight` is zero.
    /// An explicit weight above the running counter advances it.
    fn push(&mut self, location: &str, collection: Collection, weight: u32, flags: PreloadFlags) {
        let weight = if weight == 0 {
            self.last_weight += WEIGHT_STEP;
            self.last_weight
        } else {
            if weight > self.last_weight {
                self.last_weight = weight;
            }
            weight
        };
        self.entries.push(PreloadEntry {
            location: location.to_string(),
            collection,
            weight,
            flags,
        });
    }

    /// Whether `location` is already queued.
    fn contains(&self, location: &str) -> bool {
        self.entries.iter().any(|entry| entry.location == location)
    }

    /// Entries of `collection` sorted by weight (stable, so insertion order
    /// breaks ties).
    fn sorted(&self, collection: Collection) -> Vec<&PreloadEntry> {
        let mut entries: Vec<&PreloadEntry> =
            self.entries.iter().filter(|entry| entry.collection == collection).collect();
        entries.sort_by_key(|entry| entry.weight);
        entries
    }
}

/// Assets queued for rendering into a page.
///
/// Permanent entries are rendered on every page and survive [`reset`];
/// request entries belong to the page being built and are dropped by it.
/// Entries are deduplicated by location across both queues.
///
/// [`reset`]: PageAssets::reset
#[derive(Debug, Clone, Default)]
pub struct PageAssets {
    /// Entries rendered on every page.
    permanent: WeightedQueue,
    /// Entries for the current page only.
    request: WeightedQueue,
    /// Inline scripts with weights, current page only.
    inline: Vec<(String, u32)>,
    /// Highest inline weight seen so far.
    last_inline_weight: u32,
}

impl PageAssets {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an asset location for preloading.
    ///
    /// The collection is detected from the location when not given. A weight
    /// of zero assigns the next auto weight; duplicates of an already queued
    /// location are ignored.
    ///
    /// # Errors
    /// - `UnknownCollection` when no collection is given and the extension
    ///   is neither `.js` nor `.css`
    pub fn preload(
        &mut self,
        location: &str,
        permanent: bool,
        collection: Option<Collection>,
        weight: u32,
        flags: PreloadFlags,
    ) -> Result<(), AssetError> {
        let collection = match collection {
            Some(collection) => collection,
            None => Collection::detect(location)?,
        };

        if self.permanent.contains(location) || self.request.contains(location) {
            return Ok(());
        }

        let queue = if permanent { &mut self.permanent } else { &mut self.request };
        queue.push(location, collection, weight, flags);

        Ok(())
    }

    /// Queue an inline script for the current page.
    pub fn add_inline_js(&mut self, code: &str, weight: u32) {
        let weight = if weight == 0 {
            self.last_inline_weight += WEIGHT_STEP;
            self.last_inline_weight
        } else {
            if weight > self.last_inline_weight {
                self.last_inline_weight = weight;
            }
            weight
        };
        self.inline.push((code.to_string(), weight));
    }

    /// Drop everything queued for the current page. Permanent entries stay.
    pub fn reset(&mut self) {
        self.request = WeightedQueue::default();
        self.inline.clear();
        self.last_inline_weight = 0;
    }

    /// Entries of `collection`: permanent first, each group sorted by weight.
    fn sorted(&self, collection: Collection) -> Vec<&PreloadEntry> {
        let mut entries = self.permanent.sorted(collection);
        entries.extend(self.request.sorted(collection));
        entries
    }

    /// `<script>` tags for queued scripts, head or body section.
    ///
    /// # Errors
    /// - `Registry` when a location names an unregistered package
    pub fn js_tags(
        &self,
        registry: &PackageRegistry,
        public_prefix: &str,
        head: bool,
    ) -> Result<String, AssetError> {
        let mut out = String::new();
        for entry in self.sorted(Collection::Js) {
            if entry.flags.head == head {
                out.push_str(&js_tag(&url(registry, public_prefix, &entry.location)?, entry.flags));
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// `<link rel="stylesheet">` tags for queued stylesheets.
    ///
    /// # Errors
    /// - `Registry` when a location names an unregistered package
    pub fn css_tags(
        &self,
        registry: &PackageRegistry,
        public_prefix: &str,
    ) -> Result<String, AssetError> {
        let tags: Vec<String> = self
            .sorted(Collection::Css)
            .into_iter()
            .map(|entry| Ok(css_tag(&url(registry, public_prefix, &entry.location)?)))
            .collect::<Result<_, AssetError>>()?;
        Ok(tags.join("\n"))
    }

    /// Queued inline scripts concatenated in weight order.
    #[must_use]
    pub fn inline_js(&self) -> String {
        let mut snippets: Vec<&(String, u32)> = self.inline.iter().collect();
        snippets.sort_by_key(|(_, weight)| *weight);
        snippets.iter().map(|(code, _)| code.as_str()).collect()
    }
}

/// `<script>` tag for a resolved URL.
fn js_tag(url: &str, flags: PreloadFlags) -> String {
    let src = html_escape::encode_double_quoted_attribute(url);
    let asynchr = if flags.asynchr { " async" } else { "" };
    let defer = if flags.defer { " defer" } else { "" };
    format!(r#"<script type="text/javascript" src="{src}"{asynchr}{defer}></script>"#)
}

/// `<link rel="stylesheet">` tag for a resolved URL.
fn css_tag(url: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{}">"#, html_escape::encode_double_quoted_attribute(url))
}
