use std::collections::HashSet;

use cctv_core::{normalize_label, StreamEntry, StreamFilter, MAX_LABEL_CHARS};
use ego_tree::{NodeId, NodeRef};
use scrape_logging::{scrape_debug, scrape_info};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Rows, list items and class-tagged blocks that may hold one channel each.
pub const DEFAULT_CONTAINER_SELECTOR: &str = r#"tr, li, div[class*="channel"], div[class*="stream"], div[class*="item"], div[class*="result"]"#;
/// Sub-elements whose text is preferred as the channel label.
pub const DEFAULT_TITLE_SELECTOR: &str = r#"[class*="title"], [class*="name"]"#;
/// Elements that carry a URL in an attribute.
pub const DEFAULT_LINK_SELECTOR: &str = "a[href], source[src], video[src]";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid css selector {css:?}: {message}")]
pub struct SelectorError {
    pub css: String,
    pub message: String,
}

pub fn parse_selector(css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|err| SelectorError {
        css: css.to_string(),
        message: err.to_string(),
    })
}

fn builtin_selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("built-in selector is valid")
}

/// Shared inputs for one extraction pass.
pub struct ExtractContext<'a> {
    pub filter: &'a StreamFilter,
    pub base_url: Option<&'a Url>,
    pub max_label_chars: usize,
}

impl ExtractContext<'_> {
    fn label(&self, raw: &str) -> Option<String> {
        let label = normalize_label(raw, self.max_label_chars);
        (!label.is_empty()).then_some(label)
    }

    /// Resolve an attribute URL and keep it only if the allow-list accepts it.
    fn stream_url(&self, raw: &str) -> Option<String> {
        resolve_url(raw, self.base_url).filter(|url| self.filter.accepts_url(url))
    }
}

/// One way of turning a parsed page into entries.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Vec<StreamEntry>;
}

/// Runs strategies in priority order and returns the first non-empty result.
pub struct Extractor {
    filter: StreamFilter,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    max_label_chars: usize,
}

impl Extractor {
    /// Structured scan first, flat link scan as fallback.
    pub fn new(filter: StreamFilter) -> Self {
        Self::with_strategies(
            filter,
            vec![
                Box::new(StructuredScan::default()),
                Box::new(FlatLinkScan::default()),
            ],
        )
    }

    pub fn with_strategies(filter: StreamFilter, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self {
            filter,
            strategies,
            max_label_chars: MAX_LABEL_CHARS,
        }
    }

    pub fn with_max_label_chars(mut self, max_label_chars: usize) -> Self {
        self.max_label_chars = max_label_chars.max(1);
        self
    }

    pub fn filter(&self) -> &StreamFilter {
        &self.filter
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// `base_url` is the address the page came from; relative links resolve against it.
    pub fn extract(&self, html: &str, base_url: Option<&str>) -> Vec<StreamEntry> {
        let doc = Html::parse_document(html);
        let base_url = base_url.and_then(|b| Url::parse(b).ok());
        let ctx = ExtractContext {
            filter: &self.filter,
            base_url: base_url.as_ref(),
            max_label_chars: self.max_label_chars,
        };

        for strategy in &self.strategies {
            let entries = strategy.extract(&doc, &ctx);
            if !entries.is_empty() {
                scrape_info!("{} produced {} candidate(s)", strategy.name(), entries.len());
                return entries;
            }
            scrape_debug!("{} found nothing", strategy.name());
        }
        Vec::new()
    }
}

/// Scan container elements whose text mentions the keyword and pair each
/// with the first accepted URL inside it (attribute first, then plain text).
pub struct StructuredScan {
    containers: Selector,
    titles: Selector,
    links: Selector,
}

impl StructuredScan {
    pub fn new(containers: &str, titles: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            containers: parse_selector(containers)?,
            titles: parse_selector(titles)?,
            links: builtin_selector(DEFAULT_LINK_SELECTOR),
        })
    }

    fn title_text(&self, container: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
        container
            .select(&self.titles)
            .find_map(|title| ctx.label(&element_text(title)))
    }

    fn link_url(&self, container: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
        container
            .select(&self.links)
            .filter_map(link_target)
            .find_map(|raw| ctx.stream_url(raw))
    }

    /// Entry for one container, judged on its own content.
    ///
    /// The keyword must appear in the label source (the title sub-element, or
    /// the container text with the URL removed), not only inside the URL.
    fn candidate(&self, container: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<StreamEntry> {
        let text = element_text(container);
        if !ctx.filter.matches_keyword(&text) {
            return None;
        }
        let url = self
            .link_url(container, ctx)
            .or_else(|| ctx.filter.find_url_in_text(&text))?;
        let source = self
            .title_text(container, ctx)
            .unwrap_or_else(|| text.replace(url.as_str(), " "));
        if !ctx.filter.matches_keyword(&source) {
            return None;
        }
        ctx.label(&source).map(|channel| StreamEntry::new(channel, url))
    }
}

impl Default for StructuredScan {
    fn default() -> Self {
        Self {
            containers: builtin_selector(DEFAULT_CONTAINER_SELECTOR),
            titles: builtin_selector(DEFAULT_TITLE_SELECTOR),
            links: builtin_selector(DEFAULT_LINK_SELECTOR),
        }
    }
}

impl ExtractionStrategy for StructuredScan {
    fn name(&self) -> &'static str {
        "structured scan"
    }

    /// A container that wraps another container which produced an entry
    /// defers to the inner one, so labels come from the innermost row.
    fn extract(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Vec<StreamEntry> {
        let candidates: Vec<(NodeId, StreamEntry)> = doc
            .select(&self.containers)
            .filter_map(|container| {
                self.candidate(container, ctx)
                    .map(|entry| (container.id(), entry))
            })
            .collect();

        let mut wrappers: HashSet<NodeId> = HashSet::new();
        for (id, _) in &candidates {
            if let Some(node) = doc.tree.get(*id) {
                wrappers.extend(node.ancestors().map(|ancestor| ancestor.id()));
            }
        }

        candidates
            .into_iter()
            .filter(|(id, _)| !wrappers.contains(id))
            .map(|(_, entry)| entry)
            .collect()
    }
}

/// Walk every link-like element with an accepted target and keep those whose
/// own text, or their enclosing element's text, mentions the keyword.
pub struct FlatLinkScan {
    links: Selector,
}

impl FlatLinkScan {
    pub fn new(links: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            links: parse_selector(links)?,
        })
    }
}

impl Default for FlatLinkScan {
    fn default() -> Self {
        Self {
            links: builtin_selector(DEFAULT_LINK_SELECTOR),
        }
    }
}

impl ExtractionStrategy for FlatLinkScan {
    fn name(&self) -> &'static str {
        "flat link scan"
    }

    fn extract(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Vec<StreamEntry> {
        let mut entries = Vec::new();
        for link in doc.select(&self.links) {
            let Some(url) = link_target(link).and_then(|raw| ctx.stream_url(raw)) else {
                continue;
            };

            let own = element_text(link);
            let label = if ctx.filter.matches_keyword(&own) {
                ctx.label(&own)
            } else {
                link.parent()
                    .and_then(enclosing_element)
                    .map(|parent| element_text(parent).replace(url.as_str(), " "))
                    .filter(|text| ctx.filter.matches_keyword(text))
                    .and_then(|text| ctx.label(&text))
            };

            if let Some(channel) = label {
                entries.push(StreamEntry::new(channel, url));
            }
        }
        entries
    }
}

/// Text nodes joined with spaces so adjacent cells do not run together.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn enclosing_element(node: NodeRef<'_, Node>) -> Option<ElementRef<'_>> {
    std::iter::once(node)
        .chain(node.ancestors())
        .find_map(ElementRef::wrap)
}

fn link_target(element: ElementRef<'_>) -> Option<&str> {
    let value = element.value();
    value.attr("href").or_else(|| value.attr("src"))
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    if Url::parse(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }
    base.and_then(|base| base.join(trimmed).ok())
        .map(String::from)
}
