pub mod html;
pub mod text;


use crate::error::PipelineError;
use crate::filter::CandidateFilter;
use crate::results::RawPage;
use scraper::{Html, Selector};

/// CSS marker of a message's text block on the public channel page
pub const MESSAGE_TEXT_SELECTOR: &str = ".tgme_widget_message_text";

/// How many characters of body text the fallback keeps
pub const FALLBACK_MAX_CHARS: usize = 1500;

/// Outcome of a single selection strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The strategy does not apply to this page; try the next one
    NoMatch,
    /// The strategy applied but nothing passed its quality bar
    Exhausted,
    /// Text to send to extraction
    Found(String),
}

/// Ways of picking the extraction input, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Newest qualifying message node
    MessageNodes,
    /// Prefix of the page's visible text, for when the layout changed
    BodyFallback,
}

impl SelectionStrategy {
    /// Default order: targeted selector first, whole page second
    pub const CHAIN: [SelectionStrategy; 2] =
        [SelectionStrategy::MessageNodes, SelectionStrategy::BodyFallback];

    /// Runs this strategy against a parsed page
    pub fn select(&self, doc: &Html, selector: &MessageSelector) -> Selection {
        match self {
            SelectionStrategy::MessageNodes => {
                let Some(candidates) = html::matching_texts(doc, &selector.message_selector)
                else {
                    return Selection::NoMatch;
                };
                match selector.filter.newest(candidates) {
                    Some(text) => Selection::Found(text),
                    None => Selection::Exhausted,
                }
            }
            SelectionStrategy::BodyFallback => {
                ::log::warn!(
                    "No {} nodes found; channel may be private or the layout changed",
                    MESSAGE_TEXT_SELECTOR
                );
                let body = html::body_text(doc);
                let prefix = text::char_prefix(&body, selector.fallback_max_chars);
                if prefix.is_empty() {
                    Selection::Exhausted
                } else {
                    Selection::Found(prefix.to_string())
                }
            }
        }
    }
}

/// Text chosen as extraction input, with the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedText {
    pub text: String,
    pub strategy: SelectionStrategy,
}

/// Picks the message most likely to carry today's rates from a feed page
#[derive(Debug, Clone)]
pub struct MessageSelector {
    message_selector: Selector,
    filter: CandidateFilter,
    fallback_max_chars: usize,
    chain: Vec<SelectionStrategy>,
}

impl Default for MessageSelector {
    fn default() -> Self {
        Self {
            message_selector: Selector::parse(MESSAGE_TEXT_SELECTOR).unwrap(),
            filter: CandidateFilter::default(),
            fallback_max_chars: FALLBACK_MAX_CHARS,
            chain: SelectionStrategy::CHAIN.to_vec(),
        }
    }
}

impl MessageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate filter
    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restrict or reorder the strategies that are tried
    pub fn with_chain(mut self, chain: Vec<SelectionStrategy>) -> Self {
        self.chain = chain;
        self
    }

    /// Walks the strategy chain until one of them decides.
    ///
    /// The first strategy that applies settles the outcome: `Found` wins,
    /// `Exhausted` aborts with [`PipelineError::NoText`] without trying the
    /// rest.
    pub fn select_text(&self, page: &RawPage) -> Result<SelectedText, PipelineError> {
        let doc = Html::parse_document(&page.html);

        for strategy in &self.chain {
            match strategy.select(&doc, self) {
                Selection::NoMatch => {
                    ::log::debug!("Strategy {:?} did not apply to {}", strategy, page.url);
                }
                Selection::Exhausted => {
                    ::log::debug!("Strategy {:?} found nothing usable", strategy);
                    return Err(PipelineError::NoText);
                }
                Selection::Found(text) => {
                    ::log::info!(
                        "Selected {} characters via {:?}",
                        text.chars().count(),
                        strategy
                    );
                    return Ok(SelectedText {
                        text,
                        strategy: *strategy,
                    });
                }
            }
        }

        Err(PipelineError::NoText)
    }
}
