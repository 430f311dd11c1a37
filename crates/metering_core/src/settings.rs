use serde::{Deserialize, Serialize};

use crate::{ContentId, Period};

/// Metering configuration supplied by the host for one page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringSettings {
    pub period: Period,
    /// Free views allowed per period.
    pub count: u32,
    /// Content being viewed right now.
    pub post_id: ContentId,
    #[serde(default = "default_visible_paragraphs")]
    pub visible_paragraphs: usize,
    #[serde(default)]
    pub use_more_tag: bool,
}

fn default_visible_paragraphs() -> usize {
    2
}

impl MeteringSettings {
    pub fn new(period: Period, count: u32, post_id: impl Into<ContentId>) -> Self {
        Self {
            period,
            count,
            post_id: post_id.into(),
            visible_paragraphs: default_visible_paragraphs(),
            use_more_tag: false,
        }
    }

    pub fn with_visible_paragraphs(mut self, visible_paragraphs: usize) -> Self {
        self.visible_paragraphs = visible_paragraphs;
        self
    }

    pub fn with_more_tag(mut self, use_more_tag: bool) -> Self {
        self.use_more_tag = use_more_tag;
        self
    }

    /// Same settings, viewing a different piece of content.
    pub fn for_post(&self, post_id: impl Into<ContentId>) -> Self {
        Self {
            post_id: post_id.into(),
            ..self.clone()
        }
    }
}
