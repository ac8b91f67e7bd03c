//! Project and content-item domain model.
//!
//! A [`Project`] owns an ordered collection of [`ContentItem`]s. All
//! mutations go through the methods here so ordering, type-transition and
//! ownership rules live in one place regardless of which handler or store
//! touches the data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::chart::ChartData;
use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// What kind of document a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Linear prose document, exported as `.docx`.
    FlowDocument,
    /// Slide presentation, exported as `.pptx`.
    SlideDeck,
}

impl DocumentKind {
    /// File extension of the export artifact.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::FlowDocument => "docx",
            DocumentKind::SlideDeck => "pptx",
        }
    }

    /// Item type assigned to freshly created outline items.
    pub fn default_item_type(self) -> ItemType {
        match self {
            DocumentKind::FlowDocument => ItemType::Section,
            DocumentKind::SlideDeck => ItemType::Slide,
        }
    }

    /// Human word for one content unit, used in generation prompts.
    pub fn unit_name(self) -> &'static str {
        match self {
            DocumentKind::FlowDocument => "section",
            DocumentKind::SlideDeck => "slide",
        }
    }

    /// Wire/storage string, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::FlowDocument => "flow-document",
            DocumentKind::SlideDeck => "slide-deck",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flow-document" => Ok(DocumentKind::FlowDocument),
            "slide-deck" => Ok(DocumentKind::SlideDeck),
            other => Err(CoreError::Validation(format!(
                "unknown document kind '{other}'"
            ))),
        }
    }
}

/// Role of a content item inside its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Prose section of a flow document.
    Section,
    /// Text slide of a slide deck.
    Slide,
    /// Item rendered as a native chart.
    Chart,
    /// Item rendered as a full-slide image.
    ImagePrompt,
}

// ---------------------------------------------------------------------------
// Content items
// ---------------------------------------------------------------------------

/// One ordered unit of a project: a section, slide, chart or image.
///
/// Deserialization is deliberately tolerant: everything that can default
/// does, so one malformed stored item never poisons a whole project read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    /// Markdown-lite body text (see [`crate::markdown`]).
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Sole sort key at export time. Gaps are allowed; never renumbered.
    pub order: i64,
    pub feedback: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    pub chart_data: Option<ChartData>,
    pub image_prompt: Option<String>,
    pub image_url: Option<String>,
}

impl ContentItem {
    pub fn new(title: impl Into<String>, item_type: ItemType, order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            item_type,
            order,
            feedback: None,
            comments: Vec::new(),
            chart_data: None,
            image_prompt: None,
            image_url: None,
        }
    }

    /// Attach generated chart data, turning the item into a chart item.
    ///
    /// Any prior image semantic is cleared: a chart item renders its chart,
    /// nothing else.
    pub fn apply_chart(&mut self, data: ChartData) {
        self.item_type = ItemType::Chart;
        self.chart_data = Some(data);
        self.image_prompt = None;
        self.image_url = None;
    }

    /// Attach a generated image prompt and (optionally) a resolved URL.
    ///
    /// Slides keep their type: the image becomes a side panel next to the
    /// slide text. Any other type becomes `image_prompt`, making the image
    /// the item body.
    pub fn apply_image(&mut self, prompt: impl Into<String>, url: Option<String>) {
        if self.item_type != ItemType::Slide {
            self.item_type = ItemType::ImagePrompt;
        }
        self.image_prompt = Some(prompt.into());
        self.image_url = url;
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn default_version() -> i64 {
    1
}

/// A user's document project with its full item tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Owning user, as issued by the identity provider.
    pub user_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub topic: String,
    pub description: Option<String>,
    /// Optimistic-concurrency token; bumped on every successful mutation.
    #[serde(default = "default_version")]
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Project {
    /// Create a project from validated input and a generated outline.
    ///
    /// Outline entries become items with `order` 0..n and empty content,
    /// typed per the document kind.
    pub fn new(user_id: impl Into<String>, input: NewProject, outline: Vec<String>) -> Self {
        let now = chrono::Utc::now();
        let item_type = input.kind.default_item_type();
        let items = outline
            .into_iter()
            .enumerate()
            .map(|(i, title)| ContentItem::new(title, item_type, i as i64))
            .collect();

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: input.title,
            kind: input.kind,
            topic: input.topic,
            description: input.description,
            version: 1,
            created_at: now,
            updated_at: now,
            items,
        }
    }

    /// Refresh `updated_at`. Called by the store's mutation path on every
    /// successful write.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    /// Items in ascending `order`. The sort is stable, so equal orders keep
    /// their storage sequence.
    pub fn sorted_items(&self) -> Vec<&ContentItem> {
        let mut items: Vec<&ContentItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// Append a new item at the end of the ordering and return its id.
    pub fn append_item(&mut self, title: impl Into<String>, item_type: ItemType) -> Uuid {
        let order = self.items.len() as i64;
        let item = ContentItem::new(title, item_type, order);
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove an item by id. Remaining orders are left untouched; export
    /// sorts, so gaps are harmless.
    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() != before
    }

    pub fn item(&self, item_id: Uuid) -> Result<&ContentItem, CoreError> {
        self.items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: item_id,
            })
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> Result<&mut ContentItem, CoreError> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: item_id,
            })
    }

    /// Reject access by anyone other than the owning user.
    pub fn ensure_owned_by(&self, user_id: &str) -> Result<(), CoreError> {
        if self.user_id != user_id {
            return Err(CoreError::Forbidden(
                "project belongs to another user".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a partial metadata update. Absent fields are left unchanged.
    pub fn apply_update(&mut self, input: UpdateProject) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(topic) = input.topic {
            self.topic = topic;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
    }
}

// ---------------------------------------------------------------------------
// Input payloads
// ---------------------------------------------------------------------------

/// Input for creating a project.
#[derive(Debug, Deserialize, Validate)]
pub struct NewProject {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[validate(length(min = 1, max = 500, message = "topic must be 1-500 characters"))]
    pub topic: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Partial metadata update for a project.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 500, message = "topic must be 1-500 characters"))]
    pub topic: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Input for appending an item to a project.
#[derive(Debug, Deserialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    /// Defaults to the project kind's natural item type when absent.
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
}

/// Partial manual edit of an item.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ItemPatch {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Accepted values for item feedback.
pub const FEEDBACK_VALUES: [&str; 2] = ["like", "dislike"];

/// Validate a feedback value against [`FEEDBACK_VALUES`].
pub fn validate_feedback(value: &str) -> Result<(), CoreError> {
    if FEEDBACK_VALUES.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "feedback must be one of: like, dislike".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
