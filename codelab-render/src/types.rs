use serde::{Deserialize, Serialize};

/// A single element of a codelab document tree.
///
/// The set of kinds is closed: every backend matches on all of them, and
/// kinds a backend cannot express are ignored explicitly in its dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A run of styled text.
    Text(TextNode),
    /// An inline image.
    Image(ImageNode),
    /// A hyperlink or named anchor.
    Url(UrlNode),
    /// A call-to-action button, usually wrapped in a `Url`.
    Button(ButtonNode),
    /// A code snippet or terminal transcript.
    Code(CodeNode),
    /// A sequence of inline nodes, optionally forming a paragraph.
    List(ListNode),
    /// A bulleted, numbered, checklist or FAQ list.
    ItemsList(ItemsListNode),
    /// A table.
    Grid(GridNode),
    /// A callout box.
    Infobox(InfoboxNode),
    /// A section heading.
    Header(HeaderNode),
    /// Content transcluded from an external document.
    Import(ImportNode),
    /// A poll embedded in the lab.
    Survey(SurveyNode),
    /// An embedded video.
    #[serde(rename = "youtube")]
    YouTube(YouTubeNode),
}

impl Node {
    /// Environment labels gating this node.
    pub fn env(&self) -> &Env {
        match self {
            Node::Text(n) => &n.env,
            Node::Image(n) => &n.env,
            Node::Url(n) => &n.env,
            Node::Button(n) => &n.env,
            Node::Code(n) => &n.env,
            Node::List(n) => &n.env,
            Node::ItemsList(n) => &n.env,
            Node::Grid(n) => &n.env,
            Node::Infobox(n) => &n.env,
            Node::Header(n) => &n.env,
            Node::Import(n) => &n.env,
            Node::Survey(n) => &n.env,
            Node::YouTube(n) => &n.env,
        }
    }

    /// Short name of the node kind, as used in serialized documents.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Image(_) => "image",
            Node::Url(_) => "url",
            Node::Button(_) => "button",
            Node::Code(_) => "code",
            Node::List(_) => "list",
            Node::ItemsList(_) => "items_list",
            Node::Grid(_) => "grid",
            Node::Infobox(_) => "infobox",
            Node::Header(_) => "header",
            Node::Import(_) => "import",
            Node::Survey(_) => "survey",
            Node::YouTube(_) => "youtube",
        }
    }

    /// Restrict this node to the given environments.
    pub fn with_env<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let env = Env::new(labels);
        match &mut self {
            Node::Text(n) => n.env = env,
            Node::Image(n) => n.env = env,
            Node::Url(n) => n.env = env,
            Node::Button(n) => n.env = env,
            Node::Code(n) => n.env = env,
            Node::List(n) => n.env = env,
            Node::ItemsList(n) => n.env = env,
            Node::Grid(n) => n.env = env,
            Node::Infobox(n) => n.env = env,
            Node::Header(n) => n.env = env,
            Node::Import(n) => n.env = env,
            Node::Survey(n) => n.env = env,
            Node::YouTube(n) => n.env = env,
        }
        self
    }

    /// Plain text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(TextNode::new(value))
    }

    /// Header node at `level` wrapping `content`.
    pub fn header(level: usize, content: Vec<Node>) -> Self {
        Node::Header(HeaderNode {
            level,
            content,
            ..Default::default()
        })
    }
}

impl From<TextNode> for Node {
    fn from(n: TextNode) -> Self {
        Node::Text(n)
    }
}

/// Sorted set of environment labels attached to a node.
///
/// An empty set matches every environment. Producers are expected to hand
/// over sorted labels; [`Env::new`] sorts and deduplicates for them.
/// Deserialization keeps the order as written so that
/// [`validate`](crate::validate::validate) can report unsorted input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(Vec<String>);

impl Env {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();
        Env(labels)
    }

    /// Whether a node carrying this set is emitted for `target`.
    ///
    /// Matches when the set is empty, when `target` is empty, or when
    /// `target` is one of the labels exactly.
    pub fn matches(&self, target: &str) -> bool {
        if self.0.is_empty() || target.is_empty() {
            return true;
        }
        self.0
            .binary_search_by(|label| label.as_str().cmp(target))
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

/// A run of text with style flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub value: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl TextNode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.code = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub src: String,
    /// Maximum display width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Anchor name (`<a name=...>`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub content: Vec<Node>,
}

impl UrlNode {
    /// The first button among the direct children visible in `env`, if any.
    pub fn button(&self, env: &str) -> Option<&ButtonNode> {
        self.content.iter().find_map(|n| match n {
            Node::Button(b) if b.env.matches(env) => Some(b),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub content: Vec<Node>,
    pub colored: bool,
    pub raised: bool,
    /// Show a download icon in front of the label.
    pub download: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Terminal/shell transcript rather than source code.
    pub term: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub nodes: Vec<Node>,
    pub block: bool,
}

impl ListNode {
    /// Whether the list stands as its own paragraph.
    pub fn is_block(&self) -> bool {
        self.block
    }
}

/// Flavor of an items list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Plain,
    Ordered,
    Checklist,
    Faq,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsListNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub items: Vec<Vec<Node>>,
    pub list_kind: ListKind,
    /// First ordinal; 0 means the list is not numbered.
    pub start: usize,
    /// Ordered-list type hint (`1`, `a`, `I`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
}

impl ItemsListNode {
    /// Whether items carry ordinals rather than bullets.
    pub fn is_numbered(&self) -> bool {
        matches!(self.list_kind, ListKind::Plain | ListKind::Ordered) && self.start > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub rows: Vec<Vec<GridCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridCell {
    pub colspan: usize,
    pub rowspan: usize,
    pub content: Vec<Node>,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            content: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoboxNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    /// Styling hook, e.g. `warning` or `positive`.
    #[serde(rename = "infobox_kind")]
    pub kind: String,
    pub content: Vec<Node>,
}

/// Semantic flavor of a header, only visible in HTML output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    #[default]
    Plain,
    Checklist,
    Faq,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub level: usize,
    pub header_kind: HeaderKind,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    /// Where the content was fetched from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub id: String,
    pub groups: Vec<SurveyGroup>,
}

/// One question of a survey with its answer options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyGroup {
    pub name: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeNode {
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub video_id: String,
}
