//! Level definitions for the REST Quest tutorial variants.
//!
//! Levels are plain data: each one names the HTTP method it gates, the
//! request forms it offers and whether the live book table is visible.
//! The navigator and the view interpret them generically.

use serde::{Deserialize, Serialize};

// ============================================================================
// Method
// ============================================================================

/// An API interaction the learner can complete.
///
/// Wire names match the companion server's progress tracking
/// (`"GET"`, `"GET_ID"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Method {
    /// `GET /books`
    #[serde(rename = "GET")]
    Get,
    /// `GET /books/{id}`
    #[serde(rename = "GET_ID")]
    GetById,
    /// `POST /books`
    #[serde(rename = "POST")]
    Post,
    /// `PUT /books/{id}`
    #[serde(rename = "PUT")]
    Put,
    /// `PATCH /books/{id}`
    #[serde(rename = "PATCH")]
    Patch,
    /// `DELETE /books/{id}`
    #[serde(rename = "DELETE")]
    Delete,
}

impl Method {
    /// The methods that count toward the progress ratio.
    pub const REQUIRED: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    /// Returns the wire name used by the companion server.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::GetById => "GET_ID",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Parses a wire name. Returns `None` for names this client doesn't know.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "GET" => Some(Self::Get),
            "GET_ID" => Some(Self::GetById),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// Mode
// ============================================================================

/// Difficulty mode chosen before the tutorial starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Lenient rules: fetching a single book also counts as GET.
    Beginner,
    /// Every method has to be exercised through its own endpoint.
    Advanced,
}

impl Mode {
    /// Parses a string into a `Mode`, case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Returns the wire name sent to `POST /mode`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid mode '{s}': expected one of 'beginner', 'advanced'"
            ))
        })
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Variant
// ============================================================================

/// One canonical tutorial rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Three levels: welcome, GET, then a free-play playground.
    Basics,
    /// Six levels, one per method, ending on DELETE.
    Classic,
    /// Eight levels with difficulty modes, server progress and a
    /// documentation finale (default).
    #[default]
    Quest,
}

impl Variant {
    /// Parses a string into a `Variant`, case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basics" => Some(Self::Basics),
            "classic" => Some(Self::Classic),
            "quest" => Some(Self::Quest),
            _ => None,
        }
    }

    /// Returns the configuration name of this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Classic => "classic",
            Self::Quest => "quest",
        }
    }

    /// Returns `true` if a difficulty mode must be chosen before starting.
    #[must_use]
    pub const fn supports_modes(self) -> bool {
        matches!(self, Self::Quest)
    }

    /// Returns `true` if the companion server's progress endpoints are used.
    #[must_use]
    pub const fn tracks_server_progress(self) -> bool {
        matches!(self, Self::Quest)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid variant '{s}': expected one of 'basics', 'classic', 'quest'"
            ))
        })
    }
}

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Forms
// ============================================================================

/// An input field on a request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Key used by learner commands (`title=...`).
    pub name: &'static str,
    /// Human-readable placeholder.
    pub label: &'static str,
    /// Whether the field must be filled before submitting.
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required,
    }
}

const ID_FIELD: FieldSpec = field("id", "Book ID", true);

static ID_FIELDS: [FieldSpec; 1] = [ID_FIELD];

static CREATE_FIELDS: [FieldSpec; 3] = [
    field("title", "Book title", true),
    field("author", "Author", true),
    field("year", "Year", true),
];

static UPDATE_FIELDS: [FieldSpec; 4] = [
    ID_FIELD,
    field("title", "New title", true),
    field("author", "New author (optional)", false),
    field("year", "New year (optional)", false),
];

static PATCH_FIELDS: [FieldSpec; 4] = [
    ID_FIELD,
    field("title", "New title (optional)", false),
    field("author", "New author (optional)", false),
    field("year", "New year (optional)", false),
];

/// A request form a level can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Fetch the whole collection.
    GetAll,
    /// Fetch a single book by id.
    GetById,
    /// Create a book.
    Create,
    /// Replace a book.
    Update,
    /// Partially update a book.
    Patch,
    /// Remove a book.
    Delete,
}

impl FormKind {
    /// Every form that takes input, in display order.
    pub const WITH_DRAFTS: [Self; 5] = [
        Self::GetById,
        Self::Create,
        Self::Update,
        Self::Patch,
        Self::Delete,
    ];

    /// Returns the fields the form collects.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::GetAll => &[],
            Self::GetById | Self::Delete => &ID_FIELDS,
            Self::Create => &CREATE_FIELDS,
            Self::Update => &UPDATE_FIELDS,
            Self::Patch => &PATCH_FIELDS,
        }
    }

    /// Returns the endpoint label shown on the submit button.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::GetAll => "GET /api/books",
            Self::GetById => "GET /api/books/{id}",
            Self::Create => "POST /api/books",
            Self::Update => "PUT /api/books/{id}",
            Self::Patch => "PATCH /api/books/{id}",
            Self::Delete => "DELETE /api/books/{id}",
        }
    }

    /// Returns the learner command that submits this form.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::GetAll => "get",
            Self::GetById => "get <id>",
            Self::Create => "post title=.. author=.. year=..",
            Self::Update => "put id=.. title=.. [author=..] [year=..]",
            Self::Patch => "patch id=.. [title=..] [author=..] [year=..]",
            Self::Delete => "delete <id>",
        }
    }
}

// ============================================================================
// LevelDef
// ============================================================================

/// What kind of screen a level is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    /// Non-interactive intro; left via `start`.
    Welcome,
    /// Interactive lesson with request forms.
    Lesson,
    /// Reference finale with no required method.
    Documentation,
}

/// Static definition of one tutorial level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelDef {
    /// Stable identifier.
    pub id: &'static str,
    /// Title shown in the level panel.
    pub title: &'static str,
    /// Lesson text.
    pub lesson: &'static str,
    /// Screen kind.
    pub kind: LevelKind,
    /// Method that unlocks the next level, if any.
    pub required: Option<Method>,
    /// Request forms offered on this level.
    pub forms: &'static [FormKind],
    /// Whether the live book table is visible.
    pub shows_table: bool,
}

const WELCOME: LevelDef = LevelDef {
    id: "welcome",
    title: "Welcome to REST Quest",
    lesson: "Learn how computers talk over HTTP by managing a small library of books. \
             Each level unlocks once you have sent its request successfully.",
    kind: LevelKind::Welcome,
    required: None,
    forms: &[],
    shows_table: false,
};

const GET_LEVEL: LevelDef = LevelDef {
    id: "get",
    title: "GET: Reading Resources",
    lesson: "REST treats books as resources and the API as the library catalog. \
             A GET request reads resources without changing them.",
    kind: LevelKind::Lesson,
    required: Some(Method::Get),
    forms: &[FormKind::GetAll],
    shows_table: true,
};

const GET_ID_LEVEL: LevelDef = LevelDef {
    id: "get-id",
    title: "GET by ID: Reading One Resource",
    lesson: "Every resource has its own address. Put the book's id in the path \
             to fetch just that one.",
    kind: LevelKind::Lesson,
    required: Some(Method::GetById),
    forms: &[FormKind::GetById],
    shows_table: true,
};

const POST_LEVEL: LevelDef = LevelDef {
    id: "post",
    title: "POST: Creating Resources",
    lesson: "POST sends a new resource to a collection. The server assigns the id \
             and answers with the created book.",
    kind: LevelKind::Lesson,
    required: Some(Method::Post),
    forms: &[FormKind::Create],
    shows_table: true,
};

const PUT_LEVEL: LevelDef = LevelDef {
    id: "put",
    title: "PUT: Replacing Resources",
    lesson: "PUT replaces the whole resource. Fields you leave out are not kept.",
    kind: LevelKind::Lesson,
    required: Some(Method::Put),
    forms: &[FormKind::Update],
    shows_table: true,
};

const PATCH_LEVEL: LevelDef = LevelDef {
    id: "patch",
    title: "PATCH: Updating Parts of Resources",
    lesson: "PATCH only sends the fields that change; everything else stays as it was.",
    kind: LevelKind::Lesson,
    required: Some(Method::Patch),
    forms: &[FormKind::Patch],
    shows_table: true,
};

const DELETE_LEVEL: LevelDef = LevelDef {
    id: "delete",
    title: "DELETE: Removing Resources",
    lesson: "DELETE removes a resource. A successful delete usually has no body at all.",
    kind: LevelKind::Lesson,
    required: Some(Method::Delete),
    forms: &[FormKind::Delete],
    shows_table: true,
};

/// The full set of forms, offered on the free-play and documentation screens.
const ALL_FORMS: &[FormKind] = &[
    FormKind::GetAll,
    FormKind::GetById,
    FormKind::Create,
    FormKind::Update,
    FormKind::Patch,
    FormKind::Delete,
];

static BASICS_LEVELS: [LevelDef; 3] = [
    WELCOME,
    LevelDef {
        id: "rest-basics",
        title: "REST Fundamentals",
        lesson: "Imagine a library: books are resources, the catalog is the API. \
                 Make your first GET request to see every book.",
        ..GET_LEVEL
    },
    LevelDef {
        id: "http-methods",
        title: "HTTP Methods",
        lesson: "REST APIs use HTTP methods for the CRUD operations. Try them all!",
        kind: LevelKind::Lesson,
        required: None,
        forms: ALL_FORMS,
        shows_table: true,
    },
];

static CLASSIC_LEVELS: [LevelDef; 6] = [
    WELCOME,
    GET_LEVEL,
    POST_LEVEL,
    PUT_LEVEL,
    PATCH_LEVEL,
    DELETE_LEVEL,
];

static QUEST_LEVELS: [LevelDef; 8] = [
    WELCOME,
    GET_LEVEL,
    GET_ID_LEVEL,
    POST_LEVEL,
    PUT_LEVEL,
    PATCH_LEVEL,
    DELETE_LEVEL,
    LevelDef {
        id: "documentation",
        title: "API Documentation",
        lesson: "You have used every method. The full API is summarised below; \
                 every form stays available for experiments.",
        kind: LevelKind::Documentation,
        required: None,
        forms: ALL_FORMS,
        shows_table: true,
    },
];

// ============================================================================
// Tutorial
// ============================================================================

/// The ordered level list of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutorial {
    variant: Variant,
    levels: &'static [LevelDef],
}

impl Tutorial {
    /// Builds the tutorial for the given variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use restquest_core::{Tutorial, Variant};
    ///
    /// let tutorial = Tutorial::for_variant(Variant::Classic);
    /// assert_eq!(tutorial.len(), 6);
    /// assert_eq!(tutorial.first_interactive(), 1);
    /// ```
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        let levels: &'static [LevelDef] = match variant {
            Variant::Basics => &BASICS_LEVELS,
            Variant::Classic => &CLASSIC_LEVELS,
            Variant::Quest => &QUEST_LEVELS,
        };
        Self { variant, levels }
    }

    /// Returns the variant this tutorial was built for.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns all levels in order.
    #[must_use]
    pub const fn levels(&self) -> &'static [LevelDef] {
        self.levels
    }

    /// Returns the number of levels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if the tutorial has no levels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level at `index`.
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&'static LevelDef> {
        self.levels.get(index)
    }

    /// Index of the last level.
    #[must_use]
    pub const fn terminal_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Lowest index the learner can retreat to.
    ///
    /// Level 0 is skipped when it is a welcome screen.
    #[must_use]
    pub fn first_interactive(&self) -> usize {
        match self.levels.first() {
            Some(level) if level.kind == LevelKind::Welcome => 1,
            _ => 0,
        }
    }

    /// Returns `true` if `index` is the terminal documentation level.
    #[must_use]
    pub fn is_terminal_documentation(&self, index: usize) -> bool {
        index == self.terminal_index()
            && self
                .level(index)
                .is_some_and(|level| level.kind == LevelKind::Documentation)
    }
}
