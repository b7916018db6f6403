//! Public gallery view model: load state, category filter, grid cards and
//! the lightbox carousel.

use aidy_core::media::{card_thumbnail, resolve_url, MediaItem, MediaKind};
use aidy_core::types::DbId;

use crate::api::{ApiClient, CategoryView, ProjectView};
use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Load state
// ---------------------------------------------------------------------------

/// Outcome of the most recent project fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Empty,
    Populated,
    /// The project fetch failed; distinct from a successful empty list.
    Failed(String),
}

impl LoadState {
    pub fn for_projects(projects: &[ProjectView]) -> Self {
        if projects.is_empty() {
            Self::Empty
        } else {
            Self::Populated
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, project: &ProjectView) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => project.category.as_deref() == Some(name.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lightbox
// ---------------------------------------------------------------------------

/// Carousel over one project's media. Navigation wraps in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightbox {
    pub project_id: DbId,
    pub title: String,
    items: Vec<MediaItem>,
    index: usize,
}

impl Lightbox {
    /// Returns `None` for a project without any media.
    pub fn open(project: &ProjectView, origin: &str) -> Option<Self> {
        let items: Vec<MediaItem> = project
            .media_urls()
            .iter()
            .map(|url| MediaItem::new(resolve_url(url, origin)))
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            project_id: project.id,
            title: project.title.clone(),
            items,
            index: 0,
        })
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &MediaItem {
        &self.items[self.index]
    }

    /// Whether the current item renders with native playback controls.
    pub fn shows_controls(&self) -> bool {
        self.current().kind.has_playback_controls()
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.items.len() - 1) % self.items.len();
    }

    /// Jump to a thumbnail. Out-of-range indices are ignored.
    pub fn jump(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.index = index;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// What a grid card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: DbId,
    pub title: String,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub media_count: usize,
    pub is_video: bool,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    origin: String,
    pub state: LoadState,
    pub projects: Vec<ProjectView>,
    pub categories: Vec<CategoryView>,
    pub filter: CategoryFilter,
    pub lightbox: Option<Lightbox>,
}

impl Gallery {
    /// `origin` resolves relative (local-disk) media URLs.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            state: LoadState::Loading,
            projects: Vec::new(),
            categories: Vec::new(),
            filter: CategoryFilter::All,
            lightbox: None,
        }
    }

    /// Fetch categories and projects concurrently.
    pub async fn load(&mut self, api: &ApiClient) {
        self.state = LoadState::Loading;
        let (categories, projects) = tokio::join!(api.list_categories(), api.list_projects());
        self.apply(categories, projects);
    }

    /// Apply fetch results. A failed category fetch only empties the filter
    /// list; a failed project fetch is a distinct state.
    pub fn apply(
        &mut self,
        categories: Result<Vec<CategoryView>, ClientError>,
        projects: Result<Vec<ProjectView>, ClientError>,
    ) {
        self.categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load categories");
            Vec::new()
        });

        match projects {
            Ok(projects) => {
                self.state = LoadState::for_projects(&projects);
                self.projects = projects;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load projects");
                self.projects.clear();
                self.state = LoadState::Failed(e.user_message());
            }
        }
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Projects passing the current filter, in fetch order.
    pub fn visible(&self) -> impl Iterator<Item = &ProjectView> + '_ {
        self.projects.iter().filter(|p| self.filter.matches(p))
    }

    pub fn cards(&self) -> Vec<Card> {
        self.visible().map(|p| self.card(p)).collect()
    }

    fn card(&self, project: &ProjectView) -> Card {
        let media = project.media_urls();
        let cover = project.image_url.clone().or_else(|| media.first().cloned());
        let is_video = cover
            .as_deref()
            .is_some_and(|url| MediaKind::of_url(url) == MediaKind::Video);
        Card {
            id: project.id,
            title: project.title.clone(),
            category: project.category.clone(),
            thumbnail: cover.map(|url| resolve_url(&card_thumbnail(&url), &self.origin)),
            media_count: media.len(),
            is_video,
        }
    }

    /// Open the lightbox for a project. Returns false if it has no media.
    pub fn open(&mut self, project_id: DbId) -> bool {
        self.lightbox = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .and_then(|p| Lightbox::open(p, &self.origin));
        self.lightbox.is_some()
    }

    pub fn close(&mut self) {
        self.lightbox = None;
    }
}
