//! Admin console: project CRUD with direct media uploads, category
//! management and delete confirmations.
//!
//! At most one modal is open at a time, tracked by [`ModalState`]. Saving a
//! project uploads pending files straight to the media host, one at a time,
//! then submits the full URL list to the API as JSON.

use std::sync::Arc;

use aidy_core::error::CoreError;
use aidy_core::media::MediaKind;
use aidy_core::project::validate_title;
use aidy_core::types::DbId;
use aidy_core::upload::UploadProgress;
use aidy_media::{remove_best_effort, upload_sequentially, MediaStore, MediaUpload};

use crate::api::{ApiClient, CategoryView, ProjectInput, ProjectView};
use crate::error::ClientError;
use crate::gallery::LoadState;

// ---------------------------------------------------------------------------
// Modal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Creating,
    Editing(DbId),
    ConfirmingDeleteProject(DbId),
    ConfirmingDeleteCategory(DbId),
}

impl ModalState {
    /// True while the project form is shown.
    pub fn is_form(&self) -> bool {
        matches!(self, Self::Creating | Self::Editing(_))
    }
}

// ---------------------------------------------------------------------------
// Media draft
// ---------------------------------------------------------------------------

/// One tile of the form's preview strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Already attached to the project.
    Retained { url: String, kind: MediaKind },
    /// Picked locally, not uploaded yet.
    Pending { file_name: String, kind: MediaKind },
}

/// The media being edited: URLs kept from the project followed by files
/// waiting to be uploaded. Previews list retained entries first.
#[derive(Debug, Clone, Default)]
pub struct MediaDraft {
    pub retained: Vec<String>,
    pub pending: Vec<MediaUpload>,
}

impl MediaDraft {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            retained: urls,
            pending: Vec::new(),
        }
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = MediaUpload>) {
        self.pending.extend(files);
    }

    pub fn len(&self) -> usize {
        self.retained.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn previews(&self) -> Vec<Preview> {
        let retained = self.retained.iter().map(|url| Preview::Retained {
            url: url.clone(),
            kind: MediaKind::of_url(url),
        });
        let pending = self.pending.iter().map(|f| Preview::Pending {
            file_name: f.file_name.clone(),
            kind: f.kind(),
        });
        retained.chain(pending).collect()
    }

    /// Remove the preview at `index` from whichever list owns it.
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.retained.len() {
            self.retained.remove(index);
            true
        } else if index - self.retained.len() < self.pending.len() {
            self.pending.remove(index - self.retained.len());
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl ProjectForm {
    fn from_project(project: &ProjectView) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone().unwrap_or_default(),
            category: project.category.clone().unwrap_or_default(),
        }
    }

    fn to_input(&self, media_urls: Vec<String>) -> ProjectInput {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.trim().is_empty());
        ProjectInput {
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            category: non_empty(&self.category),
            media_urls,
        }
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

pub struct AdminConsole {
    api: ApiClient,
    store: Option<Arc<dyn MediaStore>>,
    pub state: LoadState,
    pub projects: Vec<ProjectView>,
    pub categories: Vec<CategoryView>,
    pub modal: ModalState,
    pub form: ProjectForm,
    pub draft: MediaDraft,
    /// Progress of the running upload batch, if any.
    pub progress: Option<UploadProgress>,
    /// Message shown on the project form.
    pub form_error: Option<String>,
    /// Message shown in the category manager.
    pub category_error: Option<String>,
    pub saving: bool,
}

impl AdminConsole {
    /// `store` receives direct uploads; without one, saving a form with
    /// pending files fails with [`ClientError::UploadUnavailable`].
    pub fn new(api: ApiClient, store: Option<Arc<dyn MediaStore>>) -> Self {
        Self {
            api,
            store,
            state: LoadState::Loading,
            projects: Vec::new(),
            categories: Vec::new(),
            modal: ModalState::Closed,
            form: ProjectForm::default(),
            draft: MediaDraft::default(),
            progress: None,
            form_error: None,
            category_error: None,
            saving: false,
        }
    }

    // --- Loading ---

    /// Fetch categories and projects concurrently.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        let (categories, projects) =
            tokio::join!(self.api.list_categories(), self.api.list_projects());
        self.categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load categories");
            Vec::new()
        });
        self.apply_projects(projects);
    }

    pub async fn refresh_projects(&mut self) {
        let projects = self.api.list_projects().await;
        self.apply_projects(projects);
    }

    fn apply_projects(&mut self, projects: Result<Vec<ProjectView>, ClientError>) {
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

    async fn refresh_categories(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::warn!(error = %e, "Failed to reload categories"),
        }
    }

    // --- Project form ---

    /// Open an empty form; the category defaults to the first listed one.
    pub fn open_create(&mut self) {
        self.reset_form();
        self.form.category = self
            .categories
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.modal = ModalState::Creating;
    }

    /// Open the form pre-filled from a listed project.
    pub fn open_edit(&mut self, id: DbId) -> bool {
        let Some(project) = self.projects.iter().find(|p| p.id == id) else {
            return false;
        };
        let form = ProjectForm::from_project(project);
        let urls = project.media_urls();

        self.reset_form();
        self.form = form;
        self.draft = MediaDraft::from_urls(urls);
        self.modal = ModalState::Editing(id);
        true
    }

    /// Close whatever modal is open, discarding unsaved edits.
    pub fn close(&mut self) {
        self.modal = ModalState::Closed;
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.form = ProjectForm::default();
        self.draft = MediaDraft::default();
        self.progress = None;
        self.form_error = None;
    }

    /// Upload pending files, then create or update the project.
    ///
    /// On any failure the modal stays open with [`form_error`](Self::form_error)
    /// set. Files uploaded by an aborted save are handed to a best-effort
    /// removal.
    pub async fn save(&mut self) -> Result<ProjectView, ClientError> {
        let result = self.try_save().await;
        self.saving = false;
        match &result {
            Ok(project) => {
                tracing::info!(project_id = project.id, "Project saved");
                self.refresh_projects().await;
                self.close();
            }
            Err(e) => self.form_error = Some(e.user_message()),
        }
        result
    }

    async fn try_save(&mut self) -> Result<ProjectView, ClientError> {
        let target = match self.modal {
            ModalState::Creating => None,
            ModalState::Editing(id) => Some(id),
            _ => return Err(ClientError::Invalid("No project form is open".into())),
        };
        validate_title(Some(&self.form.title)).map_err(|e| match e {
            CoreError::Validation(msg) => ClientError::Invalid(msg),
            other => ClientError::Invalid(other.to_string()),
        })?;

        self.saving = true;
        self.form_error = None;

        let uploaded = self.upload_pending().await?;
        let mut media_urls = self.draft.retained.clone();
        media_urls.extend(uploaded.iter().cloned());
        let input = self.form.to_input(media_urls);

        let saved = match target {
            None => self.api.create_project(&input).await,
            Some(id) => self.api.update_project(id, &input).await,
        };
        if saved.is_err() {
            self.discard_uploads(&uploaded).await;
        }
        saved
    }

    /// Upload every pending file in order, updating [`progress`](Self::progress).
    async fn upload_pending(&mut self) -> Result<Vec<String>, ClientError> {
        if self.draft.pending.is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store.clone().ok_or(ClientError::UploadUnavailable)?;

        let files = self.draft.pending.clone();
        self.progress = Some(UploadProgress::new(files.len()));
        let progress = &mut self.progress;

        let result = upload_sequentially(store.as_ref(), files, |p| {
            tracing::debug!(percent = p.percent(), "Upload progress");
            *progress = Some(p);
        })
        .await;

        match result {
            Ok(stored) => Ok(stored.into_iter().map(|m| m.url).collect()),
            Err(err) => {
                let partial: Vec<String> = err.uploaded.iter().map(|m| m.url.clone()).collect();
                self.discard_uploads(&partial).await;
                Err(err.into())
            }
        }
    }

    async fn discard_uploads(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        match &self.store {
            Some(store) => {
                let removed = remove_best_effort(store.as_ref(), urls).await;
                tracing::warn!(orphaned = urls.len() - removed, "Aborted save left uploaded media");
            }
            None => tracing::warn!(orphaned = urls.len(), "Aborted save left uploaded media"),
        }
    }

    // --- Deletes ---

    pub fn request_delete_project(&mut self, id: DbId) {
        self.modal = ModalState::ConfirmingDeleteProject(id);
    }

    pub fn request_delete_category(&mut self, id: DbId) {
        self.category_error = None;
        self.modal = ModalState::ConfirmingDeleteCategory(id);
    }

    /// Carry out the delete awaiting confirmation, if any.
    ///
    /// Returns the server's confirmation message. The modal closes either way;
    /// failures are reported through the return value and the relevant error
    /// field.
    pub async fn confirm(&mut self) -> Result<String, ClientError> {
        let modal = std::mem::take(&mut self.modal);
        match modal {
            ModalState::ConfirmingDeleteProject(id) => {
                let result = self.api.delete_project(id).await;
                match &result {
                    Ok(_) => {
                        tracing::info!(project_id = id, "Project deleted");
                        self.refresh_projects().await;
                    }
                    Err(e) => self.form_error = Some(e.user_message()),
                }
                result
            }
            ModalState::ConfirmingDeleteCategory(id) => {
                let result = self.api.delete_category(id).await;
                match &result {
                    Ok(_) => {
                        tracing::info!(category_id = id, "Category deleted");
                        self.refresh_categories().await;
                    }
                    Err(e) => self.category_error = Some(e.user_message()),
                }
                result
            }
            other => {
                self.modal = other;
                Err(ClientError::Invalid("Nothing to confirm".into()))
            }
        }
    }

    // --- Categories ---

    /// Create a category from the category manager.
    pub async fn add_category(&mut self, name: &str) -> Result<CategoryView, ClientError> {
        self.category_error = None;
        match self.api.create_category(name).await {
            Ok(created) => {
                self.refresh_categories().await;
                Ok(created)
            }
            Err(e) => {
                self.category_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Create a category from the project form and select it there.
    pub async fn quick_add_category(&mut self, name: &str) -> Result<CategoryView, ClientError> {
        match self.api.create_category(name).await {
            Ok(created) => {
                self.refresh_categories().await;
                self.form.category = created.name.clone();
                Ok(created)
            }
            Err(e) => {
                self.form_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Rename a category; listed projects are reloaded to pick up the new name.
    pub async fn rename_category(&mut self, id: DbId, name: &str) -> Result<CategoryView, ClientError> {
        self.category_error = None;
        match self.api.rename_category(id, name).await {
            Ok(renamed) => {
                self.refresh_categories().await;
                self.refresh_projects().await;
                Ok(renamed)
            }
            Err(e) => {
                self.category_error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
