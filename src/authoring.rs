// SPDX-License-Identifier: MPL-2.0

//! The post editor: gate, draft autosave and publishing.

use crate::api::{Backend, BlogPost, PostPayload, RemoteError};
use crate::cache::{ViewEpoch, ViewTicket};
use crate::config::HOME_PATH;
use crate::gate::{Admission, can_enter_authoring_view};
use crate::state::validation::{MIN_CONTENT_LEN, join_tags, parse_tags};
use crate::state::{CredentialStore, DraftRecord, DraftStore, EditorForm, ValidationErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("session ended, continue at {0}")]
    NotAdmitted(String),
    #[error("Failed to publish blog post: {0}")]
    Remote(#[from] RemoteError),
}

/// A single form change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Title(String),
    Content(String),
    Tags(String),
    Published(bool),
}

/// Result of navigating into the editor.
pub enum Opened<'a, B> {
    Editor(Authoring<'a, B>),
    RedirectTo(String),
    /// A newer view was opened while this one was loading.
    Superseded,
}

/// Outcome of a successful publish.
#[derive(Debug, Clone)]
pub struct Published {
    /// Present when the backend echoed the stored post
    pub post: Option<BlogPost>,
    pub updated: bool,
}

impl Published {
    pub fn message(&self) -> &'static str {
        if self.updated {
            "Blog post updated and published successfully!"
        } else {
            "Blog post created and published successfully!"
        }
    }

    /// Where the editor goes once the message has been shown.
    pub fn next_path(&self) -> &'static str {
        HOME_PATH
    }
}

/// One open editor view.
pub struct Authoring<'a, B> {
    credentials: &'a CredentialStore<B>,
    drafts: DraftStore,
    ticket: ViewTicket,
    requested_writer_id: Option<String>,
    edit_post_id: Option<String>,
    writer_key: String,
    form: EditorForm,
}

impl<'a, B: Backend> Authoring<'a, B> {
    /// Enter the editor for `requested_writer_id`, optionally editing an
    /// existing post.
    ///
    /// The form comes from the edited post when there is one, otherwise from
    /// the writer's saved draft.
    pub async fn open(
        credentials: &'a CredentialStore<B>,
        drafts: DraftStore,
        epoch: &ViewEpoch,
        requested_writer_id: Option<&str>,
        edit_post_id: Option<&str>,
    ) -> Result<Opened<'a, B>, RemoteError> {
        let session = credentials.current_session();
        if let Admission::RedirectTo(path) =
            can_enter_authoring_view(&session, requested_writer_id)
        {
            tracing::debug!(%path, "editor not admitted");
            return Ok(Opened::RedirectTo(path));
        }

        let ticket = epoch.enter();
        let writer_key = session
            .writer_id()
            .or(requested_writer_id)
            .unwrap_or_default()
            .to_string();
        let edit_post_id = edit_post_id.filter(|id| !id.is_empty()).map(str::to_string);

        let mut form = EditorForm::default();
        if let Some(id) = &edit_post_id {
            let post = credentials.cache().get_post(id).await?;
            let Some(post) = ticket.admit(post) else {
                return Ok(Opened::Superseded);
            };
            form = EditorForm {
                title: post.title,
                content: post.content,
                tags: join_tags(&post.tags),
                is_published: post.is_published,
            };
        } else if let Some(draft) = drafts.load(&writer_key) {
            form.prefill_from(&draft);
        }

        Ok(Opened::Editor(Self {
            credentials,
            drafts,
            ticket,
            requested_writer_id: requested_writer_id.map(str::to_string),
            edit_post_id,
            writer_key,
            form,
        }))
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn is_editing(&self) -> bool {
        self.edit_post_id.is_some()
    }

    pub fn writer_key(&self) -> &str {
        &self.writer_key
    }

    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }

    /// Apply a change and autosave the draft.
    pub fn edit(&mut self, edit: Edit) -> Option<DraftRecord> {
        match edit {
            Edit::Title(title) => self.form.title = title,
            Edit::Content(content) => self.form.content = content,
            Edit::Tags(tags) => self.form.tags = tags,
            Edit::Published(published) => self.form.is_published = published,
        }
        self.drafts.autosave(&self.writer_key, &self.form)
    }

    pub fn save_draft(&self) -> Option<DraftRecord> {
        self.drafts.autosave(&self.writer_key, &self.form)
    }

    /// Empty the form and drop the draft if `confirm` agrees.
    pub fn clear_draft(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        let cleared = self.drafts.clear_confirmed(&self.writer_key, confirm);
        if cleared {
            self.form = EditorForm::default();
        }
        cleared
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_form(&self.form)
    }

    /// Validate, then create or update the post as published and drop the
    /// draft.
    pub async fn publish(&mut self) -> Result<Published, PublishError> {
        self.validate().map_err(PublishError::Validation)?;

        let session = self.credentials.current_session();
        if let Admission::RedirectTo(path) =
            can_enter_authoring_view(&session, self.requested_writer_id.as_deref())
        {
            return Err(PublishError::NotAdmitted(path));
        }
        let writer = session
            .writer_id()
            .or(self.requested_writer_id.as_deref())
            .unwrap_or_default()
            .to_string();

        let payload = PostPayload {
            title: self.form.title.trim().to_string(),
            content: self.form.content.trim().to_string(),
            excerpt: None,
            tags: parse_tags(&self.form.tags),
            is_published: true,
            writer,
        };

        let cache = self.credentials.cache();
        let published = match &self.edit_post_id {
            Some(id) => Published {
                post: cache.update_post(id, &payload).await?,
                updated: true,
            },
            None => Published {
                post: cache.create_post(&payload).await?,
                updated: false,
            },
        };

        self.drafts.clear(&self.writer_key);
        tracing::info!(
            writer_key = %self.writer_key,
            updated = published.updated,
            "post published"
        );
        Ok(published)
    }
}

fn validate_form(form: &EditorForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if form.title.trim().is_empty() {
        errors.add("title", "Title is required");
    }

    let content = form.content.trim();
    if content.is_empty() {
        errors.add("content", "Content is required");
    } else if content.chars().count() < MIN_CONTENT_LEN {
        errors.add(
            "content",
            format!("Content must be at least {MIN_CONTENT_LEN} characters long"),
        );
    }

    errors.into_result()
}
