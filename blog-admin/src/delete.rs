use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use blog_api::PostRef;
use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::guard::ADMIN_POSTS_ROUTE;

/// Prompt shown before deleting `post`.
pub fn confirm_message(post: &PostRef) -> String {
    format!("Delete \"{}\"? This cannot be undone.", post.post_title)
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send;
}

pub trait PostDeleter {
    fn delete_post(&self, id: Uuid) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Transient user-facing notifications.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub trait Navigator {
    fn navigate(&self, route: &str);
}

impl PostDeleter for ApiClient {
    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        ApiClient::delete_post(self, id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    /// The user declined; nothing was sent.
    Declined,
    /// Another deletion from this action is still in flight.
    AlreadyInProgress,
}

/// Confirm-then-delete flow for a single post view.
pub struct DeletePostAction<A, C, N, V> {
    api: A,
    confirm: C,
    notifier: N,
    navigator: V,
    in_progress: AtomicBool,
}

/// Clears the in-progress flag however the call ends.
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A, C, N, V> DeletePostAction<A, C, N, V>
where
    A: PostDeleter,
    C: Confirm,
    N: Notifier,
    V: Navigator,
{
    pub fn new(api: A, confirm: C, notifier: N, navigator: V) -> Self {
        Self {
            api,
            confirm,
            notifier,
            navigator,
            in_progress: AtomicBool::new(false),
        }
    }

    /// True while a deletion call is in flight; the trigger should be disabled.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub async fn run(&self, post: &PostRef) -> DeleteOutcome {
        let post_id = post.post_id;
        if self.is_in_progress() {
            return DeleteOutcome::AlreadyInProgress;
        }

        if !self.confirm.confirm(&confirm_message(post)).await {
            tracing::debug!(%post_id, "Deletion declined");
            return DeleteOutcome::Declined;
        }

        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return DeleteOutcome::AlreadyInProgress;
        }
        let _flag = InProgress(&self.in_progress);

        match self.api.delete_post(post_id).await {
            Ok(()) => {
                self.notifier.success("Post deleted");
                self.navigator.navigate(ADMIN_POSTS_ROUTE);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(%post_id, "Post deletion failed: {e}");
                self.notifier.error(&format!("Failed to delete post: {e}"));
                DeleteOutcome::Failed
            }
        }
    }
}
