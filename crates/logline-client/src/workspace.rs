//! Loading the sidebar: folders and conversations together.

use mc_domain::error::Result;

use crate::conversations::ConversationFilter;
use crate::gateway::SpanGateway;
use crate::views::WorkspaceSnapshot;

impl SpanGateway {
    /// Query folders and conversations concurrently.
    ///
    /// Both must succeed; on the first failure the other result is
    /// discarded and the error returned.
    pub async fn load_workspace(&self) -> Result<WorkspaceSnapshot> {
        let filter = ConversationFilter::default();
        let (folders, conversations) =
            tokio::try_join!(self.list_folders(), self.list_conversations(&filter))?;

        tracing::debug!(
            folders = folders.len(),
            conversations = conversations.len(),
            "workspace loaded"
        );

        Ok(WorkspaceSnapshot {
            folders,
            conversations,
        })
    }
}
