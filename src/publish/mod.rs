//! Publication engine
//!
//! Takes a version and a set of edited files and turns them into a pushed
//! update branch with exactly one open request:
//! 1. Prepare - provision the workspace, clone, check out the update branch
//! 2. Record - stage and commit the caller's edits
//! 3. Publish - push and open the request unless it already exists

mod progress;
mod push;
mod request;
mod workflow;

pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use push::push_branch;
pub use request::{REQUEST_TITLE_PREFIX, ensure_request, find_request_by_title, request_title};
pub use workflow::{PreparedWorkspace, Publication, PublicationOutcome};
