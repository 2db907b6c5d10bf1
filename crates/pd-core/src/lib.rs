//! pd-core: shared vocabulary for the pollination dashboard tools.
//!
//! Contains:
//! - ids (project, job and recipe references)
//! - status (remote job status vocabulary + local simulation status)
//! - urls (dashboard link construction)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod status;
pub mod urls;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use status::{RemoteStatus, SimStatus};
pub use urls::{DEFAULT_APP_URL, dashboard_url, dashboard_url_with_base};
