//! HTTP surface of the signing service.

mod handlers;
mod middleware;
mod router;

pub use handlers::{SaveResponse, SAVE_SUCCESS_MESSAGE};
pub use router::{build_router, run_server};
