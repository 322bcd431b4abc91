//! Club REST API access
//!
//! - [`http`]: transport bound to one base URL
//! - [`client`]: `ResourceClient<T>` and the `ResourceApi<T>` seam
//! - [`club`]: the four collection clients
//! - [`error`]: `ApiError` and user-facing formatting

pub mod client;
pub mod club;
pub mod error;
pub mod http;

pub use client::{
    FilterValue, Filters, ListResponse, PageSlice, RemoveResult, ResourceApi, ResourceClient,
};
pub use club::{ClubApi, CoachesClient, EventsClient, StudentsClient, TeamsClient};
pub use error::{format_api_error, ApiError, ApiResult};
pub use http::ApiHttpClient;
