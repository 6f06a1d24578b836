//! Exploration engine: backend access, session state and its projections.

pub mod client;
pub mod debounce;
pub mod error;
pub mod model;
pub mod scene;
pub mod session;
pub mod source;
pub mod state;

pub use client::{Backend, Endpoints, HttpBackend};
pub use error::{ApiError, SubgraphError};
pub use model::{Edge, Node, SourceDocument, Subgraph};
pub use scene::{Role, Scene, SceneEdge, SceneNode};
pub use session::{Explorer, StateCell, run_search, run_select};
pub use state::{ExplorationState, NeighborhoodOutcome, Phase, SearchTicket, SelectTicket};
