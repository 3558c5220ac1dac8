//! opencrag library
//!
//! Client-side support for a climbing-route information application:
//! - `scales` - Grade contexts, disciplines, and the context-to-scale mapping
//! - `grades` - Grade formatting and form validation rules
//! - `graphql` - Cache-first GraphQL query client
//! - `api` - Area query wrappers and models
//! - `traits` - Trait seams for the external scale resolver and query client

pub mod api;
pub mod grades;
pub mod graphql;
pub mod scales;
pub mod traits;

// Re-export commonly used types
pub use api::{get_area_by_uuid, get_crag_details_near, Area, CragsNearDetails};
pub use grades::{EditableClimb, Grade, GradeHelper, ValidationRule};
pub use graphql::GraphqlClient;
pub use scales::{scale_for, Discipline, DisciplineFlags, GradeContext, GradeScaleId, GradeValues, Score};
pub use traits::{QueryClient, ScaleResolver};
