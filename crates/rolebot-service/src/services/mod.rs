//! Business logic services
//!
//! The binding manager owns all binding state; the reconciler and the
//! command surface only talk to it through its public operations.

pub mod binding;
pub mod context;
pub mod error;
pub mod index;
pub mod member_count;
pub mod reconciler;

pub use binding::BindingManager;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use index::BindingIndex;
pub use member_count::{member_count_name, MemberCountChannels, MemberCountService};
pub use reconciler::{ReactionReconciler, ReconcileOutcome};
