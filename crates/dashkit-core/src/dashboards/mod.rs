//! Dashboard contexts.
//!
//! Each dashboard owns a [`StoreContext`] and one [`RecordStore`] per entity
//! type, plus its tab/search state and one form editor per entity. Every
//! mutation goes through the record stores, so storage is always current.
//!
//! Cross-store updates (cascades) are written one store at a time. A failure
//! part way leaves the earlier writes in place; callers that need a consistent
//! view after an error should call `reload`.

pub mod clinic;
pub mod factory;
pub mod physio;
pub mod realestate;
pub mod social;
pub mod toys;

pub use clinic::ClinicDashboard;
pub use factory::FactoryDashboard;
pub use physio::PhysioDashboard;
pub use realestate::RealEstateDashboard;
pub use social::SocialDashboard;
pub use toys::ToyStoreDashboard;

use thiserror::Error;

use crate::form::FormError;
use crate::store::{KeyValueStore, Record, RecordStore, StoreContext, StoreError, StoreResult};

/// Dashboard errors.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        toy_id: String,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Production order {0} is closed")]
    OrderClosed(String),

    #[error("Member {member_id} is not in group {group_id}")]
    NotGroupMember { group_id: String, member_id: String },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Initialize a record store for `key`, seeding it with `seed` on first open
/// when samples are enabled.
pub(crate) fn open_store<T, S, F>(
    ctx: &StoreContext<S>,
    key: &str,
    seed_samples: bool,
    seed: F,
) -> StoreResult<RecordStore<T>>
where
    T: Record,
    S: KeyValueStore,
    F: FnOnce() -> Vec<T>,
{
    let mut store = RecordStore::new(key);
    if seed_samples {
        store.initialize(ctx, seed)?;
    } else {
        store.initialize(ctx, Vec::new)?;
    }
    Ok(store)
}

/// Look up a referenced record, mapping a miss to
/// [`FormError::UnknownReference`].
pub(crate) fn require<'a, T: Record>(
    store: &'a RecordStore<T>,
    field: &'static str,
    id: &str,
) -> Result<&'a T, FormError> {
    store.get(id).ok_or_else(|| FormError::UnknownReference {
        field,
        id: id.to_string(),
    })
}
