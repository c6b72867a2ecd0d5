//! Domain model (ids, tasks, dispatch state, errors).

pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{ChimeError, DeliveryError, StoreError, ValidationError};
pub use self::ids::TaskId;
pub use self::state::DispatchState;
pub use self::task::{ScheduleRequest, ScheduledTask};
