pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod util;

pub use io::store::{DirStore, KeyValueStore, MemoryStore, StoreError};
pub use model::{CollectionState, Priority, Tab, Task, TaskDraft, ValidationError};
pub use ops::coordinator::{Coordinator, CoordinatorError};
pub use ops::view::{EmptyReason, Projection, TaskFilter};
