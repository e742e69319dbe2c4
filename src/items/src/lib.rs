//! Item tracking
//!
//! The [`ItemRegistry`] owns every item in a scene, detects pickups through the
//! scene's collision query and turns bound pickups into puzzle step
//! completions via its [`BindingTable`].

pub mod binding;
pub mod item;
pub mod registry;


pub use binding::{BindingTable, StepBinding};
pub use item::{Item, ItemKind};
pub use registry::{ITEM_DOC_VERSION, ItemCallback, ItemRegistry, ItemStatistics, Pickup, PickupContext};
