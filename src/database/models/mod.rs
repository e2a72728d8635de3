pub mod group;
pub mod resource;
pub mod user;

pub use group::Group;
pub use resource::{Label, LabelCreate, Location, LocationCreate};
pub use user::{normalize_email, User, UserCreate, UserUpdate};
