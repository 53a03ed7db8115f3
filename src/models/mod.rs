pub mod collection;
pub mod todo;
pub mod user;

pub use collection::{Collection, CollectionInput, DeleteCollectionRequest, DEFAULT_COLOR};
pub use todo::{Todo, TodoInput};
pub use user::{has_admin_role, NewUser, User, UserChanges, UserUpdate, ADMIN_ROLE, DEFAULT_ROLE};
