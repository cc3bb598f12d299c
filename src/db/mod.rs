mod backend;
mod categorydb;
mod db;
mod file;
mod memory;
mod projectdb;
mod sessiondb;
mod userdb;

pub use backend::{
    StorageBackend, StoreError, CATEGORIES_KEY, CURRENT_USER_KEY, PROJECTS_KEY, USERS_KEY,
};
pub use categorydb::CategoryExt;
pub use db::StoreClient;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use projectdb::ProjectExt;
pub use sessiondb::SessionExt;
pub use userdb::UserExt;
