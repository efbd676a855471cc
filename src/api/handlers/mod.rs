mod health;
mod inventory;
mod pages;
mod photos;
mod register;
mod search;

pub use health::health;
pub use inventory::{delete_item, get_item, list_items, update_item};
pub use pages::{docs, openapi_spec, register_form, search_form};
pub use photos::get_photo;
pub use register::register;
pub use search::search;
