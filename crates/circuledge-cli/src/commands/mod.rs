pub mod channels;
pub mod common;
pub mod delete;
pub mod edit;
pub mod history;
pub mod list;
pub mod new;
pub mod settings;
pub mod show;
