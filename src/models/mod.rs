pub mod binding;
pub mod catalog;
pub mod instance;
