pub mod arguments;
pub mod command;
pub mod component;
pub mod guild;
pub mod message;
pub mod payload;
pub mod platter;
