pub mod health;
pub mod model;
pub mod session;
pub mod tagging;
pub mod ui;
