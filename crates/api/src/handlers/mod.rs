pub mod analytics;
pub mod auth;
pub mod form;
pub mod question;
pub mod response;
