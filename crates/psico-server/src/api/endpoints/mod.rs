pub mod auth;
pub mod health;
pub mod history;
pub mod patients;
pub mod reference;
pub mod therapists;
