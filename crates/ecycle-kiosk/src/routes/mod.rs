pub mod connectivity;
pub mod feedback;
pub mod health;
pub mod notice;
