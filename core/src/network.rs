pub mod route;
pub mod tcp;
