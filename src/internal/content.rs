pub mod impl_service;
pub mod structs;
