pub mod requests;
pub mod workout;
