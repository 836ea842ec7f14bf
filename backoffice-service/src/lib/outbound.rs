pub mod google;
pub mod notify;
pub mod repositories;
