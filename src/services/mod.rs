pub mod assistant;
pub mod booking;
pub mod calendar;
pub mod careers;
pub mod contact;
pub mod dialogue;
pub mod email;
pub mod estimate;
pub mod estimate_store;
pub mod faq;
pub mod sessions;
pub mod slots;
pub mod speech;
