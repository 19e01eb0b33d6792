pub mod faq;
pub mod fleet;
