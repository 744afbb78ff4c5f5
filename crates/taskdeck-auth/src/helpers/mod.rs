pub mod cookie;
pub mod ip_extractor;
