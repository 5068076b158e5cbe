pub mod classifier;
pub mod keywords;

pub use classifier::SpamClassifier;
pub use keywords::KeywordSet;
