pub mod timestamp;
mod text;
#[cfg(test)]
mod test;

pub use text::truncate_words;
pub use timestamp::parse_timestamp;
