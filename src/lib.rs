pub mod parser;
pub mod scraper;
pub mod types;
pub mod utils;

pub use scraper::CoursePage;

pub(crate) const BASE_URL: &str = "https://academia.srmist.edu.in";
