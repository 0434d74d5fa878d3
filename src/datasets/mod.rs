/// The labeled posts dataset
pub mod posts;
