pub mod counts;
pub mod due;
pub mod list;
pub mod new;
pub mod review;
pub mod stats;

/// First segment of a card id, enough to address it on the command line
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}
