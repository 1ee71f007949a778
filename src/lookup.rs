use crate::fetch::ContentService;
use crate::models::{Record, Room};
use crate::types::Collection;
use tracing::{debug, error};

impl ContentService {
    /// Look up one room by its slug.
    ///
    /// The slug is matched exactly as given. Returns `None` for a blank slug or
    /// an unconfigured rooms source (no query is sent), when nothing matches,
    /// and when the source fails.
    pub async fn room_by_slug(&self, slug: &str) -> Option<Room> {
        if slug.trim().is_empty() {
            return None;
        }
        let data_source_id = self.data_source_id(Collection::Rooms)?;

        match self
            .client()
            .query_collection(&data_source_id, &Room::slug_query(slug))
            .await
        {
            Ok(pages) => {
                let room = pages.first().map(Room::from_page);
                if room.is_none() {
                    debug!(slug, "No room with this slug");
                }
                room
            }
            Err(e) => {
                error!(slug, error = %e, "Error fetching room by slug");
                None
            }
        }
    }
}
