//! Read-only views over a decoded feed message.

use super::model::{Alert, EntityKind, FeedEntity, FeedMessage, TripUpdate, VehiclePosition};

impl FeedMessage {
    /// Entities carrying a trip update, with their ids, in feed order.
    pub fn trip_updates(&self) -> impl Iterator<Item = (&str, &TripUpdate)> + Clone {
        self.entities
            .iter()
            .filter_map(|e| e.trip_update().map(|tu| (e.id.as_str(), tu)))
    }

    /// Entities carrying a vehicle position, with their ids, in feed order.
    pub fn vehicle_positions(&self) -> impl Iterator<Item = (&str, &VehiclePosition)> + Clone {
        self.entities
            .iter()
            .filter_map(|e| e.vehicle_position().map(|vp| (e.id.as_str(), vp)))
    }

    /// Entities carrying an alert, with their ids, in feed order.
    pub fn alerts(&self) -> impl Iterator<Item = (&str, &Alert)> + Clone {
        self.entities
            .iter()
            .filter_map(|e| e.alert().map(|alert| (e.id.as_str(), alert)))
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &FeedEntity> + Clone {
        self.entities.iter().filter(move |e| e.kind() == Some(kind))
    }

    /// Entities with no payload, typically deletions in a differential feed.
    pub fn entities_without_payload(&self) -> impl Iterator<Item = &FeedEntity> + Clone {
        self.entities.iter().filter(|e| e.payload.is_none())
    }

    /// First entity with the given id.
    pub fn entity(&self, id: &str) -> Option<&FeedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn trip_updates_for_trip<'a>(
        &'a self,
        trip_id: &'a str,
    ) -> impl Iterator<Item = &'a TripUpdate> + Clone {
        self.trip_updates()
            .map(|(_, tu)| tu)
            .filter(move |tu| tu.trip.trip_id.as_deref() == Some(trip_id))
    }

    /// The latest vehicle position reported against a trip, if any.
    pub fn vehicle_for_trip(&self, trip_id: &str) -> Option<&VehiclePosition> {
        self.vehicle_positions()
            .map(|(_, vp)| vp)
            .filter(|vp| {
                vp.trip
                    .as_ref()
                    .is_some_and(|t| t.trip_id.as_deref() == Some(trip_id))
            })
            .max_by_key(|vp| vp.timestamp)
    }
}
