//! Building typed feed messages from wire events.
//!
//! Each schema message has one builder function that loops over the
//! fields of its body, dispatching on the constants in [`super::fields`].
//! Unknown field numbers are skipped. Failure handling follows two rules:
//! - The envelope (FeedMessage and its FeedHeader) is fail-fast: any error
//!   there aborts the decode.
//! - Everything below the envelope is an optional substructure. If one
//!   fails to decode, or lacks a field it requires, it is treated as absent
//!   and the decode carries on, subject to [`SubstructurePolicy`].

use std::fmt;

use tracing::{debug, trace};

use super::config::{DecodeConfig, SubstructurePolicy};
use super::enums::{
    Cause, CongestionLevel, Effect, Incrementality, OccupancyStatus, SeverityLevel,
    StopTimeScheduleRelationship, TripScheduleRelationship, VehicleStopStatus,
};
use super::fields::{
    alert, entity_selector, feed_entity, feed_header, feed_message, position, stop_time_event,
    stop_time_update, time_range, translated_string, translation, trip_descriptor, trip_update,
    vehicle_descriptor, vehicle_position,
};
use super::model::{
    Alert, EntityPayload, EntitySelector, FeedEntity, FeedHeader, FeedMessage, Position,
    StopTimeEvent, StopTimeUpdate, TimeRange, TranslatedString, Translation, TripDescriptor,
    TripUpdate, VehicleDescriptor, VehiclePosition,
};
use crate::domain::Coordinate;
use crate::wire::{DecodeError, DecodeErrorKind, Field, WireReader};

/// A substructure that was dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    /// Schema name of the dropped structure, e.g. `"TripUpdate"`.
    pub path: &'static str,
    pub error: DecodeError,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dropped {}: {}", self.path, self.error)
    }
}

/// A decoded message plus whatever was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    pub message: FeedMessage,
    /// Empty unless the policy is [`SubstructurePolicy::Report`].
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a GTFS-realtime buffer with the default configuration.
///
/// # Examples
///
/// ```
/// use gtfs_feed::realtime::decode_feed;
/// use gtfs_feed::wire::MessageWriter;
///
/// let header = MessageWriter::new().string(1, "2.0").varint(3, 1_700_000_000);
/// let buf = MessageWriter::new().message(1, header).finish();
///
/// let message = decode_feed(&buf).unwrap();
/// assert_eq!(message.header.gtfs_realtime_version, "2.0");
/// assert!(message.entities.is_empty());
/// ```
pub fn decode_feed(buf: &[u8]) -> Result<FeedMessage, DecodeError> {
    decode_feed_with(buf, &DecodeConfig::default()).map(|outcome| outcome.message)
}

/// Decode a GTFS-realtime buffer.
///
/// Fails only if the envelope is unusable or a configured limit is hit.
/// Under [`SubstructurePolicy::Reject`], any dropped substructure also fails
/// the decode.
pub fn decode_feed_with(buf: &[u8], config: &DecodeConfig) -> Result<DecodeOutcome, DecodeError> {
    if let Some(limit) = config.max_buffer_len {
        if buf.len() > limit {
            return Err(DecodeError::without_offset(
                DecodeErrorKind::BufferTooLarge {
                    len: buf.len(),
                    limit,
                },
            ));
        }
    }

    let mut builder = Builder {
        config,
        warnings: Vec::new(),
    };
    let message = builder.feed_message(buf)?;

    debug!(
        bytes = buf.len(),
        entities = message.entities.len(),
        warnings = builder.warnings.len(),
        "decoded realtime feed"
    );

    Ok(DecodeOutcome {
        message,
        warnings: builder.warnings,
    })
}

struct Builder<'c> {
    config: &'c DecodeConfig,
    warnings: Vec<DecodeWarning>,
}

impl Builder<'_> {
    /// Decode an optional nested message, containing any failure.
    fn nested<'b, T>(
        &mut self,
        path: &'static str,
        parent: &WireReader<'b>,
        field: &Field<'b>,
        build: impl FnOnce(&mut Self, WireReader<'b>) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, DecodeError> {
        match parent.nested(field).and_then(|child| build(self, child)) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.degrade(path, err),
        }
    }

    fn degrade<T>(
        &mut self,
        path: &'static str,
        err: DecodeError,
    ) -> Result<Option<T>, DecodeError> {
        if err.kind.is_limit() {
            return Err(err);
        }
        match self.config.substructure_policy {
            SubstructurePolicy::Reject => Err(err),
            SubstructurePolicy::Report => {
                debug!(path, error = %err, "dropping malformed substructure");
                self.warnings.push(DecodeWarning { path, error: err });
                Ok(None)
            }
            SubstructurePolicy::Drop => {
                debug!(path, error = %err, "dropping malformed substructure");
                Ok(None)
            }
        }
    }

    fn skip(&self, message: &'static str, field: &Field<'_>) {
        trace!(
            message,
            field = field.number,
            wire_type = %field.wire_type(),
            "skipping unknown field"
        );
    }

    fn feed_message(&mut self, buf: &[u8]) -> Result<FeedMessage, DecodeError> {
        let mut r = WireReader::with_max_depth(buf, self.config.max_nesting_depth);
        let mut header = None;
        let mut entities = Vec::new();

        while let Some(field) = r.next_field()? {
            match field.number {
                feed_message::HEADER => {
                    let child = r.nested(&field)?;
                    header = Some(self.header(child)?);
                }
                feed_message::ENTITY => {
                    if let Some(entity) = self.nested("FeedEntity", &r, &field, Self::entity)? {
                        entities.push(entity);
                    }
                }
                _ => self.skip("FeedMessage", &field),
            }
        }

        let header = header.ok_or_else(|| {
            DecodeError::without_offset(DecodeErrorKind::MissingRequiredField(
                "FeedMessage.header",
            ))
        })?;

        Ok(FeedMessage { header, entities })
    }

    fn header(&mut self, mut r: WireReader<'_>) -> Result<FeedHeader, DecodeError> {
        let start = r.offset();
        let mut version = None;
        let mut incrementality = Incrementality::default();
        let mut timestamp = None;
        let mut feed_version = None;

        while let Some(field) = r.next_field()? {
            match field.number {
                feed_header::GTFS_REALTIME_VERSION => {
                    version = Some(field.as_string("FeedHeader.gtfs_realtime_version")?);
                }
                feed_header::INCREMENTALITY => {
                    incrementality = Incrementality::from_code(field.as_i32()?);
                }
                feed_header::TIMESTAMP => timestamp = Some(field.as_u64()?),
                feed_header::FEED_VERSION => {
                    feed_version = Some(field.as_string("FeedHeader.feed_version")?);
                }
                _ => self.skip("FeedHeader", &field),
            }
        }

        Ok(FeedHeader {
            gtfs_realtime_version: version
                .ok_or_else(|| DecodeError::missing("FeedHeader.gtfs_realtime_version", start))?,
            incrementality,
            timestamp,
            feed_version,
        })
    }

    fn entity(&mut self, mut r: WireReader<'_>) -> Result<FeedEntity, DecodeError> {
        let start = r.offset();
        let mut id = None;
        let mut is_deleted = false;
        let mut payload = None;

        while let Some(field) = r.next_field()? {
            // Oneof members overwrite each other; a malformed one overwrites nothing
            match field.number {
                feed_entity::ID => id = Some(field.as_string("FeedEntity.id")?),
                feed_entity::IS_DELETED => is_deleted = field.as_bool()?,
                feed_entity::TRIP_UPDATE => {
                    if let Some(tu) = self.nested("TripUpdate", &r, &field, Self::trip_update)? {
                        payload = Some(EntityPayload::TripUpdate(tu));
                    }
                }
                feed_entity::VEHICLE => {
                    if let Some(vp) =
                        self.nested("VehiclePosition", &r, &field, Self::vehicle_position)?
                    {
                        payload = Some(EntityPayload::VehiclePosition(vp));
                    }
                }
                feed_entity::ALERT => {
                    if let Some(alert) = self.nested("Alert", &r, &field, Self::alert)? {
                        payload = Some(EntityPayload::Alert(alert));
                    }
                }
                _ => self.skip("FeedEntity", &field),
            }
        }

        Ok(FeedEntity {
            id: id.ok_or_else(|| DecodeError::missing("FeedEntity.id", start))?,
            is_deleted,
            payload,
        })
    }

    fn trip_update(&mut self, mut r: WireReader<'_>) -> Result<TripUpdate, DecodeError> {
        let start = r.offset();
        let mut trip = None;
        let mut vehicle = None;
        let mut stop_time_updates = Vec::new();
        let mut timestamp = None;
        let mut delay = None;

        while let Some(field) = r.next_field()? {
            match field.number {
                trip_update::TRIP => {
                    trip = self.nested("TripDescriptor", &r, &field, Self::trip_descriptor)?;
                }
                trip_update::STOP_TIME_UPDATE => {
                    if let Some(stu) =
                        self.nested("StopTimeUpdate", &r, &field, Self::stop_time_update)?
                    {
                        stop_time_updates.push(stu);
                    }
                }
                trip_update::VEHICLE => {
                    vehicle =
                        self.nested("VehicleDescriptor", &r, &field, Self::vehicle_descriptor)?;
                }
                trip_update::TIMESTAMP => timestamp = Some(field.as_u64()?),
                trip_update::DELAY => delay = Some(field.as_i32()?),
                _ => self.skip("TripUpdate", &field),
            }
        }

        Ok(TripUpdate {
            trip: trip.ok_or_else(|| DecodeError::missing("TripUpdate.trip", start))?,
            vehicle,
            stop_time_updates,
            timestamp,
            delay,
        })
    }

    fn stop_time_update(&mut self, mut r: WireReader<'_>) -> Result<StopTimeUpdate, DecodeError> {
        let mut update = StopTimeUpdate::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                stop_time_update::STOP_SEQUENCE => update.stop_sequence = Some(field.as_u32()?),
                stop_time_update::ARRIVAL => {
                    update.arrival =
                        self.nested("StopTimeEvent", &r, &field, Self::stop_time_event)?;
                }
                stop_time_update::DEPARTURE => {
                    update.departure =
                        self.nested("StopTimeEvent", &r, &field, Self::stop_time_event)?;
                }
                stop_time_update::STOP_ID => {
                    update.stop_id = Some(field.as_string("StopTimeUpdate.stop_id")?);
                }
                stop_time_update::SCHEDULE_RELATIONSHIP => {
                    update.schedule_relationship =
                        StopTimeScheduleRelationship::from_code(field.as_i32()?);
                }
                _ => self.skip("StopTimeUpdate", &field),
            }
        }

        Ok(update)
    }

    fn stop_time_event(&mut self, mut r: WireReader<'_>) -> Result<StopTimeEvent, DecodeError> {
        let mut event = StopTimeEvent::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                stop_time_event::DELAY => event.delay = Some(field.as_i32()?),
                stop_time_event::TIME => event.time = Some(field.as_i64()?),
                stop_time_event::UNCERTAINTY => event.uncertainty = Some(field.as_i32()?),
                _ => self.skip("StopTimeEvent", &field),
            }
        }

        Ok(event)
    }

    fn vehicle_position(&mut self, mut r: WireReader<'_>) -> Result<VehiclePosition, DecodeError> {
        let mut vp = VehiclePosition::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                vehicle_position::TRIP => {
                    vp.trip = self.nested("TripDescriptor", &r, &field, Self::trip_descriptor)?;
                }
                vehicle_position::POSITION => {
                    vp.position = self.nested("Position", &r, &field, Self::position)?;
                }
                vehicle_position::CURRENT_STOP_SEQUENCE => {
                    vp.current_stop_sequence = Some(field.as_u32()?);
                }
                vehicle_position::CURRENT_STATUS => {
                    vp.current_status = Some(VehicleStopStatus::from_code(field.as_i32()?));
                }
                vehicle_position::TIMESTAMP => vp.timestamp = Some(field.as_u64()?),
                vehicle_position::CONGESTION_LEVEL => {
                    vp.congestion_level = Some(CongestionLevel::from_code(field.as_i32()?));
                }
                vehicle_position::STOP_ID => {
                    vp.stop_id = Some(field.as_string("VehiclePosition.stop_id")?);
                }
                vehicle_position::VEHICLE => {
                    vp.vehicle =
                        self.nested("VehicleDescriptor", &r, &field, Self::vehicle_descriptor)?;
                }
                vehicle_position::OCCUPANCY_STATUS => {
                    vp.occupancy_status = Some(OccupancyStatus::from_code(field.as_i32()?));
                }
                vehicle_position::OCCUPANCY_PERCENTAGE => {
                    vp.occupancy_percentage = Some(field.as_u32()?);
                }
                _ => self.skip("VehiclePosition", &field),
            }
        }

        Ok(vp)
    }

    fn position(&mut self, mut r: WireReader<'_>) -> Result<Position, DecodeError> {
        let start = r.offset();
        let mut latitude = None;
        let mut longitude = None;
        let mut bearing = None;
        let mut odometer = None;
        let mut speed = None;

        while let Some(field) = r.next_field()? {
            match field.number {
                position::LATITUDE => latitude = Some(field.as_f32()?),
                position::LONGITUDE => longitude = Some(field.as_f32()?),
                position::BEARING => bearing = Some(field.as_f32()?),
                position::ODOMETER => odometer = Some(field.as_f64()?),
                position::SPEED => speed = Some(field.as_f32()?),
                _ => self.skip("Position", &field),
            }
        }

        let latitude = latitude.ok_or_else(|| DecodeError::missing("Position.latitude", start))?;
        let longitude =
            longitude.ok_or_else(|| DecodeError::missing("Position.longitude", start))?;
        let coordinate = Coordinate::new(f64::from(latitude), f64::from(longitude))
            .map_err(|e| DecodeError::new(DecodeErrorKind::MalformedScalar(e), start))?;

        Ok(Position {
            coordinate,
            bearing,
            odometer,
            speed,
        })
    }

    fn trip_descriptor(&mut self, mut r: WireReader<'_>) -> Result<TripDescriptor, DecodeError> {
        let mut trip = TripDescriptor::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                trip_descriptor::TRIP_ID => {
                    trip.trip_id = Some(field.as_string("TripDescriptor.trip_id")?);
                }
                trip_descriptor::START_TIME => {
                    trip.start_time = Some(field.as_string("TripDescriptor.start_time")?);
                }
                trip_descriptor::START_DATE => {
                    trip.start_date = Some(field.as_string("TripDescriptor.start_date")?);
                }
                trip_descriptor::SCHEDULE_RELATIONSHIP => {
                    trip.schedule_relationship =
                        Some(TripScheduleRelationship::from_code(field.as_i32()?));
                }
                trip_descriptor::ROUTE_ID => {
                    trip.route_id = Some(field.as_string("TripDescriptor.route_id")?);
                }
                trip_descriptor::DIRECTION_ID => trip.direction_id = Some(field.as_u32()?),
                _ => self.skip("TripDescriptor", &field),
            }
        }

        Ok(trip)
    }

    fn vehicle_descriptor(
        &mut self,
        mut r: WireReader<'_>,
    ) -> Result<VehicleDescriptor, DecodeError> {
        let mut vehicle = VehicleDescriptor::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                vehicle_descriptor::ID => {
                    vehicle.id = Some(field.as_string("VehicleDescriptor.id")?);
                }
                vehicle_descriptor::LABEL => {
                    vehicle.label = Some(field.as_string("VehicleDescriptor.label")?);
                }
                vehicle_descriptor::LICENSE_PLATE => {
                    vehicle.license_plate =
                        Some(field.as_string("VehicleDescriptor.license_plate")?);
                }
                _ => self.skip("VehicleDescriptor", &field),
            }
        }

        Ok(vehicle)
    }

    fn alert(&mut self, mut r: WireReader<'_>) -> Result<Alert, DecodeError> {
        let mut alert = Alert::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                alert::ACTIVE_PERIOD => {
                    if let Some(period) = self.nested("TimeRange", &r, &field, Self::time_range)? {
                        alert.active_periods.push(period);
                    }
                }
                alert::INFORMED_ENTITY => {
                    if let Some(selector) =
                        self.nested("EntitySelector", &r, &field, Self::entity_selector)?
                    {
                        alert.informed_entities.push(selector);
                    }
                }
                alert::CAUSE => alert.cause = Cause::from_code(field.as_i32()?),
                alert::EFFECT => alert.effect = Effect::from_code(field.as_i32()?),
                alert::URL => {
                    alert.url =
                        self.nested("TranslatedString", &r, &field, Self::translated_string)?;
                }
                alert::HEADER_TEXT => {
                    alert.header_text =
                        self.nested("TranslatedString", &r, &field, Self::translated_string)?;
                }
                alert::DESCRIPTION_TEXT => {
                    alert.description_text =
                        self.nested("TranslatedString", &r, &field, Self::translated_string)?;
                }
                alert::SEVERITY_LEVEL => {
                    alert.severity_level = SeverityLevel::from_code(field.as_i32()?);
                }
                _ => self.skip("Alert", &field),
            }
        }

        Ok(alert)
    }

    fn time_range(&mut self, mut r: WireReader<'_>) -> Result<TimeRange, DecodeError> {
        let mut range = TimeRange::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                time_range::START => range.start = Some(field.as_u64()?),
                time_range::END => range.end = Some(field.as_u64()?),
                _ => self.skip("TimeRange", &field),
            }
        }

        Ok(range)
    }

    fn entity_selector(&mut self, mut r: WireReader<'_>) -> Result<EntitySelector, DecodeError> {
        let mut selector = EntitySelector::default();

        while let Some(field) = r.next_field()? {
            match field.number {
                entity_selector::AGENCY_ID => {
                    selector.agency_id = Some(field.as_string("EntitySelector.agency_id")?);
                }
                entity_selector::ROUTE_ID => {
                    selector.route_id = Some(field.as_string("EntitySelector.route_id")?);
                }
                entity_selector::ROUTE_TYPE => selector.route_type = Some(field.as_i32()?),
                entity_selector::TRIP => {
                    selector.trip =
                        self.nested("TripDescriptor", &r, &field, Self::trip_descriptor)?;
                }
                entity_selector::STOP_ID => {
                    selector.stop_id = Some(field.as_string("EntitySelector.stop_id")?);
                }
                entity_selector::DIRECTION_ID => selector.direction_id = Some(field.as_u32()?),
                _ => self.skip("EntitySelector", &field),
            }
        }

        Ok(selector)
    }

    fn translated_string(
        &mut self,
        mut r: WireReader<'_>,
    ) -> Result<TranslatedString, DecodeError> {
        let mut translations = Vec::new();

        while let Some(field) = r.next_field()? {
            match field.number {
                translated_string::TRANSLATION => {
                    if let Some(t) = self.nested("Translation", &r, &field, Self::translation)? {
                        translations.push(t);
                    }
                }
                _ => self.skip("TranslatedString", &field),
            }
        }

        Ok(TranslatedString { translations })
    }

    fn translation(&mut self, mut r: WireReader<'_>) -> Result<Translation, DecodeError> {
        let start = r.offset();
        let mut text = None;
        let mut language = None;

        while let Some(field) = r.next_field()? {
            match field.number {
                translation::TEXT => text = Some(field.as_string("Translation.text")?),
                translation::LANGUAGE => {
                    language = Some(field.as_string("Translation.language")?);
                }
                _ => self.skip("Translation", &field),
            }
        }

        Ok(Translation {
            text: text.ok_or_else(|| DecodeError::missing("Translation.text", start))?,
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::MessageWriter;

    fn header() -> MessageWriter {
        MessageWriter::new()
            .string(1, "2.0")
            .varint(3, 1_700_000_000)
    }

    fn trip(trip_id: &str) -> MessageWriter {
        MessageWriter::new().string(1, trip_id)
    }

    fn feed(entities: Vec<MessageWriter>) -> Vec<u8> {
        entities
            .into_iter()
            .fold(MessageWriter::new().message(1, header()), |w, e| {
                w.message(2, e)
            })
            .finish()
    }

    fn decode_with(buf: &[u8], policy: SubstructurePolicy) -> Result<DecodeOutcome, DecodeError> {
        decode_feed_with(buf, &DecodeConfig::with_policy(policy))
    }

    #[test]
    fn decodes_trip_update() {
        let update = MessageWriter::new()
            .message(1, trip("t1").string(5, "r1"))
            .message(
                2,
                MessageWriter::new()
                    .varint(1, 3)
                    .message(2, MessageWriter::new().int32(1, -30))
                    .string(4, "s3"),
            )
            .int32(5, 120);
        let buf = feed(vec![MessageWriter::new().string(1, "e1").message(3, update)]);

        let message = decode_feed(&buf).unwrap();
        assert_eq!(message.header.gtfs_realtime_version, "2.0");
        assert_eq!(message.header.timestamp, Some(1_700_000_000));
        assert_eq!(message.entities.len(), 1);

        let entity = &message.entities[0];
        assert_eq!(entity.id, "e1");
        assert!(!entity.is_deleted);
        let tu = entity.trip_update().unwrap();
        assert_eq!(tu.trip.trip_id.as_deref(), Some("t1"));
        assert_eq!(tu.trip.route_id.as_deref(), Some("r1"));
        assert_eq!(tu.delay, Some(120));
        assert_eq!(tu.stop_time_updates.len(), 1);

        let stu = &tu.stop_time_updates[0];
        assert_eq!(stu.stop_sequence, Some(3));
        assert_eq!(stu.stop_id.as_deref(), Some("s3"));
        assert_eq!(stu.arrival.unwrap().delay, Some(-30));
        assert_eq!(stu.departure, None);
        assert_eq!(
            stu.schedule_relationship,
            StopTimeScheduleRelationship::Scheduled
        );
    }

    #[test]
    fn last_payload_member_wins() {
        let position = MessageWriter::new().float(1, 52.5).float(2, -1.25);
        let entity = MessageWriter::new()
            .string(1, "e1")
            .message(3, MessageWriter::new().message(1, trip("t1")))
            .message(
                4,
                MessageWriter::new().message(2, position).varint(4, 1),
            );

        let message = decode_feed(&feed(vec![entity])).unwrap();
        let vp = message.entities[0].vehicle_position().unwrap();
        assert_eq!(vp.current_status, Some(VehicleStopStatus::StoppedAt));

        let position = vp.position.unwrap();
        assert_eq!(position.coordinate.latitude(), 52.5);
        assert_eq!(position.coordinate.longitude(), -1.25);
        assert!(message.entities[0].trip_update().is_none());
    }

    #[test]
    fn malformed_payload_member_keeps_previous() {
        let entity = MessageWriter::new()
            .string(1, "e1")
            .message(3, MessageWriter::new().message(1, trip("t1")))
            .bytes(5, &[0x08]);

        let outcome = decode_with(&feed(vec![entity]), SubstructurePolicy::Report).unwrap();
        let entity = &outcome.message.entities[0];
        assert!(entity.trip_update().is_some());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].path, "Alert");
        assert_eq!(
            outcome.warnings[0].error.kind,
            DecodeErrorKind::TruncatedMessage
        );
    }

    #[test]
    fn entity_without_payload() {
        let entity = MessageWriter::new().string(1, "gone").bool(2, true);
        let message = decode_feed(&feed(vec![entity])).unwrap();

        let entity = &message.entities[0];
        assert_eq!(entity.id, "gone");
        assert!(entity.is_deleted);
        assert_eq!(entity.payload, None);
        assert_eq!(entity.kind(), None);
    }

    #[test]
    fn empty_buffer_lacks_header() {
        let err = decode_feed(&[]).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::MissingRequiredField("FeedMessage.header")
        );
        assert_eq!(err.offset, None);
    }

    #[test]
    fn header_errors_are_fatal() {
        let buf = MessageWriter::new()
            .message(1, MessageWriter::new().varint(3, 5))
            .finish();
        let err = decode_with(&buf, SubstructurePolicy::Drop).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::MissingRequiredField("FeedHeader.gtfs_realtime_version")
        );

        let buf = MessageWriter::new()
            .message(1, MessageWriter::new().varint(1, 2))
            .finish();
        let err = decode_with(&buf, SubstructurePolicy::Drop).unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::WireTypeMismatch { field: 1, .. }
        ));
    }

    #[test]
    fn truncated_envelope_is_fatal() {
        // Tag for field 99 as a varint, then nothing
        let buf = MessageWriter::new()
            .message(1, header())
            .raw(&[0x98, 0x06])
            .finish();
        let err = decode_with(&buf, SubstructurePolicy::Drop).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TruncatedMessage);
        assert_eq!(err.offset, Some(buf.len()));
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let plain = MessageWriter::new()
            .string(1, "e1")
            .message(3, MessageWriter::new().message(1, trip("t1")));
        let noisy = MessageWriter::new()
            .fixed32(50, 7)
            .string(1, "e1")
            // Group 60 containing a varint field
            .raw(&[0xE3, 0x03, 0x08, 0x01, 0xE4, 0x03])
            .message(
                3,
                MessageWriter::new()
                    .message(1, trip("t1").varint(999, 1))
                    .fixed64(77, 1),
            );

        let expected = decode_feed(&feed(vec![plain])).unwrap();
        let outcome = decode_with(&feed(vec![noisy]), SubstructurePolicy::Reject).unwrap();
        assert_eq!(outcome.message, expected);
        assert!(outcome.warnings.is_empty());
    }

    fn tripless_update() -> Vec<u8> {
        let entity = MessageWriter::new()
            .string(1, "e1")
            .message(3, MessageWriter::new().varint(4, 1_700_000_000));
        feed(vec![entity])
    }

    #[test]
    fn report_policy_records_warnings() {
        let outcome = decode_with(&tripless_update(), SubstructurePolicy::Report).unwrap();
        assert_eq!(outcome.message.entities.len(), 1);
        assert_eq!(outcome.message.entities[0].payload, None);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].path, "TripUpdate");
        assert_eq!(
            outcome.warnings[0].error.kind,
            DecodeErrorKind::MissingRequiredField("TripUpdate.trip")
        );
        assert!(
            outcome.warnings[0]
                .to_string()
                .starts_with("dropped TripUpdate: missing required field TripUpdate.trip")
        );
    }

    #[test]
    fn drop_policy_is_silent() {
        let outcome = decode_with(&tripless_update(), SubstructurePolicy::Drop).unwrap();
        assert_eq!(outcome.message.entities[0].payload, None);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn reject_policy_fails() {
        let err = decode_with(&tripless_update(), SubstructurePolicy::Reject).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::MissingRequiredField("TripUpdate.trip")
        );
    }

    #[test]
    fn entity_without_id_is_dropped() {
        let good = MessageWriter::new().string(1, "e1");
        let anonymous = MessageWriter::new().message(5, MessageWriter::new().varint(6, 4));
        let outcome =
            decode_with(&feed(vec![anonymous, good]), SubstructurePolicy::Report).unwrap();

        assert_eq!(outcome.message.entities.len(), 1);
        assert_eq!(outcome.message.entities[0].id, "e1");
        assert_eq!(outcome.warnings[0].path, "FeedEntity");
    }

    #[test]
    fn out_of_range_position_is_absent() {
        let vp = MessageWriter::new()
            .message(2, MessageWriter::new().float(1, 95.0).float(2, 10.0))
            .string(7, "s1");
        let entity = MessageWriter::new().string(1, "v1").message(4, vp);
        let outcome = decode_with(&feed(vec![entity]), SubstructurePolicy::Report).unwrap();

        let vp = outcome.message.entities[0].vehicle_position().unwrap();
        assert_eq!(vp.position, None);
        assert_eq!(vp.stop_id.as_deref(), Some("s1"));
        assert_eq!(outcome.warnings[0].path, "Position");
        assert!(matches!(
            outcome.warnings[0].error.kind,
            DecodeErrorKind::MalformedScalar(_)
        ));
    }

    #[test]
    fn decodes_alert() {
        let text = MessageWriter::new()
            .message(1, MessageWriter::new().string(1, "Delays").string(2, "en"))
            .message(1, MessageWriter::new().string(1, "Retards").string(2, "fr"))
            // A translation without text is dropped
            .message(1, MessageWriter::new().string(2, "de"));
        let alert = MessageWriter::new()
            .message(1, MessageWriter::new().varint(1, 100).varint(2, 200))
            .message(5, MessageWriter::new().string(2, "r1").int32(3, 3))
            .varint(6, 8)
            .varint(7, 3)
            .message(10, text)
            .varint(14, 3);
        let entity = MessageWriter::new().string(1, "a1").message(5, alert);

        let outcome = decode_with(&feed(vec![entity]), SubstructurePolicy::Report).unwrap();
        let alert = outcome.message.entities[0].alert().unwrap();
        assert_eq!(alert.cause, Cause::Weather);
        assert_eq!(alert.effect, Effect::SignificantDelays);
        assert_eq!(alert.severity_level, SeverityLevel::Warning);
        assert!(alert.is_active_at(150));
        assert!(!alert.is_active_at(250));
        assert_eq!(alert.informed_entities[0].route_id.as_deref(), Some("r1"));
        assert_eq!(alert.informed_entities[0].route_type, Some(3));

        let header = alert.header_text.as_ref().unwrap();
        assert_eq!(header.translations.len(), 2);
        assert_eq!(header.text_for("fr"), Some("Retards"));
        assert_eq!(alert.description_text, None);
        assert_eq!(outcome.warnings[0].path, "Translation");
    }

    #[test]
    fn unknown_enum_codes_are_kept() {
        let alert = MessageWriter::new().varint(6, 42).varint(7, 99);
        let entity = MessageWriter::new().string(1, "a1").message(5, alert);

        let message = decode_feed(&feed(vec![entity])).unwrap();
        let alert = message.entities[0].alert().unwrap();
        assert_eq!(alert.cause, Cause::Unrecognized(42));
        assert_eq!(alert.effect, Effect::Unrecognized(99));
    }

    #[test]
    fn buffer_guard() {
        let buf = feed(vec![MessageWriter::new().string(1, "e1")]);
        let config = DecodeConfig::new(Some(4), DEFAULT_DEPTH, SubstructurePolicy::Drop);
        let err = decode_feed_with(&buf, &config).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::BufferTooLarge {
                len: buf.len(),
                limit: 4
            }
        );
        assert_eq!(err.offset, None);

        let config = DecodeConfig::new(Some(buf.len()), DEFAULT_DEPTH, SubstructurePolicy::Drop);
        assert!(decode_feed_with(&buf, &config).is_ok());
    }

    const DEFAULT_DEPTH: usize = crate::wire::DEFAULT_MAX_DEPTH;

    #[test]
    fn nesting_limit_overrides_policy() {
        let entity = MessageWriter::new()
            .string(1, "e1")
            .message(3, MessageWriter::new().message(1, trip("t1")));
        let buf = feed(vec![entity]);

        let config = DecodeConfig::new(None, 2, SubstructurePolicy::Drop);
        let err = decode_feed_with(&buf, &config).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::NestingTooDeep { limit: 2 });

        let config = DecodeConfig::new(None, 3, SubstructurePolicy::Drop);
        assert!(decode_feed_with(&buf, &config).is_ok());
    }

    #[test]
    fn repeated_singular_message_is_replaced() {
        let update = MessageWriter::new()
            .message(1, trip("first"))
            .message(1, trip("second"));
        let entity = MessageWriter::new().string(1, "e1").message(3, update);

        let message = decode_feed(&feed(vec![entity])).unwrap();
        let tu = message.entities[0].trip_update().unwrap();
        assert_eq!(tu.trip.trip_id.as_deref(), Some("second"));
    }
}
