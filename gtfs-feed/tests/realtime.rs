use gtfs_feed::realtime::fields::{
    alert, feed_entity, feed_header, feed_message, position, stop_time_event, stop_time_update,
    translated_string, translation, trip_descriptor, trip_update, vehicle_position,
};
use gtfs_feed::realtime::{
    DecodeConfig, Effect, EntityKind, Incrementality, OccupancyStatus, SubstructurePolicy,
    decode_feed, decode_feed_with,
};
use gtfs_feed::wire::{DecodeErrorKind, MessageWriter};

fn header(timestamp: u64) -> MessageWriter {
    MessageWriter::new()
        .string(feed_header::GTFS_REALTIME_VERSION, "2.0")
        .varint(feed_header::INCREMENTALITY, 0)
        .varint(feed_header::TIMESTAMP, timestamp)
}

fn trip(trip_id: &str) -> MessageWriter {
    MessageWriter::new()
        .string(trip_descriptor::TRIP_ID, trip_id)
        .string(trip_descriptor::START_DATE, "20240315")
        .string(trip_descriptor::START_TIME, "25:10:00")
}

fn trip_update_entity(id: &str, trip_id: &str, delay: i32) -> MessageWriter {
    let update = MessageWriter::new()
        .message(trip_update::TRIP, trip(trip_id))
        .message(
            trip_update::STOP_TIME_UPDATE,
            MessageWriter::new()
                .varint(stop_time_update::STOP_SEQUENCE, 1)
                .message(
                    stop_time_update::DEPARTURE,
                    MessageWriter::new().int32(stop_time_event::DELAY, delay),
                ),
        );
    MessageWriter::new()
        .string(feed_entity::ID, id)
        .message(feed_entity::TRIP_UPDATE, update)
}

fn vehicle_entity(id: &str, trip_id: &str, timestamp: u64) -> MessageWriter {
    let vehicle = MessageWriter::new()
        .message(vehicle_position::TRIP, trip(trip_id))
        .message(
            vehicle_position::POSITION,
            MessageWriter::new()
                .float(position::LATITUDE, 51.5)
                .float(position::LONGITUDE, -0.125),
        )
        .varint(vehicle_position::TIMESTAMP, timestamp)
        .varint(vehicle_position::OCCUPANCY_STATUS, 2);
    MessageWriter::new()
        .string(feed_entity::ID, id)
        .message(feed_entity::VEHICLE, vehicle)
}

fn alert_entity(id: &str) -> MessageWriter {
    let text = |t: &str, lang: &str| {
        MessageWriter::new()
            .string(translation::TEXT, t)
            .string(translation::LANGUAGE, lang)
    };
    let alert = MessageWriter::new()
        .varint(alert::EFFECT, 3)
        .message(
            alert::HEADER_TEXT,
            MessageWriter::new()
                .message(translated_string::TRANSLATION, text("Delays", "en"))
                .message(translated_string::TRANSLATION, text("Retards", "fr")),
        );
    MessageWriter::new()
        .string(feed_entity::ID, id)
        .message(feed_entity::ALERT, alert)
}

fn feed(entities: Vec<MessageWriter>) -> Vec<u8> {
    entities.into_iter().fold(
        MessageWriter::new().message(feed_message::HEADER, header(1_710_500_000)),
        |w, e| w.message(feed_message::ENTITY, e),
    )
    .finish()
}

#[test]
fn decodes_mixed_feed() {
    let buf = feed(vec![
        trip_update_entity("tu1", "t1", 90),
        vehicle_entity("v1", "t1", 1_710_499_990),
        alert_entity("a1"),
        vehicle_entity("v2", "t1", 1_710_499_995),
    ]);

    let message = decode_feed(&buf).unwrap();
    assert_eq!(message.header.gtfs_realtime_version, "2.0");
    assert_eq!(message.header.incrementality, Incrementality::FullDataset);
    assert_eq!(
        message.header.timestamp_utc().map(|t| t.timestamp()),
        Some(1_710_500_000)
    );

    let ids: Vec<&str> = message.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["tu1", "v1", "a1", "v2"]);

    let (id, update) = message.trip_updates().next().unwrap();
    assert_eq!(id, "tu1");
    assert_eq!(
        update.stop_time_updates[0].departure.and_then(|d| d.delay),
        Some(90)
    );
    assert_eq!(
        update.trip.service_date().unwrap().map(|d| d.to_string()),
        Some("20240315".to_string())
    );
    assert_eq!(
        update.trip.service_start_time().unwrap().map(|t| t.hours()),
        Some(25)
    );

    assert_eq!(message.vehicle_positions().count(), 2);
    let latest = message.vehicle_for_trip("t1").unwrap();
    assert_eq!(latest.timestamp, Some(1_710_499_995));
    assert_eq!(latest.occupancy_status, Some(OccupancyStatus::FewSeatsAvailable));
    let coordinate = latest.position.unwrap().coordinate;
    assert_eq!(coordinate.latitude(), 51.5);
    assert_eq!(coordinate.longitude(), -0.125);

    let (_, alert) = message.alerts().next().unwrap();
    assert_eq!(alert.effect, Effect::SignificantDelays);
    assert!(alert.is_active_at(0));
    let header = alert.header_text.as_ref().unwrap();
    assert_eq!(header.text_for("fr"), Some("Retards"));
    assert_eq!(header.text_for("de"), Some("Delays"));

    assert_eq!(message.trip_updates_for_trip("t1").count(), 1);
    assert_eq!(message.entities_of_kind(EntityKind::Alert).count(), 1);
    assert!(message.entity("a1").and_then(|e| e.alert()).is_some());
    assert!(message.entity("missing").is_none());
}

#[test]
fn policy_decides_fate_of_broken_entity() {
    // Position with a truncated body: the fixed32 latitude is cut short.
    let broken_vehicle = MessageWriter::new()
        .message(vehicle_position::POSITION, MessageWriter::new().raw(&[0x0D, 0x00]));
    let buf = feed(vec![
        trip_update_entity("tu1", "t1", 0),
        MessageWriter::new()
            .string(feed_entity::ID, "v1")
            .message(feed_entity::VEHICLE, broken_vehicle),
    ]);

    let dropped =
        decode_feed_with(&buf, &DecodeConfig::with_policy(SubstructurePolicy::Drop)).unwrap();
    assert!(dropped.warnings.is_empty());
    let vehicle = dropped.message.entity("v1").and_then(|e| e.vehicle_position()).unwrap();
    assert_eq!(vehicle.position, None);

    let reported =
        decode_feed_with(&buf, &DecodeConfig::with_policy(SubstructurePolicy::Report)).unwrap();
    assert_eq!(reported.message, dropped.message);
    assert_eq!(reported.warnings.len(), 1);
    assert_eq!(
        reported.warnings[0].error.kind,
        DecodeErrorKind::TruncatedMessage
    );

    let err = decode_feed_with(&buf, &DecodeConfig::with_policy(SubstructurePolicy::Reject))
        .unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::TruncatedMessage);
    assert!(err.offset.is_some());
}

#[test]
fn limits_reject_input() {
    let buf = feed(vec![trip_update_entity("tu1", "t1", 0)]);

    let config = DecodeConfig::new(Some(buf.len() - 1), 32, SubstructurePolicy::Drop);
    let err = decode_feed_with(&buf, &config).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::BufferTooLarge { .. }));

    let config = DecodeConfig::new(Some(buf.len()), 32, SubstructurePolicy::Drop);
    assert!(decode_feed_with(&buf, &config).is_ok());
}

#[test]
fn missing_header_is_fatal() {
    let buf = MessageWriter::new()
        .message(feed_message::ENTITY, trip_update_entity("tu1", "t1", 0))
        .finish();
    let err = decode_feed(&buf).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::MissingRequiredField(_)));
}
