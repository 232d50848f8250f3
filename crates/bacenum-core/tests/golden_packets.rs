//! Byte-exact fixtures for the frames this client sends and the replies it
//! parses, captured from wire traces of commercial BACnet/IP controllers.

use bacenum_core::apdu::{ComplexAckHeader, UnconfirmedRequestHeader};
use bacenum_core::encoding::reader::Reader;
use bacenum_core::encoding::writer::Writer;
use bacenum_core::npdu::Npdu;
use bacenum_core::services::i_am::{IAmRequest, SERVICE_I_AM};
use bacenum_core::services::read_property::{
    ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY,
};
use bacenum_core::services::who_is::WhoIsRequest;
use bacenum_core::types::{DataValue, ObjectId, ObjectType, PropertyId};

#[test]
fn who_is_frame_matches_fixture() {
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    WhoIsRequest::unbounded().encode(&mut w).unwrap();

    assert_eq!(w.as_written(), &[0x01, 0x00, 0x10, 0x08]);
}

#[test]
fn read_object_name_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    ReadPropertyRequest {
        object_id: ObjectId::new(ObjectType::Device, 123),
        property_id: PropertyId::ObjectName,
        array_index: None,
        invoke_id: 1,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x00, 0x02, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D,]
    );
}

#[test]
fn read_object_list_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    ReadPropertyRequest {
        object_id: ObjectId::new(ObjectType::Device, 123),
        property_id: PropertyId::ObjectList,
        array_index: None,
        invoke_id: 2,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x00, 0x02, 0x05, 0x02, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4C,]
    );
}

#[test]
fn i_am_fixture_decodes_expected() {
    let fixture = [
        0x10, 0x00, // unconfirmed I-Am
        0xC4, 0x02, 0x00, 0x00, 0x7B, // device,123
        0x22, 0x04, 0x00, // max APDU 1024
        0x91, 0x03, // segmentation: no-segmentation
        0x21, 0x0F, // vendor 15
    ];

    let mut r = Reader::new(&fixture);
    let header = UnconfirmedRequestHeader::decode(&mut r).unwrap();
    assert_eq!(header.service_choice, SERVICE_I_AM);

    let i_am = IAmRequest::decode_after_header(&mut r).unwrap();
    assert_eq!(i_am.device_id, ObjectId::new(ObjectType::Device, 123));
    assert_eq!(i_am.max_apdu, 1024);
    assert_eq!(i_am.segmentation, 3);
    assert_eq!(i_am.vendor_id, 15);
    assert!(r.is_empty());
}

#[test]
fn object_list_ack_fixture_decodes_expected() {
    let fixture = [
        0x30, 0x02, 0x0C, // complex ack, invoke 2, ReadProperty
        0x0C, 0x02, 0x00, 0x00, 0x7B, // [0] device,123
        0x19, 0x4C, // [1] object-list
        0x3E, // [3] opening
        0xC4, 0x02, 0x00, 0x00, 0x7B, // device,123
        0xC4, 0x00, 0x00, 0x00, 0x01, // analog-input,1
        0xC4, 0x01, 0x00, 0x00, 0x02, // binary-output,2
        0x3F, // [3] closing
    ];

    let mut r = Reader::new(&fixture);
    let header = ComplexAckHeader::decode(&mut r).unwrap();
    assert_eq!(header.invoke_id, 2);
    assert_eq!(header.service_choice, SERVICE_READ_PROPERTY);
    assert!(!header.segmented);

    let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
    assert_eq!(ack.object_id, ObjectId::new(ObjectType::Device, 123));
    assert_eq!(ack.property_id, PropertyId::ObjectList);
    assert_eq!(
        ack.values,
        vec![
            DataValue::ObjectId(ObjectId::new(ObjectType::Device, 123)),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
            DataValue::ObjectId(ObjectId::new(ObjectType::BinaryOutput, 2)),
        ]
    );
    assert!(r.is_empty());
}

#[test]
fn object_name_ack_fixture_decodes_expected() {
    let fixture = [
        0x30, 0x03, 0x0C, // complex ack, invoke 3, ReadProperty
        0x0C, 0x00, 0x00, 0x00, 0x01, // [0] analog-input,1
        0x19, 0x4D, // [1] object-name
        0x3E, // [3] opening
        0x75, 0x09, 0x00, 0x5A, 0x6F, 0x6E, 0x65, 0x54, 0x65, 0x6D, 0x70, // "ZoneTemp"
        0x3F, // [3] closing
    ];

    let mut r = Reader::new(&fixture);
    let header = ComplexAckHeader::decode(&mut r).unwrap();
    assert_eq!(header.invoke_id, 3);

    let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
    assert_eq!(ack.object_id, ObjectId::new(ObjectType::AnalogInput, 1));
    assert_eq!(ack.property_id, PropertyId::ObjectName);
    assert_eq!(ack.values, vec![DataValue::CharacterString("ZoneTemp")]);
}
