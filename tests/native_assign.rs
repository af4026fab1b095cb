use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rstest::rstest;

use pgarray::{
    Array, ArrayDimension, Cidr, CidrArray, Element, EnumArray, Error, ErrorKind, Int4, Int4Array,
    Int8, Status, Text, TextArray, Timestamp, TimestampArray, Uuid, UuidArray,
};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn dims(lengths: &[i32]) -> Vec<ArrayDimension> {
    lengths.iter().copied().map(ArrayDimension::with_length).collect()
}

fn ints(values: &[i32], lengths: &[i32]) -> Int4Array {
    Array::new(values.iter().copied().map(Int4::new).collect(), dims(lengths)).unwrap()
}

#[rstest]
fn assign_one_dimension() {
    let src = CidrArray::new(vec![Cidr::host(ip("127.0.0.1"))], dims(&[1])).unwrap();
    let mut dst: Vec<IpAddr> = Vec::new();
    src.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![ip("127.0.0.1")]);
}

#[rstest]
fn assign_null_element_into_option() {
    let src = CidrArray::new(vec![Cidr::null()], dims(&[1])).unwrap();
    let mut dst: Vec<Option<IpAddr>> = Vec::new();
    src.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![None]);

    let mut strict: Vec<IpAddr> = Vec::new();
    let err = src.assign_to(&mut strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assignment);
}

#[rstest]
fn assign_null_array() {
    let src = CidrArray::null();

    let mut dst: Vec<IpAddr> = vec![ip("10.0.0.1")];
    let err = src.assign_to(&mut dst).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assignment);

    let mut optional: Option<Vec<IpAddr>> = Some(vec![ip("10.0.0.1")]);
    src.assign_to(&mut optional).unwrap();
    assert_eq!(optional, None);
}

#[rstest]
fn assign_empty_array() {
    let src = CidrArray::empty();

    let mut dst: Vec<IpAddr> = vec![ip("10.0.0.1")];
    src.assign_to(&mut dst).unwrap();
    assert!(dst.is_empty());

    let mut optional: Option<Vec<IpAddr>> = None;
    src.assign_to(&mut optional).unwrap();
    assert_eq!(optional, Some(vec![]));

    let mut nested: Vec<Vec<IpAddr>> = vec![vec![]];
    src.assign_to(&mut nested).unwrap();
    assert!(nested.is_empty());

    let mut fixed: [IpAddr; 1] = [ip("10.0.0.1")];
    let err = src.assign_to(&mut fixed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[rstest]
fn assign_two_dimensions() {
    let src = CidrArray::new(
        vec![Cidr::host(ip("127.0.0.1")), Cidr::host(ip("10.0.0.1"))],
        dims(&[2, 1]),
    )
    .unwrap();

    let mut nested: Vec<Vec<IpAddr>> = Vec::new();
    src.assign_to(&mut nested).unwrap();
    assert_eq!(nested, vec![vec![ip("127.0.0.1")], vec![ip("10.0.0.1")]]);

    let mut fixed = [[ip("0.0.0.0")]; 2];
    src.assign_to(&mut fixed).unwrap();
    assert_eq!(fixed, [[ip("127.0.0.1")], [ip("10.0.0.1")]]);
}

#[rstest]
fn assign_four_dimensions() {
    let networks = [
        ("127.0.0.0", 24),
        ("10.0.0.0", 24),
        ("172.16.0.0", 16),
        ("192.168.0.0", 16),
        ("224.0.0.0", 24),
        ("169.168.0.0", 16),
    ];
    let src = CidrArray::new(
        networks
            .iter()
            .map(|&(addr, prefix)| Cidr::try_with_prefix(ip(addr), prefix).unwrap())
            .collect(),
        dims(&[2, 1, 1, 3]),
    )
    .unwrap();

    let mut nested: Vec<Vec<Vec<Vec<(IpAddr, u8)>>>> = Vec::new();
    src.assign_to(&mut nested).unwrap();
    assert_eq!(nested[1][0][0][2], (ip("169.168.0.0"), 16));
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0][0][0].len(), 3);

    let mut fixed = [[[[(ip("0.0.0.0"), 0u8); 3]; 1]; 1]; 2];
    src.assign_to(&mut fixed).unwrap();
    assert_eq!(fixed[0][0][0][0], (ip("127.0.0.0"), 24));
    assert_eq!(fixed[1][0][0][1], (ip("224.0.0.0"), 24));
}

#[rstest]
fn assign_mixed_fixed_and_resizable() {
    let src = ints(&[1, 2, 3, 4, 5, 6], &[3, 2]);
    let mut dst: Vec<[i64; 2]> = Vec::new();
    src.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![[1, 2], [3, 4], [5, 6]]);
}

#[rstest]
fn fixed_length_mismatch_is_a_shape_error() {
    let src = ints(&[1, 2, 3, 4, 5, 6], &[3, 2]);

    let mut dst: Vec<[i32; 3]> = Vec::new();
    let err = src.assign_to(&mut dst).unwrap_err();
    assert_eq!(err, Error::shape(1, 3, 2));
    assert!(dst.is_empty(), "shape is checked before writing");

    let mut outer: [Vec<i32>; 2] = [vec![], vec![]];
    let err = src.assign_to(&mut outer).unwrap_err();
    assert_eq!(err, Error::shape(0, 2, 3));
}

#[rstest]
fn rank_mismatch() {
    let src = ints(&[1, 2, 3, 4], &[2, 2]);
    let mut dst: Vec<i32> = Vec::new();
    let err = src.assign_to(&mut dst).unwrap_err();
    assert_eq!(
        err,
        Error::Rank {
            expected: 1,
            actual: 2
        }
    );
}

#[rstest]
fn undefined_array_is_a_state_error() {
    let src = Int4Array::default();
    let mut dst: Vec<i32> = Vec::new();
    assert_eq!(src.assign_to(&mut dst).unwrap_err().kind(), ErrorKind::State);
}

#[rstest]
fn element_failure_leaves_partial_result() {
    let src: Array<Int8> = Array::new(
        vec![Int8::new(1), Int8::new(i64::MAX), Int8::new(3)],
        dims(&[3]),
    )
    .unwrap();
    let mut dst: Vec<i32> = Vec::new();
    let err = src.assign_to(&mut dst).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assignment);
    assert_eq!(dst, vec![1]);
}

#[rstest]
fn assign_enum_labels() {
    let src = EnumArray::new(
        vec![Text::new("foo"), Text::new("bar")],
        dims(&[2, 1]),
    )
    .unwrap();
    let mut dst: Vec<Vec<String>> = Vec::new();
    src.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![vec!["foo".to_string()], vec!["bar".to_string()]]);

    let with_null = TextArray::new(vec![Text::null()], dims(&[1])).unwrap();
    let mut dst: Vec<Option<String>> = Vec::new();
    with_null.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![None]);
}

#[rstest]
fn assign_timestamps() {
    let src = TimestampArray::new(
        vec![
            Timestamp::new(date(2015, 2, 1)),
            Timestamp::new(date(2016, 3, 4)),
        ],
        dims(&[2, 1]),
    )
    .unwrap();

    let mut naive = [[date(2000, 1, 1)]; 2];
    src.assign_to(&mut naive).unwrap();
    assert_eq!(naive, [[date(2015, 2, 1)], [date(2016, 3, 4)]]);

    let mut utc: Vec<Vec<DateTime<Utc>>> = Vec::new();
    src.assign_to(&mut utc).unwrap();
    assert_eq!(utc[1][0], date(2016, 3, 4).and_utc());
}

#[rstest]
fn assign_uuids() {
    let raw = uuid::Uuid::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    let src = UuidArray::new(vec![Uuid::new(raw), Uuid::null()], dims(&[2])).unwrap();

    let mut dst: Vec<Option<uuid::Uuid>> = Vec::new();
    src.assign_to(&mut dst).unwrap();
    assert_eq!(dst, vec![Some(raw), None]);

    let mut text: Vec<Option<String>> = Vec::new();
    src.assign_to(&mut text).unwrap();
    assert_eq!(
        text[0].as_deref(),
        Some("00010203-0405-0607-0809-0a0b0c0d0e0f")
    );
}

#[rstest]
fn scalar_destination_is_rejected() {
    let src = ints(&[1], &[1]);
    let mut dst = 0i32;
    assert_eq!(src.assign_to(&mut dst).unwrap_err().kind(), ErrorKind::Shape);
}

#[rstest]
fn status_survives_native_round_trip() {
    let native: Option<Vec<Vec<Option<i32>>>> = Some(vec![vec![Some(1), None]]);
    let array = Int4Array::from_native(&native).unwrap();
    assert_eq!(array.status, Status::Present);

    let mut back: Option<Vec<Vec<Option<i32>>>> = None;
    array.assign_to(&mut back).unwrap();
    assert_eq!(back, native);
}
