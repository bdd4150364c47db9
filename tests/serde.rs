#![cfg(feature = "serde")]

use strict_uri::Uri;

#[test]
fn serializes_to_the_string_form() {
    let u = Uri::parse("http://user@example.com:8042/over/there?name=ferret#nose");
    let json = serde_json::to_string(&u).unwrap();
    assert_eq!(
        json,
        "\"http://user@example.com:8042/over/there?name=ferret#nose\""
    );
}

#[test]
fn round_trips_through_json() {
    let u = Uri::parse("http://[fe80::1%25en0]:8080/p?q#f");
    assert!(u.is_valid());
    let json = serde_json::to_string(&u).unwrap();
    let back: Uri = serde_json::from_str(&json).unwrap();
    assert_eq!(back, u);
}

#[test]
fn rejects_invalid_input() {
    // Strict URI mode applies: a reference has no scheme.
    assert!(serde_json::from_str::<Uri>("\"//host.example/p\"").is_err());
    assert!(serde_json::from_str::<Uri>("\"https://host:8080a\"").is_err());
    assert!(serde_json::from_str::<Uri>("42").is_err());
}
