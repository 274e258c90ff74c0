#![cfg(feature = "serde")]

use cowdeque::{deque, Deque};

#[test]
fn encodes_like_a_vec() {
    let mut d = Deque::with_capacity(4);
    d.extend([0, 1, 2, 3]);
    d.remove_first_n(2);
    d.extend([4, 5]);
    assert!(!d.is_contiguous());

    let json = serde_json::to_string(&d).unwrap();
    assert_eq!(json, "[2,3,4,5]");
    assert_eq!(json, serde_json::to_string(&vec![2, 3, 4, 5]).unwrap());
}

#[test]
fn round_trip() {
    let d = deque!["front".to_string(), "middle".to_string(), "back".to_string()];
    let json = serde_json::to_string(&d).unwrap();
    let back: Deque<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, d);

    let empty: Deque<u8> = serde_json::from_str("[]").unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.capacity(), 0);
}

#[test]
fn rejects_non_sequences() {
    assert!(serde_json::from_str::<Deque<u8>>("{\"a\": 1}").is_err());
    assert!(serde_json::from_str::<Deque<u8>>("[1, 300]").is_err());
}
