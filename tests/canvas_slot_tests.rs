// Host-side tests for the leaked surface canvas slot.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod canvas_slot {
    include!("../src/canvas_slot.rs");
}

use canvas_slot::leak_once;
use std::cell::Cell;

#[test]
fn same_canvas_is_leaked_once() {
    let slot = Cell::new(None);
    let first = leak_once(&slot, &String::from("app-canvas"));
    let second = leak_once(&slot, &String::from("app-canvas"));
    assert!(std::ptr::eq(first, second));
}

#[test]
fn replaced_canvas_gets_its_own_copy() {
    let slot = Cell::new(None);
    let first = leak_once(&slot, &String::from("app-canvas"));
    let other = leak_once(&slot, &String::from("other-canvas"));
    assert!(!std::ptr::eq(first, other));
    assert_eq!(other, "other-canvas");
    assert!(std::ptr::eq(other, leak_once(&slot, &String::from("other-canvas"))));
}
