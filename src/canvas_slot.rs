use std::cell::Cell;

/// Hands out one leaked `'static` copy per distinct value. Surfaces need a
/// `'static` canvas; restarting a session on the same canvas reuses the
/// earlier leak instead of leaking again.
pub fn leak_once<T: PartialEq + Clone + 'static>(
    slot: &Cell<Option<&'static T>>,
    value: &T,
) -> &'static T {
    match slot.get() {
        Some(leaked) if leaked == value => leaked,
        _ => {
            let leaked: &'static T = Box::leak(Box::new(value.clone()));
            slot.set(Some(leaked));
            leaked
        }
    }
}
